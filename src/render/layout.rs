use super::html::escape;
use super::{Page, TemplateData};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #212529; }
nav { background: #343a40; padding: 0.75rem 1.5rem; }
nav a { color: #f8f9fa; margin-right: 1rem; text-decoration: none; }
nav a.brand { font-weight: 700; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.alert { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.alert-success { background: #d1e7dd; }
.alert-warning { background: #fff3cd; }
.alert-danger { background: #f8d7da; }
.field-error { color: #dc3545; font-size: 0.875rem; }
.btn { display: inline-block; padding: 0.5rem 1rem; background: #198754; color: #fff; border: 0; border-radius: 4px; text-decoration: none; }
footer { text-align: center; color: #6c757d; padding: 2rem 0; font-size: 0.875rem; }
"#;

/// Wrap a page body in the shared document shell.
pub fn base(site_name: &str, page: Page, data: &TemplateData, body: &str) -> String {
    let site = escape(site_name);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site}</title>
<style>{STYLE}</style>
</head>
<body data-page="{template}">
<nav>
<a class="brand" href="/">{site}</a>
<a href="/">Home</a>
<a href="/about">About</a>
<a href="/generals">General's Quarters</a>
<a href="/majors">Major's Suite</a>
<a href="/search-availability">Book Now</a>
<a href="/contact">Contact</a>
</nav>
<main>
{alerts}{body}
</main>
<footer>&copy; {site}</footer>
</body>
</html>
"#,
        title = escape(page.title()),
        template = page.template_name(),
        alerts = alerts(data),
    )
}

fn alerts(data: &TemplateData) -> String {
    [
        ("alert-success", &data.flash),
        ("alert-warning", &data.warning),
        ("alert-danger", &data.error),
    ]
    .into_iter()
    .filter_map(|(class, message)| {
        message
            .as_deref()
            .map(|m| format!("<div class=\"alert {class}\" role=\"alert\">{}</div>\n", escape(m)))
    })
    .collect()
}
