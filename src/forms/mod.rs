//! Submitted-form validation.
//!
//! A [`Form`] wraps the posted key/value pairs. Each check records a message
//! against the offending field and never stops the others from running, so a
//! single round trip reports every problem; [`Form::valid`] is asked last.

mod errors;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

pub use errors::FormErrors;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("static regex is valid")
});

/// Posted form values plus the errors found in them.
#[derive(Debug, Clone, Default)]
pub struct Form {
    values: HashMap<String, String>,
    pub errors: FormErrors,
}

impl Form {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self {
            values,
            errors: FormErrors::default(),
        }
    }

    /// Raw submitted value, empty when the field was not sent.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Whether the field was submitted with something other than whitespace.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).trim().is_empty()
    }

    /// Every listed field must be present.
    pub fn required(&mut self, fields: &[&str]) -> &mut Self {
        for field in fields {
            if !self.has(field) {
                self.errors.add(field, "This field cannot be blank");
            }
        }
        self
    }

    /// The field must hold at least `length` characters.
    pub fn min_length(&mut self, field: &str, length: usize) -> &mut Self {
        if self.get(field).trim().chars().count() < length {
            self.errors.add(
                field,
                format!("This field must be at least {length} characters long"),
            );
        }
        self
    }

    /// The field must look like an email address.
    pub fn is_email(&mut self, field: &str) -> &mut Self {
        if !EMAIL_RE.is_match(self.get(field).trim()) {
            self.errors.add(field, "Invalid email address");
        }
        self
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> Form {
        Form::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_empty_form_is_valid() {
        assert!(Form::default().valid());
    }

    #[test]
    fn test_required() {
        let mut f = form(&[("first_name", "John"), ("last_name", "   ")]);
        f.required(&["first_name", "last_name", "email"]);

        assert!(!f.valid());
        assert_eq!(f.errors.get("first_name"), None);
        assert_eq!(f.errors.get("last_name"), Some("This field cannot be blank"));
        assert_eq!(f.errors.get("email"), Some("This field cannot be blank"));

        let mut f = form(&[("first_name", "John"), ("last_name", "Smith"), ("email", "a@b.com")]);
        f.required(&["first_name", "last_name", "email"]).is_email("email");
        assert!(f.valid());
    }

    #[test]
    fn test_min_length() {
        let mut f = form(&[("first_name", "Jo")]);
        f.min_length("first_name", 3);
        assert!(!f.valid());
        assert_eq!(
            f.errors.get("first_name"),
            Some("This field must be at least 3 characters long")
        );

        let mut f = form(&[("first_name", "Joe")]);
        f.min_length("first_name", 3);
        assert!(f.valid());
    }

    #[test]
    fn test_min_length_counts_characters() {
        let mut f = form(&[("first_name", "Zoë")]);
        f.min_length("first_name", 3);
        assert!(f.valid());
    }

    #[test]
    fn test_is_email() {
        for good in ["a@b.com", "first.last+tag@mail.example.org"] {
            let mut f = form(&[("email", good)]);
            f.is_email("email");
            assert!(f.valid(), "{good} should pass");
        }
        for bad in ["not-an-email", "a@b", "@b.com", "a b@c.com", ""] {
            let mut f = form(&[("email", bad)]);
            f.is_email("email");
            assert!(!f.valid(), "{bad} should fail");
            assert_eq!(f.errors.get("email"), Some("Invalid email address"));
        }
    }

    #[test]
    fn test_checks_accumulate() {
        let mut f = form(&[("first_name", "Al"), ("email", "nope")]);
        f.required(&["first_name", "last_name", "email"])
            .min_length("first_name", 3)
            .is_email("email");

        assert_eq!(f.errors.len(), 3);
        assert!(f.errors.get("first_name").is_some());
        assert!(f.errors.get("last_name").is_some());
        assert!(f.errors.get("email").is_some());
    }
}
