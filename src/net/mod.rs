//! Network plumbing: optional TLS for the public listener.

pub mod tls;

pub use tls::load_tls_config;
