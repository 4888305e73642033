//! Flat, line-oriented config files (INI and a TOML-like subset).
//!
//! ```text
//! [server]
//! port = 8080
//! ; listen backlog
//! backlog = 128
//! ```
//!
//! Every line becomes one [`Token`], comments and blank lines included, so a
//! [`Document`] can be changed and saved without losing its layout.
//!
//! ```
//! use flatini::Document;
//!
//! let mut doc: Document = "[server]\nport = 8080\n".parse().unwrap();
//! assert_eq!(doc.find::<u16>("server", "port"), Some(8080));
//! assert_eq!(doc.find_or("server", "backlog", 128), 128);
//!
//! assert_eq!(doc.set("server", "port", 9090), Ok(true));
//! assert_eq!(doc.to_string(), "[server]\nport = 9090\n");
//! ```

mod ini;

pub use self::ini::*;
