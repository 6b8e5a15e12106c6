//! Quill CMS application crate.
//!
//! Exposes the built-in system addon so integration tests and embedders
//! can install it alongside third-party addons; the `quill-server`
//! binary is the usual entry point.

pub mod system;
