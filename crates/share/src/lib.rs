//! Shareable links for generated blocks.
//!
//! A share token carries an extent and the "hide map" display flag. The
//! encoding is reversible by anyone: it keeps links short and opaque-looking,
//! it does **not** protect the payload. Never put anything secret in it.

pub mod codec;
pub mod url;

pub use codec::*;
pub use url::*;
