//! Credential models, WSSE signing, and authentication header resolution.

pub mod scheme;
pub mod secret;
pub mod wsse;

pub use scheme::*;
pub use secret::*;
pub use wsse::*;
