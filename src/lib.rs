#![deny(warnings)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! `safecomms` is a crate providing ergonomic access to the [SafeComms
//! moderation API].
//!
//! To get started, create a [`Client`] with your API key and use it to
//! moderate [`moderation::Text`], inline [`moderation::Image`] payloads, or
//! [`moderation::File`] uploads. The API returns open JSON objects
//! ([`response::Moderation`], [`response::Usage`]) which are inspected by
//! key rather than deserialized into a fixed schema.
//!
//! [SafeComms moderation API]: <https://api.safecomms.dev>
//!
//! See the `demos` directory for more detailed usage.

pub mod key;
pub use key::Key;

pub mod client;
pub use client::Client;

pub mod moderation;

pub mod response;

/// Re-exports of commonly used crates to avoid version conflicts and reduce
/// dependency bloat.
pub mod exports {
    pub use base64;
    #[cfg(feature = "image")]
    pub use image;
    #[cfg(feature = "log")]
    pub use log;
    #[cfg(feature = "memsecurity")]
    pub use memsecurity;
    pub use reqwest;
    pub use serde;
    pub use serde_json;
}

/// Re-export of `serde_json::json!` for convenience because this is used
/// frequently.
pub use exports::serde_json::json;
