//! [`Key`] is a wrapper around a SafeComms API key.

#[cfg(feature = "memsecurity")]
mod encrypted;
#[cfg(feature = "memsecurity")]
pub use encrypted::Key;
#[cfg(not(feature = "memsecurity"))]
mod unencrypted;
#[cfg(not(feature = "memsecurity"))]
pub use unencrypted::Key;

/// Error for when a key cannot be used as a bearer credential.
#[derive(Debug, thiserror::Error)]
pub enum InvalidKey {
    /// The key is empty.
    #[error("API key is empty.")]
    Empty,
    /// The key contains a byte that cannot appear in an `Authorization`
    /// header.
    #[error("API key contains an invalid byte at offset {offset}.")]
    InvalidByte {
        /// Offset of the first invalid byte.
        offset: usize,
    },
}

/// Keys must be non-empty printable ASCII so the `Authorization` header can
/// always be built from them. This is checked once, at construction.
pub(crate) fn validate(bytes: &[u8]) -> Result<(), InvalidKey> {
    if bytes.is_empty() {
        return Err(InvalidKey::Empty);
    }
    if let Some(offset) = bytes.iter().position(|b| !b.is_ascii_graphic()) {
        return Err(InvalidKey::InvalidByte { offset });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(validate(b"sc-test-key").is_ok());

        let err = validate(b"").unwrap_err();
        assert_eq!(err.to_string(), "API key is empty.");

        let err = validate(b"sc test key").unwrap_err();
        assert_eq!(
            err.to_string(),
            "API key contains an invalid byte at offset 2."
        );
    }
}
