//! Plain [`Key`] management for SafeComms API keys. The key is zeroized on
//! drop but not encrypted in memory. Enable the `memsecurity` feature for an
//! encrypted alternative.

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Stores a SafeComms API key. The key is zeroized on drop. The object
/// features a [`Display`] implementation that can be used to write out the
/// key. **Be sure to zeroize whatever you write it to**.
///
/// [`Display`]: std::fmt::Display
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Key {
    v: Vec<u8>,
}

impl Key {
    /// Read the key.
    pub fn read(&self) -> &[u8] {
        &self.v
    }
}

impl TryFrom<String> for Key {
    type Error = super::InvalidKey;

    /// Create a new key from a string. The string is zeroized after
    /// conversion.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        // This just unwraps the internal Vec<u8> so the data can still be
        // zeroized if validation rejects it.
        let mut v = Zeroizing::new(s.into_bytes());
        super::validate(&v)?;

        // Move the bytes out of the wrapper. The `Key` zeroizes them on drop
        // instead.
        Ok(Self {
            v: std::mem::take(&mut *v),
        })
    }
}

impl std::fmt::Display for Key {
    /// Write out the key. Make sure to zeroize whatever you write it to if at
    /// all possible.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Unwrap can never panic because a Key can only be created from a
        // String which is guaranteed to be valid UTF-8.
        let key_str = std::str::from_utf8(&self.v).unwrap();
        write!(f, "{}", key_str)
    }
}

impl std::fmt::Debug for Key {
    /// Redacted. The key material is never written out by `Debug`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::super::InvalidKey;
    use super::*;

    // Note: Not a real key. As is warned in the docs above, do not use a
    // string literal for a real key. There is no TryFrom<&'static str> for
    // Key for this reason.
    const API_KEY: &str = "sc-live-9hc2vvrtLx0aB0LqnyEaUVigQg5s";

    #[test]
    fn test_key() {
        let key = Key::try_from(API_KEY.to_string()).unwrap();
        let key_str = key.to_string();
        assert_eq!(key_str, API_KEY);
    }

    #[test]
    fn test_empty_key() {
        let err = Key::try_from(String::new()).unwrap_err();
        assert!(matches!(err, InvalidKey::Empty));
        assert_eq!(err.to_string(), "API key is empty.");
    }

    #[test]
    fn test_invalid_byte() {
        let err = Key::try_from("sc live key".to_string()).unwrap_err();
        assert!(matches!(err, InvalidKey::InvalidByte { offset: 2 }));
        assert_eq!(
            err.to_string(),
            "API key contains an invalid byte at offset 2."
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = Key::try_from(API_KEY.to_string()).unwrap();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(API_KEY));
    }
}
