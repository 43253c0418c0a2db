//! Log and display helpers that keep secrets out of output

use std::fmt;

/// Masked display form of an API key
///
/// Shows the first 4 and last 4 characters; short keys are fully masked.
#[derive(Clone, Debug)]
pub struct SensitiveApiKey<'a> {
    inner: &'a str,
}

impl<'a> SensitiveApiKey<'a> {
    /// # Example
    /// ```
    /// use kea_relay::logging::SensitiveApiKey;
    ///
    /// let masked = SensitiveApiKey::new("0123456789abcdef");
    /// assert_eq!(masked.to_string(), "0123...cdef");
    /// ```
    pub fn new(key: &'a str) -> Self {
        Self { inner: key }
    }
}

impl fmt::Display for SensitiveApiKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<char> = self.inner.chars().collect();
        if chars.is_empty() {
            return Ok(());
        }
        if chars.len() <= 12 {
            return write!(f, "***");
        }

        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        write!(f, "{}...{}", head, tail)
    }
}
