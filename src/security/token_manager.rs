//! Secure handling of the feed API key
//!
//! The key is wrapped in `secrecy::SecretString` so that it cannot end up in
//! `Debug` output by accident, and every diagnostic line that might contain
//! it goes through `mask_in_string` first.

use secrecy::{ExposeSecret, SecretString};

/// Holder for the feed API key
///
/// # Examples
///
/// ```
/// use feed_pusher::security::SecureTokenManager;
/// use secrecy::SecretString;
///
/// let manager = SecureTokenManager::new(SecretString::new("oy2abcdef123456".into()));
/// assert_eq!(manager.masked(), "oy2...456");
/// ```
pub struct SecureTokenManager {
    api_key: SecretString,
}

impl SecureTokenManager {
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// The raw key, for handing to the child process argument vector only
    pub fn expose(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Masked form of the managed key
    pub fn masked(&self) -> String {
        Self::mask_token(self.api_key.expose_secret())
    }

    /// Masks a token for safe logging
    ///
    /// Shows only the first 3 and last 3 characters for identification purposes.
    /// Tokens shorter than 10 characters are fully masked as "****".
    ///
    /// # Examples
    ///
    /// ```
    /// use feed_pusher::security::SecureTokenManager;
    ///
    /// assert_eq!(SecureTokenManager::mask_token("abcdef123456"), "abc...456");
    /// assert_eq!(SecureTokenManager::mask_token("short"), "****");
    /// ```
    pub fn mask_token(token: &str) -> String {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() < 10 {
            return "****".to_string();
        }

        let prefix: String = chars[..3].iter().collect();
        let suffix: String = chars[chars.len() - 3..].iter().collect();
        format!("{}...{}", prefix, suffix)
    }

    /// Replace every occurrence of the managed key in `text` with its mask
    pub fn mask_in_string(&self, text: &str) -> String {
        let key = self.api_key.expose_secret();
        if key.is_empty() {
            return text.to_string();
        }
        text.replace(key, &self.masked())
    }
}
