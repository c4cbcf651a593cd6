//! API token persistence via OS keyring
//!
//! The backend credential is stored in the operating system's native
//! credential store (Keychain on macOS, Secret Service on Linux, Windows
//! Credential Manager on Windows). The `CAMPMATE_TOKEN` environment variable
//! overrides the keyring, which is what CI and scripted use rely on.

use crate::error::{CampmateError, Result};

/// Environment variable that bypasses the keyring entirely.
pub const TOKEN_ENV: &str = "CAMPMATE_TOKEN";

const SERVICE: &str = "campmate";
const ACCOUNT: &str = "api-token";

/// Stateless accessor for the stored API token.
///
/// # Examples
///
/// ```no_run
/// use campmate::auth::TokenStore;
///
/// # fn example() -> campmate::error::Result<()> {
/// let store = TokenStore;
/// store.store("secret-token")?;
/// let token = store.load()?;
/// # Ok(())
/// # }
/// ```
pub struct TokenStore;

impl TokenStore {
    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(SERVICE, ACCOUNT)
            .map_err(CampmateError::Keyring)
            .map_err(Into::into)
    }

    /// Resolve the API token: environment variable first, keyring second.
    ///
    /// # Errors
    ///
    /// Returns [`CampmateError::MissingCredentials`] when neither source has
    /// a token, or [`CampmateError::Keyring`] on an unexpected credential
    /// store failure.
    pub fn load(&self) -> Result<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                tracing::debug!("using API token from {}", TOKEN_ENV);
                return Ok(token);
            }
        }

        match self.entry()?.get_password() {
            Ok(token) => Ok(token),
            Err(keyring::Error::NoEntry) => Err(CampmateError::MissingCredentials(format!(
                "no API token stored; run `campmate auth login` or set {}",
                TOKEN_ENV
            ))
            .into()),
            Err(e) => Err(CampmateError::Keyring(e).into()),
        }
    }

    /// Whether a token is available from either source.
    pub fn is_configured(&self) -> bool {
        self.load().is_ok()
    }

    /// Persist a token in the keyring.
    pub fn store(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .map_err(CampmateError::Keyring)?;
        Ok(())
    }

    /// Remove the stored token. A no-op when nothing is stored.
    pub fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CampmateError::Keyring(e).into()),
        }
    }
}
