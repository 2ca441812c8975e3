//! Access token storage

use crate::core::prompt::Prompt;
use crate::error::TokenError;
use keyring::Entry;
use tracing::debug;

/// Keyring service the token is filed under
pub const SERVICE_NAME: &str = "SwitchTube";

/// Page where users create new access tokens
pub const CREATE_TOKEN_URL: &str = "https://tube.switch.ch/access_tokens";

/// Environment variable that overrides the stored token
pub const TOKEN_ENV_VAR: &str = "SWITCHTUBE_TOKEN";

/// Source of the API access token
pub trait TokenProvider: Send + Sync {
    fn get(&self) -> Result<String, TokenError>;
}

/// Token fixed at construction, e.g. from the environment
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token from `SWITCHTUBE_TOKEN`, if set and non-empty
    pub fn from_env() -> Option<Self> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Self)
    }
}

impl TokenProvider for StaticToken {
    fn get(&self) -> Result<String, TokenError> {
        if self.0.is_empty() {
            return Err(TokenError::Empty);
        }
        Ok(self.0.clone())
    }
}

/// Low-level secret storage for a single account
pub trait SecretStore: Send + Sync {
    /// Stored secret, `None` when nothing is stored
    fn load(&self) -> Result<Option<String>, TokenError>;
    fn store(&self, secret: &str) -> Result<(), TokenError>;
    /// Returns false when there was nothing to delete
    fn remove(&self) -> Result<bool, TokenError>;
}

/// Secret storage in the operating system keyring
#[derive(Debug, Clone)]
pub struct KeyringBackend {
    service: String,
    user: String,
}

impl KeyringBackend {
    /// Entry for the current OS user under [`SERVICE_NAME`]
    pub fn new() -> Self {
        Self::with_user(current_user())
    }

    pub fn with_user(user: impl Into<String>) -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, TokenError> {
        Ok(Entry::new(&self.service, &self.user)?)
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringBackend {
    fn load(&self) -> Result<Option<String>, TokenError> {
        match self.entry()?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, secret: &str) -> Result<(), TokenError> {
        self.entry()?.set_password(secret)?;
        Ok(())
    }

    fn remove(&self) -> Result<bool, TokenError> {
        match self.entry()?.delete_password() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "default".to_string())
}

/// Result of an interactive `set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Stored,
    /// An existing token was kept
    Kept,
}

/// Token manager over a secret store
pub struct TokenStore<S = KeyringBackend> {
    backend: S,
}

impl TokenStore<KeyringBackend> {
    /// Store backed by the system keyring
    pub fn keyring() -> Self {
        Self::new(KeyringBackend::new())
    }
}

impl<S: SecretStore> TokenStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Stored token, or `NotFound`
    pub fn get(&self) -> Result<String, TokenError> {
        self.backend.load()?.ok_or(TokenError::NotFound)
    }

    /// Ask for a new token and store it.
    ///
    /// An existing token is only replaced after confirmation.
    pub fn set(&self, prompt: &dyn Prompt) -> Result<SetOutcome, TokenError> {
        if self.backend.load()?.is_some_and(|t| !t.is_empty())
            && !prompt.confirm("Token already exists in keyring. Do you want to replace it?")
        {
            debug!("Keeping existing token");
            return Ok(SetOutcome::Kept);
        }

        let token = prompt
            .input(&format!(
                "Create an access token at {} and paste it here",
                CREATE_TOKEN_URL
            ))
            .map_err(TokenError::ReadInput)?;
        if token.is_empty() {
            return Err(TokenError::Empty);
        }

        self.backend.store(&token)?;
        debug!("Token stored for service {}", SERVICE_NAME);
        Ok(SetOutcome::Stored)
    }

    /// Delete the stored token, `NotFound` if there is none
    pub fn delete(&self) -> Result<(), TokenError> {
        if self.backend.remove()? {
            Ok(())
        } else {
            Err(TokenError::NotFound)
        }
    }
}

impl<S: SecretStore> TokenProvider for TokenStore<S> {
    fn get(&self) -> Result<String, TokenError> {
        TokenStore::get(self)
    }
}
