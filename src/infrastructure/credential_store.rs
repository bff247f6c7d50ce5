use crate::infrastructure::error::SyncError;
use std::sync::{Mutex, MutexGuard};

pub trait CredentialStore: Send + Sync {
    fn save_token(&self, token: &str) -> Result<(), SyncError>;
    fn load_token(&self) -> Result<Option<String>, SyncError>;
    fn delete_token(&self) -> Result<(), SyncError>;
}

#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service_name: String,
    account_name: String,
}

impl KeyringCredentialStore {
    pub fn new(service_name: impl Into<String>, account_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            account_name: account_name.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, SyncError> {
        keyring::Entry::new(&self.service_name, &self.account_name)
            .map_err(|error| SyncError::Credential(error.to_string()))
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new("timesync.timecamp", "default")
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn save_token(&self, token: &str) -> Result<(), SyncError> {
        let token = normalized_token(token)?;
        self.entry()?
            .set_password(token)
            .map_err(|error| SyncError::Credential(error.to_string()))
    }

    fn load_token(&self) -> Result<Option<String>, SyncError> {
        match self.entry()?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(SyncError::Credential(error.to_string())),
        }
    }

    fn delete_token(&self) -> Result<(), SyncError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(SyncError::Credential(error.to_string())),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl InMemoryCredentialStore {
    pub fn with_token(token: &str) -> Result<Self, SyncError> {
        let store = Self::default();
        store.save_token(token)?;
        Ok(store)
    }

    fn slot(&self) -> Result<MutexGuard<'_, Option<String>>, SyncError> {
        self.token
            .lock()
            .map_err(|_| SyncError::Credential("in-memory token slot is poisoned".to_string()))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn save_token(&self, token: &str) -> Result<(), SyncError> {
        let token = normalized_token(token)?.to_string();
        *self.slot()? = Some(token);
        Ok(())
    }

    fn load_token(&self) -> Result<Option<String>, SyncError> {
        Ok(self.slot()?.clone())
    }

    fn delete_token(&self) -> Result<(), SyncError> {
        self.slot()?.take();
        Ok(())
    }
}

fn normalized_token(token: &str) -> Result<&str, SyncError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SyncError::Credential("token must not be empty".to_string()));
    }
    Ok(token)
}

pub fn resolve_auth_token(
    configured: Option<&str>,
    store: &dyn CredentialStore,
) -> Result<String, SyncError> {
    if let Some(token) = configured.map(str::trim).filter(|token| !token.is_empty()) {
        return Ok(token.to_string());
    }
    store.load_token()?.ok_or_else(|| {
        SyncError::Credential(
            "no TimeCamp token configured; set TimeCamp.AuthToken or run `timesync token set`"
                .to_string(),
        )
    })
}
