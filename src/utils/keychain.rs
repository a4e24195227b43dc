//! Secure API key storage using OS keychain
//!
//! Used as the fallback when a provider's API key is not set in the
//! environment:
//! - Windows: Windows Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)
//! - macOS: macOS Keychain

use crate::error::{AppError, Result};
use keyring::Entry;

/// Keychain service name for Advisor Scribe
const SERVICE_NAME: &str = "advisor-scribe";

/// Trait for keychain operations - allows for mocking in tests
pub trait KeychainPort: Send + Sync {
    fn save_api_key(&self, provider: &str, api_key: &str) -> Result<()>;
    fn get_api_key(&self, provider: &str) -> Result<String>;
    fn has_api_key(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_ok()
    }
}

/// Keychain account for an LLM provider
fn account(provider: &str) -> String {
    format!("llm_{}", provider)
}

/// Keychain manager for secure API key storage using OS keychain
#[derive(Default)]
pub struct KeychainManager;

impl KeychainManager {
    /// Creates a new KeychainManager instance
    pub fn new() -> Self {
        Self
    }
}

impl KeychainPort for KeychainManager {
    fn save_api_key(&self, provider: &str, api_key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, &account(provider))
            .map_err(|e| AppError::Keychain(e.to_string()))?;

        entry
            .set_password(api_key)
            .map_err(|e| AppError::Keychain(format!("Failed to save API key: {}", e)))?;

        log::info!("API key saved for {}", provider);
        Ok(())
    }

    fn get_api_key(&self, provider: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, &account(provider))
            .map_err(|e| AppError::Keychain(e.to_string()))?;

        entry
            .get_password()
            .map_err(|e| AppError::Keychain(format!("Failed to retrieve API key: {}", e)))
    }
}

#[cfg(test)]
pub use mock::MockKeychain;

#[cfg(test)]
mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mock keychain implementation for testing (in-memory storage)
    #[derive(Clone, Default)]
    pub struct MockKeychain {
        storage: Arc<Mutex<HashMap<String, String>>>,
    }

    impl MockKeychain {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl KeychainPort for MockKeychain {
        fn save_api_key(&self, provider: &str, api_key: &str) -> Result<()> {
            self.storage
                .lock()
                .unwrap()
                .insert(account(provider), api_key.to_string());
            Ok(())
        }

        fn get_api_key(&self, provider: &str) -> Result<String> {
            let key = account(provider);
            self.storage
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .ok_or_else(|| AppError::Keychain(format!("API key not found for {}", key)))
        }
    }
}
