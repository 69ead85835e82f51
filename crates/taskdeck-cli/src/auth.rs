//! Session persistence in the OS keychain, one entry per CLI profile.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;
use taskdeck_core::auth::{decode_stored_session, encode_session};
use taskdeck_core::{CredentialStore, Error, Result, Session};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "taskdeck";

#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    username: String,
}

impl KeyringCredentialStore {
    pub fn for_profile(profile_name: &str) -> Self {
        Self {
            username: format!("session:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::Storage(error.to_string()))
    }

    #[cfg(not(test))]
    fn read_raw(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(raw) => Ok(Some(raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn read_raw(&self) -> Result<Option<String>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    fn write_raw(&self, raw: &str) -> Result<()> {
        self.entry()?
            .set_password(raw)
            .map_err(|error| Error::Storage(error.to_string()))
    }

    #[cfg(test)]
    fn write_raw(&self, raw: &str) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(self.username.clone(), raw.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn delete_raw(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn delete_raw(&self) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn save(&self, session: &Session) -> Result<()> {
        self.write_raw(&encode_session(session)?)
    }

    fn read(&self) -> Option<Session> {
        match self.read_raw() {
            Ok(raw) => decode_stored_session(&raw?),
            Err(error) => {
                tracing::warn!("Failed to read stored session: {}", error);
                None
            }
        }
    }

    fn clear(&self) {
        if let Err(error) = self.delete_raw() {
            tracing::warn!("Failed to clear stored session: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sessions_are_kept_per_profile() {
        let work = KeyringCredentialStore::for_profile("keyring-test-work");
        let home = KeyringCredentialStore::for_profile("keyring-test-home");
        let session = Session::new("u1", "alice", "tok").unwrap();

        work.save(&session).unwrap();
        assert_eq!(work.read(), Some(session));
        assert_eq!(home.read(), None);

        work.clear();
        assert_eq!(work.read(), None);
        work.clear();
    }

    #[test]
    fn corrupt_entry_reads_as_signed_out() {
        let store = KeyringCredentialStore::for_profile("keyring-test-corrupt");
        store.write_raw("{not json").unwrap();
        assert_eq!(store.read(), None);

        store.write_raw(r#"{"userId":"u1","userName":"","token":"tok"}"#).unwrap();
        assert_eq!(store.read(), None);
        store.clear();
    }

    #[test]
    fn session_debug_redacts_token() {
        let session = Session::new("u1", "alice", "secret-token").unwrap();
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
