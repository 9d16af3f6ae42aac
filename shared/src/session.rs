//! Session and preference state, mirrored to the key-value store.
//!
//! Every transition returns the writes that bring the store back in line with
//! memory; the caller issues them immediately, so the two never drift.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::capabilities::{
    decode_flag, decode_json, decode_text, KvError, StorageKey, StoreWrite,
};
use crate::i18n::Language;
use crate::{GUEST_EMAIL, GUEST_NAME, SIGNED_IN_EMAIL, SIGNED_IN_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn,
}

impl SessionState {
    #[must_use]
    pub const fn is_logged_in(self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

impl UserProfile {
    #[must_use]
    pub fn guest() -> Self {
        Self {
            name: GUEST_NAME.into(),
            email: GUEST_EMAIL.into(),
        }
    }

    /// The fixed identity every successful login substitutes.
    #[must_use]
    pub fn signed_in() -> Self {
        Self {
            name: SIGNED_IN_NAME.into(),
            email: SIGNED_IN_EMAIL.into(),
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::guest()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub dark_mode: bool,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    state: SessionState,
    profile: UserProfile,
    preferences: Preferences,
}

impl Session {
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in()
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn login(&mut self) -> Result<Vec<StoreWrite>, KvError> {
        let profile = UserProfile::signed_in();
        let profile_write = StoreWrite::json(StorageKey::User, &profile)?;

        self.state = SessionState::LoggedIn;
        self.profile = profile;

        Ok(vec![StoreWrite::flag(StorageKey::LoggedIn, true), profile_write])
    }

    pub fn logout(&mut self) -> Result<Vec<StoreWrite>, KvError> {
        let profile = UserProfile::guest();
        let profile_write = StoreWrite::json(StorageKey::User, &profile)?;

        self.state = SessionState::LoggedOut;
        self.profile = profile;

        Ok(vec![StoreWrite::flag(StorageKey::LoggedIn, false), profile_write])
    }

    pub fn toggle_dark_mode(&mut self) -> StoreWrite {
        self.preferences.dark_mode = !self.preferences.dark_mode;
        StoreWrite::flag(StorageKey::DarkMode, self.preferences.dark_mode)
    }

    pub fn toggle_language(&mut self) -> StoreWrite {
        self.preferences.language = self.preferences.language.toggled();
        StoreWrite {
            key: StorageKey::Language,
            value: self.preferences.language.code().as_bytes().to_vec(),
        }
    }

    /// Rebuilds the session from whatever the store held at start-up.
    ///
    /// Missing entries take their defaults; malformed ones are logged and
    /// treated as missing.
    #[must_use]
    pub fn restore(stored: &HashMap<StorageKey, Vec<u8>>) -> Self {
        let raw = |key: StorageKey| stored.get(&key).map(Vec::as_slice);

        let logged_in = decode_flag(StorageKey::LoggedIn, raw(StorageKey::LoggedIn))
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring stored session flag");
                false
            });

        let dark_mode = decode_flag(StorageKey::DarkMode, raw(StorageKey::DarkMode))
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring stored dark mode flag");
                false
            });

        let language = match raw(StorageKey::Language).map(|bytes| decode_language(bytes)) {
            None => Language::default(),
            Some(Ok(language)) => language,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring stored language");
                Language::default()
            }
        };

        let profile = if logged_in {
            match raw(StorageKey::User).map(|bytes| decode_json::<UserProfile>(StorageKey::User, bytes)) {
                Some(Ok(profile)) => profile,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "stored profile is malformed, using guest");
                    UserProfile::guest()
                }
                None => UserProfile::guest(),
            }
        } else {
            UserProfile::guest()
        };

        Self {
            state: if logged_in {
                SessionState::LoggedIn
            } else {
                SessionState::LoggedOut
            },
            profile,
            preferences: Preferences {
                dark_mode,
                language,
            },
        }
    }
}

fn decode_language(raw: &[u8]) -> Result<Language, KvError> {
    let code = decode_text(StorageKey::Language, raw)?;
    Language::from_code(code).ok_or_else(|| KvError::UnexpectedValue {
        key: StorageKey::Language,
        value: code.to_string(),
    })
}

/// Collects the start-up reads until every key has answered.
#[derive(Debug, Clone, Default)]
pub struct Hydration {
    answered: HashMap<StorageKey, Option<Vec<u8>>>,
}

impl Hydration {
    pub fn record(&mut self, key: StorageKey, value: Option<Vec<u8>>) {
        self.answered.insert(key, value);
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        StorageKey::ALL
            .iter()
            .all(|key| self.answered.contains_key(key))
    }

    #[must_use]
    pub fn pending(&self) -> Vec<StorageKey> {
        StorageKey::ALL
            .into_iter()
            .filter(|key| !self.answered.contains_key(key))
            .collect()
    }

    /// Present values only; keys that answered "absent" are left out.
    #[must_use]
    pub fn into_stored(self) -> HashMap<StorageKey, Vec<u8>> {
        self.answered
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stored(entries: &[(StorageKey, &str)]) -> HashMap<StorageKey, Vec<u8>> {
        entries
            .iter()
            .map(|(key, value)| (*key, value.as_bytes().to_vec()))
            .collect()
    }

    fn written(writes: &[StoreWrite], key: StorageKey) -> Option<Vec<u8>> {
        writes
            .iter()
            .rev()
            .find(|w| w.key == key)
            .map(|w| w.value.clone())
    }

    #[test]
    fn empty_store_restores_defaults() {
        let session = Session::restore(&HashMap::new());
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert!(!session.preferences().dark_mode);
        assert_eq!(session.preferences().language, Language::En);
        assert_eq!(session.profile(), &UserProfile::guest());
    }

    #[test]
    fn only_exact_true_literal_logs_in() {
        let session = Session::restore(&stored(&[(StorageKey::LoggedIn, "true")]));
        assert!(session.is_logged_in());

        for raw in ["True", "1", "yes", "false", ""] {
            let session = Session::restore(&stored(&[(StorageKey::LoggedIn, raw)]));
            assert!(!session.is_logged_in(), "{raw:?} must not log in");
        }
    }

    #[test]
    fn restores_stored_preferences() {
        let session = Session::restore(&stored(&[
            (StorageKey::DarkMode, "true"),
            (StorageKey::Language, "ru"),
        ]));
        assert!(session.preferences().dark_mode);
        assert_eq!(session.preferences().language, Language::Ru);
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let session = Session::restore(&stored(&[(StorageKey::Language, "fr")]));
        assert_eq!(session.preferences().language, Language::En);
    }

    #[test]
    fn restores_stored_profile_when_logged_in() {
        let session = Session::restore(&stored(&[
            (StorageKey::LoggedIn, "true"),
            (StorageKey::User, r#"{"name":"Admin","email":"admin@example.com"}"#),
        ]));
        assert_eq!(session.profile(), &UserProfile::signed_in());
    }

    #[test]
    fn malformed_profile_falls_back_to_guest() {
        let session = Session::restore(&stored(&[
            (StorageKey::LoggedIn, "true"),
            (StorageKey::User, r#"{"name":"#),
        ]));
        assert!(session.is_logged_in());
        assert_eq!(session.profile(), &UserProfile::guest());
    }

    #[test]
    fn logged_out_session_ignores_stored_profile() {
        let session = Session::restore(&stored(&[
            (StorageKey::LoggedIn, "false"),
            (StorageKey::User, r#"{"name":"Admin","email":"admin@example.com"}"#),
        ]));
        assert_eq!(session.profile(), &UserProfile::guest());
    }

    #[test]
    fn login_writes_flag_and_profile() {
        let mut session = Session::default();
        let writes = session.login().unwrap();

        assert!(session.is_logged_in());
        assert_eq!(session.profile(), &UserProfile::signed_in());
        assert_eq!(written(&writes, StorageKey::LoggedIn), Some(b"true".to_vec()));

        let profile: UserProfile =
            serde_json::from_slice(&written(&writes, StorageKey::User).unwrap()).unwrap();
        assert_eq!(profile, UserProfile::signed_in());
    }

    #[test]
    fn logout_writes_false_and_guest_profile() {
        let mut session = Session::default();
        session.login().unwrap();
        let writes = session.logout().unwrap();

        assert!(!session.is_logged_in());
        assert_eq!(session.profile(), &UserProfile::guest());
        assert_eq!(written(&writes, StorageKey::LoggedIn), Some(b"false".to_vec()));
    }

    #[test]
    fn toggles_write_their_new_value() {
        let mut session = Session::default();
        assert_eq!(session.toggle_dark_mode().value, b"true".to_vec());
        assert_eq!(session.toggle_language().value, b"ru".to_vec());
        assert_eq!(session.toggle_language().value, b"en".to_vec());
    }

    #[test]
    fn hydration_completes_after_all_keys() {
        let mut hydration = Hydration::default();
        assert_eq!(hydration.pending().len(), 4);

        hydration.record(StorageKey::LoggedIn, Some(b"true".to_vec()));
        hydration.record(StorageKey::DarkMode, None);
        hydration.record(StorageKey::Language, None);
        assert!(!hydration.is_complete());
        assert_eq!(hydration.pending(), vec![StorageKey::User]);

        hydration.record(StorageKey::User, None);
        assert!(hydration.is_complete());

        let stored = hydration.into_stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get(&StorageKey::LoggedIn), Some(&b"true".to_vec()));
    }

    proptest! {
        #[test]
        fn session_flag_written_matches_memory(ops in proptest::collection::vec(any::<bool>(), 1..32)) {
            let mut session = Session::default();
            for login in ops {
                let writes = if login { session.login() } else { session.logout() }.unwrap();
                let flag = written(&writes, StorageKey::LoggedIn).unwrap();
                prop_assert_eq!(flag, crate::capabilities::encode_flag(session.is_logged_in()));
            }
        }

        #[test]
        fn double_toggle_is_identity(dark in any::<bool>(), russian in any::<bool>()) {
            let mut stored_entries = HashMap::new();
            stored_entries.insert(StorageKey::DarkMode, crate::capabilities::encode_flag(dark));
            stored_entries.insert(
                StorageKey::Language,
                if russian { b"ru".to_vec() } else { b"en".to_vec() },
            );
            let mut session = Session::restore(&stored_entries);
            let before = session.preferences();

            session.toggle_dark_mode();
            let write = session.toggle_dark_mode();
            session.toggle_language();
            session.toggle_language();

            prop_assert_eq!(session.preferences(), before);
            prop_assert_eq!(write.value, crate::capabilities::encode_flag(dark));
        }
    }
}
