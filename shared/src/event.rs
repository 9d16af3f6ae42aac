use serde::{Deserialize, Serialize};

use crate::auth::PasswordInput;
use crate::capabilities::{KvReply, StorageKey};
use crate::catalog::ProductId;
use crate::model::{Route, Section};

#[derive(Serialize, Deserialize, Debug)]
pub enum Event {
    /// First event from the shell; reads every persisted entry.
    Startup,

    Navigate { route: Route },
    SectionSelected { section: Section },

    UsernameChanged { value: String },
    PasswordChanged { value: PasswordInput },
    LoginSubmitted,
    AlertDismissed,
    LogoutRequested,
    ProfileMenuToggled,

    DarkModeToggled,
    LanguageToggled,

    /// One wall-clock sample. The shell sends one as soon as
    /// `ViewModel::clock_running` turns on and then every `TICK_INTERVAL_MS`
    /// while it stays on; until the first one the date and time cards are empty.
    ClockTicked {
        timestamp_ms: i64,
        utc_offset_minutes: i32,
    },

    NewProductNameChanged { value: String },
    NewProductPriceChanged { value: String },
    NewProductImageSelected { uri: String },
    /// `timestamp_ms` is the shell's wall clock at submit; new ids derive from it.
    AddProductSubmitted { timestamp_ms: i64 },

    EditProductRequested { id: ProductId },
    EditNameChanged { value: String },
    EditPriceChanged { value: String },
    EditImageSelected { uri: String },
    EditSaved,
    EditCancelled,
    DeleteProductRequested { id: ProductId },

    // Capability callbacks; never sent by the shell.
    #[serde(skip)]
    StoredValueLoaded { key: StorageKey, result: KvReply },
    #[serde(skip)]
    StoredValueWritten { key: StorageKey, result: KvReply },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Navigate { .. } => "navigate",
            Self::SectionSelected { .. } => "section_selected",
            Self::UsernameChanged { .. } => "username_changed",
            Self::PasswordChanged { .. } => "password_changed",
            Self::LoginSubmitted => "login_submitted",
            Self::AlertDismissed => "alert_dismissed",
            Self::LogoutRequested => "logout_requested",
            Self::ProfileMenuToggled => "profile_menu_toggled",
            Self::DarkModeToggled => "dark_mode_toggled",
            Self::LanguageToggled => "language_toggled",
            Self::ClockTicked { .. } => "clock_ticked",
            Self::NewProductNameChanged { .. } => "new_product_name_changed",
            Self::NewProductPriceChanged { .. } => "new_product_price_changed",
            Self::NewProductImageSelected { .. } => "new_product_image_selected",
            Self::AddProductSubmitted { .. } => "add_product_submitted",
            Self::EditProductRequested { .. } => "edit_product_requested",
            Self::EditNameChanged { .. } => "edit_name_changed",
            Self::EditPriceChanged { .. } => "edit_price_changed",
            Self::EditImageSelected { .. } => "edit_image_selected",
            Self::EditSaved => "edit_saved",
            Self::EditCancelled => "edit_cancelled",
            Self::DeleteProductRequested { .. } => "delete_product_requested",
            Self::StoredValueLoaded { .. } => "stored_value_loaded",
            Self::StoredValueWritten { .. } => "stored_value_written",
        }
    }

    /// Everything except the start-up signal, the clock, and capability callbacks.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::Startup
                | Self::ClockTicked { .. }
                | Self::StoredValueLoaded { .. }
                | Self::StoredValueWritten { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_events_deserialize() {
        let event: Event = serde_json::from_str(r#""LoginSubmitted""#).unwrap();
        assert!(matches!(event, Event::LoginSubmitted));

        let event: Event =
            serde_json::from_str(r#"{"Navigate":{"route":"dashboard"}}"#).unwrap();
        assert!(matches!(
            event,
            Event::Navigate {
                route: Route::Dashboard
            }
        ));

        let event: Event = serde_json::from_str(r#"{"DeleteProductRequested":{"id":2}}"#).unwrap();
        assert!(matches!(
            event,
            Event::DeleteProductRequested { id: ProductId(2) }
        ));
    }

    #[test]
    fn password_is_redacted_in_debug() {
        let event = Event::PasswordChanged {
            value: PasswordInput::new("hunter2"),
        };
        assert!(!format!("{event:?}").contains("hunter2"));
    }

    #[test]
    fn internal_events_are_not_user_initiated() {
        assert!(!Event::Startup.is_user_initiated());
        assert!(!Event::StoredValueWritten {
            key: StorageKey::DarkMode,
            result: Ok(None),
        }
        .is_user_initiated());
        assert!(Event::DarkModeToggled.is_user_initiated());
        assert_eq!(Event::DarkModeToggled.name(), "dark_mode_toggled");
    }
}
