use async_trait::async_trait;
use chrono_tz::Tz;

use crate::errors::Result;
use crate::session::SessionContext;
use crate::settings::settings_model::UserSettings;

/// Trait for user settings repository operations
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    fn get_settings(&self, owner: &str) -> Result<Option<UserSettings>>;
    async fn upsert_timezone(&self, owner: &str, timezone: &str) -> Result<UserSettings>;
}

/// Trait for user settings service operations
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    /// The user's stored timezone, falling back to the default zone when
    /// unset or unparseable.
    fn get_timezone(&self, owner: &str) -> Result<Tz>;
    async fn set_timezone(&self, owner: &str, timezone: &str) -> Result<UserSettings>;
    /// Builds the session context handed to every other service.
    fn session_for(&self, owner: &str) -> Result<SessionContext>;
}
