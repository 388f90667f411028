use async_trait::async_trait;
use chrono_tz::Tz;
use log::warn;
use std::sync::Arc;

use crate::errors::{Error, Result, ValidationError};
use crate::session::{default_timezone, SessionContext};
use crate::settings::settings_model::UserSettings;
use crate::settings::settings_traits::{SettingsRepositoryTrait, SettingsServiceTrait};

pub struct SettingsService {
    repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService { repository }
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_timezone(&self, owner: &str) -> Result<Tz> {
        let stored = self.repository.get_settings(owner)?;
        Ok(match stored {
            Some(settings) => settings.timezone.parse().unwrap_or_else(|_| {
                warn!(
                    "stored timezone '{}' for user {} is not a valid IANA zone, using default",
                    settings.timezone, owner
                );
                default_timezone()
            }),
            None => default_timezone(),
        })
    }

    async fn set_timezone(&self, owner: &str, tz_name: &str) -> Result<UserSettings> {
        if tz_name.parse::<Tz>().is_err() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "'{}' is not a valid IANA timezone",
                tz_name
            ))));
        }
        self.repository.upsert_timezone(owner, tz_name).await
    }

    fn session_for(&self, owner: &str) -> Result<SessionContext> {
        Ok(SessionContext::new(owner, self.get_timezone(owner)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock;

    struct MockSettingsRepository {
        row: RwLock<Option<UserSettings>>,
    }

    impl MockSettingsRepository {
        fn with_timezone(timezone: Option<&str>) -> Self {
            let row = timezone.map(|tz_name| {
                let now = chrono::Utc::now().naive_utc();
                UserSettings {
                    user_id: "user-1".to_string(),
                    timezone: tz_name.to_string(),
                    created_at: now,
                    updated_at: now,
                }
            });
            Self {
                row: RwLock::new(row),
            }
        }
    }

    #[async_trait]
    impl SettingsRepositoryTrait for MockSettingsRepository {
        fn get_settings(&self, _owner: &str) -> Result<Option<UserSettings>> {
            Ok(self.row.read().unwrap().clone())
        }

        async fn upsert_timezone(&self, owner: &str, tz_name: &str) -> Result<UserSettings> {
            let now = chrono::Utc::now().naive_utc();
            let row = UserSettings {
                user_id: owner.to_string(),
                timezone: tz_name.to_string(),
                created_at: now,
                updated_at: now,
            };
            *self.row.write().unwrap() = Some(row.clone());
            Ok(row)
        }
    }

    #[test]
    fn test_missing_row_falls_back_to_default() {
        let service = SettingsService::new(Arc::new(MockSettingsRepository::with_timezone(None)));
        assert_eq!(service.get_timezone("user-1").unwrap(), default_timezone());
    }

    #[test]
    fn test_stored_zone_is_used() {
        let service = SettingsService::new(Arc::new(MockSettingsRepository::with_timezone(Some(
            "Europe/Paris",
        ))));
        assert_eq!(
            service.get_timezone("user-1").unwrap(),
            chrono_tz::Europe::Paris
        );
    }

    #[test]
    fn test_garbage_zone_falls_back_to_default() {
        let service = SettingsService::new(Arc::new(MockSettingsRepository::with_timezone(Some(
            "Mars/Olympus_Mons",
        ))));
        assert_eq!(service.get_timezone("user-1").unwrap(), default_timezone());
    }

    #[tokio::test]
    async fn test_set_timezone_rejects_invalid_zone() {
        let service = SettingsService::new(Arc::new(MockSettingsRepository::with_timezone(None)));
        let err = service.set_timezone("user-1", "not-a-zone").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_session_for_builds_context() {
        let service = SettingsService::new(Arc::new(MockSettingsRepository::with_timezone(Some(
            "Asia/Tokyo",
        ))));
        let ctx = service.session_for("user-1").unwrap();
        assert_eq!(ctx.user_id, "user-1");
        assert_eq!(ctx.timezone, chrono_tz::Asia::Tokyo);
    }
}
