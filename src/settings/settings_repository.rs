use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::user_settings;
use crate::settings::settings_model::UserSettings;
use crate::settings::settings_traits::SettingsRepositoryTrait;

pub struct SettingsRepository {
    pool: Arc<DbPool>,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SettingsRepository { pool }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_settings(&self, owner: &str) -> Result<Option<UserSettings>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(user_settings::table
            .find(owner)
            .first::<UserSettings>(&mut conn)
            .optional()?)
    }

    async fn upsert_timezone(&self, owner: &str, tz_name: &str) -> Result<UserSettings> {
        let now = Utc::now().naive_utc();
        let row = UserSettings {
            user_id: owner.to_string(),
            timezone: tz_name.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(user_settings::table)
            .values(&row)
            .on_conflict(user_settings::user_id)
            .do_update()
            .set((
                user_settings::timezone.eq(tz_name.to_string()),
                user_settings::updated_at.eq(now),
            ))
            .execute(&mut conn)?;

        Ok(user_settings::table.find(owner).first(&mut conn)?)
    }
}
