use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::constants::DEFAULT_TIMEZONE;

/// Returns the fallback timezone used when a user has none stored.
pub fn default_timezone() -> Tz {
    DEFAULT_TIMEZONE.parse().unwrap_or(chrono_tz::America::Chicago)
}

/// Per-session actor context: which user is operating and in which local
/// timezone. Built at login, dropped at logout, and passed explicitly to every
/// operation that needs ownership filtering or local-date arithmetic.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: String,
    pub timezone: Tz,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, timezone: Tz) -> Self {
        SessionContext {
            user_id: user_id.into(),
            timezone,
        }
    }

    pub fn with_default_timezone(user_id: impl Into<String>) -> Self {
        Self::new(user_id, default_timezone())
    }

    /// Today's date in the session's local timezone.
    pub fn today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timezone_is_chicago() {
        assert_eq!(default_timezone(), chrono_tz::America::Chicago);
    }

    #[test]
    fn test_context_carries_explicit_timezone() {
        let ctx = SessionContext::new("user-1", chrono_tz::Asia::Tokyo);
        assert_eq!(ctx.user_id, "user-1");
        assert_eq!(ctx.timezone, chrono_tz::Asia::Tokyo);
    }
}
