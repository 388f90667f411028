/// Fallback IANA timezone for users who have not stored one.
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";
