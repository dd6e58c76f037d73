//! Canonical UUID and timestamp identifier implementations.

use crate::{UuidError, UuidResult};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// A UUID held in canonical form (32 lowercase hex characters, no hyphens).
///
/// [`UuidService::new`] generates a fresh v4 value; [`UuidService::parse`] accepts only input
/// that is already canonical.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UuidService(Uuid);

impl Default for UuidService {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidService {
    /// Generates a new random (v4) UUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses a UUID string that must already be in canonical form.
    ///
    /// Hyphenated or uppercase forms are rejected rather than normalised.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "UUID must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid UUID '{}': {}", input, e)))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is exactly 32 lowercase hex characters.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for UuidService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for UuidService {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UuidService::parse(s)
    }
}

/// A time-prefixed unique identifier.
///
/// Format: `YYYYMMDDTHHMMSS.mmmZ-<canonical_uuid>`
///
/// When generated with the previously issued value, the timestamp is strictly greater than the
/// previous one (bumped by 1ms if the clock has not advanced), so identifiers issued by one
/// generator sort in issue order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimestampUuid {
    timestamp: DateTime<Utc>,
    uuid: UuidService,
}

impl TimestampUuid {
    /// Generate a new identifier, strictly later than `last_uid` when one is given.
    pub fn generate(last_uid: Option<&TimestampUuid>) -> Self {
        let now = Utc::now();

        let timestamp = match last_uid {
            Some(prev) if now <= prev.timestamp => prev.timestamp + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            timestamp,
            uuid: UuidService::new(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn uuid(&self) -> &UuidService {
        &self.uuid
    }

    /// The timestamp as an ISO-8601 / RFC 3339 string with millisecond precision.
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl FromStr for TimestampUuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ts_str, uuid_str) = s.split_once('-').ok_or_else(|| {
            UuidError::InvalidInput(format!("Invalid timestamp UID format: '{}'", s))
        })?;

        let ts_no_z = ts_str.strip_suffix('Z').ok_or_else(|| {
            UuidError::InvalidInput(format!("Timestamp must end with 'Z': '{}'", ts_str))
        })?;

        let naive =
            chrono::NaiveDateTime::parse_from_str(ts_no_z, "%Y%m%dT%H%M%S%.3f").map_err(|e| {
                UuidError::InvalidInput(format!("Invalid timestamp format '{}': {}", ts_str, e))
            })?;

        Ok(Self {
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc),
            uuid: UuidService::parse(uuid_str)?,
        })
    }
}

impl fmt::Display for TimestampUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.timestamp.format("%Y%m%dT%H%M%S%.3fZ"),
            self.uuid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_canonical_uuid() {
        let canonical = UuidService::new().to_string();

        assert_eq!(canonical.len(), 32);
        assert!(UuidService::is_canonical(&canonical));
    }

    #[test]
    fn test_parse_rejects_hyphenated_uuid() {
        let result = UuidService::parse("550e8400-e29b-41d4-a716-446655440000");

        match result {
            Err(UuidError::InvalidInput(msg)) => {
                assert!(msg.contains("32 lowercase hex characters"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_is_canonical_invalid() {
        assert!(!UuidService::is_canonical(
            "550E8400E29B41D4A716446655440000"
        ));
        assert!(!UuidService::is_canonical(
            "550e8400e29b41d4a716446655440zzz"
        ));
        assert!(!UuidService::is_canonical(""));
    }

    #[test]
    fn test_timestamp_uid_generate_monotonic_same_instant() {
        let uid1 = TimestampUuid::generate(None);
        let uid2 = TimestampUuid::generate(Some(&uid1));

        assert!(uid2.timestamp() > uid1.timestamp());
        assert_ne!(uid1.uuid(), uid2.uuid());
    }

    #[test]
    fn test_timestamp_uid_display_format() {
        let displayed = TimestampUuid::generate(None).to_string();

        let parts: Vec<&str> = displayed.split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].ends_with('Z'));
        assert!(UuidService::is_canonical(parts[1]));
    }

    #[test]
    fn test_timestamp_uid_parse_and_display_agree() {
        let original_str = "20260111T143522.045Z-550e8400e29b41d4a716446655440000";
        let uid = TimestampUuid::from_str(original_str).unwrap();

        assert_eq!(uid.to_string(), original_str);
        assert_eq!(uid.iso_timestamp(), "2026-01-11T14:35:22.045Z");
    }

    #[test]
    fn test_timestamp_uid_parse_missing_z_suffix() {
        let result = TimestampUuid::from_str("20260111T143522.045-550e8400e29b41d4a716446655440000");

        match result {
            Err(UuidError::InvalidInput(msg)) => assert!(msg.contains("must end with 'Z'")),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_timestamp_uid_parse_invalid_timestamp() {
        let result = TimestampUuid::from_str("20260199T143522.045Z-550e8400e29b41d4a716446655440000");

        match result {
            Err(UuidError::InvalidInput(msg)) => assert!(msg.contains("Invalid timestamp format")),
            _ => panic!("Expected InvalidInput error"),
        }
    }
}
