//! User domain entity and related types.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MIN_NAME_LENGTH, TIMESTAMP_PRECISION_DIGITS, USER_ID_PREFIX,
};
use crate::error::{DomainError, DomainResult};

/// User domain entity
///
/// Stores hand out owned clones of this value, so mutating a returned `User`
/// never touches the stored record. Changes go back through the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user that has not been stored yet.
    ///
    /// The id is left empty for the store to assign; both timestamps are
    /// set to the same instant.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now();
        Self {
            id: String::new(),
            email: email.into(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the store has assigned an identifier yet
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Update user's name
    pub fn update_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = now();
    }

    /// Update user's email
    pub fn update_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.updated_at = now();
    }

    /// Fill in creation defaults: a fresh id when empty, `now` for zero
    /// timestamps. Timestamps are normalised to storage precision and
    /// `updated_at` never precedes `created_at`.
    pub fn prepare_for_insert(&mut self, now: DateTime<Utc>, id: impl FnOnce() -> String) {
        if !self.has_id() {
            self.id = id();
        }
        if is_zero_time(&self.created_at) {
            self.created_at = now;
        }
        if is_zero_time(&self.updated_at) {
            self.updated_at = now;
        }
        self.created_at = normalize(self.created_at);
        self.updated_at = normalize(self.updated_at).max(self.created_at);
    }

    /// Apply the persisted bookkeeping for an update against the `stored`
    /// record: `created_at` is kept and `updated_at` moves to `now`, never
    /// behind the stored `updated_at` or `created_at`.
    pub fn stamp_update(&mut self, stored: &User, now: DateTime<Utc>) {
        self.created_at = stored.created_at;
        self.updated_at = normalize(now)
            .max(stored.updated_at)
            .max(stored.created_at);
    }
}

/// Generate a collision-resistant user identifier (`user_` + 128 random bits).
pub fn generate_user_id() -> String {
    format!("{}{}", USER_ID_PREFIX, Uuid::new_v4().simple())
}

/// Current time at storage precision.
pub fn now() -> DateTime<Utc> {
    normalize(Utc::now())
}

/// Truncate a timestamp to the precision both stores keep.
pub fn normalize(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS)
}

/// The "unset" timestamp (Unix epoch, `DateTime::default()`).
pub fn is_zero_time(ts: &DateTime<Utc>) -> bool {
    *ts == DateTime::<Utc>::default()
}

/// Validate an email address for user creation or update.
pub fn validate_email(email: &str) -> DomainResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(DomainError::validation("email is required"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(DomainError::validation(format!(
            "email must be at most {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::validation("email is invalid")),
    }
}

/// Validate a display name for user creation or update.
pub fn validate_name(name: &str) -> DomainResult<()> {
    let len = name.trim().chars().count();
    if len < MIN_NAME_LENGTH {
        return Err(DomainError::validation("name is required"));
    }
    if len > MAX_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn new_user_has_no_id_and_equal_timestamps() {
        let user = User::new("a@x.com", "A");
        assert!(!user.has_id());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn prepare_for_insert_assigns_missing_fields() {
        let mut user = User {
            id: String::new(),
            email: "a@x.com".into(),
            name: "A".into(),
            created_at: DateTime::default(),
            updated_at: DateTime::default(),
        };
        let now = now();
        user.prepare_for_insert(now, || "user_fixed".to_string());

        assert_eq!(user.id, "user_fixed");
        assert_eq!(user.created_at, now);
        assert_eq!(user.updated_at, now);
    }

    #[test]
    fn prepare_for_insert_keeps_caller_values() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut user = User {
            id: "custom".into(),
            email: "a@x.com".into(),
            name: "A".into(),
            created_at: created,
            updated_at: created + Duration::seconds(5),
        };
        user.prepare_for_insert(now(), || unreachable!());

        assert_eq!(user.id, "custom");
        assert_eq!(user.created_at, created);
        assert_eq!(user.updated_at, created + Duration::seconds(5));
    }

    fn stored_at(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> User {
        User {
            id: "user_1".into(),
            email: "a@x.com".into(),
            name: "A".into(),
            created_at,
            updated_at,
        }
    }

    #[test]
    fn updated_at_never_precedes_created_at() {
        let created = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let mut user = User::new("a@x.com", "A");
        user.stamp_update(&stored_at(created, created), created - Duration::hours(1));
        assert_eq!(user.created_at, created);
        assert_eq!(user.updated_at, created);
    }

    #[test]
    fn updated_at_never_moves_backwards() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let previous = created + Duration::hours(2);
        let mut user = User::new("a@x.com", "A");

        user.stamp_update(&stored_at(created, previous), created + Duration::hours(1));
        assert_eq!(user.created_at, created);
        assert_eq!(user.updated_at, previous);

        let later = created + Duration::hours(3);
        user.stamp_update(&stored_at(created, previous), later);
        assert_eq!(user.updated_at, later);
    }

    #[test]
    fn normalize_drops_nanoseconds() {
        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        assert_eq!(normalize(ts).timestamp_subsec_nanos(), 123_456_000);
    }

    #[test]
    fn generated_ids_are_prefixed_and_unique() {
        let a = generate_user_id();
        let b = generate_user_id();
        assert!(a.starts_with(USER_ID_PREFIX));
        assert_eq!(a.len(), USER_ID_PREFIX.len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@x.com").is_err());
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("A").is_ok());
        assert!(validate_name(" ").is_err());
        assert!(validate_name(&"n".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn serializes_with_snake_case_timestamps() {
        let user = User::new("a@x.com", "A");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
    }
}
