//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Identifiers
// =============================================================================

/// Prefix for store-assigned user identifiers
pub const USER_ID_PREFIX: &str = "user_";

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 1;

/// Maximum name length (matches the `varchar(255)` column)
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum email length (matches the `varchar(255)` column)
pub const MAX_EMAIL_LENGTH: usize = 255;

// =============================================================================
// Listing
// =============================================================================

/// Page size used when the caller does not supply one
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Largest page size the HTTP layer will request
pub const MAX_LIST_LIMIT: i64 = 100;

/// Offset used when the caller does not supply one
pub const DEFAULT_LIST_OFFSET: i64 = 0;

// =============================================================================
// Timestamps
// =============================================================================

/// Fractional-second digits kept on stored timestamps (microseconds)
pub const TIMESTAMP_PRECISION_DIGITS: u16 = 6;
