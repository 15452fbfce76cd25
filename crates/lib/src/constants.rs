//! Constants used throughout the Tabkeep library.
//!
//! Central definitions for key prefixes, bootstrap defaults and session lifetimes.

/// Key prefix for user records.
pub const USER_PREFIX: &str = "user_";

/// Key prefix for tab records.
pub const TAB_PREFIX: &str = "tab_";

/// Name of the administrator account created on an empty store.
pub const DEFAULT_ADMIN_NAME: &str = "admin";

/// Length of the generated bootstrap password.
pub const DEFAULT_PASSWORD_LENGTH: usize = 20;

/// Shortest password accepted for an account.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Alphabet used for generated passwords.
pub const ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Lifetime of a session token: 30 days.
pub const TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Longest configurable session token lifetime: 10 years.
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;
