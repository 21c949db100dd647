//! Test helpers for generating unique test data
//!
//! ULID suffixes keep tests isolated when they share a database.

use ulid::Ulid;

/// Longest username the backend accepts.
const MAX_USERNAME: usize = 32;

/// Generate a unique string in the format `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("game");
/// let id2 = unique_str("game");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("game-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique, valid username (`[A-Za-z0-9_-]`, at most 32 chars).
///
/// The prefix is cut so the full ULID always fits.
///
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let name = unique_username("alice");
/// assert!(name.starts_with("alice_"));
/// assert!(name.len() <= 32);
/// assert_ne!(name, unique_username("alice"));
/// ```
pub fn unique_username(prefix: &str) -> String {
    let ulid = Ulid::new().to_string();
    let room = MAX_USERNAME - ulid.len() - 1;
    let prefix: String = prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(room)
        .collect();
    format!("{prefix}_{ulid}")
}
