//! Query and term normalization
//!
//! Every comparison in the engine goes through [`normalize`], so stored terms,
//! definitions and incoming queries are always compared in the same form.

/// Strip surrounding whitespace and lowercase.
///
/// Total and idempotent; the empty string normalizes to itself.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
