//! Cache/fallback resolution
//!
//! Decides what to do with the value produced by one refresh cycle: store
//! a fresh count, store the configured fallback text, or leave the
//! previously cached value untouched.

/// Outcome of resolving a refresh cycle's candidate count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A valid count was obtained and should be stored.
    Count(i64),
    /// No valid count; the configured fallback text should be stored.
    Fallback(String),
    /// No valid count and no fallback; keep the previously stored value.
    Retain,
}

impl Resolution {
    /// The value to persist, if any.
    pub fn persisted_value(&self) -> Option<String> {
        match self {
            Resolution::Count(n) => Some(n.to_string()),
            Resolution::Fallback(text) => Some(text.clone()),
            Resolution::Retain => None,
        }
    }
}

/// Resolves a candidate count against the configured fallback text.
///
/// A candidate is valid iff it is present and strictly greater than zero.
/// Invalid candidates fall back to `fallback_text` when it is non-empty,
/// otherwise the previous value is retained.
pub fn resolve_count(candidate: Option<i64>, fallback_text: &str) -> Resolution {
    match candidate {
        Some(count) if count > 0 => Resolution::Count(count),
        _ if !fallback_text.is_empty() => Resolution::Fallback(fallback_text.to_string()),
        _ => Resolution::Retain,
    }
}
