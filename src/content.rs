//! Content payloads and semantic equality.
//!
//! A surface cell holds an opaque display payload. The animation diff
//! step and the empty-cell fills need to know whether two payloads are
//! "the same thing on screen", which for item-like payloads is a
//! semantic comparison, not pointer identity.

/// An opaque display payload placed in a cell.
///
/// Implementors supply [`similar`], the semantic equality used by the
/// differential frame application: two payloads that render identically
/// must compare similar even if they are distinct values in memory.
///
/// For payload types whose `PartialEq` already expresses display
/// equality, `similar` is just `==`.
///
/// [`similar`]: Content::similar
pub trait Content: Clone + Send + Sync + 'static {
    /// Semantic equality, ignoring incidental identity.
    fn similar(&self, other: &Self) -> bool;
}

macro_rules! content_via_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Content for $ty {
                fn similar(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

content_via_eq!(
    String,
    &'static str,
    char,
    bool,
    u8,
    u16,
    u32,
    u64,
    usize,
    i32,
    i64,
);

/// Compare two optional cell payloads.
///
/// Two empty cells are equal; an empty cell never equals an occupied one.
pub fn slots_similar<C: Content>(a: Option<&C>, b: Option<&C>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.similar(b),
        _ => false,
    }
}

// =============================================================================
// Tests
// =============================================================================
