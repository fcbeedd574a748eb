//! Cross-frame stable element identity.
//!
//! An `ElementId` is a fingerprint of the call site that declared the
//! element (source file + line), so the same widget keeps the same id on
//! every tick without any registration step.  It is **not** an array index —
//! see [`crate::tree::ElementIndex`] for the per-frame position.

use std::hash::{Hash, Hasher};
use std::panic::Location;

use rustc_hash::FxHasher;

/// Salt mixed into every fingerprint so a real call site never hashes to
/// the reserved `NONE` value.
const ID_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Stable identity for correlating persistent per-widget state (hover,
/// focus) across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

impl ElementId {
    /// The reserved "no identity" value.  Never produced by [`here`] or
    /// [`here_indexed`].
    ///
    /// [`here`]: ElementId::here
    /// [`here_indexed`]: ElementId::here_indexed
    pub const NONE: ElementId = ElementId(0);

    /// Fingerprint of the calling source location.
    ///
    /// Two calls on the same line yield the same id; calls on different
    /// lines (or in different files) yield different ids.
    #[track_caller]
    pub fn here() -> Self {
        Self::at(Location::caller(), 0)
    }

    /// Fingerprint of the calling source location, disambiguated by
    /// `index`.  Use inside loops where one line declares many elements.
    #[track_caller]
    pub fn here_indexed(index: u32) -> Self {
        Self::at(Location::caller(), index)
    }

    fn at(location: &Location<'_>, index: u32) -> Self {
        let mut hasher = FxHasher::default();
        ID_SALT.hash(&mut hasher);
        location.file().hash(&mut hasher);
        location.line().hash(&mut hasher);
        index.hash(&mut hasher);
        let value = hasher.finish();
        // Fold the (astronomically unlikely) zero hash away from NONE.
        ElementId(if value == 0 { ID_SALT } else { value })
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_call_site_same_id() {
        fn make() -> ElementId {
            ElementId::here()
        }
        assert_eq!(make(), make());
    }

    #[test]
    fn test_distinct_call_sites_distinct_ids() {
        let a = ElementId::here();
        let b = ElementId::here();
        assert_ne!(a, b);
    }

    #[test]
    fn test_indexed_ids_distinct_within_loop() {
        let ids: Vec<ElementId> = (0..8).map(ElementId::here_indexed).collect();
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                assert_ne!(ids[i], ids[j]);
            }
        }
    }

    #[test]
    fn test_indexed_id_stable_across_calls() {
        fn make(i: u32) -> ElementId {
            ElementId::here_indexed(i)
        }
        assert_eq!(make(3), make(3));
        assert_ne!(make(3), make(4));
    }

    #[test]
    fn test_never_none() {
        assert!(!ElementId::here().is_none());
        assert!(ElementId::NONE.is_none());
    }
}
