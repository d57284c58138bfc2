//! Strongly typed identifier wrappers and the edge key used by traffic maps.
//!
//! `NodeId` and `EdgeId` are dense indices into a graph's node and edge
//! arrays.  `EdgeId`s are only meaningful for the graph that produced them
//! (removing an edge renumbers the ones after it), so anything that must
//! survive a closure (traffic volumes, closure requests) is keyed by
//! [`EdgeKey`] instead.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID", equal to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road-network node (intersection).
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed road-network edge within one graph instance.
    pub struct EdgeId(u32);
}

// ── EdgeKey ───────────────────────────────────────────────────────────────────

/// Stable identity of a directed edge: `(from, to, key)`.
///
/// `key` is the discriminator between parallel edges joining the same ordered
/// pair.  Single-edge graphs always carry `key = 0`.  Ordering is
/// lexicographic, so a `BTreeMap<EdgeKey, _>` iterates by source node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeKey {
    pub from: NodeId,
    pub to:   NodeId,
    pub key:  u32,
}

impl EdgeKey {
    #[inline]
    pub fn new(from: NodeId, to: NodeId, key: u32) -> Self {
        Self { from, to, key }
    }

    /// Key of the first (and usually only) edge from `from` to `to`.
    #[inline]
    pub fn first(from: NodeId, to: NodeId) -> Self {
        Self { from, to, key: 0 }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -> {}, key {})", self.from.0, self.to.0, self.key)
    }
}
