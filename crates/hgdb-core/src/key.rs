//! Canonical hyperedge keys.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HgdbError};
use crate::value::VertexId;

/// Smallest number of distinct members a hyperedge may have.
pub const MIN_EDGE_SIZE: usize = 2;

/// Order-independent identity of a hyperedge.
///
/// Members are deduplicated and sorted by the [`VertexId`] order, so every
/// permutation or container shape naming the same vertices yields the same
/// key. Deserialization re-runs [`EdgeKey::encode`], which keeps persisted
/// keys canonical.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<VertexId>", try_from = "Vec<VertexId>")]
pub struct EdgeKey {
    members: Vec<VertexId>,
}

impl EdgeKey {
    /// Canonicalizes a raw collection of vertex identifiers.
    ///
    /// Accepts any iterable (arrays, vectors, sets, another key). Duplicates
    /// are removed; fewer than [`MIN_EDGE_SIZE`] distinct members fails with
    /// [`HgdbError::InvalidEdgeShape`].
    pub fn encode<I>(raw: I) -> Result<EdgeKey, HgdbError>
    where
        I: IntoIterator,
        I::Item: Into<VertexId>,
    {
        let set: BTreeSet<VertexId> = raw.into_iter().map(Into::into).collect();
        Self::from_sorted(set.into_iter().collect())
    }

    fn from_sorted(members: Vec<VertexId>) -> Result<EdgeKey, HgdbError> {
        if members.len() < MIN_EDGE_SIZE {
            return Err(HgdbError::InvalidEdgeShape(
                ErrorInfo::new(
                    "too-few-members",
                    "hyperedges require at least two distinct vertices",
                )
                .with_context("distinct", members.len().to_string()),
            ));
        }
        Ok(EdgeKey { members })
    }

    /// Returns the members in canonical order.
    pub fn members(&self) -> &[VertexId] {
        &self.members
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; keys hold at least two members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns whether `vertex` is a member.
    pub fn contains(&self, vertex: &VertexId) -> bool {
        self.members.binary_search(vertex).is_ok()
    }

    /// Returns whether every member appears in `vertices`.
    pub fn is_subset_of(&self, vertices: &BTreeSet<VertexId>) -> bool {
        self.members.iter().all(|member| vertices.contains(member))
    }

    /// Returns the key left after removing `vertex`.
    ///
    /// `None` when the remaining members would fall below [`MIN_EDGE_SIZE`].
    /// Removing a non-member returns an identical key.
    pub fn without(&self, vertex: &VertexId) -> Option<EdgeKey> {
        let members: Vec<VertexId> = self
            .members
            .iter()
            .filter(|member| *member != vertex)
            .cloned()
            .collect();
        Self::from_sorted(members).ok()
    }

    /// Iterates over the members in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, VertexId> {
        self.members.iter()
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (idx, member) in self.members.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{member}")?;
        }
        write!(f, ")")
    }
}

impl<'a> IntoIterator for &'a EdgeKey {
    type Item = &'a VertexId;
    type IntoIter = std::slice::Iter<'a, VertexId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl From<EdgeKey> for Vec<VertexId> {
    fn from(key: EdgeKey) -> Self {
        key.members
    }
}

impl TryFrom<Vec<VertexId>> for EdgeKey {
    type Error = HgdbError;

    fn try_from(members: Vec<VertexId>) -> Result<Self, Self::Error> {
        EdgeKey::encode(members)
    }
}

/// Canonicalizes a raw edge specification. See [`EdgeKey::encode`].
pub fn encode<I>(raw: I) -> Result<EdgeKey, HgdbError>
where
    I: IntoIterator,
    I::Item: Into<VertexId>,
{
    EdgeKey::encode(raw)
}
