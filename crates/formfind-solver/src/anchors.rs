//! Anchor set — vertices whose position is fixed externally every tick.

use formfind_types::{FormFindError, FormFindResult};

/// Sorted, duplicate-free set of anchored vertex indices.
///
/// Backed by a per-vertex mask for O(1) membership tests and a sorted
/// index list for iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorSet {
    mask: Vec<bool>,
    sorted: Vec<usize>,
}

impl AnchorSet {
    /// An empty set over `vertex_count` vertices.
    pub fn empty(vertex_count: usize) -> Self {
        Self {
            mask: vec![false; vertex_count],
            sorted: Vec::new(),
        }
    }

    /// Builds a set from arbitrary indices, rejecting any outside `[0, vertex_count)`.
    pub fn new(vertex_count: usize, indices: &[usize]) -> FormFindResult<Self> {
        let mut set = Self::empty(vertex_count);
        for &i in indices {
            set.insert(i)?;
        }
        Ok(set)
    }

    /// Adds `index`. Returns `true` if it was not already anchored.
    pub fn insert(&mut self, index: usize) -> FormFindResult<bool> {
        let vertex_count = self.mask.len();
        let slot = self
            .mask
            .get_mut(index)
            .ok_or_else(|| FormFindError::out_of_range(index, vertex_count))?;
        if *slot {
            return Ok(false);
        }
        *slot = true;
        let at = self.sorted.partition_point(|&v| v < index);
        self.sorted.insert(at, index);
        Ok(true)
    }

    /// Whether `index` is anchored. Out-of-range indices are never anchored.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Anchored indices in ascending order.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.sorted
    }

    /// Number of anchors.
    #[inline]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Returns true if nothing is anchored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}
