//! Spring topology graph.
//!
//! An unweighted directed graph over a fixed vertex count. Edges are
//! collected into a [`TopologyBuilder`], validated against `[0, M)` as they
//! arrive, and then frozen into a [`Topology`] that the mass-spring system
//! owns for its lifetime.

use formfind_types::{FormFindError, FormFindResult};
use serde::{Deserialize, Serialize};

/// A directed `(from, to)` vertex pair.
///
/// Spring forces are symmetric, so direction carries no physical meaning;
/// it only fixes which endpoint is "from" when a spring is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Start vertex.
    pub from: usize,
    /// End vertex.
    pub to: usize,
}

impl Edge {
    /// Creates an edge without validation.
    #[inline]
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// Append-only edge buffer with bounds checking.
///
/// Duplicate edges and self-loops are accepted; every edge becomes an
/// independent spring.
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl TopologyBuilder {
    /// Starts an empty topology over `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    /// Starts an empty topology with room for `edge_capacity` edges.
    pub fn with_capacity(vertex_count: usize, edge_capacity: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::with_capacity(edge_capacity),
        }
    }

    /// Appends the directed edge `v -> w`.
    ///
    /// Fails with [`FormFindError::VertexOutOfRange`] if either endpoint is
    /// outside `[0, vertex_count)`; the edge list is left untouched.
    pub fn add_edge(&mut self, v: usize, w: usize) -> FormFindResult<()> {
        self.validate(v)?;
        self.validate(w)?;
        self.edges.push(Edge::new(v, w));
        Ok(())
    }

    fn validate(&self, v: usize) -> FormFindResult<()> {
        if v >= self.vertex_count {
            return Err(FormFindError::out_of_range(v, self.vertex_count));
        }
        Ok(())
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges appended so far.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Freezes the buffer into an immutable [`Topology`].
    pub fn build(self) -> Topology {
        Topology {
            vertex_count: self.vertex_count,
            edges: self.edges,
        }
    }
}

/// Immutable topology: vertex count plus edges in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl Topology {
    /// Shorthand for [`TopologyBuilder::new`].
    pub fn builder(vertex_count: usize) -> TopologyBuilder {
        TopologyBuilder::new(vertex_count)
    }

    /// Builds a topology from `(from, to)` pairs, validating each one.
    pub fn from_pairs<I>(vertex_count: usize, pairs: I) -> FormFindResult<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut builder = TopologyBuilder::new(vertex_count);
        for (v, w) in pairs {
            builder.add_edge(v, w)?;
        }
        Ok(builder.build())
    }

    /// Number of vertices `M`.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of edges touching vertex `v`, counting both directions.
    pub fn degree(&self, v: usize) -> usize {
        self.edges
            .iter()
            .filter(|e| e.from == v || e.to == v)
            .count()
    }
}
