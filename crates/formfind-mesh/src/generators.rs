//! Grid connectivity generators.
//!
//! Each [`ConnectivityPattern`] lays a different set of springs over the
//! same planar lattice. All generators are deterministic except
//! [`ConnectivityPattern::RandomDiagonal`], whose randomness comes from an
//! explicit seeded source.

use formfind_types::{FormFindError, FormFindResult, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::GridSpec;
use crate::topology::{Topology, TopologyBuilder};

/// Which springs the grid builder lays down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectivityPattern {
    /// 4-connected structural grid (horizontal and vertical springs).
    #[default]
    Grid,
    /// Structural grid plus diagonal bracing along the midlines and borders.
    /// Square, odd resolutions only; even resolutions are decremented.
    Bracing,
    /// Structural grid plus one randomly chosen diagonal per cell.
    RandomDiagonal {
        /// Seed for the diagonal choices.
        seed: u64,
    },
    /// One extra vertex per cell at its centroid, tied to the four corners,
    /// plus springs along the outer boundary only.
    CentroidSubdivision,
}

impl ConnectivityPattern {
    /// Returns all pattern kinds, using `seed` for the randomized one.
    pub fn all(seed: u64) -> [ConnectivityPattern; 4] {
        [
            ConnectivityPattern::Grid,
            ConnectivityPattern::Bracing,
            ConnectivityPattern::RandomDiagonal { seed },
            ConnectivityPattern::CentroidSubdivision,
        ]
    }

    /// Returns a short name.
    pub fn name(&self) -> &'static str {
        match self {
            ConnectivityPattern::Grid => "grid",
            ConnectivityPattern::Bracing => "bracing",
            ConnectivityPattern::RandomDiagonal { .. } => "random_diagonal",
            ConnectivityPattern::CentroidSubdivision => "centroid",
        }
    }

    /// Parses a short name as produced by [`ConnectivityPattern::name`].
    pub fn from_name(name: &str, seed: u64) -> FormFindResult<Self> {
        match name {
            "grid" => Ok(ConnectivityPattern::Grid),
            "bracing" => Ok(ConnectivityPattern::Bracing),
            "random_diagonal" => Ok(ConnectivityPattern::RandomDiagonal { seed }),
            "centroid" => Ok(ConnectivityPattern::CentroidSubdivision),
            other => Err(FormFindError::InvalidConfig(format!(
                "unknown connectivity pattern '{other}' (expected grid, bracing, random_diagonal, centroid)"
            ))),
        }
    }

    /// Whether two builds with the same inputs always agree.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, ConnectivityPattern::RandomDiagonal { .. })
    }
}

/// Output of the grid builder: everything needed to initialize a system.
#[derive(Debug, Clone)]
pub struct GridMesh {
    /// The grid actually built (bracing may have adjusted the resolution).
    pub spec: GridSpec,
    /// Pattern used.
    pub pattern: ConnectivityPattern,
    /// Initial particle positions; `positions.len() == topology.vertex_count()`.
    pub positions: Vec<Vec3>,
    /// Spring topology.
    pub topology: Topology,
    /// Default anchors: the four lattice corners, sorted.
    pub anchors: Vec<usize>,
}

impl GridMesh {
    /// Returns the number of particles.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of springs.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.topology.edge_count()
    }

    /// Triangle faces covering the surface, for exporters and renderers.
    ///
    /// Quads split into `(p0, p3, p2)` and `(p0, p2, p1)`; centroid
    /// subdivision emits four triangles per quad around the centroid.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        let spec = &self.spec;
        let lattice = spec.vertex_count();
        let per_face = match self.pattern {
            ConnectivityPattern::CentroidSubdivision => 4,
            _ => 2,
        };
        let mut faces = Vec::with_capacity(spec.face_count() * per_face);

        for row in 0..spec.rows.saturating_sub(1) {
            for col in 0..spec.columns.saturating_sub(1) {
                let p0 = spec.index(col, row) as u32;
                let p1 = p0 + 1;
                let p3 = p0 + spec.columns as u32;
                let p2 = p3 + 1;

                if per_face == 4 {
                    let p4 = (lattice + row * (spec.columns - 1) + col) as u32;
                    faces.push([p0, p4, p3]);
                    faces.push([p0, p4, p1]);
                    faces.push([p1, p4, p2]);
                    faces.push([p2, p4, p3]);
                } else {
                    faces.push([p0, p3, p2]);
                    faces.push([p0, p2, p1]);
                }
            }
        }
        faces
    }
}

/// Builds positions, topology, and default anchors for `pattern`.
///
/// # Example
/// ```
/// use formfind_mesh::{build_grid_mesh, ConnectivityPattern, GridSpec};
/// let mesh = build_grid_mesh(&GridSpec::square(3), ConnectivityPattern::Grid).unwrap();
/// assert_eq!(mesh.vertex_count(), 9);
/// assert_eq!(mesh.edge_count(), 12);
/// ```
pub fn build_grid_mesh(spec: &GridSpec, pattern: ConnectivityPattern) -> FormFindResult<GridMesh> {
    let seed = match pattern {
        ConnectivityPattern::RandomDiagonal { seed } => seed,
        _ => 0,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    build_grid_mesh_with_rng(spec, pattern, &mut rng)
}

/// Like [`build_grid_mesh`], drawing random diagonals from `rng` instead of
/// the pattern's seed.
pub fn build_grid_mesh_with_rng<R: Rng>(
    spec: &GridSpec,
    pattern: ConnectivityPattern,
    rng: &mut R,
) -> FormFindResult<GridMesh> {
    let spec = effective_spec(spec, pattern)?;
    let topology = build_topology(&spec, pattern, rng)?;
    let positions = build_geometry(&spec, pattern)?;

    if positions.len() != topology.vertex_count() {
        return Err(FormFindError::GeometryMismatch {
            expected: topology.vertex_count(),
            actual: positions.len(),
        });
    }

    let mut anchors = spec.corner_indices().to_vec();
    anchors.sort_unstable();
    anchors.dedup();

    debug!(
        pattern = pattern.name(),
        columns = spec.columns,
        rows = spec.rows,
        vertices = positions.len(),
        edges = topology.edge_count(),
        "grid mesh built"
    );

    Ok(GridMesh {
        spec,
        pattern,
        positions,
        topology,
        anchors,
    })
}

/// Validates `spec` and applies pattern-specific adjustments.
///
/// Bracing needs a square grid with an odd resolution of at least 3; an
/// even resolution is decremented by one.
pub fn effective_spec(spec: &GridSpec, pattern: ConnectivityPattern) -> FormFindResult<GridSpec> {
    spec.validate()?;
    if pattern != ConnectivityPattern::Bracing {
        return Ok(*spec);
    }

    if spec.columns != spec.rows {
        return Err(FormFindError::InvalidGrid(format!(
            "bracing needs a square grid, got {}x{}",
            spec.columns, spec.rows
        )));
    }
    let mut n = spec.columns;
    if n % 2 == 0 {
        n -= 1;
    }
    if n < 3 {
        return Err(FormFindError::InvalidGrid(format!(
            "bracing needs an odd resolution of at least 3, got {}",
            spec.columns
        )));
    }
    Ok(GridSpec {
        columns: n,
        rows: n,
        ..*spec
    })
}

/// Builds the spring topology for `pattern` over an already-effective `spec`.
pub fn build_topology<R: Rng>(
    spec: &GridSpec,
    pattern: ConnectivityPattern,
    rng: &mut R,
) -> FormFindResult<Topology> {
    spec.validate()?;
    let topology = match pattern {
        ConnectivityPattern::Grid => {
            let mut builder = TopologyBuilder::new(spec.vertex_count());
            add_structural_edges(&mut builder, spec)?;
            builder.build()
        }
        ConnectivityPattern::Bracing => {
            let mut builder = TopologyBuilder::new(spec.vertex_count());
            add_bracing_edges(&mut builder, spec)?;
            add_structural_edges(&mut builder, spec)?;
            builder.build()
        }
        ConnectivityPattern::RandomDiagonal { .. } => {
            let mut builder = TopologyBuilder::new(spec.vertex_count());
            add_random_diagonals(&mut builder, spec, rng)?;
            add_structural_edges(&mut builder, spec)?;
            builder.build()
        }
        ConnectivityPattern::CentroidSubdivision => {
            let mut builder = TopologyBuilder::new(spec.vertex_count() + spec.face_count());
            add_boundary_edges(&mut builder, spec)?;
            add_centroid_edges(&mut builder, spec)?;
            builder.build()
        }
    };
    Ok(topology)
}

/// Builds the initial particle positions for `pattern`.
pub fn build_geometry(spec: &GridSpec, pattern: ConnectivityPattern) -> FormFindResult<Vec<Vec3>> {
    spec.validate()?;
    let mut positions = spec.lattice_positions();

    if pattern == ConnectivityPattern::CentroidSubdivision {
        positions.reserve(spec.face_count());
        for row in 0..spec.rows - 1 {
            for col in 0..spec.columns - 1 {
                let id = spec.index(col, row);
                let p0 = positions[id];
                let p1 = positions[id + 1];
                let p2 = positions[id + spec.columns];
                let p3 = positions[id + 1 + spec.columns];
                positions.push((p0 + p1 + p2 + p3) * 0.25);
            }
        }
    }

    Ok(positions)
}

/// Horizontal springs row by row, then vertical springs column by column.
fn add_structural_edges(builder: &mut TopologyBuilder, spec: &GridSpec) -> FormFindResult<()> {
    for row in 0..spec.rows {
        for col in 0..spec.columns - 1 {
            let i = spec.index(col, row);
            builder.add_edge(i, i + 1)?;
        }
    }
    for col in 0..spec.columns {
        for row in 0..spec.rows - 1 {
            builder.add_edge(spec.index(col, row), spec.index(col, row + 1))?;
        }
    }
    Ok(())
}

/// Springs along the outer boundary: first and last row, then first and last column.
fn add_boundary_edges(builder: &mut TopologyBuilder, spec: &GridSpec) -> FormFindResult<()> {
    for row in [0, spec.rows - 1] {
        for col in 0..spec.columns - 1 {
            let i = spec.index(col, row);
            builder.add_edge(i, i + 1)?;
        }
    }
    for col in [0, spec.columns - 1] {
        for row in 0..spec.rows - 1 {
            builder.add_edge(spec.index(col, row), spec.index(col, row + 1))?;
        }
    }
    Ok(())
}

/// Each cell's four corners tied to the cell centroid, appended after the lattice.
fn add_centroid_edges(builder: &mut TopologyBuilder, spec: &GridSpec) -> FormFindResult<()> {
    let lattice = spec.vertex_count();
    let w = spec.columns;
    for row in 0..spec.rows - 1 {
        for col in 0..w - 1 {
            let centroid = lattice + row * (w - 1) + col;
            let corner = spec.index(col, row);
            builder.add_edge(corner, centroid)?;
            builder.add_edge(corner + 1, centroid)?;
            builder.add_edge(corner + w, centroid)?;
            builder.add_edge(corner + w + 1, centroid)?;
        }
    }
    Ok(())
}

/// One diagonal per cell: main diagonal on a coin flip, anti-diagonal otherwise.
fn add_random_diagonals<R: Rng>(
    builder: &mut TopologyBuilder,
    spec: &GridSpec,
    rng: &mut R,
) -> FormFindResult<()> {
    let w = spec.columns;
    for row in 0..spec.rows - 1 {
        for col in 0..w - 1 {
            let i = spec.index(col, row);
            if rng.random_bool(0.5) {
                builder.add_edge(i, i + 1 + w)?;
            } else {
                builder.add_edge(i + 1, i + w)?;
            }
        }
    }
    Ok(())
}

/// Diagonal bracing concentrated on the borders, midlines, and around the centre.
///
/// Expects a square grid with odd resolution `n`; every target is offset
/// from the source `i = row * n + col` by `±1 ± n`.
fn add_bracing_edges(builder: &mut TopologyBuilder, spec: &GridSpec) -> FormFindResult<()> {
    let n = spec.columns;
    let mid = n / 2;

    for y in 0..n - 1 {
        for x in 0..n - 1 {
            let i = y * n + x;

            // First row
            if y == 0 && x > 1 && x < mid {
                builder.add_edge(i, i + n - 1)?;
            }
            if y == 0 && x > mid && x < n - 2 {
                builder.add_edge(i, i + 1 + n)?;
            }
            // Last row
            if y == n - 2 && x > 0 && x + 1 < mid {
                builder.add_edge(i, i + 1 + n)?;
            }
            if y == n - 2 && x > mid + 1 {
                builder.add_edge(i, i + n - 1)?;
            }

            // First column
            if x == 0 && y < mid && y > 1 {
                builder.add_edge(i, i + 1 - n)?;
            }
            if x == 0 && y > mid && y < n - 2 {
                builder.add_edge(i, i + 1 + n)?;
            }
            // Last column
            if x == n - 2 && y + 1 < mid && y > 0 {
                builder.add_edge(i, i + 1 + n)?;
            }
            if x == n - 2 && y > mid + 1 {
                builder.add_edge(i, i + 1 - n)?;
            }

            // Horizontal midline
            if y == mid && x >= mid {
                builder.add_edge(i, i + 1 + n)?;
                builder.add_edge(i, i + 1 - n)?;
            }
            if y == mid && x <= mid && x > 0 {
                builder.add_edge(i, i + n - 1)?;
                builder.add_edge(i, i - 1 - n)?;
            }
            // Vertical midline
            if x == mid && y >= mid {
                builder.add_edge(i, i + 1 + n)?;
                builder.add_edge(i, i + n - 1)?;
            }
            if x == mid && y <= mid && y > 0 {
                builder.add_edge(i, i - 1 - n)?;
                builder.add_edge(i, i + 1 - n)?;
            }
        }
    }
    Ok(())
}
