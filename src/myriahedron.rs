//! The assembled myriahedron.
//!
//! [`Myriahedron::build`] runs the whole pipeline for one configuration:
//! subdivision, dual graph, spanning tree, fold tree and, for unfoldable
//! meshes, vertex duplication and the unfold engine. Topology is fixed
//! after the build; only vertex positions change on [`Myriahedron::unfold`].
//!
//! # Example
//!
//! ```
//! use myriahedral::{BaseGeometry, Myriahedron, MyriahedronOptions};
//!
//! let options = MyriahedronOptions::new(BaseGeometry::Tetrahedron).with_subdivisions(1);
//! let mut myria = Myriahedron::build(&options).unwrap();
//! assert_eq!(myria.num_faces(), 16);
//! assert_eq!(myria.folds().len(), 15);
//!
//! myria.unfold(1.0).unwrap();
//! let data = myria.mesh_data();
//! assert_eq!(data.uv.len(), 2 * data.num_vertices());
//! ```

use std::fmt;

use nalgebra::{Point3, Vector3};

use crate::algo::fold::{CutEdge, DualGraph, FoldPair, FoldTree, SpanningTree};
use crate::algo::subdivide::{subdivide_in_stage, SubdivideOptions, SubdividedMesh};
use crate::algo::unfold::{FaceInfo, Retriangulated, Unfolder};
use crate::algo::uv::{indexed_uv, per_face_uv, UVMap, UvOffset};
use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::math::face_normal;
use crate::mesh::{BaseGeometry, FaceId};

/// Number of stages reported through [`Progress`]; subdivision is stage 0.
const BUILD_STAGES: usize = 5;

/// Configuration of a myriahedron.
#[derive(Debug, Clone)]
pub struct MyriahedronOptions {
    /// Base solid to subdivide.
    pub geometry: BaseGeometry,

    /// Number of 1-to-4 subdivision steps.
    pub subdivisions: usize,

    /// Whether to duplicate vertices per face and enable [`Myriahedron::unfold`].
    pub unfoldable: bool,

    /// Whether to project subdivided vertices onto the unit sphere.
    pub normalize: bool,

    /// Longitude/latitude offset for texture coordinates.
    pub uv_offset: UvOffset,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for MyriahedronOptions {
    fn default() -> Self {
        Self {
            geometry: BaseGeometry::Icosahedron,
            subdivisions: 3,
            unfoldable: true,
            normalize: true,
            uv_offset: UvOffset::default(),
            parallel: true,
        }
    }
}

impl MyriahedronOptions {
    /// Default options for the given base geometry.
    pub fn new(geometry: BaseGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// Set the subdivision depth.
    pub fn with_subdivisions(mut self, subdivisions: usize) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    /// Set whether the mesh can be unfolded.
    pub fn with_unfoldable(mut self, unfoldable: bool) -> Self {
        self.unfoldable = unfoldable;
        self
    }

    /// Set whether vertices are normalized to the unit sphere.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the texture longitude/latitude offset, in radians.
    pub fn with_uv_offset(mut self, lon: f64, lat: f64) -> Self {
        self.uv_offset = UvOffset::new(lon, lat);
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Flat buffers for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// `x, y, z` per vertex.
    pub vertices: Vec<f32>,
    /// Three vertex indices per triangle.
    pub index: Vec<u32>,
    /// `u, v` per vertex.
    pub uv: Vec<f32>,
    /// Fold tree edges as face pairs.
    pub folds: Vec<FoldPair>,
    /// Severed edges as subdivided-mesh vertex pairs.
    pub cuts: Vec<CutEdge>,
}

impl MeshData {
    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.index.len() / 3
    }
}

/// Summary counts of a built myriahedron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshStats {
    /// Base geometry name.
    pub geometry: String,
    /// Subdivision depth.
    pub subdivisions: usize,
    /// Number of triangles.
    pub faces: usize,
    /// Vertices of the subdivided (shared) mesh.
    pub vertices: usize,
    /// Vertices in the output buffers (three per face when unfoldable).
    pub output_vertices: usize,
    /// Undivided mesh edges.
    pub edges: usize,
    /// Edges shared by two faces.
    pub dual_edges: usize,
    /// Fold edges.
    pub folds: usize,
    /// Cut edges.
    pub cuts: usize,
    /// Open edges with one face.
    pub boundary: usize,
    /// Longest root-to-leaf fold chain.
    pub tree_depth: usize,
    /// Whether the mesh can be unfolded.
    pub unfoldable: bool,
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Geometry:       {} (depth {})", self.geometry, self.subdivisions)?;
        writeln!(f, "Faces:          {}", self.faces)?;
        writeln!(f, "Vertices:       {} ({} in output)", self.vertices, self.output_vertices)?;
        writeln!(f, "Edges:          {}", self.edges)?;
        writeln!(f, "Dual edges:     {}", self.dual_edges)?;
        writeln!(f, "Folds:          {}", self.folds)?;
        writeln!(f, "Cuts:           {}", self.cuts)?;
        writeln!(f, "Boundary edges: {}", self.boundary)?;
        writeln!(f, "Fold depth:     {}", self.tree_depth)?;
        write!(f, "Unfoldable:     {}", if self.unfoldable { "yes" } else { "no" })
    }
}

/// Duplicated geometry and its unfold engine.
#[derive(Debug, Clone)]
struct Unfoldable {
    faces: Vec<FaceInfo>,
    unfolder: Unfolder,
}

/// A subdivided sphere with its fold tree.
#[derive(Debug, Clone)]
pub struct Myriahedron {
    name: String,
    subdivisions: usize,
    parallel: bool,
    mesh: SubdividedMesh,
    graph: DualGraph,
    spanning: SpanningTree,
    tree: FoldTree,
    unfoldable: Option<Unfoldable>,
    uv: UVMap,
    uv_offset: UvOffset,
}

impl Myriahedron {
    /// Build a myriahedron.
    ///
    /// # Errors
    /// Fails if the base geometry is invalid or its dual graph is not
    /// connected; no partially built mesh is returned.
    pub fn build(options: &MyriahedronOptions) -> Result<Self> {
        Self::build_with_progress(options, &Progress::none())
    }

    /// Build with progress reporting.
    pub fn build_with_progress(options: &MyriahedronOptions, progress: &Progress) -> Result<Self> {
        let base = options.geometry.to_polyhedron()?;
        let sub_options = SubdivideOptions::new(options.subdivisions).with_normalize(options.normalize);
        let mesh = subdivide_in_stage(&base, &sub_options, progress, 0, BUILD_STAGES)?;

        progress.report(1, BUILD_STAGES, "Building dual graph");
        let mut graph = DualGraph::build(&mesh);
        let spanning = graph.spanning_tree()?;

        progress.report(2, BUILD_STAGES, "Building fold tree");
        let tree = FoldTree::build(&mut graph, &spanning)?;

        let unfoldable = if options.unfoldable {
            progress.report(3, BUILD_STAGES, "Duplicating vertices");
            let retri = Retriangulated::build(&mesh, &graph, &spanning)?;

            progress.report(4, BUILD_STAGES, "Orienting folds");
            let unfolder = Unfolder::new(&retri, &mut graph, &tree)?.with_parallel(options.parallel);
            Some(Unfoldable {
                faces: retri.faces,
                unfolder,
            })
        } else {
            None
        };
        progress.report(BUILD_STAGES, BUILD_STAGES, "Done");

        let mut myria = Self {
            name: base.name,
            subdivisions: options.subdivisions,
            parallel: options.parallel,
            mesh,
            graph,
            spanning,
            tree,
            unfoldable,
            uv: UVMap::default(),
            uv_offset: options.uv_offset,
        };
        myria.calculate_uv(options.uv_offset.lon, options.uv_offset.lat);

        log::info!(
            "built {} at depth {}: {} faces, {} folds, {} cuts",
            myria.name,
            myria.subdivisions,
            myria.num_faces(),
            myria.tree.len(),
            myria.spanning.cuts.len()
        );

        Ok(myria)
    }

    /// Base geometry name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subdivision depth.
    #[inline]
    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Whether [`unfold`](Self::unfold) is available.
    #[inline]
    pub fn is_unfoldable(&self) -> bool {
        self.unfoldable.is_some()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.mesh.num_faces()
    }

    /// Number of output vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        match &self.unfoldable {
            Some(u) => u.unfolder.positions().len(),
            None => self.mesh.num_vertices(),
        }
    }

    /// Move the mesh to `scale` (0 = sphere, 1 = flat net).
    ///
    /// Positions are rebuilt from the folded shape on every call, so calling
    /// twice with the same scale gives identical positions.
    ///
    /// # Errors
    /// Returns [`MeshError::NotUnfoldable`] if the mesh was built without
    /// unfoldable topology and [`MeshError::InvalidParameter`] if `scale` is
    /// outside `[0, 1]`.
    pub fn unfold(&mut self, scale: f64) -> Result<()> {
        match &mut self.unfoldable {
            Some(u) => u.unfolder.unfold(scale),
            None => Err(MeshError::NotUnfoldable),
        }
    }

    /// Scale of the last `unfold` call (0 before any).
    #[inline]
    pub fn scale(&self) -> f64 {
        self.unfoldable.as_ref().map_or(0.0, |u| u.unfolder.scale())
    }

    /// Recompute texture coordinates with a longitude/latitude offset in
    /// radians. Coordinates always come from the folded shape.
    pub fn calculate_uv(&mut self, offset_lon: f64, offset_lat: f64) {
        self.uv_offset = UvOffset::new(offset_lon, offset_lat);
        self.uv = match &self.unfoldable {
            Some(u) => per_face_uv(u.unfolder.canonical(), self.uv_offset, self.parallel),
            None => indexed_uv(&self.mesh.vertices, self.uv_offset, self.parallel),
        };
    }

    /// Current texture coordinate offset.
    #[inline]
    pub fn uv_offset(&self) -> UvOffset {
        self.uv_offset
    }

    /// Texture coordinates, one per output vertex.
    #[inline]
    pub fn uv(&self) -> &UVMap {
        &self.uv
    }

    /// Current vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        match &self.unfoldable {
            Some(u) => u.unfolder.positions(),
            None => &self.mesh.vertices,
        }
    }

    /// Triangles as output vertex indices.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match &self.unfoldable {
            Some(u) => u
                .faces
                .iter()
                .map(|f| f.vertices.map(|v| v.raw()))
                .collect(),
            None => self
                .mesh
                .triangles
                .iter()
                .map(|t| t.map(|v| v.raw()))
                .collect(),
        }
    }

    /// Current normal of a face.
    pub fn face_normal(&self, face: FaceId) -> Vector3<f64> {
        match &self.unfoldable {
            Some(u) => u.unfolder.face_normal(face),
            None => face_normal(&self.mesh.triangle_positions(face)),
        }
    }

    /// Fold tree edges as `from → to` face pairs, in tree order.
    pub fn folds(&self) -> Vec<FoldPair> {
        self.tree
            .order()
            .iter()
            .map(|&fold| {
                let edge = self.graph.edge(fold);
                FoldPair {
                    f0: edge.from.index(),
                    f1: edge.to.index(),
                }
            })
            .collect()
    }

    /// Cut edges as subdivided-mesh vertex pairs.
    pub fn cuts(&self) -> Vec<CutEdge> {
        self.spanning
            .cuts
            .iter()
            .map(|&cut| {
                let [v0, v1] = self.graph.edge(cut).vertices;
                CutEdge {
                    v0: v0.index(),
                    v1: v1.index(),
                }
            })
            .collect()
    }

    /// Open edges (one adjacent face) as subdivided-mesh vertex pairs.
    pub fn boundary(&self) -> Vec<CutEdge> {
        self.graph
            .boundary()
            .iter()
            .map(|&e| {
                let [v0, v1] = self.mesh.edge(e).vertices;
                CutEdge {
                    v0: v0.index(),
                    v1: v1.index(),
                }
            })
            .collect()
    }

    /// The rooted fold tree.
    #[inline]
    pub fn fold_tree(&self) -> &FoldTree {
        &self.tree
    }

    /// The dual graph, with fold orientations.
    #[inline]
    pub fn dual_graph(&self) -> &DualGraph {
        &self.graph
    }

    /// The subdivided mesh with shared vertices.
    #[inline]
    pub fn subdivided(&self) -> &SubdividedMesh {
        &self.mesh
    }

    /// Per-face records of an unfoldable mesh.
    #[inline]
    pub fn faces(&self) -> Option<&[FaceInfo]> {
        self.unfoldable.as_ref().map(|u| u.faces.as_slice())
    }

    /// Flat buffers of the current shape.
    pub fn mesh_data(&self) -> MeshData {
        MeshData {
            vertices: self
                .positions()
                .iter()
                .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
                .collect(),
            index: self.triangles().into_iter().flatten().collect(),
            uv: self.uv.to_flat_f32(),
            folds: self.folds(),
            cuts: self.cuts(),
        }
    }

    /// Summary counts.
    pub fn stats(&self) -> MeshStats {
        MeshStats {
            geometry: self.name.clone(),
            subdivisions: self.subdivisions,
            faces: self.num_faces(),
            vertices: self.mesh.num_vertices(),
            output_vertices: self.num_vertices(),
            edges: self.mesh.num_edges(),
            dual_edges: self.graph.num_edges(),
            folds: self.tree.len(),
            cuts: self.spanning.cuts.len(),
            boundary: self.graph.boundary().len(),
            tree_depth: self.tree.depth(),
            unfoldable: self.is_unfoldable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::GraticuleLayout;

    #[test]
    fn test_default_options() {
        let o = MyriahedronOptions::default();
        assert!(matches!(o.geometry, BaseGeometry::Icosahedron));
        assert_eq!(o.subdivisions, 3);
        assert!(o.unfoldable && o.normalize && o.parallel);
        assert!(!o.sequential().parallel);
    }

    #[test]
    fn test_indexed_form_shares_vertices() {
        let options = MyriahedronOptions::new(BaseGeometry::Octahedron)
            .with_subdivisions(1)
            .with_unfoldable(false);
        let mut m = Myriahedron::build(&options).unwrap();
        assert!(!m.is_unfoldable());
        assert_eq!(m.num_vertices(), 18);
        assert_eq!(m.uv().len(), 18);
        assert!(matches!(m.unfold(0.5), Err(MeshError::NotUnfoldable)));
        assert_eq!(m.folds().len(), 31);
        assert_eq!(m.scale(), 0.0);
    }

    #[test]
    fn test_mesh_data_layout() {
        let m = Myriahedron::build(&MyriahedronOptions::new(BaseGeometry::Cube).with_subdivisions(1)).unwrap();
        let data = m.mesh_data();
        assert_eq!(data.num_faces(), 48);
        assert_eq!(data.num_vertices(), 144);
        assert_eq!(data.uv.len(), 288);
        assert_eq!(data.index, (0..144).collect::<Vec<u32>>());
        assert_eq!(data.folds.len(), 47);
        assert_eq!(data.cuts.len(), m.dual_graph().num_edges() - 47);
    }

    #[test]
    fn test_stats() {
        let m = Myriahedron::build(&MyriahedronOptions::new(BaseGeometry::Tetrahedron).with_subdivisions(2)).unwrap();
        let s = m.stats();
        assert_eq!(s.geometry, "tetrahedron");
        assert_eq!(s.faces, 64);
        assert_eq!(s.folds, 63);
        assert_eq!(s.edges, 96);
        assert_eq!(s.cuts, 96 - 63);
        assert_eq!(s.boundary, 0);
        assert!(s.to_string().contains("Folds:          63"));
    }

    #[test]
    fn test_build_progress_fractions() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |c, t, m| sink.lock().unwrap().push((c as f64 / t as f64, m.to_string())));
        Myriahedron::build_with_progress(&MyriahedronOptions::new(BaseGeometry::Octahedron), &progress).unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(seen.first().map(|s| s.1.as_str()), Some("Subdividing"));
        assert_eq!(seen.last().cloned(), Some((1.0, "Done".to_string())));
    }

    #[test]
    fn test_calculate_uv_offset() {
        let mut m = Myriahedron::build(&MyriahedronOptions::default().with_subdivisions(1)).unwrap();
        let before = m.uv().clone();
        m.calculate_uv(0.5, 0.0);
        assert_eq!(m.uv_offset(), UvOffset::new(0.5, 0.0));
        assert_ne!(&before, m.uv());
        m.calculate_uv(0.0, 0.0);
        assert_eq!(&before, m.uv());
    }

    #[test]
    fn test_layout_folds_follow_weights() {
        let options = MyriahedronOptions::new(BaseGeometry::Graticule {
            parallels: 4,
            layout: GraticuleLayout::Cylindrical,
        })
        .with_subdivisions(0);
        let m = Myriahedron::build(&options).unwrap();
        let graph = m.dual_graph();
        for &fold in m.fold_tree().order() {
            assert!(-graph.edge(fold).weight > 1.0);
        }
    }
}
