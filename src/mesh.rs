//! Mesh export for an external renderer.
//!
//! The body carries its eight box corners in body space (see
//! [`Shape::vertices`](crate::body::Shape::vertices)). This module adds the
//! connectivity over that fixed vertex order and a [`BodyMesh`] that snapshots the
//! vertices together with the body's world transform.

use heapless::Vec;
use log::error;
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::body::{BodyAttributes, VERTEX_COUNT};

/// Twelve outward-facing triangles (counter-clockwise seen from outside).
pub const BOX_FACES: [[usize; 3]; 12] = [
    // -z
    [0, 2, 1],
    [0, 3, 2],
    // +z
    [4, 5, 6],
    [4, 6, 7],
    // -y
    [0, 1, 5],
    [0, 5, 4],
    // +y
    [3, 6, 2],
    [3, 7, 6],
    // -x
    [0, 4, 7],
    [0, 7, 3],
    // +x
    [1, 2, 6],
    [1, 6, 5],
];

/// The twelve box edges, without face diagonals.
pub const BOX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Edge count of a triangulated box: twelve edges plus one diagonal per face.
pub const TRIANGLE_EDGE_COUNT: usize = 18;

/// Unique undirected edges of a triangle list, each stored low index first.
///
/// Edges keep first-seen order. Once `N` edges are collected, any further new
/// edge is dropped and an error is logged.
pub fn lines_from_faces<const N: usize>(faces: &[[usize; 3]]) -> Vec<[usize; 2], N> {
    let mut lines: Vec<[usize; 2], N> = Vec::new();
    let sides = faces.iter().flat_map(|&[a, b, c]| [[a, b], [b, c], [c, a]]);
    for [a, b] in sides {
        let edge = [a.min(b), a.max(b)];
        if lines.contains(&edge) {
            continue;
        }
        if lines.push(edge).is_err() {
            error!("Edge list full at {} entries, dropping the rest", N);
            break;
        }
    }
    lines
}

/// Body-local vertices moved into world space with the body's `R` and `X`.
pub fn world_vertices(body: &BodyAttributes) -> [Vector3<f32>; VERTEX_COUNT] {
    body.vertices.map(|v| body.rotation * v + body.position)
}

/// Body-local vertices as plain arrays, for renderers that take `&[[f32; 3]]`.
pub fn vertices_as_arrays(body: &BodyAttributes) -> [[f32; 3]; VERTEX_COUNT] {
    body.vertices.map(|v| [v.x, v.y, v.z])
}

/// Render-side snapshot of a body: local geometry plus its current model matrix.
#[derive(Debug, Clone)]
pub struct BodyMesh {
    pub vertices: [[f32; 3]; VERTEX_COUNT],
    pub faces: &'static [[usize; 3]],
    pub lines: &'static [[usize; 2]],
    pub model_matrix: Matrix4<f32>,
}

impl BodyMesh {
    pub fn from_body(body: &BodyAttributes) -> Self {
        Self {
            vertices: vertices_as_arrays(body),
            faces: &BOX_FACES,
            lines: &BOX_EDGES,
            model_matrix: body.world_matrix(),
        }
    }

    /// Refresh the model matrix from the body's current `R` and `X`.
    ///
    /// Call after each solver step.
    pub fn sync(&mut self, body: &BodyAttributes) {
        self.model_matrix = body.world_matrix();
    }

    /// Check that every face and line index addresses an existing vertex.
    pub fn check_validity(&self) -> bool {
        for face in self.faces {
            if face.iter().any(|&i| i >= self.vertices.len()) {
                error!("Face vertices are out of bounds");
                return false;
            }
        }

        for line in self.lines {
            if line.iter().any(|&i| i >= self.vertices.len()) {
                error!("Line vertices are out of bounds");
                return false;
            }
        }

        true
    }

    /// Wireframe over every triangle edge, face diagonals included.
    ///
    /// [`lines`](Self::lines) holds the plain box outline; this is the variant for
    /// renderers that want to show the triangulation.
    pub fn triangle_lines(&self) -> Vec<[usize; 2], TRIANGLE_EDGE_COUNT> {
        lines_from_faces(self.faces)
    }

    /// Vertex `index` transformed by the model matrix.
    pub fn world_vertex(&self, index: usize) -> Option<Vector3<f32>> {
        let v = self.vertices.get(index)?;
        let p = self.model_matrix * Vector4::new(v[0], v[1], v[2], 1.0);
        Some(p.xyz())
    }
}
