//! CPU-side mesh data.

use glam::Vec4;
use std::collections::HashSet;

/// Vertex streams plus a triangle index list.
///
/// Positions are homogeneous points (w = 1) and normals homogeneous
/// directions (w = 0). Vertex order is the order uploaded to the GPU.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec4>,
    pub normals: Vec<Vec4>,
    pub colors: Option<Vec<Vec4>>,
    pub indices: Vec<u32>,
}

/// A broken mesh invariant, as reported by [`Mesh::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),

    #[error("index {value} at position {at} is out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds {
        at: usize,
        value: u32,
        vertex_count: usize,
    },

    #[error("{stream} stream has {found} entries, expected {expected}")]
    StreamLength {
        stream: &'static str,
        found: usize,
        expected: usize,
    },
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check stream lengths and index bounds, reporting the first violation.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.positions.len();
        if self.normals.len() != vertex_count {
            return Err(MeshError::StreamLength {
                stream: "normal",
                found: self.normals.len(),
                expected: vertex_count,
            });
        }
        if let Some(colors) = &self.colors {
            if colors.len() != vertex_count {
                return Err(MeshError::StreamLength {
                    stream: "color",
                    found: colors.len(),
                    expected: vertex_count,
                });
            }
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(self.indices.len()));
        }
        if let Some(at) = self
            .indices
            .iter()
            .position(|&i| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfBounds {
                at,
                value: self.indices[at],
                vertex_count,
            });
        }
        Ok(())
    }

    /// Unique undirected edges as a line-list index buffer, in first-seen order.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.extend_from_slice(&[key.0, key.1]);
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh {
            positions: vec![Vec4::new(0.0, 0.0, 0.0, 1.0); 3],
            normals: vec![Vec4::Z; 3],
            colors: None,
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn valid_triangle_passes() {
        assert_eq!(triangle().validate(), Ok(()));
        assert_eq!(triangle().triangle_count(), 1);
    }

    #[test]
    fn partial_triangle_is_reported() {
        let mut mesh = triangle();
        mesh.indices.push(0);
        assert_eq!(mesh.validate(), Err(MeshError::PartialTriangle(4)));
    }

    #[test]
    fn out_of_bounds_index_is_reported() {
        let mut mesh = triangle();
        mesh.indices[1] = 7;
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfBounds {
                at: 1,
                value: 7,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn short_color_stream_is_reported() {
        let mut mesh = triangle();
        mesh.colors = Some(vec![Vec4::ONE]);
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::StreamLength { stream: "color", .. })
        ));
    }

    #[test]
    fn shared_edges_are_listed_once() {
        let mut mesh = triangle();
        mesh.positions.push(Vec4::W);
        mesh.normals.push(Vec4::Z);
        mesh.indices.extend_from_slice(&[2, 1, 3]);
        // 5 distinct edges: 0-1, 1-2, 0-2, 1-3, 2-3
        let edges = mesh.edge_indices();
        assert_eq!(edges.len(), 10);
        assert_eq!(&edges[..6], &[0, 1, 1, 2, 0, 2]);
    }

    #[test]
    fn empty_mesh_has_no_edges() {
        let mesh = Mesh::default();
        assert!(mesh.is_empty());
        assert!(mesh.edge_indices().is_empty());
        assert_eq!(mesh.validate(), Ok(()));
    }
}
