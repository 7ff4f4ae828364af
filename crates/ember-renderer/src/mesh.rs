//! GPU-resident meshes.

use crate::backend::{BufferUsage, GpuBackend};
use crate::geometry::Mesh;
use crate::shader::AttributeRole;

/// Primitive assembly for a mesh buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    #[default]
    TriangleList,
    /// Unique edges, for wireframe display.
    LineList,
}

impl Topology {
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            Topology::LineList => wgpu::PrimitiveTopology::LineList,
        }
    }
}

/// Vertex and index buffers for one mesh, owned exclusively.
///
/// Each vertex stream is `vec4<f32>` with a 16-byte stride. Dropping the
/// mesh buffer releases every buffer it holds.
#[derive(Debug)]
pub struct MeshBuffer<B: GpuBackend> {
    position: Option<B::Buffer>,
    normal: Option<B::Buffer>,
    color: Option<B::Buffer>,
    index: Option<B::Buffer>,
    vertex_count: u32,
    element_count: u32,
    topology: Topology,
}

impl<B: GpuBackend> MeshBuffer<B> {
    /// Upload `mesh`. An empty mesh allocates nothing and draws nothing.
    pub fn upload(backend: &B, mesh: &Mesh, topology: Topology) -> Self {
        if mesh.is_empty() {
            return Self {
                position: None,
                normal: None,
                color: None,
                index: None,
                vertex_count: 0,
                element_count: 0,
                topology,
            };
        }

        let indices = match topology {
            Topology::TriangleList => mesh.indices.clone(),
            Topology::LineList => mesh.edge_indices(),
        };

        let position = Some(backend.create_buffer(
            "mesh positions",
            BufferUsage::Vertex,
            bytemuck::cast_slice(&mesh.positions),
        ));
        let normal = (mesh.normals.len() == mesh.positions.len()).then(|| {
            backend.create_buffer(
                "mesh normals",
                BufferUsage::Vertex,
                bytemuck::cast_slice(&mesh.normals),
            )
        });
        let color = mesh
            .colors
            .as_ref()
            .filter(|colors| colors.len() == mesh.positions.len())
            .map(|colors| {
                backend.create_buffer(
                    "mesh colors",
                    BufferUsage::Vertex,
                    bytemuck::cast_slice(colors),
                )
            });
        let index = (!indices.is_empty()).then(|| {
            backend.create_buffer(
                "mesh indices",
                BufferUsage::Index,
                bytemuck::cast_slice(&indices),
            )
        });

        tracing::debug!(
            vertices = mesh.vertex_count(),
            elements = indices.len(),
            ?topology,
            "uploaded mesh"
        );

        Self {
            position,
            normal,
            color,
            element_count: if index.is_some() { indices.len() as u32 } else { 0 },
            index,
            vertex_count: mesh.vertex_count() as u32,
            topology,
        }
    }

    pub fn bind_position(&self) -> Option<&B::Buffer> {
        self.position.as_ref()
    }

    pub fn bind_normal(&self) -> Option<&B::Buffer> {
        self.normal.as_ref()
    }

    pub fn bind_color(&self) -> Option<&B::Buffer> {
        self.color.as_ref()
    }

    pub fn bind_index(&self) -> Option<&B::Buffer> {
        self.index.as_ref()
    }

    /// Buffer feeding `role`, if this mesh provides it.
    pub fn attribute(&self, role: AttributeRole) -> Option<&B::Buffer> {
        match role {
            AttributeRole::Position => self.bind_position(),
            AttributeRole::Normal => self.bind_normal(),
            AttributeRole::Color => self.bind_color(),
        }
    }

    /// Number of indices drawn.
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn primitive_topology(&self) -> Topology {
        self.topology
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::geometry::Icosphere;
    use glam::{Vec3, Vec4};

    #[test]
    fn upload_allocates_position_normal_and_index() {
        let backend = HeadlessBackend::new();
        let mesh = Icosphere::build(Vec3::ZERO, 1.0, 1);
        let buffer = MeshBuffer::upload(&backend, &mesh, Topology::TriangleList);

        assert_eq!(backend.live_buffers(), 3);
        assert_eq!(buffer.element_count(), 240);
        assert_eq!(buffer.vertex_count(), 42);
        assert_eq!(buffer.bind_position().unwrap().size(), 42 * 16);
        assert_eq!(buffer.bind_normal().unwrap().size(), 42 * 16);
        assert_eq!(buffer.bind_index().unwrap().size(), 240 * 4);
        assert!(buffer.bind_color().is_none());
        assert_eq!(buffer.primitive_topology(), Topology::TriangleList);
    }

    #[test]
    fn line_list_uploads_unique_edges() {
        let backend = HeadlessBackend::new();
        let mesh = Icosphere::build(Vec3::ZERO, 1.0, 0);
        let buffer = MeshBuffer::upload(&backend, &mesh, Topology::LineList);
        assert_eq!(buffer.element_count(), 60);
        assert_eq!(buffer.primitive_topology(), Topology::LineList);
    }

    #[test]
    fn color_stream_is_uploaded_when_present() {
        let backend = HeadlessBackend::new();
        let mut mesh = Icosphere::build(Vec3::ZERO, 1.0, 0);
        mesh.colors = Some(vec![Vec4::ONE; mesh.vertex_count()]);
        let buffer = MeshBuffer::upload(&backend, &mesh, Topology::TriangleList);
        assert!(buffer.bind_color().is_some());
        assert!(buffer.attribute(AttributeRole::Color).is_some());
        assert_eq!(backend.live_buffers(), 4);
    }

    #[test]
    fn empty_mesh_allocates_nothing() {
        let backend = HeadlessBackend::new();
        let buffer = MeshBuffer::upload(&backend, &Mesh::default(), Topology::TriangleList);
        assert_eq!(buffer.element_count(), 0);
        assert!(buffer.bind_position().is_none());
        assert!(buffer.bind_index().is_none());
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn drop_releases_buffers() {
        let backend = HeadlessBackend::new();
        let mesh = Icosphere::build(Vec3::ZERO, 1.0, 2);
        let buffer = MeshBuffer::upload(&backend, &mesh, Topology::TriangleList);
        assert_eq!(backend.live_buffers(), 3);
        drop(buffer);
        assert_eq!(backend.live_buffers(), 0);
    }
}
