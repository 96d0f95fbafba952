//! Position-only triangle meshes.

use glam::Vec3;
use reflector_core::SurfaceGeometry;
use wgpu::util::DeviceExt;

/// Vertex layout shared by the reflector and unlit pipelines.
pub const VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: 12,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    }],
};

/// A non-indexed triangle list on the GPU.
pub struct SurfaceMesh {
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl SurfaceMesh {
    /// Uploads a triangle list.
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[Vec3]) -> Self {
        let vertex_count = u32::try_from(vertices.len()).unwrap_or(u32::MAX);
        // Empty meshes keep no buffer and draw nothing.
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            let data: Vec<[f32; 3]> = vertices.iter().map(|v| v.to_array()).collect();
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&data),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        Self {
            vertex_buffer,
            vertex_count,
        }
    }

    /// Triangulates and uploads a reflective surface shape.
    pub fn from_geometry(device: &wgpu::Device, geometry: &SurfaceGeometry) -> Self {
        Self::new(device, "reflector surface", &geometry.triangle_vertices())
    }

    /// Uploads an axis-aligned box centered on the origin.
    pub fn cuboid(device: &wgpu::Device, half_extents: Vec3) -> Self {
        Self::new(device, "cuboid", &cuboid_vertices(half_extents))
    }

    /// Number of vertices drawn.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Records the draw into `render_pass`. The pipeline and bind groups
    /// must already be set.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if let Some(buffer) = &self.vertex_buffer {
            render_pass.set_vertex_buffer(0, buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }
    }
}

/// Counter-clockwise triangles of a box with the given half extents.
pub fn cuboid_vertices(half_extents: Vec3) -> Vec<Vec3> {
    let h = half_extents;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
    // Each face as four corners in counter-clockwise order seen from outside.
    let faces = [
        [corner(1., -1., -1.), corner(1., 1., -1.), corner(1., 1., 1.), corner(1., -1., 1.)],
        [corner(-1., -1., 1.), corner(-1., 1., 1.), corner(-1., 1., -1.), corner(-1., -1., -1.)],
        [corner(-1., 1., -1.), corner(-1., 1., 1.), corner(1., 1., 1.), corner(1., 1., -1.)],
        [corner(-1., -1., 1.), corner(-1., -1., -1.), corner(1., -1., -1.), corner(1., -1., 1.)],
        [corner(-1., -1., 1.), corner(1., -1., 1.), corner(1., 1., 1.), corner(-1., 1., 1.)],
        [corner(1., -1., -1.), corner(-1., -1., -1.), corner(-1., 1., -1.), corner(1., 1., -1.)],
    ];
    faces
        .iter()
        .flat_map(|[a, b, c, d]| [*a, *b, *c, *a, *c, *d])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_faces_point_outward() {
        let vertices = cuboid_vertices(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(vertices.len(), 36);
        for triangle in vertices.chunks(3) {
            let normal = (triangle[1] - triangle[0]).cross(triangle[2] - triangle[0]);
            let center = (triangle[0] + triangle[1] + triangle[2]) / 3.0;
            assert!(normal.dot(center) > 0.0, "inward face {triangle:?}");
        }
    }

    #[test]
    fn test_vertex_layout_matches_vec3() {
        assert_eq!(VERTEX_LAYOUT.array_stride, std::mem::size_of::<[f32; 3]>() as u64);
    }
}
