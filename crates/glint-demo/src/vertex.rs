use bytemuck::{Pod, Zeroable};

/// One vertex: a clip-space position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

/// The demo triangle in clip space, counter-clockwise.
///
/// Must stay in sync with the positions baked into `triangle_inline.wgsl`;
/// both variants rasterize this exact triangle.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex { position: [0.0, -0.5] },
    Vertex { position: [0.5, 0.5] },
    Vertex { position: [-0.5, 0.5] },
];

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        0 => Float32x2 // position, see vertex shader
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_two_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8);
        assert_eq!(Vertex::layout().array_stride, 8);
    }

    #[test]
    fn upload_bytes_cover_all_vertices() {
        let bytes: &[u8] = bytemuck::cast_slice(&TRIANGLE_VERTICES);
        assert_eq!(bytes.len(), 24);
    }

    #[test]
    fn buffer_geometry_matches_inline_shader() {
        // The buffer variant must rasterize the same clip-space triangle as
        // the inline-shader variant.
        let inline_src = include_str!("shaders/triangle_inline.wgsl");

        for v in TRIANGLE_VERTICES {
            let literal = format!("vec2<f32>({:?}, {:?})", v.position[0], v.position[1]);
            assert!(
                inline_src.contains(&literal),
                "inline shader is missing vertex {literal}"
            );
        }
    }

    #[test]
    fn triangle_is_counter_clockwise() {
        let [a, b, c] = TRIANGLE_VERTICES;
        let cross = (b.position[0] - a.position[0]) * (c.position[1] - a.position[1])
            - (b.position[1] - a.position[1]) * (c.position[0] - a.position[0]);
        assert!(cross > 0.0);
    }
}
