use glint_engine::core::{App, GpuCtx, PassPolicy};

use crate::vertex::{Vertex, TRIANGLE_VERTICES};

/// Triangle with positions baked into the vertex shader; the MSAA buffer is
/// discarded after resolving into the presentable image.
#[derive(Default)]
pub struct InlineTriangle {
    pipeline: Option<wgpu::RenderPipeline>,
}

impl InlineTriangle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl App for InlineTriangle {
    fn rebuild(&mut self, ctx: &GpuCtx<'_>) {
        self.pipeline = Some(build_pipeline(
            ctx,
            "triangle inline",
            include_str!("shaders/triangle_inline.wgsl"),
            &[],
        ));
    }

    fn pass_policy(&self) -> PassPolicy {
        PassPolicy {
            clear_color: wgpu::Color::BLACK,
            msaa_store: wgpu::StoreOp::Discard,
        }
    }

    fn draw(&mut self, rpass: &mut wgpu::RenderPass<'_>) {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.draw(0..3, 0..1);
    }
}

/// Triangle with positions uploaded through a vertex buffer; the MSAA buffer is
/// stored in addition to the resolve.
#[derive(Default)]
pub struct BufferTriangle {
    pipeline: Option<wgpu::RenderPipeline>,
    vertex_buffer: Option<wgpu::Buffer>,
}

impl BufferTriangle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl App for BufferTriangle {
    fn rebuild(&mut self, ctx: &GpuCtx<'_>) {
        self.pipeline = Some(build_pipeline(
            ctx,
            "triangle buffer",
            include_str!("shaders/triangle_buffer.wgsl"),
            &[Vertex::layout()],
        ));

        let vertex_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("triangle vbo"),
            size: std::mem::size_of_val(&TRIANGLE_VERTICES) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        ctx.queue
            .write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&TRIANGLE_VERTICES));

        self.vertex_buffer = Some(vertex_buffer);
    }

    fn pass_policy(&self) -> PassPolicy {
        PassPolicy {
            clear_color: wgpu::Color::BLACK,
            msaa_store: wgpu::StoreOp::Store,
        }
    }

    fn draw(&mut self, rpass: &mut wgpu::RenderPass<'_>) {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };
        let Some(vbo) = self.vertex_buffer.as_ref() else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..TRIANGLE_VERTICES.len() as u32, 0..1);
    }
}

fn build_pipeline(
    ctx: &GpuCtx<'_>,
    label: &str,
    shader_src: &str,
    vertex_buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let layout = ctx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

    ctx.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: vertex_buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: ctx.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },

            multiview_mask: None,
            cache: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_variant_discards_msaa_after_resolve() {
        let app = InlineTriangle::new();
        assert_eq!(app.pass_policy().msaa_store, wgpu::StoreOp::Discard);
    }

    #[test]
    fn buffer_variant_stores_msaa() {
        let app = BufferTriangle::new();
        assert_eq!(app.pass_policy().msaa_store, wgpu::StoreOp::Store);
    }

    #[test]
    fn both_variants_clear_to_opaque_black() {
        for policy in [
            InlineTriangle::new().pass_policy(),
            BufferTriangle::new().pass_policy(),
        ] {
            assert_eq!(policy.clear_color, wgpu::Color::BLACK);
        }
    }

}
