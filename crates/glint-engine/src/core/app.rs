/// Handles the application needs to (re)build its static GPU resources.
///
/// Passed by explicit argument on every rebuild; applications must not stash
/// device handles across rebuilds, since a rebuild means the previous device
/// is gone.
pub struct GpuCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,

    /// Format of the surface and of the MSAA color target.
    pub surface_format: wgpu::TextureFormat,

    /// Sample count of the MSAA color target the pass renders into.
    pub sample_count: u32,
}

/// Render-pass policy supplied by the application.
#[derive(Debug, Copy, Clone)]
pub struct PassPolicy {
    /// Clear color for the MSAA attachment.
    pub clear_color: wgpu::Color,

    /// Store op for the MSAA attachment.
    ///
    /// `Discard` drops the multisampled contents after the resolve (the
    /// resolve target still receives the frame); `Store` keeps them, trading
    /// memory bandwidth for no change in output.
    pub msaa_store: wgpu::StoreOp,
}

impl Default for PassPolicy {
    fn default() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            msaa_store: wgpu::StoreOp::Discard,
        }
    }
}

/// Application contract implemented by the demo layer.
///
/// Lifecycle: `rebuild` is called once after the first acquisition and again
/// after every device recovery, always against the new device. `draw` is
/// called once per frame inside a pass already targeting the MSAA view with
/// the surface view as resolve target.
pub trait App: 'static {
    /// Builds (or rebuilds, discarding prior handles) pipeline and buffers.
    fn rebuild(&mut self, ctx: &GpuCtx<'_>);

    /// Clear color and MSAA store behavior for the pass.
    fn pass_policy(&self) -> PassPolicy {
        PassPolicy::default()
    }

    /// Records draw commands for one frame.
    fn draw(&mut self, rpass: &mut wgpu::RenderPass<'_>);
}
