use winit::dpi::PhysicalSize;

/// Fixed sample count for the offscreen color target.
pub const MSAA_SAMPLE_COUNT: u32 = 4;

/// Decision for the current tick, keyed on the observed drawable size.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TargetPlan {
    /// Existing target still matches the drawable size.
    Keep,
    /// No target yet, or the size changed; destroy + reallocate.
    Recreate,
    /// Degenerate (zero-area) size; skip the frame, allocate nothing.
    Skip,
}

/// Plans the per-tick target action from the last allocated size.
pub fn plan(last: Option<PhysicalSize<u32>>, current: PhysicalSize<u32>) -> TargetPlan {
    if current.width == 0 || current.height == 0 {
        return TargetPlan::Skip;
    }

    match last {
        Some(size) if size == current => TargetPlan::Keep,
        _ => TargetPlan::Recreate,
    }
}

struct Target {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: PhysicalSize<u32>,
}

/// Owns the offscreen multisampled color target.
///
/// Invariants:
/// - at most one live target at any time
/// - the view returned by [`ensure`](Self::ensure) is backed by a texture
///   whose dimensions equal the size of the most recent successful call
/// - a stale target is destroyed before its replacement is allocated
#[derive(Default)]
pub struct RenderTargetManager {
    target: Option<Target>,
}

impl RenderTargetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view sized to `size`, reallocating if needed.
    ///
    /// Returns `None` for a degenerate size; the caller must skip the frame
    /// and keep scheduling.
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
    ) -> Option<&wgpu::TextureView> {
        match plan(self.target.as_ref().map(|t| t.size), size) {
            TargetPlan::Skip => return None,
            TargetPlan::Keep => {}
            TargetPlan::Recreate => {
                if let Some(old) = self.target.take() {
                    log::debug!(
                        "render target resized {}x{} -> {}x{}",
                        old.size.width,
                        old.size.height,
                        size.width,
                        size.height
                    );
                    old.texture.destroy();
                }

                let texture = device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("glint msaa color target"),
                    size: wgpu::Extent3d {
                        width: size.width,
                        height: size.height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: MSAA_SAMPLE_COUNT,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                });

                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

                self.target = Some(Target {
                    texture,
                    view,
                    size,
                });
            }
        }

        self.target.as_ref().map(|t| &t.view)
    }

    /// Drops the target wholesale.
    ///
    /// Used on device recovery: textures created against the lost device must
    /// not survive into the new session.
    pub fn invalidate(&mut self) {
        if let Some(old) = self.target.take() {
            old.texture.destroy();
        }
    }

    /// Size of the current live target, if any.
    pub fn current_size(&self) -> Option<PhysicalSize<u32>> {
        self.target.as_ref().map(|t| t.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: u32, h: u32) -> PhysicalSize<u32> {
        PhysicalSize::new(w, h)
    }

    #[test]
    fn first_use_allocates() {
        assert_eq!(plan(None, size(800, 600)), TargetPlan::Recreate);
    }

    #[test]
    fn unchanged_size_keeps_target() {
        assert_eq!(plan(Some(size(800, 600)), size(800, 600)), TargetPlan::Keep);
    }

    #[test]
    fn resize_recreates_exactly_once() {
        // Scenario: 800x600 window resized to 1024x768 mid-loop.
        let mut last = None;
        let mut recreates = 0;

        for current in [size(800, 600), size(800, 600), size(1024, 768), size(1024, 768)] {
            if plan(last, current) == TargetPlan::Recreate {
                recreates += 1;
                last = Some(current);
            }
        }

        assert_eq!(recreates, 2); // initial allocation + one resize
        assert_eq!(last, Some(size(1024, 768)));
    }

    #[test]
    fn zero_area_skips_without_allocating() {
        assert_eq!(plan(None, size(0, 600)), TargetPlan::Skip);
        assert_eq!(plan(Some(size(800, 600)), size(800, 0)), TargetPlan::Skip);
    }

    #[test]
    fn zero_area_preserves_previous_size_for_later_ticks() {
        // A minimized window must not discard the last-known allocation; once
        // the size comes back the plan is Keep, not Recreate.
        let last = Some(size(800, 600));
        assert_eq!(plan(last, size(0, 0)), TargetPlan::Skip);
        assert_eq!(plan(last, size(800, 600)), TargetPlan::Keep);
    }
}
