use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::DeviceSession;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Association between the window surface and the active device.
///
/// The pixel format is chosen once at the first bind and reused for the
/// lifetime of the binding, including rebinds after device recovery.
pub struct SurfaceBinding<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl<'w> SurfaceBinding<'w> {
    /// Binds the window surface to the session's device.
    ///
    /// Picks the backend's preferred presentable format (sRGB favored) and a
    /// premultiplied alpha mode when the surface supports one.
    pub fn bind(window: &'w Window, session: &DeviceSession) -> Result<Self> {
        let size = window.inner_size();

        let surface = session
            .instance()
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let caps = surface.get_capabilities(session.adapter());

        let format = pick_format(&caps.formats).context("no supported surface formats")?;
        let alpha_mode = pick_alpha_mode(&caps.alpha_modes);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(session.device(), &config);

        Ok(Self {
            surface,
            config,
            size,
        })
    }

    /// Reconfigures the surface against a replacement device after recovery.
    ///
    /// The format chosen at the first bind is reused; only the device changes.
    pub fn rebind(&mut self, device: &wgpu::Device) {
        if self.size.width > 0 && self.size.height > 0 {
            self.surface.configure(device, &self.config);
        }
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu does not support configuring a surface with a 0x0 size; in that
    /// case only internal state is updated and configuration is deferred.
    pub fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        if new_size == self.size {
            return;
        }

        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(device, &self.config);
    }

    /// Acquires the next presentable surface texture.
    pub fn acquire_frame(&self) -> std::result::Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_error(&self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.size.width > 0 && self.size.height > 0 {
                    self.surface.configure(device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
            wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }

    /// Returns the format fixed at the first bind.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the last size the binding was configured (or asked) to match.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }
}

fn pick_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    let preferred = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    for f in preferred {
        if formats.contains(&f) {
            return Some(f);
        }
    }

    formats.first().copied()
}

fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::PreMultiplied) {
        return wgpu::CompositeAlphaMode::PreMultiplied;
    }

    modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_prefers_srgb() {
        let formats = [
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(pick_format(&formats), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn format_falls_back_to_first_supported() {
        let formats = [wgpu::TextureFormat::Rgb10a2Unorm];
        assert_eq!(pick_format(&formats), Some(wgpu::TextureFormat::Rgb10a2Unorm));
    }

    #[test]
    fn format_empty_caps_is_none() {
        assert_eq!(pick_format(&[]), None);
    }

    #[test]
    fn alpha_prefers_premultiplied() {
        let modes = [
            wgpu::CompositeAlphaMode::Opaque,
            wgpu::CompositeAlphaMode::PreMultiplied,
        ];
        assert_eq!(pick_alpha_mode(&modes), wgpu::CompositeAlphaMode::PreMultiplied);
    }

    #[test]
    fn alpha_falls_back_to_first_supported() {
        let modes = [wgpu::CompositeAlphaMode::Opaque];
        assert_eq!(pick_alpha_mode(&modes), wgpu::CompositeAlphaMode::Opaque);
    }
}
