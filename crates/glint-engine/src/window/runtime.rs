use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, GpuCtx};
use crate::device::{
    AcquireOptions, DeviceSession, SurfaceBinding, SurfaceErrorAction,
};
use crate::sched::{Phase, RecoveryAction};
use crate::target::{RenderTargetManager, MSAA_SAMPLE_COUNT};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the frame loop until the window closes or the device session ends.
    ///
    /// Acquisition failures are logged and also returned, so binaries exit
    /// nonzero without partial state left running.
    pub fn run<A>(config: RuntimeConfig, options: AcquireOptions, app: A) -> Result<()>
    where
        A: App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, options, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    binding: SurfaceBinding<'this>,
}

fn bind_window(window: Window, session: &DeviceSession) -> WindowEntry {
    WindowEntryBuilder {
        window,
        binding_builder: |w| {
            SurfaceBinding::bind(w, session).expect("surface binding failed for window")
        },
    }
    .build()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum FrameOutcome {
    /// One command sequence was submitted and presented.
    Submitted,
    /// Nothing drawable this tick (degenerate size, surface hiccup);
    /// scheduling continues.
    Skipped,
    /// Unrecoverable surface error; terminate gracefully.
    Fatal,
}

struct AppState<A>
where
    A: App,
{
    config: RuntimeConfig,
    options: AcquireOptions,
    app: A,

    session: Option<DeviceSession>,
    entry: Option<WindowEntry>,
    targets: RenderTargetManager,
    clock: FrameClock,
    phase: Phase,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App,
{
    fn new(config: RuntimeConfig, options: AcquireOptions, app: A) -> Self {
        Self {
            config,
            options,
            app,
            session: None,
            entry: None,
            targets: RenderTargetManager::new(),
            clock: FrameClock::new(),
            phase: Phase::new(),
            fatal: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    /// First acquisition: session, surface binding, static resources.
    ///
    /// Any acquisition failure halts initialization; nothing downstream is
    /// constructed in that case.
    fn initialize(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = match event_loop.create_window(attrs) {
            Ok(w) => w,
            Err(e) => {
                log::error!("failed to create window: {e}");
                self.fatal = Some(anyhow::Error::new(e).context("window creation failed"));
                self.request_exit(event_loop);
                return;
            }
        };

        let session = match pollster::block_on(DeviceSession::acquire(self.options.clone())) {
            Ok(s) => s,
            Err(e) => {
                log::error!("GPU acquisition failed: {e}");
                self.fatal = Some(anyhow::Error::new(e).context("GPU acquisition failed"));
                self.request_exit(event_loop);
                return;
            }
        };

        let entry = bind_window(window, &session);

        let ctx = GpuCtx {
            device: session.device(),
            queue: session.queue(),
            surface_format: entry.borrow_binding().format(),
            sample_count: MSAA_SAMPLE_COUNT,
        };
        self.app.rebuild(&ctx);

        self.phase.on_acquired(session.generation());
        self.session = Some(session);

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
    }

    /// Re-acquires the session after a non-intentional loss and rebuilds
    /// everything downstream from zero: surface reconfigured, render target
    /// invalidated, static resources rebuilt against the new device.
    fn recover(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        log::warn!("attempting device recovery");

        if let Err(e) = pollster::block_on(session.reacquire()) {
            log::error!("device recovery failed: {e}");
            self.phase.on_recovery_failed();
            return false;
        }

        self.targets.invalidate();

        if let Some(entry) = self.entry.as_mut() {
            entry.with_binding_mut(|b| b.rebind(session.device()));

            let ctx = GpuCtx {
                device: session.device(),
                queue: session.queue(),
                surface_format: entry.borrow_binding().format(),
                sample_count: MSAA_SAMPLE_COUNT,
            };
            self.app.rebuild(&ctx);
        }

        self.clock.reset();
        self.phase.on_acquired(session.generation());
        true
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Drain the loss slot before touching the device this tick.
        if let Some(session) = self.session.as_mut() {
            session.poll();

            if let Some(loss) = session.take_loss() {
                match self.phase.on_loss(loss.reason) {
                    RecoveryAction::Halt => {
                        log::info!("device destroyed; stopping frame loop");
                        self.request_exit(event_loop);
                        return;
                    }
                    RecoveryAction::Reacquire => {
                        if !self.recover() {
                            self.request_exit(event_loop);
                            return;
                        }
                    }
                }
            }
        }

        if !self.phase.is_running() {
            return;
        }

        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let app = &mut self.app;
        let targets = &mut self.targets;
        let clock = &mut self.clock;

        let mut outcome = FrameOutcome::Skipped;
        entry.with_mut(|fields| {
            outcome = render_frame(session, fields.window, fields.binding, targets, app, clock);
        });

        if outcome == FrameOutcome::Fatal {
            log::error!("surface ran out of memory; exiting");
            self.request_exit(event_loop);
        }
    }
}

/// Builds and submits one command sequence into the current MSAA target,
/// resolving into the surface's presentable image.
fn render_frame<A>(
    session: &DeviceSession,
    window: &Window,
    binding: &mut SurfaceBinding<'_>,
    targets: &mut RenderTargetManager,
    app: &mut A,
    clock: &mut FrameClock,
) -> FrameOutcome
where
    A: App,
{
    let size = window.inner_size();
    binding.resize(session.device(), size);

    // Lazy (re)allocation keyed on the observed drawable size; None means the
    // size is degenerate and this tick is skipped without stalling the loop.
    let Some(msaa_view) = targets.ensure(session.device(), binding.format(), size) else {
        return FrameOutcome::Skipped;
    };

    let surface_texture = match binding.acquire_frame() {
        Ok(t) => t,
        Err(err) => {
            return match binding.handle_error(session.device(), err) {
                SurfaceErrorAction::Fatal => FrameOutcome::Fatal,
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                    FrameOutcome::Skipped
                }
            };
        }
    };

    let resolve_view = surface_texture
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = session
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("glint frame encoder"),
        });

    let policy = app.pass_policy();

    // Pass is scoped so the encoder can be finished afterwards.
    {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint msaa pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: msaa_view,
                resolve_target: Some(&resolve_view),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(policy.clear_color),
                    store: policy.msaa_store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        app.draw(&mut rpass);
    }

    session.queue().submit(std::iter::once(encoder.finish()));
    window.pre_present_notify();
    surface_texture.present();

    let ft = clock.tick();
    log::trace!("frame {} submitted (dt {:.4}s)", ft.frame_index, ft.dt);

    FrameOutcome::Submitted
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        self.initialize(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous loop: one redraw per vsync tick, rescheduled
        // unconditionally. Skipped frames self-heal on a later tick.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let (Some(entry), Some(session)) = (self.entry.as_mut(), self.session.as_ref())
                {
                    entry.with_binding_mut(|b| b.resize(session.device(), new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(entry), Some(session)) = (self.entry.as_mut(), self.session.as_ref())
                {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_binding_mut(|b| b.resize(session.device(), new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }

            _ => {}
        }
    }
}
