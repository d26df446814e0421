use std::sync::{Arc, Mutex};

use super::AcquireError;

/// Acquisition parameters for the device session.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct AcquireOptions {
    /// Backends the instance is allowed to use.
    ///
    /// An empty set means the host has no usable GPU capability and
    /// acquisition fails up front with [`AcquireError::Unsupported`].
    pub backends: wgpu::Backends,

    /// Adapter power preference.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// Why the active device stopped being usable.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LossReason {
    /// Intentional teardown. Terminal; no re-acquisition is attempted.
    Destroyed,
    /// Anything else (driver reset, TDR, backend fault). Recovered by
    /// re-acquiring the session from scratch.
    Unknown,
}

/// One-shot loss notification recorded by the device-lost callback.
#[derive(Debug, Clone)]
pub struct LossEvent {
    pub reason: LossReason,
    pub message: String,
}

/// Owns the wgpu instance and the currently active adapter/device/queue.
///
/// The instance persists across recoveries; on loss only the adapter, device,
/// and queue are replaced ([`DeviceSession::reacquire`]). Everything derived
/// from the previous device (surface configuration, pipelines, buffers,
/// render targets) must be rebuilt by the caller after a successful
/// re-acquisition — downstream state is reconstructed, never patched.
pub struct DeviceSession {
    instance: wgpu::Instance,
    options: AcquireOptions,

    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Bumped on every successful (re)acquisition.
    generation: u64,

    /// Slot written once per device by the loss callback, drained by the
    /// runtime each tick via [`DeviceSession::take_loss`].
    loss: Arc<Mutex<Option<LossEvent>>>,
}

impl DeviceSession {
    /// Acquires an adapter and logical device.
    ///
    /// Acquisition is asynchronous under wgpu; callers block on it with
    /// `pollster` at startup. Every failure is fatal and reported by the
    /// caller; nothing in here retries.
    pub async fn acquire(options: AcquireOptions) -> Result<Self, AcquireError> {
        if options.backends.is_empty() {
            return Err(AcquireError::Unsupported);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: options.backends,
            ..Default::default()
        });

        let (adapter, device, queue, loss) = open_device(&instance, &options).await?;

        Ok(Self {
            instance,
            options,
            adapter,
            device,
            queue,
            generation: 0,
            loss,
        })
    }

    /// Replaces the lost adapter/device/queue with freshly acquired ones.
    ///
    /// Re-runs acquisition from the adapter request onward against the
    /// retained instance and bumps the generation counter.
    pub async fn reacquire(&mut self) -> Result<(), AcquireError> {
        let (adapter, device, queue, loss) = open_device(&self.instance, &self.options).await?;

        self.adapter = adapter;
        self.device = device;
        self.queue = queue;
        self.loss = loss;
        self.generation += 1;

        log::info!("device session re-acquired (generation {})", self.generation);
        Ok(())
    }

    /// Drains the pending loss event, if the loss callback fired.
    pub fn take_loss(&mut self) -> Option<LossEvent> {
        self.loss.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Gives the backend a chance to run queued callbacks (loss included).
    pub fn poll(&self) {
        let _ = self.device.poll(wgpu::PollType::Poll);
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Number of recoveries since the first acquisition.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

async fn open_device(
    instance: &wgpu::Instance,
    options: &AcquireOptions,
) -> Result<
    (
        wgpu::Adapter,
        wgpu::Device,
        wgpu::Queue,
        Arc<Mutex<Option<LossEvent>>>,
    ),
    AcquireError,
> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: options.power_preference,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .map_err(AcquireError::NoAdapter)?;

    log::debug!("selected adapter: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("glint device"),
            required_features: options.required_features,
            required_limits: options.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .map_err(AcquireError::Device)?;

    let loss = watch_loss(&device);

    Ok((adapter, device, queue, loss))
}

/// Registers the one-shot device-lost callback.
///
/// The callback writes into a shared slot instead of re-entering
/// initialization directly; the runtime drains the slot at the top of each
/// tick and drives recovery through the scheduler phase machine.
fn watch_loss(device: &wgpu::Device) -> Arc<Mutex<Option<LossEvent>>> {
    let slot: Arc<Mutex<Option<LossEvent>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&slot);

    device.set_device_lost_callback(move |reason, message| {
        let reason = match reason {
            wgpu::DeviceLostReason::Destroyed => LossReason::Destroyed,
            wgpu::DeviceLostReason::Unknown => LossReason::Unknown,
        };

        log::error!("GPU device was lost ({reason:?}): {message}");

        if let Ok(mut slot) = sink.lock() {
            *slot = Some(LossEvent { reason, message });
        }
    });

    slot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_backends_is_unsupported() {
        let options = AcquireOptions {
            backends: wgpu::Backends::empty(),
            ..Default::default()
        };

        let result = pollster::block_on(DeviceSession::acquire(options));
        assert!(matches!(result, Err(AcquireError::Unsupported)));
    }

    #[test]
    fn default_options_allow_all_backends() {
        let options = AcquireOptions::default();
        assert_eq!(options.backends, wgpu::Backends::all());
        assert!(options.required_features.is_empty());
    }
}
