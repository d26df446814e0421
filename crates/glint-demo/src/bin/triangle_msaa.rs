//! Inline-vertex triangle: MSAA buffer discarded after resolve.

use anyhow::Result;

use glint_demo::triangle::InlineTriangle;
use glint_engine::device::AcquireOptions;
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting inline-vertex triangle demo");

    let config = RuntimeConfig {
        title: "glint triangle (msaa)".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
    };

    Runtime::run(config, AcquireOptions::default(), InlineTriangle::new())
}
