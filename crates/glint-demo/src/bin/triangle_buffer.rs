//! Vertex-buffer triangle: MSAA buffer stored, dynamic resize.

use anyhow::Result;

use glint_demo::triangle::BufferTriangle;
use glint_engine::device::AcquireOptions;
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting vertex-buffer triangle demo");

    let config = RuntimeConfig {
        title: "glint triangle (vertex buffer)".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
    };

    Runtime::run(config, AcquireOptions::default(), BufferTriangle::new())
}
