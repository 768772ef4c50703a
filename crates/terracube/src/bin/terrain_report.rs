//! # Terrain Report
//!
//! Generates and meshes a chunk field headlessly and prints what a GPU
//! would have received.
//!
//! ```text
//! terrain_report [config.toml]
//! RUST_LOG=debug terrain_report
//! ```
//!
//! Exits non-zero on any error, including an active block with no atlas
//! entry.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use terracube::procedural::HeightmapGenerator;
use terracube::rendering::HeadlessSink;
use terracube::shared::CameraView;
use terracube::{ChunkField, TerracubeConfig, TerracubeResult};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("terrain report failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> TerracubeResult<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => TerracubeConfig::load(Path::new(&path))?,
        None => TerracubeConfig::default(),
    };
    let registry = Arc::new(config.load_registry()?);
    let generator = HeightmapGenerator::new(config.terrain.clone());
    let mut sink = HeadlessSink::new();
    let mut field = ChunkField::new(&config, registry);

    let start = Instant::now();
    let outcome = field
        .setup_all(&generator, &mut sink)
        .and_then(|()| field.render_all(&mut sink, &CameraView::IDENTITY));
    let elapsed = start.elapsed();

    let stats = field.stats();
    let resident_bytes = sink.resident_bytes();
    field.unload_all(&mut sink);
    let draws = outcome?;

    println!("=== TERRAIN REPORT ===");
    println!("seed:           {:#x}", config.terrain.seed);
    println!("chunks:         {} ({} loaded)", stats.chunks, stats.loaded);
    println!("active blocks:  {}", stats.active_blocks);
    println!("faces:          {}", stats.faces);
    println!("vertices:       {}", stats.vertices);
    println!("indices:        {}", stats.indices);
    println!("draw calls:     {draws}");
    println!("gpu bytes:      {resident_bytes}");
    println!("setup + render: {:.2} ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}
