//! Headless fly-through: streams terrain around an observer moving in a straight line

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;

use endless_terrain::core::logging;
use endless_terrain::streaming::{StreamingConfig, TerrainStreamer, ThreadedProvider};

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("Logging disabled: {}", e);
    }

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> endless_terrain::core::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_arg::<String>(&args, "--config").map(PathBuf::from);
    let frames = parse_arg::<u64>(&args, "--frames").unwrap_or(600);
    let speed = parse_arg::<f32>(&args, "--speed").unwrap_or(4.0);
    let fps = parse_arg::<u32>(&args, "--fps").unwrap_or(60).max(1);

    let mut config = match &config_path {
        Some(path) => StreamingConfig::load(path)?,
        None => StreamingConfig::default(),
    };
    if let Some(seed) = parse_arg::<u32>(&args, "--seed") {
        config.terrain.seed = seed;
    }
    config.validate()?;

    log::info!(
        "Fly-through: {} frames at {} fps, {} units/frame, seed {}",
        frames, fps, speed, config.terrain.seed
    );

    let provider = Arc::new(ThreadedProvider::new(config.terrain.clone(), config.worker_threads)?);
    let mut streamer = TerrainStreamer::new(&config, provider)?;

    let frame_time = Duration::from_secs_f64(1.0 / fps as f64);
    let direction = Vec3::new(1.0, 0.0, 0.35).normalize();
    let start = Instant::now();

    for frame in 0..frames {
        let frame_start = Instant::now();
        let observer = direction * speed * frame as f32 + Vec3::Y * 50.0;

        streamer.tick(observer);

        if frame % fps as u64 == 0 {
            let stats = streamer.stats();
            log::info!(
                "frame {:>5} at {} | resident {} visible {} | data {} mesh {} ready {} | jobs {}",
                frame,
                streamer.current_chunk_coord(),
                stats.resident,
                stats.visible,
                stats.awaiting_data,
                stats.awaiting_mesh,
                stats.ready,
                streamer.provider().in_flight()
            );
        }

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    let stats = streamer.stats();
    log::info!(
        "Done in {:.1}s: {} ticks, {} chunks created, {} ready, {} visible at the end",
        start.elapsed().as_secs_f32(),
        stats.ticks,
        stats.resident,
        stats.ready,
        stats.visible
    );

    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}
