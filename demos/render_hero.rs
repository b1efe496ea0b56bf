//! Example: Render the hero graphics to PNG frames.
//!
//! Run with:
//!     cargo run --example render_hero --features tokio -- [config.json] [out_dir]
//!
//! Without a config file a 3 second 1280x720 dark-theme render of a capable
//! desktop is produced, scrolling the hero out of view in the last second.

use anyhow::Context;
use hero_graphics::device::{ConnectionInfo, DeviceSignals, EffectiveType};
use hero_graphics::pipeline::{render_hero, HeroConfig, ScrollKey};
use std::io::Write;
use std::path::PathBuf;

fn default_config() -> HeroConfig {
    HeroConfig {
        width: 1280,
        height: 720,
        fps: 30,
        duration: 3.0,
        signals: DeviceSignals {
            hardware_concurrency: Some(8),
            device_memory: Some(8.0),
            connection: Some(ConnectionInfo {
                save_data: Some(false),
                effective_type: Some(EffectiveType::FourG),
            }),
            ..Default::default()
        },
        scroll: vec![
            ScrollKey {
                time: 2.0,
                element_top: 0.0,
            },
            ScrollKey {
                time: 3.0,
                element_top: -720.0,
            },
        ],
        ..Default::default()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => HeroConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => default_config(),
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "hero_frames".to_string()));

    println!("Hero Graphics - Headless Render");
    println!("===============================\n");
    println!("  Resolution: {}x{} @{}x", config.width, config.height, config.pixel_ratio);
    println!("  FPS: {}", config.fps);
    println!("  Duration: {}s", config.duration);
    println!("  Theme: {}\n", config.theme.name());

    let progress: Box<dyn Fn(f32) + Send> = Box::new(|p| {
        print!("\r  Rendering: {:5.1}%", p * 100.0);
        let _ = std::io::stdout().flush();
    });

    let summary = render_hero(&config, &out_dir, Some(progress))
        .await
        .context("rendering hero")?;

    println!();
    println!("  Tier: {}", summary.tier.name());
    match &summary.fallback_art {
        Some(art) => println!("  Fallback artwork: {}", art),
        None => println!(
            "  Wrote {} frames ({}x{}) to {}",
            summary.frames_written,
            summary.width,
            summary.height,
            out_dir.display()
        ),
    }

    Ok(())
}
