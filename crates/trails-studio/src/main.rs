use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use trails_engine::asset::AssetRoot;
use trails_engine::config::SceneConfig;
use trails_engine::logging::{init_logging, LoggingConfig};
use trails_engine::scene::{MaterialSources, Scene};
use trails_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let assets = AssetRoot::new(asset_dir());
    log::info!("assets: {}", assets.dir().display());
    let sources = MaterialSources::load(&assets).context("failed to load shaders")?;

    let config = scene_config()?;
    let runtime = RuntimeConfig {
        title: "trails".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(runtime, move |gpu, size| {
        Scene::new(gpu, &sources, config, size)
    })
}

/// `TRAILS_ASSET_DIR`, else the crate's own `assets/`.
fn asset_dir() -> PathBuf {
    env::var_os("TRAILS_ASSET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets")))
}

/// `TRAILS_SEED` fixes the particle RNG; `TRAILS_FIELD_LINES=1` shows the field.
fn scene_config() -> Result<SceneConfig> {
    let seed = match env::var("TRAILS_SEED") {
        Ok(s) => Some(s.parse().with_context(|| format!("invalid TRAILS_SEED {s:?}"))?),
        Err(_) => None,
    };
    let show_field_lines = env::var("TRAILS_FIELD_LINES").is_ok_and(|v| v == "1");

    Ok(SceneConfig {
        seed,
        show_field_lines,
        ..SceneConfig::default()
    })
}
