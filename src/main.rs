#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod model_download;
mod pipeline;
mod sketch;
mod types;
mod ui;

use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use gpui::Application;

use config::SketchConfig;

fn main() -> Result<()> {
    env_logger::init();

    let config = SketchConfig::from_env().context("invalid configuration")?;
    log::info!(
        "model {} (input {}px), export to {}",
        config.model_path.display(),
        config.input_size,
        config.export_path.display()
    );

    let (camera_frame_tx, camera_frame_rx) = bounded(1);

    Application::new()
        .with_assets(gpui_component_assets::Assets)
        .run(move |app| {
            gpui_component::init(app);

            if let Err(err) = ui::launch_ui(app, config, camera_frame_rx, camera_frame_tx) {
                log::error!("failed to launch ui: {err:?}");
            }
        });

    Ok(())
}
