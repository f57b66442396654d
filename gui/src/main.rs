// GUI main entry point using Dioxus
#![allow(non_snake_case)] // Common for Dioxus components

use dioxus::prelude::*;
use dioxus_desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};
use engine::data::loader::TimeSeriesLoader;
use std::sync::Arc;

mod app;
mod components;
mod config;
mod services;
mod state;

use app::App;
use config::AppConfig;

fn main() {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting candlestick chart viewer (Dioxus Desktop)...");

    let app_config = match AppConfig::load() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration version {}.", cfg.version);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}. Exiting.", e);
            std::process::exit(1);
        }
    };

    let loader = match TimeSeriesLoader::new(app_config.loader.clone()) {
        Ok(loader) => Arc::new(loader),
        Err(e) => {
            tracing::error!("Failed to set up the feed loader: {}. Exiting.", e);
            std::process::exit(1);
        }
    };

    let desktop_config = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title(app_config.window.title.clone())
            .with_inner_size(LogicalSize::new(app_config.window.width, app_config.window.height)),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_config)
        .with_context(app_config)
        .with_context(loader)
        .launch(App);

    tracing::info!("Candlestick chart viewer finished.");
}
