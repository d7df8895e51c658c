// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

mod app;
mod config;
mod logic;
mod models;
mod mvu;
mod signals;
mod ui;
mod utils;

use anyhow::anyhow;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::Config::load();
    log::info!(
        "Starting with catalog {} and assets from {}",
        config.catalog_path.display(),
        config.asset_root
    );

    app::run(config).map_err(|err| anyhow!("UI terminated with an error: {err}"))
}
