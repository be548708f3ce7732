//! Horizon Segments gallery.
//!
//! Runs the gallery pages headlessly and logs what the native hosts show.
//!
//! Run with: cargo run -p horizon-segments-gallery -- [gallery.toml]

mod config;
mod pages;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{GalleryConfig, GalleryError};
use crate::pages::{AndroidPage, run_core_page};

/// Default log directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "info,horizon_segments=debug";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<(), GalleryError> {
    init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => GalleryConfig::load(path)?,
        None => GalleryConfig::default(),
    };

    let report = run_core_page(&config)?;
    tracing::info!(?report, "core gallery page done");

    let mut android = AndroidPage::new(&config.android);
    let radii = android.run(&config.android.steps);
    android.on_disappearing();
    tracing::info!(
        ?radii,
        label = %android.radius_label(),
        stepper = android.stepper().value(),
        corner_radius = android.element().corner_radius(),
        "android corner radius page done"
    );

    Ok(())
}
