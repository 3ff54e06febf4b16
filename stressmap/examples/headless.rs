//! Runs the viewer layer lifecycle against local or served assets without a window.
//! Run with: cargo run --example headless -- <asset root or http origin> [config.json]
//!
//! The asset root (or origin) must serve the files named in the configuration, e.g.
//! `assets/stress_sample.json` and `assets/sample.tif` for the default one.

use std::sync::Arc;

use anyhow::Context;
use stressmap::config::Selection;
use stressmap::grayscale::GrayscaleImage;
use stressmap::legend::Legend;
use stressmap::loader::{DirectoryLoader, HttpLoader};
use stressmap::map::{HeadlessMap, MapEngine, MapViewState, PointerEvent};
use stressmap::overlay::geotiff::GeoTiffSourceProvider;
use stressmap::{LayerLifecycleManager, ResourceLoader, ViewerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| ".".to_owned());
    let config = match args.next() {
        Some(path) => ViewerConfig::from_json_file(&path)
            .with_context(|| format!("failed to read config {path}"))?,
        None => ViewerConfig::default(),
    };

    let is_origin = root.starts_with("http://") || root.starts_with("https://");
    let loader: Arc<dyn ResourceLoader> = if is_origin {
        Arc::new(HttpLoader::new(reqwest::Client::new()).with_base_url(&root)?)
    } else {
        Arc::new(DirectoryLoader::new(&root))
    };
    let raster_sources = Arc::new(GeoTiffSourceProvider::new(loader.clone()));
    let initial_view = MapViewState {
        center: config.viewport.initial_center,
        zoom: config.viewport.initial_zoom,
    };
    let raster_url = config.raster.url.clone();
    let stress_maps = config.stress_map_options();

    let manager = LayerLifecycleManager::new(
        HeadlessMap::new(1024, 768, initial_view),
        config,
        loader.clone(),
        raster_sources,
    );

    manager.initialize()?.await;
    print_state(&manager);

    for selection in stress_maps {
        println!("-- Stress Map: {selection}");
        manager.set_stress(&selection)?.await;
        print_state(&manager);

        if let Selection::Named(_) = selection {
            let center = manager
                .with_map(|map| map.view().center)
                .context("map released")?;
            let label = manager.pointer_moved(&PointerEvent {
                pixel: [512.0, 384.0],
                coordinate: center,
            });
            match label {
                Some(label) => println!("Hover at view center: {label}"),
                None => println!("Hover at view center: no feature"),
            }
        }
    }

    let legend = Legend::default();
    let ticks: Vec<_> = legend.ticks().iter().map(|tick| tick.label()).collect();
    let gradient: Vec<_> = legend.gradient(5).iter().map(|c| c.to_css()).collect();
    println!("{}: {} / {}", legend.title(), ticks.join(" "), gradient.join(" "));

    match loader.load_bytes(&raster_url).await {
        Ok(bytes) => {
            let preview = GrayscaleImage::from_tiff(&bytes)
                .with_context(|| format!("failed to decode {raster_url}"))?;
            println!(
                "Grayscale preview of {raster_url}: {}x{}",
                preview.width(),
                preview.height()
            );
        }
        Err(err) => println!("No grayscale preview of {raster_url}: {err}"),
    }

    let map = manager.teardown().context("map already released")?;
    println!("Layers after teardown: {}", map.layers().count());

    Ok(())
}

fn print_state(manager: &LayerLifecycleManager<HeadlessMap>) {
    let Some((view, kinds)) = manager.with_map(|map| {
        let kinds: Vec<_> = map.layers().map(|(_, layer)| layer.kind()).collect();
        (map.view(), kinds)
    }) else {
        return;
    };

    println!(
        "Layers: [{}], raster: {:?}, stress map: {:?}",
        kinds.join(", "),
        manager.raster_state(),
        manager.active_stress_url()
    );
    println!(
        "View: center ({:.5}, {:.5}), zoom {:.2}",
        view.center.lon(),
        view.center.lat(),
        view.zoom
    );
}
