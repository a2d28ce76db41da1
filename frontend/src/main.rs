#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // no console in release

mod app;
mod event;

use app::App;

/// Loads a thresholded image to start from instead of an empty grid
#[cfg(not(target_arch = "wasm32"))]
fn load_seed(path: &str) -> Result<gridsearch::Grid, anyhow::Error> {
    use anyhow::Context;

    let img = image::open(path).with_context(|| format!("Could not open image {}", path))?;
    gridsearch::util::grid_from_image(&img)
}

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let seed = std::env::args().nth(1).and_then(|path| match load_seed(&path) {
        Ok(grid) => Some(grid),
        Err(e) => {
            log::error!("{:#}", e);
            None
        }
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Grid Search Visualizer",
        native_options,
        Box::new(move |cc| Box::new(App::new(cc, seed))),
    )
}

// When compiling to web using trunk:
#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let start_result = eframe::WebRunner::new()
            .start(
                "the_canvas_id", // hardcode it
                web_options,
                Box::new(|cc| Box::new(App::new(cc, None))),
            )
            .await;

        if let Err(e) = start_result {
            log::error!("failed to start eframe: {:?}", e);
        }
    });
}
