//! Nexus Console: a Rust-native console for cross-chain balances, transfers and bridges

mod app;
mod sdk_bridge;
mod tasks;
mod ui;
mod views;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eyre::Result<()> {
    use eframe::egui;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(git = env!("GIT_HASH"), "Starting Nexus Console");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Nexus Console")
            .with_inner_size([960.0, 760.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Nexus Console",
        native_options,
        Box::new(|cc| Ok(Box::new(app::App::new(cc)?))),
    )
    .map_err(|e| eyre::eyre!("eframe exited with an error: {e}"))
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use wasm_bindgen::JsCast;

    tracing_wasm::set_as_global_default();
    tracing::info!(git = env!("GIT_HASH"), "Starting Nexus Console");

    wasm_bindgen_futures::spawn_local(async {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("nexus_console_canvas"))
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok());
        let Some(canvas) = canvas else {
            tracing::error!("canvas #nexus_console_canvas not found");
            return;
        };

        let started = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|cc| Ok(Box::new(app::App::new(cc)?))),
            )
            .await;
        if let Err(e) = started {
            tracing::error!(error = ?e, "failed to start eframe");
        }
    });
}
