use eframe::egui;
use log::warn;

use graph_sketch::gui::frontend::GraphApp;
use graph_sketch::persistence::persist;
use graph_sketch::persistence::settings::AppSettings;
use graph_sketch::persistence::store::FileStore;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = AppSettings::load().unwrap_or_else(|e| {
        warn!("settings unreadable, using defaults: {}", e);
        AppSettings::default()
    });
    let store = FileStore::new(settings.storage_dir());
    let loaded_state = persist::load(&store);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([400.0, 300.0])
            .with_resizable(true),
        ..Default::default()
    };
    eframe::run_native(
        "Graph-Sketch",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(GraphApp::new(settings, Box::new(store), loaded_state)) as Box<dyn eframe::App>)
        }),
    )
}
