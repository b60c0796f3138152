use eframe::egui;
use thermolog::app::ThermoLogApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ThermoLog")
            .with_inner_size([1280.0, 840.0])
            .with_min_inner_size([800.0, 560.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "ThermoLog",
        options,
        Box::new(|cc| Ok(Box::new(ThermoLogApp::new(cc)?))),
    )
}
