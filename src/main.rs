use eco_terra::EcoApp;

fn main() -> eframe::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "EcoTerra",
        options,
        Box::new(|cc| Ok(Box::new(EcoApp::new(cc)))),
    )
}
