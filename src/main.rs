use eframe::egui;
use signpad::app::SignPadApp;
use signpad::settings::PadSettings;
use signpad::{cli, i18n, logger, t};

fn main() -> Result<(), eframe::Error> {
    // -- CLI / headless mode ---------------------------------------------
    if cli::CliArgs::is_cli_mode() {
        use clap::Parser;
        i18n::init();
        let args = cli::CliArgs::parse();
        let code = cli::run(args);
        std::process::exit(if code == std::process::ExitCode::SUCCESS {
            0
        } else {
            1
        });
    }

    // -- GUI mode -----------------------------------------------------

    // Initialize session log (overwrites previous session log)
    logger::init();

    let settings = PadSettings::load();
    i18n::init();
    i18n::apply_setting(&settings.language);
    signpad::log_info!("Language: {}", i18n::current_language());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 360.0])
            .with_min_inner_size([240.0, 300.0])
            .with_title(t!("app.title")),
        ..Default::default()
    };

    eframe::run_native(
        "SignPad",
        options,
        Box::new(move |cc| Box::new(SignPadApp::new(cc, settings))),
    )
}
