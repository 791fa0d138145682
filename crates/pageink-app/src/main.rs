//! Headless session runner: loads a config, opens every page and reports.

mod shortcuts;

use pageink_core::{BrushColor, Layout, MountTarget, SelectionBroadcastChannel, Session, WhiteboardConfig};
use shortcuts::ShortcutRegistry;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting PageInk");

    let config = match std::env::args().nth(1) {
        Some(path) => match WhiteboardConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::warn!("No config given, opening an empty session");
            WhiteboardConfig::default()
        }
    };

    let mut layout = Layout::new().with_target(MountTarget::new(config.mount_target.clone(), config.viewport_width));
    let colors = SelectionBroadcastChannel::<BrushColor>::new();

    let session = match Session::open(&config, &mut layout, &colors) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to open session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ShortcutRegistry::print_all();
    for surface in session.surfaces() {
        let size = surface.canvas_size();
        println!(
            "  page {:2}  {:40} {:>6.0} x {:<6.0} zoom {}",
            surface.index(),
            surface.background().source,
            size.width,
            size.height,
            surface.camera().zoom
        );
    }
    println!(
        "\nmode {:?}, brush {}, color topic {:?}",
        session.selected_mode(),
        session.selected_color(),
        config.color_topic
    );

    ExitCode::SUCCESS
}
