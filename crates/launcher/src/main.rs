// crates/launcher/src/main.rs
//! Runs the managed host outside the engine: `launcher <game_dir> [--server]`.

use std::env;

use sharplife_host::{log, ManagedHost};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let is_server = args.iter().any(|arg| arg == "--server");
    let game_dir = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .map(|s| s.as_str())
        .unwrap_or(".");

    if !log::init() {
        eprintln!("Could not open {}; continuing without a log", log::LOG_FILENAME);
    }
    tracing::info!("Launcher starting in '{game_dir}' (server: {is_server})");

    ManagedHost::new(game_dir, is_server).start()
}
