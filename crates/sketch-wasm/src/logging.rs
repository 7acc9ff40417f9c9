//! Browser console logging.

use log::Level;
use wasm_bindgen::prelude::*;

/// Level names as accepted by `init_logging`; anything unrecognized is `Info`.
fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::Info)
}

/// Route `log` records to the console. The first call installs the logger;
/// later calls only move the global max level.
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    let level = parse_level(level);
    if console_log::init_with_level(level).is_err() {
        log::set_max_level(level.to_level_filter());
    }
}
