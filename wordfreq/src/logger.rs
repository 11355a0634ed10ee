use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("wordfreq", LevelFilter::Info)
            .filter_module("polydict", LevelFilter::Warn)
            .filter_module("polydict::hash", LevelFilter::Warn)
            .format_timestamp_millis()
            .parse_default_env();

        // Tests may have installed a logger already.
        let _ = builder.try_init();
    });
}
