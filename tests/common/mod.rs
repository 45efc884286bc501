use std::sync::Once;

use collision_maps::{AvlChainingTable, ChainingTable, Dictionary, OpenAddressingTable};
use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

pub fn initialize_logger() {
    INIT.call_once(|| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("collision_maps", LevelFilter::Debug)
            .is_test(true)
            .parse_default_env();

        // Another test binary may already have installed a logger.
        let _ = builder.try_init();
    });
}

/// One fresh instance of every table variant, labelled for assertion messages.
pub fn all_tables() -> Vec<(&'static str, Box<dyn Dictionary>)> {
    initialize_logger();
    vec![
        (
            "open addressing",
            Box::new(OpenAddressingTable::new()) as Box<dyn Dictionary>,
        ),
        ("chaining", Box::new(ChainingTable::new()) as Box<dyn Dictionary>),
        (
            "avl chaining",
            Box::new(AvlChainingTable::new()) as Box<dyn Dictionary>,
        ),
    ]
}
