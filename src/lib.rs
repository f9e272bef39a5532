#![doc(test(attr(deny(warnings))))]

//! Refurnish is a client for a second-hand furniture marketplace: validated
//! forms, a guarded submission pipeline, image uploads and the logged-in
//! session, driven from an interactive shell.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod flows;
pub mod forms;
pub mod session;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Refurnish tracing initialized.");
    });
}
