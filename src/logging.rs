//=============================================
// File: logging.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Tracing setup for the quill binary
// Objective: Install a stderr subscriber filtered by QUILL_LOG so script
//            output on stdout stays clean
//=============================================

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "QUILL_LOG";

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize tracing once. `QUILL_LOG` wins over `default_directive`.
pub fn init(default_directive: &str, ansi: bool) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));
        SubscriberBuilder::default()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_ansi(ansi)
            .compact()
            .init();
    });
    tracing::debug!(directive = default_directive, "tracing initialised");
}
