use tracing::{error, info, warn};

use crate::errors::ShardwalletError;

pub fn log_app_startup(command: &str) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        command = command
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

/// Log an application error, at warn level for user errors.
pub fn log_app_error(error: &dyn ShardwalletError) {
    if error.is_user_error() {
        warn!(
            event = "core.app.user_error_occurred",
            error = %error,
            error_code = error.error_code()
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %error,
            error_code = error.error_code()
        );
    }
}
