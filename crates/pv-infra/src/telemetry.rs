use std::fmt::Display;

use pv_core::ports::TelemetryPort;
use tracing::error;

/// Telemetry adapter that forwards use-case error reports to `tracing`.
pub struct TracingTelemetry;

impl TelemetryPort for TracingTelemetry {
    fn log_error(&self, context: &'static str, message: &str, error: &dyn Display) {
        error!(context, error = %error, "{}", message);
    }
}
