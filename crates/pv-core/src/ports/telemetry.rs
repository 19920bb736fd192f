use std::fmt::Display;

/// Error reporting capability injected into use cases.
///
/// Use cases log each failure once, at the site that detects it, through this
/// port instead of reaching for process-global logging state.
pub trait TelemetryPort: Send + Sync {
    fn log_error(&self, context: &'static str, message: &str, error: &dyn Display);
}
