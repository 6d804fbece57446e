//! Tracing subscriber initialisation.
//!
//! Events go to stderr so command output on stdout stays machine-readable.
//! Filtering follows `RUST_LOG`.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogFormat;

/// Install the global subscriber in the requested format.
///
/// Calling this more than once is harmless; later calls log a warning and
/// leave the first subscriber in place.
pub fn init(format: LogFormat) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn repeated_initialisation_does_not_panic() {
        init(LogFormat::Json);
        init(LogFormat::Pretty);
    }
}
