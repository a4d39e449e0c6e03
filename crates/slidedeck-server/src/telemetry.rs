use color_eyre::owo_colors::OwoColorize;
use std::fmt;
use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_log::LogTracer;
use tracing_subscriber::fmt::{Layer, format::Writer, time::FormatTime};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

/// Builds the subscriber used by every command. `RUST_LOG` wins over `env_filter`.
pub fn get_subscriber(env_filter: &str) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    Registry::default()
        .with(env_filter)
        .with(
            Layer::new()
                .compact()
                .with_ansi(true)
                .with_timer(ClockTime)
                .with_writer(std::io::stderr),
        )
        .with(ErrorLayer::default())
}

/// # Errors
/// Fails when a global logger or subscriber has already been installed.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> eyre::Result<()> {
    LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Local wall-clock time down to the millisecond.
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = chrono::Local::now().format("%H:%M:%S%.3f");
        if w.has_ansi_escapes() {
            write!(w, "{}", now.dimmed())
        } else {
            write!(w, "{now}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_has_millisecond_precision() {
        let mut out = String::new();
        ClockTime.format_time(&mut Writer::new(&mut out)).unwrap();

        assert_eq!(out.len(), "12:34:56.789".len(), "unexpected time {out:?}");
        assert_eq!(&out[2..3], ":");
        assert_eq!(&out[5..6], ":");
        assert_eq!(&out[8..9], ".");
        assert!(out.chars().filter(char::is_ascii_digit).count() == 9);
    }
}
