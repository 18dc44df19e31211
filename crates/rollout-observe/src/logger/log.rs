use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = mk_filter(&cfg.filter)?;

    match cfg.format {
        LoggerFormat::Text => {
            let layer = fmt::layer()
                .with_ansi(cfg.use_color)
                .with_target(cfg.with_targets)
                .with_timer(mk_timer());
            try_install(tracing_subscriber::registry().with(filter).with(layer))
        }
        // Events carry the activity span's rollout and actor-definition ids as top-level fields.
        LoggerFormat::Json => {
            let layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_ansi(false)
                .with_target(cfg.with_targets)
                .with_timer(mk_timer());
            try_install(tracing_subscriber::registry().with(filter).with(layer))
        }
        LoggerFormat::Journald => install_journald(filter),
    }
}

fn mk_filter(directives: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(directives).map_err(|_| LoggerError::InvalidLevel(directives.to_string()))
}

fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn try_install<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(|e| {
        let msg = e.to_string();
        if msg.contains("already") {
            LoggerError::AlreadyInitialized
        } else {
            LoggerError::Init(msg)
        }
    })
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn install_journald(filter: EnvFilter) -> Result<(), LoggerError> {
    let journald = tracing_journald::layer()
        .map_err(|e| LoggerError::Init(format!("journald: {e}")))?
        .with_syslog_identifier("rollout-verify".to_string());
    try_install(tracing_subscriber::registry().with(filter).with(journald))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn install_journald(_filter: EnvFilter) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::rollout_filter;

    #[test]
    fn default_directives_build_a_filter() {
        assert!(mk_filter(&LoggerConfig::default().filter).is_ok());
        assert!(mk_filter(&rollout_filter("trace").unwrap()).is_ok());
    }

    #[test]
    fn malformed_directives_are_rejected() {
        assert_eq!(
            mk_filter("rollout_core=loud").unwrap_err(),
            LoggerError::InvalidLevel("rollout_core=loud".into())
        );
    }
}
