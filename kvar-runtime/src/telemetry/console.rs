use std::str::FromStr;

use kvar_core::config::Config;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::Layer;

pub fn create_console_layer<S>(
    config: &Config,
) -> anyhow::Result<Option<Box<dyn Layer<S> + Send + Sync + 'static>>>
where
    S: Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    let console = match &config.telemetry.console {
        Some(console) => console,
        None => return Ok(None),
    };

    let level = match &console.level {
        Some(level) => LevelFilter::from_str(level)
            .map_err(|e| anyhow::anyhow!("invalid console log level '{}', {}", level, e))?,
        None => LevelFilter::INFO,
    };

    let console_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(level);

    Ok(Some(Box::new(console_log)))
}

#[cfg(test)]
mod tests {
    use kvar_core::config::{consul::Consul, telemetry};
    use tracing_subscriber::Registry;

    use super::*;

    fn make_config(console: Option<telemetry::Console>) -> Config {
        Config {
            consul: Consul::with_address("http://127.0.0.1:8500"),
            telemetry: telemetry::Telemetry { console },
            variables: Default::default(),
        }
    }

    #[test]
    fn no_layer_without_console_section() {
        let layer = create_console_layer::<Registry>(&make_config(None)).unwrap();

        assert!(layer.is_none());
    }

    #[test]
    fn layer_with_valid_level() {
        let config = make_config(Some(telemetry::Console {
            level: Some("debug".to_string()),
        }));

        assert!(create_console_layer::<Registry>(&config).unwrap().is_some());
    }

    #[test]
    fn invalid_level_is_rejected() {
        let config = make_config(Some(telemetry::Console {
            level: Some("chatty".to_string()),
        }));

        assert!(create_console_layer::<Registry>(&config).is_err());
    }
}
