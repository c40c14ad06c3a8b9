use kvar_core::config::Config;
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, Registry};

use self::console::create_console_layer;

mod console;

pub fn setup(config: &Config) -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;

    let subscriber = Registry::default().with(create_console_layer(config)?);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
