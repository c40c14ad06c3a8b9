use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Telemetry {
    pub console: Option<Console>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Console {
    /// One of `trace`, `debug`, `info`, `warn`, `error`. Defaults to `info`.
    pub level: Option<String>,
}
