#[derive(strum_macros::Display)]
pub enum Constants {
    #[strum(serialize = "KVAR_CONFIG_DIR")]
    ConfigDirEnv,

    #[strum(serialize = "KVAR_RUN_MODE")]
    RunModeEnv,

    #[strum(serialize = "kvar")]
    EnvPrefix,

    #[strum(serialize = "__")]
    EnvSeparator,

    #[strum(serialize = "development")]
    DefaultRunMode,

    #[strum(serialize = "kvar.resolve")]
    DefaultResolveTaskName,
}

#[derive(strum_macros::Display)]
pub enum ConsulConstants {
    #[strum(serialize = "v1/kv")]
    KvEndpoint,

    #[strum(serialize = "X-Consul-Token")]
    TokenHeader,

    #[strum(serialize = "dc")]
    DatacenterParam,

    #[strum(serialize = "ns")]
    NamespaceParam,

    #[strum(serialize = "raw")]
    RawParam,
}
