use envconfig::Envconfig;

/// Environment-driven service configuration.
#[derive(Envconfig)]
pub struct Config {
    /// URL of the upstream occupancy sensor API.
    #[envconfig(from = "API_URL")]
    pub api_url: String,

    /// Tenant identity sent as the `X-Tenant` header on upstream requests.
    #[envconfig(from = "X_TENANT")]
    pub tenant: String,

    /// HTTP listen port.
    #[envconfig(from = "PORT", default = "3030")]
    pub port: u16,

    /// Directory holding the on-disk keyspace.
    #[envconfig(from = "DATA_PATH", default = "./data")]
    pub data_path: String,

    /// Number of past weeks folded into a weekday query.
    #[envconfig(from = "LOOKBACK_WEEKS", default = "4")]
    pub lookback_weeks: u32,

    /// Seconds between poll cycles.
    #[envconfig(from = "POLL_INTERVAL_SECS", default = "900")]
    pub poll_interval_secs: u64,

    /// Per-request timeout for upstream fetches, in seconds.
    #[envconfig(from = "UPSTREAM_TIMEOUT_SECS", default = "5")]
    pub upstream_timeout_secs: u64,
}
