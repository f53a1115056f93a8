use envconfig::Envconfig;
use gymstat::{Config, Poller, SensorClient, Store};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> gymstat::Result<()> {
    env_logger::builder()
        .filter_module("lsm_tree", log::LevelFilter::Warn)
        .filter_module("fjall", log::LevelFilter::Warn)
        .filter_module("gymstat", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::init_from_env()?;

    let store = Arc::new(Store::open(&config.data_path)?);

    let client = SensorClient::new(
        &config.api_url,
        &config.tenant,
        Duration::from_secs(config.upstream_timeout_secs),
    )?;

    let poller = Poller::start(
        store.clone(),
        client.clone(),
        Duration::from_secs(config.poll_interval_secs),
    );

    gymstat::http::serve(config.port, config.lookback_weeks, store, client).await?;

    // Dropping the handle aborts any in-flight poll cycle; writes only
    // happen after a successful fetch, so shutdown cannot tear a record.
    drop(poller);

    Ok(())
}
