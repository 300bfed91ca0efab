use std::sync::Arc;

use claude_ticker::client::TickerClient;
use claude_ticker::config::Config;
use claude_ticker::credentials;
use claude_ticker::scheduler::Scheduler;
use claude_ticker::tick::Ticker;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Scheduler running - every {} min, {:02}:00-{:02}:59",
        config.interval_minutes,
        config.window_start_hour,
        config.window_end_hour
    );

    let source: Arc<dyn credentials::CredentialSource> =
        Arc::from(credentials::platform_source(&config.credential_entry));
    let client = TickerClient::new(&config.usage_url, &config.update_url);
    let ticker = Ticker::new(source, client);

    Scheduler::new(config.schedule(), ticker).run().await;
}
