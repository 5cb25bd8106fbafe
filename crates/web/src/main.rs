use database::{DatabaseConnectionInfo, PgDatabase};
use feed::FeedConfig;
use tracking::{Tracker, TrackerConfig};
use web::{start_web_server, WebConfig};

#[tokio::main]
async fn main() {
    env_logger::init();

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    // tracking
    let tracker = Tracker::new(database, TrackerConfig::from_env());

    // device feed
    match FeedConfig::from_env() {
        Some(feed_config) => {
            log::info!("relaying device feed from {}", feed_config.address);
            tokio::spawn(feed::relay::run(feed_config, tracker.clone()));
        }
        None => log::info!("no FEED_ADDRESS set, accepting positions over /ws only"),
    }

    // web server
    let web_future = start_web_server(WebConfig::from_env(), tracker);

    if let Err(why) = web_future.await {
        log::error!("web server stopped: {}", why);
    }
}
