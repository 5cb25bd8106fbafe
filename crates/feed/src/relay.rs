use std::error::Error;

use futures::StreamExt;
use tokio::{io::AsyncRead, net::TcpStream, time::sleep};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracking::{database::Database, Tracker};

use crate::{packet, FeedConfig};

/// Longest packet accepted before the connection is considered broken.
const MAX_PACKET_LENGTH: usize = 1024;

/// Counts of one relayed connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub accepted: usize,
    pub skipped: usize,
}

/// Relays the device feed into `tracker` forever, reconnecting whenever the
/// connection can not be established or ends.
pub async fn run<D: Database>(config: FeedConfig, tracker: Tracker<D>) {
    let mut failed_attempts = 0;
    loop {
        match connect_and_relay(&config.address, &tracker).await {
            Ok(stats) => {
                failed_attempts = 0;
                log::info!(
                    "feed {} closed after {} packets ({} skipped)",
                    config.address,
                    stats.accepted,
                    stats.skipped
                );
            }
            Err(why) => {
                failed_attempts += 1;
                log::error!("feed {} failed: {}", config.address, why);
            }
        }

        let delay = config.backoff(failed_attempts);
        log::warn!(
            "reconnecting to feed {} in {} seconds",
            config.address,
            delay.as_secs()
        );
        sleep(delay).await;
    }
}

async fn connect_and_relay<D: Database>(
    address: &str,
    tracker: &Tracker<D>,
) -> Result<RelayStats, Box<dyn Error + Send + Sync>> {
    let stream = TcpStream::connect(address).await?;
    log::info!("connected to feed {}", address);
    Ok(relay_lines(tracker, stream).await?)
}

/// Accepts every parsable packet read from `reader` until it ends.
pub async fn relay_lines<D, R>(
    tracker: &Tracker<D>,
    reader: R,
) -> Result<RelayStats, LinesCodecError>
where
    D: Database,
    R: AsyncRead + Unpin,
{
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_PACKET_LENGTH));
    let mut stats = RelayStats::default();

    while let Some(line) = lines.next().await {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match packet::parse(&line) {
            Ok(fix) => {
                tracker.accept(fix.into_fix());
                stats.accepted += 1;
            }
            Err(why) => {
                log::warn!("skipping packet {:?}: {}", line, why);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
