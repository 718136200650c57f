mod handler;
mod ladder;

use common::BookConfig;
use feed::{create_feed_channel, parse_message, FeedError, FeedSender};
use metrics::{create_metrics, SharedMetrics};
use orderbook::OrderBookEngine;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

/// Interval for periodic health status logging.
const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Rows per side in the printed ladder.
const LADDER_ROWS: usize = 15;

/// Reads one feed frame per line, parses it and forwards it to the engine loop.
async fn read_frames<R>(
    reader: R,
    sender: FeedSender,
    metrics: SharedMetrics,
) -> Result<(), FeedError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(()),
            Err(e) => {
                warn!(error = %e, "Feed input error, stopping reader");
                return Ok(());
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        metrics.inc_messages_received();

        match parse_message(&line) {
            Ok(parsed) => sender
                .send(parsed)
                .await
                .map_err(|_| FeedError::ChannelClosed)?,
            Err(e) => {
                metrics.inc_parse_errors();
                warn!(error = %e, "Rejected feed frame");
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_logging();

    let mut input: Option<String> = None;
    let mut json_output = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json_output = true;
        } else {
            input = Some(arg);
        }
    }

    let config = BookConfig::from_env();
    info!(
        market = %config.market,
        max_levels = config.max_levels,
        input = input.as_deref().unwrap_or("stdin"),
        "Starting depth book"
    );

    let mut engine = OrderBookEngine::new(config.market.product_id(), config.max_levels);
    let (sender, mut receiver) = create_feed_channel(config.channel_capacity);
    let metrics = create_metrics();

    // Create shutdown signal channel
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    // Spawn reader task
    let reader_metrics = metrics.clone();
    let reader_handle = match input {
        Some(path) => {
            let file = tokio::fs::File::open(&path).await?;
            tokio::spawn(read_frames(BufReader::new(file), sender, reader_metrics))
        }
        None => tokio::spawn(read_frames(
            BufReader::new(tokio::io::stdin()),
            sender,
            reader_metrics,
        )),
    };

    // Spawn ctrl_c handler
    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, initiating shutdown");
            let _ = shutdown_tx_clone.send(true);
        }
    });

    // Spawn periodic health reporter
    let health_metrics = metrics.clone();
    let health_shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEALTH_LOG_INTERVAL);
        let mut shutdown_rx = health_shutdown_rx;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let snapshot = health_metrics.snapshot();
                    let status = snapshot.health_status();
                    info!(
                        status = %status,
                        messages = snapshot.messages_received,
                        msgs_per_sec = format!("{:.1}", snapshot.messages_per_second),
                        parse_errors = snapshot.parse_errors,
                        dropped = snapshot.deltas_dropped,
                        "Health check"
                    );
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    // Apply frames strictly in arrival order
    loop {
        tokio::select! {
            parsed = receiver.recv() => match parsed {
                Some(parsed) => handler::handle_message(&mut engine, parsed, &metrics),
                None => break,
            },
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Feed input finished, stopping");
    let _ = shutdown_tx.send(true);
    if reader_handle.is_finished() {
        if let Ok(Err(e)) = reader_handle.await {
            warn!(error = %e, "Feed reader stopped with error");
        }
    } else {
        reader_handle.abort();
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(engine.state())?);
    } else {
        println!("{}", ladder::render(&engine, LADDER_ROWS));
    }

    let snapshot = metrics.snapshot();
    println!("\n{}", snapshot);

    info!("Shutdown complete");
    Ok(())
}
