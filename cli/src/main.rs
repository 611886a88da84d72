pub mod cli;

use std::sync::Arc;

use clap::Parser;

use common::logger::init_logger;
use swapstream::config::StreamConfig;
use swapstream::driver::SwapStreamDriver;
use swapstream::manager::SubscriptionManager;
use swapstream::store::QuoteStore;
use swapstream::transport::sse::SseQuoteStream;

use cli::{Cli, build_form, build_wallet};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("swapstream");

    let cli = Cli::parse();
    let config = StreamConfig::new(cli.base_url.clone());
    anyhow::ensure!(config.is_swaps_enabled(), "swap service base url is empty");

    let transport = Arc::new(SseQuoteStream::new(config.base_url.clone())?);
    let store = QuoteStore::new();
    let manager = SubscriptionManager::new(
        transport,
        Arc::clone(&store),
        config.event_channel_capacity,
    );

    let form = Arc::new(build_form(&cli)?);
    let wallet = Arc::new(build_wallet(&cli));
    let driver = SwapStreamDriver::new(manager, form, wallet, config.debounce);

    let mut updates = store.subscribe();
    driver.notify_change();

    while let Some(snapshot) = updates.recv().await {
        if snapshot.is_fetching {
            println!("fetching quote...");
            continue;
        }

        if let Some(error) = &snapshot.error {
            println!("route unavailable: {error}");
            continue;
        }

        if let Some(quote) = &snapshot.confirmation {
            let expired = quote.is_expired(chrono::Utc::now());
            println!(
                "quote {} via {}: {} -> {} (slippage {} bps{})",
                quote.quote_id,
                quote.resolver_name,
                quote.bid_units,
                quote.ask_units,
                quote.slippage,
                if expired { ", expired" } else { "" },
            );
        }
    }

    driver.shutdown();
    Ok(())
}
