use anyhow::Context;
use clap::Parser;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use corelib::models::swap_models::{AssetAddress, SwapAsset};
use swapstream::form::{SwapFormProvider, WalletProvider};

#[derive(Debug, Parser)]
#[clap(name = "swapstream", version)]
pub struct Cli {
    /// Base URL of the quote-aggregation service
    #[clap(long)]
    pub base_url: String,

    /// Source asset: "ton" or a jetton address
    #[clap(long, default_value = "ton")]
    pub from: String,

    /// Decimals of the source asset
    #[clap(long, default_value_t = 9)]
    pub from_decimals: u32,

    /// Destination asset: "ton" or a jetton address
    #[clap(long)]
    pub to: String,

    /// Decimals of the destination asset
    #[clap(long, default_value_t = 9)]
    pub to_decimals: u32,

    /// Amount of the source asset to swap, in display units
    #[clap(long)]
    pub amount: String,

    /// Raw wallet address quotes settle to
    #[clap(long)]
    pub address: String,
}

/// Fixed form state built from the command line.
pub struct CliForm {
    from: SwapAsset,
    to: SwapAsset,
    amount: Mutex<Option<Decimal>>,
}

impl SwapFormProvider for CliForm {
    fn from_asset(&self) -> Option<SwapAsset> {
        Some(self.from.clone())
    }

    fn to_asset(&self) -> Option<SwapAsset> {
        Some(self.to.clone())
    }

    fn from_amount(&self) -> Option<Decimal> {
        *self.amount.lock()
    }
}

pub struct CliWallet {
    address: String,
}

impl WalletProvider for CliWallet {
    fn raw_address(&self) -> Option<String> {
        Some(self.address.clone())
    }
}

fn asset(id: &str, decimals: u32) -> SwapAsset {
    SwapAsset {
        symbol: id.to_uppercase(),
        name: String::new(),
        decimals,
        address: AssetAddress::from(id.to_string()),
        image: String::new(),
    }
}

pub fn build_form(cli: &Cli) -> anyhow::Result<CliForm> {
    let amount: Decimal = cli
        .amount
        .parse()
        .with_context(|| format!("invalid amount: {}", cli.amount))?;

    Ok(CliForm {
        from: asset(&cli.from, cli.from_decimals),
        to: asset(&cli.to, cli.to_decimals),
        amount: Mutex::new(Some(amount)),
    })
}

pub fn build_wallet(cli: &Cli) -> CliWallet {
    CliWallet {
        address: cli.address.clone(),
    }
}
