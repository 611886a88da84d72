use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical asset identifier used on the wire: the chain's native coin is
/// the sentinel string `"ton"`, jettons are their raw address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetAddress {
    Native,
    Jetton(String),
}

impl AssetAddress {
    pub const NATIVE_ID: &'static str = "ton";

    /// Identifier sent in quote requests and returned by the assets endpoint.
    pub fn trade_id(&self) -> &str {
        match self {
            AssetAddress::Native => Self::NATIVE_ID,
            AssetAddress::Jetton(address) => address,
        }
    }
}

impl From<String> for AssetAddress {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case(Self::NATIVE_ID) {
            AssetAddress::Native
        } else {
            AssetAddress::Jetton(raw)
        }
    }
}

impl From<AssetAddress> for String {
    fn from(address: AssetAddress) -> Self {
        address.trade_id().to_string()
    }
}

/// Swappable asset as served by the aggregation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAsset {
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    pub address: AssetAddress,
    pub image: String,
}

/// Single settlement instruction inside a confirmed quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementMessage {
    /// Bounceable destination address.
    pub target_address: String,
    /// Amount in minor units (nanotons for the native coin).
    pub send_amount: String,
    /// Hex-encoded execution cell.
    pub payload: String,
}

impl SettlementMessage {
    /// Decode the execution payload. Must be valid even-length hex.
    pub fn payload_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.payload)
    }
}

/// A priced, time-bounded offer to execute a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub messages: Vec<SettlementMessage>,
    pub quote_id: String,
    pub resolver_name: String,

    /// Output amount, minor units.
    pub ask_units: String,
    /// Input amount, minor units.
    pub bid_units: String,

    pub protocol_fee_units: String,

    /// Unix timestamp (seconds). Absent means the quote does not expire.
    #[serde(default)]
    pub trade_start_deadline: Option<String>,

    /// Nanotons reserved for gas.
    pub gas_budget: String,
    pub estimated_gas_consumption: String,

    /// Slippage tolerance in basis points (50 = 0.5%).
    pub slippage: u32,
}

impl SwapQuote {
    /// Returns true once the trade-start deadline has passed.
    ///
    /// The store never invalidates a held quote; consumers recompute this
    /// against the current time on every read. An unreadable deadline counts
    /// as already passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match &self.trade_start_deadline {
            None => false,
            Some(raw) => match raw.parse::<i64>() {
                Ok(deadline) => deadline <= now.timestamp(),
                Err(_) => true,
            },
        }
    }
}
