use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::form::SwapFormSnapshot;

/// Wire-ready parameters for one quote subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub from_asset: String,
    pub to_asset: String,
    /// Integer amount in the source asset's minor units.
    pub from_amount: String,
    pub user_address: String,
}

/// No listed asset carries more precision than this.
const MAX_DECIMALS: u32 = 18;

/// Derive wire parameters from the observed form state.
///
/// Returns `None` when any part of the tuple is missing or the computed
/// amount is not a positive integer; the caller treats that exactly like
/// incomplete input.
pub fn build_quote_request(form: &SwapFormSnapshot) -> Option<QuoteRequest> {
    let from_asset = form.from_asset.as_ref()?;
    let to_asset = form.to_asset.as_ref()?;
    let amount = form.from_amount?;
    let user_address = form.wallet_address.clone()?;

    let from_amount = to_minor_units(amount, from_asset.decimals)?;

    Some(QuoteRequest {
        from_asset: from_asset.address.trade_id().to_string(),
        to_asset: to_asset.address.trade_id().to_string(),
        from_amount,
        user_address,
    })
}

/// Shift a user-facing decimal amount into integer minor units, truncating
/// anything below the asset's smallest unit.
fn to_minor_units(amount: Decimal, decimals: u32) -> Option<String> {
    if decimals > MAX_DECIMALS {
        return None;
    }

    let multiplier = Decimal::from_i128_with_scale(10i128.pow(decimals), 0);
    let units = amount.checked_mul(multiplier)?.trunc().to_u128()?;
    if units == 0 {
        return None;
    }

    Some(units.to_string())
}
