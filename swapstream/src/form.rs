use corelib::models::swap_models::SwapAsset;
use rust_decimal::Decimal;

/// Point-in-time view of the swap form tuple the driver observes.
#[derive(Debug, Clone, Default)]
pub struct SwapFormSnapshot {
    pub from_asset: Option<SwapAsset>,
    pub to_asset: Option<SwapAsset>,
    /// User-facing decimal amount of the source asset.
    pub from_amount: Option<Decimal>,
    pub wallet_address: Option<String>,
}

impl SwapFormSnapshot {
    /// The form is complete once both assets are chosen, a wallet is active
    /// and a non-zero amount has been entered.
    pub fn is_complete(&self) -> bool {
        self.from_asset.is_some()
            && self.to_asset.is_some()
            && self.wallet_address.is_some()
            && self.from_amount.is_some_and(|amount| !amount.is_zero())
    }
}

/// Active-wallet collaborator: supplies the raw address quotes settle to.
pub trait WalletProvider: Send + Sync + 'static {
    fn raw_address(&self) -> Option<String>;
}

/// Asset-selection collaborator: the swap form the user is editing.
pub trait SwapFormProvider: Send + Sync + 'static {
    fn from_asset(&self) -> Option<SwapAsset>;
    fn to_asset(&self) -> Option<SwapAsset>;
    fn from_amount(&self) -> Option<Decimal>;
}
