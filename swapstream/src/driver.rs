//! Debounced trigger that keeps the subscription in sync with the form.
//!
//! Mounted once per swap view: every observed form change either schedules a
//! debounced resubscription (complete input) or tears the subscription down
//! and resets the store immediately (incomplete input — no debounce on that
//! path).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::form::{SwapFormProvider, SwapFormSnapshot, WalletProvider};
use crate::manager::SubscriptionManager;
use crate::params::build_quote_request;
use crate::store::QuoteStore;
use crate::transport::QuoteStreamApi;

/// Cancellable one-shot timer used to collapse bursts of form changes.
struct DebounceTimer {
    handle: Option<JoinHandle<()>>,
}

impl DebounceTimer {
    fn new() -> Self {
        Self { handle: None }
    }

    /// Replace any pending fire with a new one after `delay`.
    fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Side-effect-only driver for one swap view.
///
/// Activate by constructing it and calling `notify_change` whenever the
/// observed tuple (source asset, destination asset, amount, wallet) changes;
/// deactivate with `shutdown` on unmount.
pub struct SwapStreamDriver<C, F, W> {
    manager: Arc<SubscriptionManager<C>>,
    form: Arc<F>,
    wallet: Arc<W>,
    debounce: Duration,
    timer: Mutex<DebounceTimer>,
}

impl<C, F, W> SwapStreamDriver<C, F, W>
where
    C: QuoteStreamApi,
    F: SwapFormProvider,
    W: WalletProvider,
{
    pub fn new(
        manager: Arc<SubscriptionManager<C>>,
        form: Arc<F>,
        wallet: Arc<W>,
        debounce: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            manager,
            form,
            wallet,
            debounce,
            timer: Mutex::new(DebounceTimer::new()),
        })
    }

    pub fn store(&self) -> &Arc<QuoteStore> {
        self.manager.store()
    }

    /// Notify the driver that the observed form tuple changed.
    ///
    /// Incomplete input closes the subscription and resets the store right
    /// away; complete input (re)schedules the debounced resubscription.
    pub fn notify_change(&self) {
        let snapshot = Self::observe(&self.form, &self.wallet);

        if !snapshot.is_complete() {
            self.timer.lock().cancel();
            self.reset();
            return;
        }

        // The live session no longer matches what the user is editing;
        // close it before the quiet period starts.
        self.manager.close_active();

        let manager = Arc::clone(&self.manager);
        let form = Arc::clone(&self.form);
        let wallet = Arc::clone(&self.wallet);
        self.timer.lock().schedule(self.debounce, async move {
            Self::resubscribe(&manager, &form, &wallet);
        });
    }

    /// Resubscribe immediately, bypassing the quiet period.
    pub fn refresh_now(&self) {
        self.timer.lock().cancel();
        Self::resubscribe(&self.manager, &self.form, &self.wallet);
    }

    /// Unmount: drop any pending timer and close the live session. The
    /// store keeps its last value.
    pub fn shutdown(&self) {
        self.timer.lock().cancel();
        self.manager.close_active();
    }

    fn observe(form: &F, wallet: &W) -> SwapFormSnapshot {
        SwapFormSnapshot {
            from_asset: form.from_asset(),
            to_asset: form.to_asset(),
            from_amount: form.from_amount(),
            wallet_address: wallet.raw_address(),
        }
    }

    /// Parameters are derived from the state at fire time, not at
    /// scheduling time.
    fn resubscribe(manager: &Arc<SubscriptionManager<C>>, form: &F, wallet: &W) {
        match build_quote_request(&Self::observe(form, wallet)) {
            Some(request) => {
                debug!(from = %request.from_asset, to = %request.to_asset, "resubscribing");
                manager.open(request);
            }
            None => {
                manager.close_active();
                manager.store().reset();
            }
        }
    }

    fn reset(&self) {
        self.manager.close_active();
        self.manager.store().reset();
    }
}
