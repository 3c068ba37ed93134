//! Application state.

use std::sync::Arc;

use eagle_core::Result;
use eagle_lookup::{LookupClient, LookupOptions};
use eagle_store::Store;

use crate::cache::ReportCache;
use crate::config::BotConfig;
use crate::dispatch::QueryDispatcher;
use crate::gate::AccessGate;
use crate::ledger::Ledger;

/// State shared by the router and the polling loop.
pub struct AppState {
    /// Bot configuration.
    pub config: BotConfig,

    /// The credit ledger.
    pub ledger: Arc<Ledger>,

    /// The report cache.
    pub reports: Arc<ReportCache>,

    /// The query dispatcher.
    pub dispatcher: QueryDispatcher,

    /// The bot's own username, for referral links.
    pub bot_username: String,
}

impl AppState {
    /// Wire up the full state from configuration and an opened store.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger snapshot cannot be loaded.
    pub fn new(config: BotConfig, store: Arc<dyn Store>, bot_username: String) -> Result<Self> {
        let ledger = Arc::new(Ledger::load(
            store,
            config.admin_user_id,
            config.initial_credits,
            config.referrals_per_credit,
        )?);
        let reports = Arc::new(ReportCache::new());

        let lookup = Arc::new(LookupClient::with_options(
            config.lookup_url.clone(),
            config.lookup_token.clone(),
            LookupOptions {
                limit: config.result_limit,
                lang: config.lang.clone(),
                timeout_seconds: config.lookup_timeout_seconds,
            },
        ));

        let dispatcher = QueryDispatcher::new(
            ledger.clone(),
            reports.clone(),
            lookup,
            AccessGate::new(config.group.clone()),
        );

        Ok(Self {
            config,
            ledger,
            reports,
            dispatcher,
            bot_username,
        })
    }
}
