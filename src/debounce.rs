//! Change Debouncing
//!
//! Collapses a burst of main-category changes into one refresh for the
//! last of them.

use std::cell::Cell;
use std::future::Future;

use log::debug;

use crate::api::FetchJson;
use crate::controller::{CascadingSelect, RefreshOutcome};
use crate::dom::SelectField;

pub struct Debouncer {
    delay_ms: u32,
    latest: Cell<u64>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            latest: Cell::new(0),
        }
    }

    /// Record a change; the returned ticket supersedes every earlier one
    pub fn register(&self) -> u64 {
        let ticket = self.latest.get() + 1;
        self.latest.set(ticket);
        ticket
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest.get() == ticket
    }

    /// Wait out the quiet period, then report whether `ticket` still owns
    /// the refresh. A zero delay never sleeps.
    pub async fn settle<S, Fut>(&self, ticket: u64, sleep: S) -> bool
    where
        S: FnOnce(u32) -> Fut,
        Fut: Future<Output = ()>,
    {
        if self.delay_ms > 0 {
            sleep(self.delay_ms).await;
        }
        self.is_latest(ticket)
    }
}

/// Sync `controller` for the change behind `ticket` unless a later change
/// arrived during the quiet period
pub async fn sync_after_quiet<F, C, S, Fut>(
    controller: &CascadingSelect<F, C>,
    debouncer: &Debouncer,
    ticket: u64,
    sleep: S,
) -> Option<RefreshOutcome>
where
    F: SelectField,
    C: FetchJson,
    S: FnOnce(u32) -> Fut,
    Fut: Future<Output = ()>,
{
    if !debouncer.settle(ticket, sleep).await {
        debug!("change {} superseded before refresh", ticket);
        return None;
    }
    Some(controller.sync().await)
}
