//! ==============================================================================
//! lifecycle.rs - one-shot request bound to a view's lifetime
//! ==============================================================================
//!
//! a Lifecycle is created when RequestView mounts. it lets the signup
//! request be claimed exactly once, and it is torn down from on_cleanup so
//! a response that lands after unmount is dropped instead of written into
//! disposed signals.
//!
//! ==============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

use leptos::logging::{debug_warn, error, log};
use serde_json::Value;

use crate::api::{signup_request, RequestFailure, Transport};
use crate::config::RequestConfig;

#[derive(Debug)]
pub struct Lifecycle {
    issued: AtomicBool,
    alive: AtomicBool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            issued: AtomicBool::new(false),
            alive: AtomicBool::new(true),
        }
    }

    /// True for the first caller only
    pub fn claim(&self) -> bool {
        !self.issued.swap(true, Ordering::SeqCst)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn teardown(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// What became of an initialize() call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// outcome handed to the view
    Applied,
    /// view was torn down before the response arrived
    Discarded,
    /// request was already issued for this lifecycle
    AlreadyIssued,
}

/// Issue the signup request once and hand the outcome to `apply`
/// if the view is still mounted.
pub async fn initialize<T, F>(
    lifecycle: &Lifecycle,
    transport: &T,
    config: &RequestConfig,
    apply: F,
) -> Completion
where
    T: Transport + ?Sized,
    F: FnOnce(Result<Value, RequestFailure>),
{
    if !lifecycle.claim() {
        return Completion::AlreadyIssued;
    }

    let outcome = match signup_request(config) {
        Ok(request) => transport.send(&request).await,
        Err(failure) => Err(failure),
    };

    match &outcome {
        Ok(_) => log!("signup request to {} succeeded", config.url),
        Err(failure) => error!("signup request to {} failed: {:?}", config.url, failure),
    }

    if !lifecycle.is_alive() {
        debug_warn!("signup response arrived after teardown, dropping it");
        return Completion::Discarded;
    }

    apply(outcome);
    Completion::Applied
}
