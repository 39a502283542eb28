//! Per-endpoint rate limiting for the hosting API
//!
//! Reactive: a category is only throttled after the host has answered one of
//! its requests with a rate-limit status. Until then requests go out freely.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;

/// Categories of endpoints, each with its own throttle once activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointCategory {
    /// `/repos/{owner}/{repo}`
    Repository,
    /// `/repos/{owner}/{repo}/contents[/...]`
    Contents,
    /// `/repos/{owner}/{repo}/commits`
    Commits,
    /// `/repos/{owner}/{repo}/git/trees/{ref}`
    Trees,
    /// Raw content host
    Raw,
}

impl EndpointCategory {
    pub const ALL: [EndpointCategory; 5] = [
        EndpointCategory::Repository,
        EndpointCategory::Contents,
        EndpointCategory::Commits,
        EndpointCategory::Trees,
        EndpointCategory::Raw,
    ];

    /// Throttled rate for this category, in requests per minute.
    pub fn requests_per_minute(&self) -> u32 {
        match self {
            EndpointCategory::Repository => 60,
            EndpointCategory::Contents => 60,
            EndpointCategory::Commits => 60,
            EndpointCategory::Trees => 20,
            EndpointCategory::Raw => 300,
        }
    }
}

/// Rate limiter state for a single endpoint category.
pub struct EndpointRateLimiter {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    active: AtomicBool,
    category: EndpointCategory,
}

impl EndpointRateLimiter {
    pub fn new(category: EndpointCategory) -> Self {
        let per_minute =
            NonZeroU32::new(category.requests_per_minute()).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
            active: AtomicBool::new(false),
            category,
        }
    }

    pub fn activate(&self) {
        let was_active = self.active.swap(true, Ordering::SeqCst);
        if !was_active {
            debug!("Rate limiting activated for {:?}", self.category);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Wait for permission if rate limiting is active.
    pub async fn wait_if_active(&self) {
        if self.is_active() {
            debug!("Waiting for rate limiter {:?}", self.category);
            self.limiter.until_ready().await;
        }
    }
}

/// Rate limiters for every endpoint category.
pub struct RateLimiterSet {
    limiters: HashMap<EndpointCategory, EndpointRateLimiter>,
}

impl Default for RateLimiterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiterSet {
    pub fn new() -> Self {
        let limiters = EndpointCategory::ALL
            .into_iter()
            .map(|category| (category, EndpointRateLimiter::new(category)))
            .collect();

        Self { limiters }
    }

    pub async fn wait_for(&self, category: EndpointCategory) {
        if let Some(limiter) = self.limiters.get(&category) {
            limiter.wait_if_active().await;
        }
    }

    /// Called when the host reports rate limiting for a category.
    pub fn activate(&self, category: EndpointCategory) {
        if let Some(limiter) = self.limiters.get(&category) {
            limiter.activate();
        }
    }

    pub fn is_active(&self, category: EndpointCategory) -> bool {
        self.limiters
            .get(&category)
            .is_some_and(EndpointRateLimiter::is_active)
    }
}
