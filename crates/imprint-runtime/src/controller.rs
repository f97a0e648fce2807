//! Navigation state machine with last-navigation-wins semantics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::payload::{FetchError, Payload, PayloadFetcher};

/// Shared monotonic navigation token counter.
///
/// Every navigation mints the next token and is superseded the moment a
/// newer token exists. Clones share the counter, so a fetcher or sink
/// holding a clone can start a competing navigation mid-flight.
#[derive(Debug, Default)]
pub struct TokenSource(Arc<AtomicU64>);

impl Clone for TokenSource {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl TokenSource {
    /// Mint the next navigation token.
    pub fn mint(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The most recently minted token.
    pub fn latest(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Boxed error an enhancement may fail with. Swallowed after logging.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Post-navigation enhancement hook.
///
/// Runs exactly once per applied navigation, after content is in place.
/// A failure is logged and reported but never propagates; a broken hook
/// cannot block navigation.
pub trait Enhancement: Send {
    fn name(&self) -> &'static str;

    fn after_navigation(&mut self, payload: &Payload) -> Result<(), HookError>;
}

/// Receives applied page content.
pub trait ContentSink {
    fn apply(&mut self, payload: &Payload);
}

/// Terminal state of one navigation.
#[derive(Debug)]
pub enum Outcome {
    /// Content applied and this navigation was still current when it
    /// finished.
    Applied,
    /// A newer navigation started first; this one stopped at its next
    /// token check.
    Superseded,
    /// Payload fetch failed. Terminal for this navigation, never retried.
    Failed(FetchError),
}

/// A swallowed enhancement failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookFailure {
    pub hook: &'static str,
    pub message: String,
}

/// What one [`NavigationController::navigate`] call did.
#[derive(Debug)]
pub struct NavigationReport {
    pub route: String,
    pub token: u64,
    pub outcome: Outcome,
    pub hook_failures: Vec<HookFailure>,
}

/// Drives navigations: mint token, fetch payload, apply content, run
/// enhancements.
///
/// Exactly-once and last-navigation-wins are enforced by comparing this
/// navigation's token against the latest minted one before every effect,
/// not by locking. Rapid successive navigations leave only the newest
/// navigation's enhancements bound.
pub struct NavigationController<F, S> {
    fetcher: F,
    sink: S,
    tokens: TokenSource,
    hooks: Vec<Box<dyn Enhancement>>,
}

impl<F: PayloadFetcher, S: ContentSink> NavigationController<F, S> {
    pub fn new(fetcher: F, sink: S) -> Self {
        Self {
            fetcher,
            sink,
            tokens: TokenSource::default(),
            hooks: Vec::new(),
        }
    }

    /// Share a token counter with parties that can start competing
    /// navigations (a fetcher, a sink, another controller).
    #[must_use]
    pub fn with_token_source(mut self, tokens: TokenSource) -> Self {
        self.tokens = tokens;
        self
    }

    /// Register an enhancement. Hooks run in registration order.
    #[must_use]
    pub fn with_enhancement(mut self, hook: impl Enhancement + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Handle to the shared token counter.
    pub fn tokens(&self) -> TokenSource {
        self.tokens.clone()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Navigate to `route`.
    ///
    /// Mints the next token, fetches the payload, applies it, then runs
    /// each enhancement once. The navigation exits at the first token
    /// check that sees a newer navigation.
    pub fn navigate(&mut self, route: &str) -> NavigationReport {
        let token = self.tokens.mint();
        tracing::debug!(route, token, "Navigation started");

        let payload = match self.fetcher.fetch(route) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(route, error = %error, "Payload fetch failed");
                return NavigationReport {
                    route: route.to_owned(),
                    token,
                    outcome: Outcome::Failed(error),
                    hook_failures: Vec::new(),
                };
            }
        };

        if self.tokens.latest() != token {
            tracing::debug!(route, token, "Navigation superseded before apply");
            return NavigationReport {
                route: route.to_owned(),
                token,
                outcome: Outcome::Superseded,
                hook_failures: Vec::new(),
            };
        }

        self.sink.apply(&payload);

        let tokens = self.tokens.clone();
        let mut hook_failures = Vec::new();
        let mut superseded = false;
        for hook in &mut self.hooks {
            if tokens.latest() != token {
                superseded = true;
                break;
            }
            if let Err(error) = hook.after_navigation(&payload) {
                tracing::warn!(hook = hook.name(), error = %error, "Enhancement failed");
                hook_failures.push(HookFailure {
                    hook: hook.name(),
                    message: error.to_string(),
                });
            }
        }
        superseded |= tokens.latest() != token;

        let outcome = if superseded {
            tracing::debug!(route, token, "Navigation superseded after apply");
            Outcome::Superseded
        } else {
            tracing::debug!(route, token, "Navigation applied");
            Outcome::Applied
        };
        NavigationReport {
            route: route.to_owned(),
            token,
            outcome,
            hook_failures,
        }
    }
}
