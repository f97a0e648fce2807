//! Client navigation contract.
//!
//! [`NavigationController`] is the reference state machine for client-side
//! route changes: mint a monotonic token, fetch the target page payload,
//! apply it, then run each registered [`Enhancement`] exactly once. A
//! navigation that is no longer the newest one stops at its next token
//! check, so rapid successive navigations leave only the last one's
//! content and hooks in place. The embedded [`RUNTIME_JS`] implements the
//! same contract in the browser and is emitted into every built site.
//!
//! ```
//! use imprint_runtime::{
//!     ContentSink, FetchError, NavigationController, Outcome, Payload, PayloadFetcher,
//! };
//!
//! struct OnePage;
//!
//! impl PayloadFetcher for OnePage {
//!     fn fetch(&mut self, route: &str) -> Result<Payload, FetchError> {
//!         Ok(Payload {
//!             route: route.to_owned(),
//!             title: "Guide".to_owned(),
//!             html: "<p>hello</p>".to_owned(),
//!             generation: "g1".to_owned(),
//!         })
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Collect(String);
//!
//! impl ContentSink for Collect {
//!     fn apply(&mut self, payload: &Payload) {
//!         self.0 = payload.html.clone();
//!     }
//! }
//!
//! let mut controller = NavigationController::new(OnePage, Collect::default());
//! let report = controller.navigate("guide");
//! assert!(matches!(report.outcome, Outcome::Applied));
//! assert_eq!(controller.sink().0, "<p>hello</p>");
//! ```

mod controller;
mod payload;

pub use controller::{
    ContentSink, Enhancement, HookError, HookFailure, NavigationController, NavigationReport,
    Outcome, TokenSource,
};
pub use payload::{DirFetcher, FetchError, Payload, PayloadFetcher, payload_path};

/// Browser implementation of the navigation contract, emitted into every
/// built site as `assets/runtime.js`.
pub const RUNTIME_JS: &str = include_str!("../assets/runtime.js");
