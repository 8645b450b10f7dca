//! Poll observation port
//!
//! Defines the callbacks fired while a content request is being polled.

use octophyx_domain::ContentStatus;

/// Callback for status observations during polling
///
/// Implementations live in the presentation layer (spinner, log lines, ...).
/// Observations arrive in lifecycle order; a status never goes backwards.
pub trait PollObserver: Send + Sync {
    /// Called after every read, with the effective status
    fn on_observe(&self, _status: ContentStatus) {}

    /// Called when the observed status changes
    fn on_transition(&self, from: ContentStatus, to: ContentStatus);
}

/// No-op observer for when progress reporting is not needed
pub struct NoPollObserver;

impl PollObserver for NoPollObserver {
    fn on_transition(&self, _from: ContentStatus, _to: ContentStatus) {}
}
