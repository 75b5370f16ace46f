#![forbid(unsafe_code)]

//! Entry check for the detail screen.

use crate::identity_store::IdentityStore;
use crate::navigation::{NavigationAdvisory, Route, Transition};

/// Result of the once-per-mount identity check.
///
/// `Unchecked` only exists between construction and [`GateState::check`];
/// a checked gate never changes again for that mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Unchecked,
    Authorized,
    Redirecting,
}

impl GateState {
    /// Read the store once and decide.
    pub fn check(store: &dyn IdentityStore) -> Self {
        let state = if store.get().is_some() {
            GateState::Authorized
        } else {
            GateState::Redirecting
        };
        tracing::debug!(store = store.name(), ?state, "detail gate checked");
        state
    }

    pub fn is_authorized(self) -> bool {
        self == GateState::Authorized
    }

    /// The backward navigation a redirecting gate issues.
    pub fn redirect(self) -> Option<Transition> {
        (self == GateState::Redirecting).then(|| {
            Transition::with_advisory(
                Route::IdentityCapture,
                NavigationAdvisory::identity_required(),
            )
        })
    }
}
