#![forbid(unsafe_code)]

//! Routes and one-shot navigation transitions.

/// Advisory shown when the detail screen is opened without an identity.
pub const IDENTITY_REQUIRED_MESSAGE: &str =
    "You must enter your details before accessing this page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    IdentityCapture,
    Detail,
}

impl Route {
    pub const fn name(self) -> &'static str {
        match self {
            Route::IdentityCapture => "identity",
            Route::Detail => "detail",
        }
    }
}

/// Message attached to exactly one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationAdvisory {
    pub message: String,
}

impl NavigationAdvisory {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn identity_required() -> Self {
        Self::new(IDENTITY_REQUIRED_MESSAGE)
    }
}

/// A request to show `to`, optionally carrying an advisory.
///
/// The destination takes the advisory when it mounts, so it can be read
/// at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub to: Route,
    pub advisory: Option<NavigationAdvisory>,
}

impl Transition {
    /// Plain navigation with no advisory.
    pub fn to(route: Route) -> Self {
        Self {
            to: route,
            advisory: None,
        }
    }

    pub fn with_advisory(route: Route, advisory: NavigationAdvisory) -> Self {
        Self {
            to: route,
            advisory: Some(advisory),
        }
    }

    /// Consume the advisory; later calls return `None`.
    pub fn take_advisory(&mut self) -> Option<NavigationAdvisory> {
        self.advisory.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_is_taken_once() {
        let mut t = Transition::with_advisory(
            Route::IdentityCapture,
            NavigationAdvisory::identity_required(),
        );
        assert_eq!(
            t.take_advisory().map(|a| a.message),
            Some(IDENTITY_REQUIRED_MESSAGE.to_string())
        );
        assert!(t.take_advisory().is_none());
    }

    #[test]
    fn plain_transition_has_no_advisory() {
        let t = Transition::to(Route::Detail);
        assert_eq!(t.to, Route::Detail);
        assert!(t.advisory.is_none());
    }
}
