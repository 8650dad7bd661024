//! Client-side navigation.

use sift_core::Location;

/// Performs client-side navigation without a full reload.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: Location);
}

/// Navigator that only logs. Used by the terminal driver, which has no
/// location bar to update.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, location: Location) {
        tracing::info!("Navigating to {}", location.href());
    }
}
