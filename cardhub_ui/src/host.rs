//! The boundary to the embedding page.

use cardhub::card::CardId;
use std::time::Duration;

/// A side effect the page asks its host to carry out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Replace the current page, e.g. with `/card/3`.
    Navigate(String),
    /// Open a URL in a new browsing context.
    OpenInNewContext(String),
    /// Reload the current page so it reflects the server state.
    Reload,
    /// Play the press animation on a card element.
    Press { id: CardId, duration: Duration },
}

/// The embedding page: owns the real DOM and the browsing context.
///
/// The host is also expected to suppress the native context menu on card elements; the page
/// decides whether anything else happens.
pub trait Host {
    /// Returns whether the viewer has administrative privileges (the admin badge is present).
    fn is_admin(&self) -> bool;

    fn perform(&mut self, effect: Effect);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn is_admin(&self) -> bool {
        (**self).is_admin()
    }

    fn perform(&mut self, effect: Effect) {
        (**self).perform(effect)
    }
}
