//! Integration tests for storecart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storecart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Add, edit, remove and checkout through a session
//! - `persistence` - Carts surviving page loads on file-backed storage
//! - `notifications` - Toast lifecycle applied to a page
//!
//! Every test runs against real storage in a temporary directory; nothing
//! outside the test process is needed.

use std::path::Path;

use storecart::{CartConfig, CartSession, FileStorage, HtmlPage, Notifier};

/// A session on file-backed storage, as one page load sees it.
pub type PageSession = CartSession<FileStorage, HtmlPage>;

/// Default configuration for tests.
#[must_use]
pub fn test_config() -> CartConfig {
    CartConfig::default()
}

/// Open a page against the carts stored in `dir`.
///
/// # Panics
///
/// Panics if the initial render fails.
#[must_use]
pub fn load_page(config: &CartConfig, dir: &Path) -> PageSession {
    CartSession::open(
        config,
        FileStorage::new(dir),
        HtmlPage::new(config.locale.locale()),
        Notifier::silent(),
    )
    .expect("Failed to open cart session")
}
