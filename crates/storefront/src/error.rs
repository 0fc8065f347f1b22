//! Unified error handling.
//!
//! Provides a unified `CartError` type aggregating the per-concern errors.
//! Nothing inside the cart core is fatal: parse failures load an empty cart,
//! unknown ids are no-ops and bad quantities clamp. What remains here is what
//! a host may want to surface.

use thiserror::Error;

use crate::config::ConfigError;
use crate::notify::NotifyError;
use crate::persistence::{PersistError, StorageError};
use crate::presenter::RenderError;
use crate::session::CatalogError;

/// Application-level error type for the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The cart could not be written.
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// A storage backend failed outside a cart write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A presenter hook failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Notifications could not be set up.
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// A catalog button carried unusable product data.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
