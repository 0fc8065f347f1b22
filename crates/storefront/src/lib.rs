//! Storecart: client-side shopping cart.
//!
//! This crate keeps the cart of a storefront page: a canonical in-memory
//! cart with write-through persistence, view rendering through a presenter,
//! direct-edit reconciliation of rendered rows and transient notifications.
//!
//! Hosts build a [`CartSession`] from a [`CartConfig`], a storage backend
//! and a [`CartPresenter`], then drive it with [`CartCommand`]s.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod format;
pub mod notify;
pub mod persistence;
pub mod presenter;
pub mod reconcile;
pub mod render;
pub mod session;
pub mod store;
pub mod telemetry;

pub use config::{CartConfig, NotificationConfig};
pub use error::CartError;
pub use format::{Locale, LocaleId};
pub use notify::{Notifier, OverlapPolicy, ToastEvent, ToastPhase};
pub use persistence::{
    CartStorage, ConfiguredStorage, FileStorage, MemoryStorage, PersistenceAdapter,
};
pub use presenter::{CartPresenter, HtmlPage};
pub use reconcile::{ProductDraft, QuantityEdit, ReconcileStrategy};
pub use render::{CartListing, CartRenderer, CartRow, CounterBadge, OrderSummary};
pub use session::{CartCommand, CartSession, CatalogItem, CheckoutOutcome};
pub use store::{CartStore, Persistence};
