//! Persistence adapter: reads and writes the cart record.
//!
//! The cart is stored as a single versioned JSON record:
//!
//! ```json
//! {"version":1,"saved_at":"2026-01-01T00:00:00Z","entries":[...]}
//! ```
//!
//! Older pages wrote a bare JSON array of entries with no envelope; that form
//! is still read. Loading never fails: an absent, unreadable or unparseable
//! record yields an empty cart.

pub mod storage;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use storecart_core::{Cart, CartEntry, Price, ProductId, Quantity};
use thiserror::Error;

pub use storage::{CartStorage, ConfiguredStorage, FileStorage, MemoryStorage, StorageError};

/// Current record format version.
pub const RECORD_VERSION: u64 = 1;

/// Errors that can occur when saving the cart.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The cart could not be serialized.
    #[error("Failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The storage backend rejected the write.
    #[error("Failed to write cart: {0}")]
    Write(#[from] StorageError),
}

/// Serialized record envelope.
#[derive(Serialize)]
struct CartRecord<'a> {
    version: u64,
    saved_at: DateTime<Utc>,
    entries: &'a [CartEntry],
}

/// Reads and writes the cart under a single storage key.
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    storage: S,
    key: String,
}

impl<S: CartStorage> PersistenceAdapter<S> {
    /// Create an adapter for `key` in `storage`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key of the cart record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the underlying storage.
    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Load the cart, falling back to an empty cart on any failure.
    pub fn load(&self) -> Cart {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "No stored cart, starting empty");
                return Cart::new();
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read stored cart, starting empty");
                return Cart::new();
            }
        };

        let cart = decode_record(&raw);
        tracing::debug!(key = %self.key, lines = cart.len(), "Loaded cart");
        cart
    }

    /// Write the cart.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if serialization or the storage write fails.
    pub fn save(&mut self, cart: &Cart) -> Result<(), PersistError> {
        let raw = encode_record(cart)?;
        self.storage.write(&self.key, &raw)?;
        Ok(())
    }

    /// Delete the stored record. A later load yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the storage backend cannot be modified.
    pub fn discard(&mut self) -> Result<(), PersistError> {
        self.storage.remove(&self.key)?;
        Ok(())
    }
}

/// Serialize a cart into the current record format.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode_record(cart: &Cart) -> Result<String, serde_json::Error> {
    serde_json::to_string(&CartRecord {
        version: RECORD_VERSION,
        saved_at: Utc::now(),
        entries: cart.entries(),
    })
}

/// Decode a stored record into a cart, normalizing its entries.
///
/// Unparseable input and unknown versions decode to an empty cart.
#[must_use]
pub fn decode_record(raw: &str) -> Cart {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Stored cart is not valid JSON, starting empty");
            return Cart::new();
        }
    };

    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut record) => {
            let version = record.get("version").and_then(Value::as_u64);
            if version != Some(RECORD_VERSION) {
                tracing::warn!(?version, "Unsupported cart record version, starting empty");
                return Cart::new();
            }
            match record.remove("entries") {
                Some(Value::Array(items)) => items,
                _ => {
                    tracing::warn!("Cart record has no entries list, starting empty");
                    return Cart::new();
                }
            }
        }
        Value::Null => return Cart::new(),
        _ => {
            tracing::warn!("Stored cart has an unexpected shape, starting empty");
            return Cart::new();
        }
    };

    let total = entries.len();
    let normalized: Vec<CartEntry> = entries.iter().filter_map(normalize_entry).collect();
    if normalized.len() < total {
        tracing::warn!(
            dropped = total - normalized.len(),
            "Dropped malformed cart entries"
        );
    }

    Cart::from_entries(normalized)
}

/// Turn one stored JSON object into an entry.
///
/// Entries without a usable id or price are dropped; a missing or invalid
/// quantity becomes 1.
fn normalize_entry(value: &Value) -> Option<CartEntry> {
    let object = value.as_object()?;

    let id = match object.get("id")? {
        Value::String(s) => ProductId::parse(s).ok()?,
        Value::Number(n) => ProductId::parse(&n.to_string()).ok()?,
        _ => return None,
    };

    let price = object.get("price").and_then(Value::as_u64).map(Price::new)?;

    let quantity = match object.get("quantity") {
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Quantity::clamped)
            .or_else(|| n.as_u64().map(|_| Quantity::clamped(i64::MAX)))
            .unwrap_or_else(|| Quantity::parse_lenient(&n.to_string())),
        Some(Value::String(s)) => Quantity::parse_lenient(s),
        _ => Quantity::ONE,
    };

    let title = object
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let entry = CartEntry::new(id, title, price, quantity);
    Some(match object.get("image").and_then(Value::as_str) {
        Some(image) => entry.with_image(image),
        None => entry,
    })
}
