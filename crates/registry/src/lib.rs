//! Reference records read (never mutated) by the metrics engine.
//!
//! Facilities and inventory items are owned by out-of-scope registration and
//! provisioning flows; the engine treats them as lookup data keyed by
//! identifier. `InventoryItem::initial_stock` is the stock *as provisioned* —
//! current stock is always derived from usage logs.

pub mod facility;
pub mod item;

pub use facility::Facility;
pub use item::{Category, InventoryItem};
