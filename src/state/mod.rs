/// State management module
///
/// This module owns everything the UI renders, including:
/// - The per-slot lookup state machine (slot.rs)
/// - The binder collection and its resize rules (collection.rs)

pub mod collection;
pub mod slot;
