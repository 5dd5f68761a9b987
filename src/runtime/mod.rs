//! Single-owner portal orchestration and change events.

/// Change notifications emitted after each persisted mutation.
pub mod events;
/// Portal that owns the store adapter, the ledger, and the projector.
pub mod portal;
