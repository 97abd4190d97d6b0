//! The channel manager's display pipeline: scanned topology snapshots are reconciled into the
//! displayed panel, new entities are laid out, and positions the user settles on are remembered
//! across sessions.

pub mod host;
pub mod layout;
pub mod panel;
pub mod reconcile;
pub mod scanner;
pub mod store;
