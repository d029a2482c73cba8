//! Business logic services for admin.
//!
//! # Services
//!
//! - `gate` - Operator username/password check
//! - `tables` - Concurrent table population with order enrichment
//! - `reconcile` - Keyed diff of operator edits and concurrent updates

pub mod gate;
pub mod reconcile;
pub mod tables;

#[cfg(test)]
pub(crate) mod testing;

pub use gate::{CredentialGate, GateError};
pub use reconcile::{
    FailedUpdate, ReconcileError, ReconcileOutcome, ReconcileReport, RowKey, TableEdits,
    UpdatePlan, reconcile,
};
pub use tables::{AdminTables, OrderRow, populate};
