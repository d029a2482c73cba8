//! Apply operator edits to the backend.
//!
//! Edits are diffed against a freshly fetched baseline, keyed by identifier:
//! products by SKU, orders by `orderSk`. Only the editable fields travel:
//! price and quantity for products, status for orders. Every other field
//! is taken from the baseline row.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use threadline_api::{ApiError, StoreApi};
use threadline_core::{Order, OrderSk, Product, Sku};
use tracing::instrument;

use super::tables::{self, AdminTables};

/// Reconciliation errors.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The baseline tables could not be fetched. No updates were sent.
    #[error("Failed to load current tables: {0}")]
    Baseline(#[source] ApiError),

    /// Updates were sent but the tables could not be reloaded.
    #[error("Failed to reload tables: {0}")]
    Refresh(#[source] ApiError),
}

/// Edited tables submitted by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableEdits {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Identifies a row in one of the editable tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "table", content = "key", rename_all = "camelCase")]
pub enum RowKey {
    Product(Sku),
    Order(OrderSk),
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product(sku) => write!(f, "product {sku}"),
            Self::Order(order_sk) => write!(f, "order {order_sk}"),
        }
    }
}

/// An update the backend rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpdate {
    pub row: RowKey,
    pub error: String,
}

/// What a submission did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Rows the backend accepted an update for.
    pub updated: Vec<RowKey>,
    /// Rows whose update failed.
    pub failed: Vec<FailedUpdate>,
    /// Edited rows with no baseline counterpart.
    pub unmatched: Vec<RowKey>,
    /// Edited orders without an `orderSk`.
    pub unkeyed_orders: usize,
}

impl ReconcileReport {
    /// Whether at least one update went through.
    #[must_use]
    pub fn any_updated(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// Report plus the reloaded tables, present when anything was updated.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutcome {
    pub report: ReconcileReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<AdminTables>,
}

/// Updates derived from a keyed diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    pub products: Vec<Product>,
    pub orders: Vec<(OrderSk, Order)>,
    pub unmatched: Vec<RowKey>,
    pub unkeyed_orders: usize,
}

impl UpdatePlan {
    /// Diff the edits against the baseline.
    ///
    /// A key edited more than once keeps its last edit.
    #[must_use]
    pub fn diff(baseline_products: &[Product], baseline_orders: &[Order], edits: &TableEdits) -> Self {
        let mut plan = Self::default();

        let products: HashMap<Sku, &Product> =
            baseline_products.iter().map(|p| (p.sku, p)).collect();
        for edit in last_wins(&edits.products, |p| Some(p.sku)) {
            match products.get(&edit.sku) {
                None => plan.unmatched.push(RowKey::Product(edit.sku)),
                Some(base) if base.differs_in_editable_fields(edit) => {
                    plan.products.push(Product {
                        price: edit.price,
                        quantity: edit.quantity,
                        ..(*base).clone()
                    });
                }
                Some(_) => {}
            }
        }

        plan.unkeyed_orders = edits.orders.iter().filter(|o| o.order_sk.is_none()).count();
        let orders: HashMap<OrderSk, &Order> = baseline_orders
            .iter()
            .filter_map(|o| o.order_sk.map(|sk| (sk, o)))
            .collect();
        for edit in last_wins(&edits.orders, |o| o.order_sk) {
            let Some(order_sk) = edit.order_sk else {
                continue;
            };
            match orders.get(&order_sk) {
                None => plan.unmatched.push(RowKey::Order(order_sk)),
                Some(base) if base.status != edit.status => {
                    plan.orders.push((
                        order_sk,
                        Order {
                            status: edit.status.clone(),
                            ..(*base).clone()
                        },
                    ));
                }
                Some(_) => {}
            }
        }

        plan
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.orders.is_empty()
    }
}

/// Keep the last row for each key, in the order those rows appear.
/// Rows without a key pass through.
fn last_wins<T, K, F>(rows: &[T], key: F) -> Vec<&T>
where
    K: Eq + Hash,
    F: Fn(&T) -> Option<K>,
{
    let mut seen = HashSet::new();
    let mut kept: Vec<&T> = rows
        .iter()
        .rev()
        .filter(|row| key(*row).is_none_or(|k| seen.insert(k)))
        .collect();
    kept.reverse();
    kept
}

/// Diff the edits against a fresh baseline and send the updates concurrently.
///
/// # Errors
///
/// Returns [`ReconcileError::Baseline`] if the current tables cannot be
/// fetched, or [`ReconcileError::Refresh`] if updates succeeded but the
/// tables could not be reloaded afterwards.
#[instrument(skip(api, edits), fields(products = edits.products.len(), orders = edits.orders.len()))]
pub async fn reconcile<A: StoreApi>(
    api: &A,
    edits: &TableEdits,
) -> Result<ReconcileOutcome, ReconcileError> {
    let (products, orders) = tokio::join!(api.get_products(), api.get_orders());
    let products = products.map_err(ReconcileError::Baseline)?;
    let orders = orders.map_err(ReconcileError::Baseline)?;

    let plan = UpdatePlan::diff(&products, &orders, edits);
    let mut report = ReconcileReport {
        unmatched: plan.unmatched,
        unkeyed_orders: plan.unkeyed_orders,
        ..ReconcileReport::default()
    };
    if !report.unmatched.is_empty() || report.unkeyed_orders > 0 {
        tracing::warn!(
            unmatched = report.unmatched.len(),
            unkeyed_orders = report.unkeyed_orders,
            "Skipping edited rows with no current counterpart"
        );
    }

    let product_updates = join_all(plan.products.iter().map(|product| async move {
        (RowKey::Product(product.sku), api.update_product(product).await)
    }));
    let order_updates = join_all(plan.orders.iter().map(|(order_sk, order)| async move {
        (RowKey::Order(*order_sk), api.update_order(order).await)
    }));
    let (product_results, order_results) = tokio::join!(product_updates, order_updates);

    for (row, result) in product_results.into_iter().chain(order_results) {
        match result {
            Ok(()) => report.updated.push(row),
            Err(e) => {
                tracing::warn!(row = %row, error = %e, "Update rejected");
                report.failed.push(FailedUpdate {
                    row,
                    error: e.client_message(),
                });
            }
        }
    }

    tracing::info!(
        updated = report.updated.len(),
        failed = report.failed.len(),
        "Reconciliation finished"
    );

    let tables = if report.any_updated() {
        Some(tables::populate(api).await.map_err(ReconcileError::Refresh)?)
    } else {
        None
    };

    Ok(ReconcileOutcome { report, tables })
}
