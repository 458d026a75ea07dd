//! Cart Snapshots
//!
//! A serialisable copy of the cart's lines that a session collaborator can
//! persist and later replay against the catalog. Totals are not stored; they are
//! recomputed on restore.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{CartError, CartLedger, CartState},
    catalog::Catalog,
};

/// Errors restoring or encoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot references a product the catalog does not have.
    #[error("snapshot references unknown product: {0}")]
    UnknownProduct(String),

    /// A snapshot line was rejected by the ledger.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// YAML encoding or decoding error
    #[error("Failed to encode or decode snapshot: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// One persisted cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LineSnapshot {
    /// Product identifier
    pub product_id: String,

    /// Units on the line
    pub quantity: u32,

    /// Selected size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Selected color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Persisted cart lines in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Lines
    #[serde(default)]
    pub lines: Vec<LineSnapshot>,
}

impl CartSnapshot {
    /// Encode as YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError::Yaml`] if serialisation fails.
    pub fn to_yaml(&self) -> Result<String, SnapshotError> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Decode from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError::Yaml`] if the document is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, SnapshotError> {
        Ok(serde_norway::from_str(yaml)?)
    }
}

impl From<&CartState<'_>> for CartSnapshot {
    fn from(state: &CartState<'_>) -> Self {
        let lines = state
            .lines()
            .iter()
            .map(|line| LineSnapshot {
                product_id: line.product().id.clone(),
                quantity: line.quantity(),
                size: line.size().map(str::to_string),
                color: line.color().map(str::to_string),
            })
            .collect();

        Self { lines }
    }
}

impl<'a> CartLedger<'a> {
    /// Capture the current lines for persistence.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(self.state())
    }

    /// Rebuild a ledger by replaying a snapshot's lines as adds.
    ///
    /// Lines sharing an identity key merge, exactly as repeated adds would.
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::UnknownProduct`]: a line names a product missing from the catalog.
    /// - [`SnapshotError::Cart`]: a line has a zero quantity or overflows on merge.
    pub fn restore(catalog: &'a Catalog, snapshot: &CartSnapshot) -> Result<Self, SnapshotError> {
        let mut ledger = Self::new();

        for line in &snapshot.lines {
            let product = catalog
                .get(&line.product_id)
                .ok_or_else(|| SnapshotError::UnknownProduct(line.product_id.clone()))?;

            ledger.add(
                product,
                i64::from(line.quantity),
                line.size.as_deref(),
                line.color.as_deref(),
            )?;
        }

        debug!(
            lines = ledger.state().lines().len(),
            total_items = ledger.state().total_items(),
            "cart restored from snapshot"
        );

        Ok(ledger)
    }
}
