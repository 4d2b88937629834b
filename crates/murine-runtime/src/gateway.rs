//! Manipulation gateway: the write path for user-driven edits.
//!
//! A manual change goes through the same clamped increment as the
//! kinetics, then locks the edited substance so automatic kinetics leave
//! it alone until the lock window has elapsed on the simulation clock.

use crate::world::{SimulationWorld, WorldEvent};
use murine_core::error::{MurineError, Result};
use murine_core::types::{CompartmentKind, CompartmentRef, Millis, SubstanceKind};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One add/subtract action against one compartment of one organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualChange {
    pub organism_id: String,
    pub compartment: CompartmentKind,
    pub substance: SubstanceKind,
    /// Signed amount; negative values remove.
    pub amount: f64,
}

impl ManualChange {
    pub fn new(
        organism_id: impl Into<String>,
        compartment: CompartmentKind,
        substance: SubstanceKind,
        amount: f64,
    ) -> Self {
        Self {
            organism_id: organism_id.into(),
            compartment,
            substance,
            amount,
        }
    }

    pub fn target(&self) -> CompartmentRef {
        CompartmentRef::new(self.organism_id.clone(), self.compartment)
    }
}

/// What a manual change actually did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeReceipt {
    pub target: CompartmentRef,
    pub substance: SubstanceKind,
    pub requested: f64,
    /// Differs from `requested` when a removal was clamped.
    pub applied: f64,
    pub lock_until: Millis,
}

impl SimulationWorld {
    /// Apply a user edit as of `current_time`.
    ///
    /// Fails with a reference error when the organism does not exist and
    /// with `InvalidAmount` for non-finite amounts or when the pending delta
    /// would overflow; nothing changes on failure.
    pub fn apply_manual_change(
        &mut self,
        change: &ManualChange,
        current_time: Millis,
    ) -> Result<ChangeReceipt> {
        if !change.amount.is_finite() {
            return Err(MurineError::InvalidAmount {
                field: "amount",
                value: change.amount,
            });
        }
        let lock_until = current_time.saturating_add(self.config.lock_window_ms);
        let organism = match self.organism_mut(&change.organism_id) {
            Ok(organism) => organism,
            Err(err) => {
                warn!(organism = %change.organism_id, "manual change for unknown organism");
                return Err(err);
            }
        };

        let accepts = organism
            .compartment(change.compartment)
            .and_then(|c| c.substance(change.substance))
            .map_or(true, |s| s.accepts_increment(change.amount));
        if !accepts {
            warn!(organism = %change.organism_id, amount = change.amount, "manual change would overflow");
            return Err(MurineError::InvalidAmount {
                field: "amount",
                value: change.amount,
            });
        }

        let applied =
            organism.increment_organelle_substance(change.compartment, change.substance, change.amount);
        organism.lock(change.compartment, change.substance, lock_until);

        let receipt = ChangeReceipt {
            target: change.target(),
            substance: change.substance,
            requested: change.amount,
            applied,
            lock_until,
        };
        info!(
            assay = %receipt.target,
            substance = %receipt.substance,
            requested = receipt.requested,
            applied = receipt.applied,
            lock_until,
            "manual change applied"
        );
        self.emit(WorldEvent::ManualChange {
            target: receipt.target.clone(),
            substance: receipt.substance,
            requested: receipt.requested,
            applied: receipt.applied,
            lock_until,
        });
        Ok(receipt)
    }

    /// Apply a user edit at the world's own clock.
    pub fn apply_manual_change_now(&mut self, change: &ManualChange) -> Result<ChangeReceipt> {
        let now = self.time();
        self.apply_manual_change(change, now)
    }
}
