//! Substance: one tracked quantity of one chemical kind in one compartment.
//!
//! A substance carries a confirmed `level` and a signed `pending_delta`
//! accumulated since the last commit, from both the kinetics and manual
//! edits. The delta may be negative but never below `-level`, so the
//! effective amount `level + pending_delta` never drops under zero.

use crate::kinetics::StepContext;
use crate::types::{Millis, SubstanceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substance {
    pub kind: SubstanceKind,
    level: f64,
    pending_delta: f64,
    /// Automatic kinetics are suppressed while the clock is before this time.
    lock_until: Option<Millis>,
}

impl Substance {
    pub fn new(kind: SubstanceKind) -> Self {
        Self::with_level(kind, 0.0)
    }

    pub fn with_level(kind: SubstanceKind, level: f64) -> Self {
        Self {
            kind,
            level: level.max(0.0),
            pending_delta: 0.0,
            lock_until: None,
        }
    }

    /// Confirmed level, clamped non-negative at read time.
    pub fn level(&self) -> f64 {
        self.level.max(0.0)
    }

    pub fn pending_delta(&self) -> f64 {
        self.pending_delta
    }

    /// `level + pending_delta`: the amount the kinetics react to.
    pub fn raw_amount(&self) -> f64 {
        (self.level() + self.pending_delta).max(0.0)
    }

    /// Level with removals subtracted; additions are charted separately.
    pub fn visual_amount(&self) -> f64 {
        (self.level() + self.pending_delta.min(0.0)).max(0.0)
    }

    pub fn lock_until(&self) -> Option<Millis> {
        self.lock_until
    }

    pub fn is_locked(&self, now: Millis) -> bool {
        self.lock_until.is_some_and(|until| until > now)
    }

    /// Install a manual-override window ending at `until`, replacing any
    /// earlier one.
    pub fn lock(&mut self, until: Millis) {
        self.lock_until = Some(until);
    }

    pub(crate) fn set_level(&mut self, level: f64) {
        self.level = level.max(0.0);
    }

    /// Add `amount` to the pending delta, never letting it fall below the
    /// negative of the current level. Returns the change actually applied.
    ///
    /// An increment whose result is not finite is dropped and reports zero.
    pub fn apply_increment(&mut self, amount: f64) -> f64 {
        let before = self.pending_delta;
        let next = before + amount;
        if !next.is_finite() {
            return 0.0;
        }
        self.pending_delta = next.max(-self.level());
        self.pending_delta - before
    }

    /// Whether adding `amount` keeps the pending delta finite.
    pub fn accepts_increment(&self, amount: f64) -> bool {
        (self.pending_delta + amount).is_finite()
    }

    /// Fold the pending delta into the level.
    pub fn commit(&mut self) {
        self.level = self.raw_amount();
        self.pending_delta = 0.0;
    }

    /// Net automatic change for this tick, or `None` while locked.
    ///
    /// Only reads; the owning organism applies the result once every
    /// substance has been evaluated against the same pre-tick state.
    pub fn step_delta(&self, ctx: &StepContext<'_>) -> Option<f64> {
        if self.is_locked(ctx.time) {
            return None;
        }
        let rates = ctx.table.rates(ctx, self);
        Some(rates.net())
    }
}
