//! Backup store
//!
//! Records which targets have their original binding preserved.
//! Membership is the only state; the implementations themselves live in
//! the primitive.

use hookwire_runtime::{CallError, OverridePrimitive, TargetId};
use indexmap::IndexSet;

/// Set of targets with a preserved original
///
/// Once a target is recorded it stays recorded until [`BackupStore::restore`]
/// succeeds for it.
#[derive(Debug, Clone, Default)]
pub struct BackupStore {
    preserved: IndexSet<TargetId>,
}

impl BackupStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preserve the original of `target` unless already preserved
    ///
    /// # Errors
    /// Forwards the primitive's failure (e.g. `UndefinedTarget`)
    pub fn ensure_backed_up<P>(&mut self, primitive: &P, target: &TargetId) -> Result<(), CallError>
    where
        P: OverridePrimitive + ?Sized,
    {
        if self.preserved.contains(target) {
            tracing::debug!(callee = %target, "original already preserved");
            return Ok(());
        }
        primitive.backup_original(target)?;
        self.preserved.insert(target.clone());
        tracing::debug!(callee = %target, "original preserved");
        Ok(())
    }

    /// Rebind the preserved original of `target` and forget it
    ///
    /// No pre-validation: a target without backup is handed to the
    /// primitive, whose `MissingBackup` failure is returned unchanged.
    ///
    /// # Errors
    /// Forwards the primitive's failure
    pub fn restore<P>(&mut self, primitive: &P, target: &TargetId) -> Result<(), CallError>
    where
        P: OverridePrimitive + ?Sized,
    {
        primitive.restore_original(target)?;
        self.preserved.shift_remove(target);
        Ok(())
    }

    /// Is `target` preserved?
    #[inline]
    #[must_use]
    pub fn contains(&self, target: &TargetId) -> bool {
        self.preserved.contains(target)
    }

    /// Preserved targets, in backup order
    #[inline]
    pub fn targets(&self) -> impl Iterator<Item = &TargetId> {
        self.preserved.iter()
    }

    /// Number of preserved targets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.preserved.len()
    }

    /// Nothing preserved?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preserved.is_empty()
    }
}
