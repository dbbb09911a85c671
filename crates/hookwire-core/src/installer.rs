//! Override installer
//!
//! Binds substitute policies to targets, preserving the original first
//! when asked to, and keeps per-target installation bookkeeping.

use crate::backup::BackupStore;
use hookwire_dispatch::{into_substitute, SubstitutePolicy};
use hookwire_runtime::{CallError, Function, OverridePrimitive, TargetId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Active substitute bound to one target
#[derive(Clone)]
pub struct Installation {
    policy: Arc<dyn SubstitutePolicy>,
    backed_up: bool,
}

impl Installation {
    /// Installed policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &Arc<dyn SubstitutePolicy> {
        &self.policy
    }

    /// Strategy name of the installed policy
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        self.policy.name()
    }

    /// Was a backup requested for this installation?
    #[inline]
    #[must_use]
    pub fn backed_up(&self) -> bool {
        self.backed_up
    }
}

impl fmt::Debug for Installation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installation")
            .field("policy", &self.policy)
            .field("backed_up", &self.backed_up)
            .finish()
    }
}

/// Installs substitutes through an [`OverridePrimitive`]
///
/// At most one installation per target; installing again replaces the
/// previous substitute.
#[derive(Debug, Default)]
pub struct Installer {
    installations: HashMap<TargetId, Installation>,
    trace_calls: bool,
}

impl Installer {
    /// Create installer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a debug event emitted for every intercepted call
    #[inline]
    #[must_use]
    pub fn with_call_tracing(mut self, enabled: bool) -> Self {
        self.trace_calls = enabled;
        self
    }

    /// Bind `policy` as the active implementation of `target`
    ///
    /// With `with_backup`, the original is preserved before the substitute
    /// takes effect, so a later restore always rewinds to the
    /// pre-override implementation.
    ///
    /// # Errors
    /// Forwards backup or install failures from the primitive; nothing is
    /// installed when the backup fails.
    pub fn install<P>(
        &mut self,
        primitive: &P,
        backups: &mut BackupStore,
        target: &TargetId,
        policy: Arc<dyn SubstitutePolicy>,
        with_backup: bool,
    ) -> Result<(), CallError>
    where
        P: OverridePrimitive + ?Sized,
    {
        if with_backup {
            backups.ensure_backed_up(primitive, target)?;
        }

        primitive.install_override(target, self.substitute_for(&policy))?;
        tracing::info!(
            callee = %target,
            strategy = policy.name(),
            backup = with_backup,
            "substitute installed"
        );

        self.installations.insert(
            target.clone(),
            Installation {
                policy,
                backed_up: with_backup,
            },
        );
        Ok(())
    }

    fn substitute_for(&self, policy: &Arc<dyn SubstitutePolicy>) -> Function {
        if !self.trace_calls {
            return into_substitute(Arc::clone(policy));
        }
        let policy = Arc::clone(policy);
        Function::new(move |ctx, args| {
            let result = policy.respond(ctx, args);
            tracing::debug!(
                callee = %ctx.target(),
                strategy = policy.name(),
                args = args.len(),
                ok = result.is_ok(),
                "intercepted call"
            );
            result
        })
    }

    /// Drop bookkeeping for `target`
    pub fn forget(&mut self, target: &TargetId) -> Option<Installation> {
        self.installations.remove(target)
    }

    /// Drop all bookkeeping
    pub fn clear(&mut self) {
        self.installations.clear();
    }

    /// Keep bookkeeping only for targets matching `keep`
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&TargetId) -> bool,
    {
        self.installations.retain(|target, _| keep(target));
    }

    /// Active installation for `target`
    #[inline]
    #[must_use]
    pub fn get(&self, target: &TargetId) -> Option<&Installation> {
        self.installations.get(target)
    }

    /// Targets with an active installation
    #[inline]
    pub fn targets(&self) -> impl Iterator<Item = &TargetId> {
        self.installations.keys()
    }

    /// Number of active installations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.installations.len()
    }

    /// No active installations?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.installations.is_empty()
    }
}
