//! Interceptor facade
//!
//! The only entry point tests need: every operation names its intent
//! (hook, conditional return, sequential return, replace, mute) and the
//! backup/installation bookkeeping stays private.

use crate::attributes::AttributeMutator;
use crate::backup::BackupStore;
use crate::config::InterceptorConfig;
use crate::error::InterceptError;
use crate::installer::{Installation, Installer};
use hookwire_dispatch::{
    Condition, ConditionalReturn, ConstantReturn, CustomSubstitute, DelegatingReplace, HookForward,
    Mute, OutputSlot, ResponseSpec, SequentialReturn, SubstitutePolicy,
};
use hookwire_runtime::{AccessFlags, Function, Host, IntoTarget, Runtime, TargetId, Value};
use std::sync::Arc;

/// Result type for interceptor operations
pub type Result<T> = std::result::Result<T, InterceptError>;

/// Call-interception engine over a [`Host`]
///
/// Installs substitutes on named targets, preserves originals on request
/// and rewinds them on [`restore`](Self::restore).
///
/// # Example
/// ```
/// use hookwire::{Function, Interceptor, Runtime, Value};
///
/// let runtime = Runtime::new();
/// runtime
///     .define_function("roll_dice", &[], Function::from_fn(|_| Ok(Value::Int(4))))
///     .unwrap();
///
/// let mut interceptor = Interceptor::new(runtime.clone());
/// interceptor
///     .consistent_return("roll_dice", vec![6.into(), 1.into()], true)
///     .unwrap();
/// assert_eq!(runtime.call_named("roll_dice", &[]).unwrap(), Value::Int(6));
/// assert_eq!(runtime.call_named("roll_dice", &[]).unwrap(), Value::Int(1));
///
/// interceptor.restore("roll_dice").unwrap();
/// assert_eq!(runtime.call_named("roll_dice", &[]).unwrap(), Value::Int(4));
/// ```
#[derive(Debug)]
pub struct Interceptor<H: Host = Runtime> {
    host: H,
    config: InterceptorConfig,
    backups: BackupStore,
    installer: Installer,
}

impl Default for Interceptor<Runtime> {
    fn default() -> Self {
        Self::new(Runtime::new())
    }
}

impl<H: Host> Interceptor<H> {
    /// Create interceptor with default configuration
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_config(host, InterceptorConfig::default())
    }

    /// Create interceptor with custom configuration
    #[must_use]
    pub fn with_config(host: H, config: InterceptorConfig) -> Self {
        Self {
            host,
            installer: Installer::new().with_call_tracing(config.trace_calls),
            config,
            backups: BackupStore::new(),
        }
    }

    /// Host the interceptor drives
    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &InterceptorConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Backup and restore
    // ------------------------------------------------------------------

    /// Preserve the original of `target` without installing anything
    ///
    /// # Errors
    /// `UndefinedTarget` if `target` does not exist
    pub fn backup(&mut self, target: impl IntoTarget) -> Result<()> {
        let target = target.into_target()?;
        self.backups.ensure_backed_up(&self.host, &target)?;
        Ok(())
    }

    /// Rebind the preserved original of `target`
    ///
    /// Drops the target's installation bookkeeping as well, so a
    /// sequential counter starts over on the next install.
    ///
    /// # Errors
    /// `MissingBackup` if no original was preserved
    pub fn restore(&mut self, target: impl IntoTarget) -> Result<()> {
        let target = target.into_target()?;
        self.backups.restore(&self.host, &target)?;
        self.installer.forget(&target);
        tracing::info!(callee = %target, "original restored");
        Ok(())
    }

    /// Restore every backed-up target
    ///
    /// Every target is attempted; failures are logged and the first one is
    /// returned once all have been tried.
    ///
    /// # Errors
    /// First restore failure encountered
    pub fn restore_all(&mut self) -> Result<()> {
        let targets: Vec<TargetId> = self.backups.targets().cloned().collect();
        let mut first_error = None;

        for target in targets {
            if let Err(e) = self.restore(target.clone()) {
                tracing::warn!(callee = %target, error = %e, "restore failed");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Tear down: restore originals (when configured) and drop installation
    /// bookkeeping
    ///
    /// Targets whose restore fails keep their bookkeeping, since their
    /// substitute is still bound.
    ///
    /// # Errors
    /// First restore failure
    pub fn reset(&mut self) -> Result<()> {
        let restored = if self.config.restore_on_reset {
            let restored = self.restore_all();
            let backups = &self.backups;
            self.installer.retain(|target| backups.contains(target));
            restored
        } else {
            self.installer.clear();
            Ok(())
        };
        tracing::debug!(
            preserved = self.backups.len(),
            installed = self.installer.len(),
            "interceptor reset"
        );
        restored
    }

    // ------------------------------------------------------------------
    // Installation
    // ------------------------------------------------------------------

    /// Install an arbitrary substitute body
    ///
    /// # Errors
    /// `UndefinedTarget` if a backup is requested for a missing target
    pub fn install_function(
        &mut self,
        target: impl IntoTarget,
        body: Function,
        with_backup: bool,
    ) -> Result<()> {
        self.install_policy(target, Arc::new(CustomSubstitute::new(body)), with_backup)
    }

    /// Install any substitute policy
    ///
    /// # Errors
    /// `UndefinedTarget` if a backup is requested for a missing target
    pub fn install_policy(
        &mut self,
        target: impl IntoTarget,
        policy: Arc<dyn SubstitutePolicy>,
        with_backup: bool,
    ) -> Result<()> {
        let target = target.into_target()?;
        self.installer
            .install(&self.host, &mut self.backups, &target, policy, with_backup)?;
        Ok(())
    }

    /// Run `hook` on every call, record its result in `slot` and return it
    ///
    /// # Errors
    /// `UndefinedTarget` if a backup is requested for a missing target
    pub fn hook(
        &mut self,
        target: impl IntoTarget,
        hook: Function,
        slot: &OutputSlot,
        with_backup: bool,
    ) -> Result<()> {
        let policy = HookForward::new(hook, slot.clone());
        self.install_policy(target, Arc::new(policy), with_backup)
    }

    /// Return the response of the first condition whose named argument
    /// strictly equals its expected value, otherwise `default`
    ///
    /// Parameter names are read from the original before it is overridden.
    ///
    /// # Errors
    /// - `UndefinedTarget` if `target` does not exist
    /// - `UnsupportedTargetKind` if `target` is already bound to a substitute
    pub fn conditional_return(
        &mut self,
        target: impl IntoTarget,
        conditions: Vec<Condition>,
        default: impl Into<ResponseSpec>,
        with_backup: bool,
    ) -> Result<()> {
        let target = target.into_target()?;
        if self.host.is_substitute(&target)? {
            return Err(InterceptError::UnsupportedTargetKind(target));
        }
        let parameters = self.host.parameter_names(&target)?;

        let policy = ConditionalReturn::new(parameters, conditions, default.into());
        self.install_policy(target, Arc::new(policy), with_backup)
    }

    /// Return `responses` one per call, in order
    ///
    /// A call past the end fails with `IndexOutOfRange`.
    ///
    /// # Errors
    /// `UndefinedTarget` if a backup is requested for a missing target
    pub fn consistent_return(
        &mut self,
        target: impl IntoTarget,
        responses: Vec<ResponseSpec>,
        with_backup: bool,
    ) -> Result<()> {
        self.install_policy(target, Arc::new(SequentialReturn::new(responses)), with_backup)
    }

    /// Always return `response`
    ///
    /// # Errors
    /// `UndefinedTarget` if a backup is requested for a missing target
    pub fn simple_return(
        &mut self,
        target: impl IntoTarget,
        response: impl Into<ResponseSpec>,
        with_backup: bool,
    ) -> Result<()> {
        let policy = ConstantReturn::new(response.into());
        self.install_policy(target, Arc::new(policy), with_backup)
    }

    /// Forward every call on `target` to `delegate`, backing up per
    /// `backup_by_default`
    ///
    /// # Errors
    /// As [`replace_with_backup`](Self::replace_with_backup)
    pub fn replace(&mut self, target: impl IntoTarget, delegate: impl IntoTarget) -> Result<()> {
        let with_backup = self.config.backup_by_default;
        self.replace_with_backup(target, delegate, with_backup)
    }

    /// Forward every call on `target` to `delegate`
    ///
    /// The delegate is looked up per call, so redefining it later is
    /// observed.
    ///
    /// # Errors
    /// - `InvalidTarget` for a malformed delegate name
    /// - `UndefinedTarget` if a backup is requested for a missing target
    pub fn replace_with_backup(
        &mut self,
        target: impl IntoTarget,
        delegate: impl IntoTarget,
        with_backup: bool,
    ) -> Result<()> {
        let delegate = delegate.into_target()?;
        self.install_policy(target, Arc::new(DelegatingReplace::new(delegate)), with_backup)
    }

    /// Make `target` a no-op returning null, backing up per
    /// `backup_by_default`
    ///
    /// # Errors
    /// As [`mute_with_backup`](Self::mute_with_backup)
    pub fn mute(&mut self, target: impl IntoTarget) -> Result<()> {
        let with_backup = self.config.backup_by_default;
        self.mute_with_backup(target, with_backup)
    }

    /// Make `target` a no-op returning null
    ///
    /// # Errors
    /// `UndefinedTarget` if a backup is requested for a missing target
    pub fn mute_with_backup(&mut self, target: impl IntoTarget, with_backup: bool) -> Result<()> {
        self.install_policy(target, Arc::new(Mute), with_backup)
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Replace the access flags of `target`
    ///
    /// # Errors
    /// `UndefinedTarget` if `target` does not exist
    pub fn set_access_attributes(&self, target: impl IntoTarget, flags: AccessFlags) -> Result<()> {
        let target = target.into_target()?;
        AttributeMutator.set_access_attributes(&self.host, &target, flags)?;
        Ok(())
    }

    /// Rebind the value of constant `name`
    ///
    /// # Errors
    /// `UndefinedConstant` if `name` was never defined
    pub fn redefine_constant(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        AttributeMutator.redefine_constant(&self.host, name, value.into())?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Is the original of `target` preserved?
    #[must_use]
    pub fn is_backed_up(&self, target: impl IntoTarget) -> bool {
        target
            .into_target()
            .is_ok_and(|target| self.backups.contains(&target))
    }

    /// Strategy name of the substitute installed on `target`
    #[must_use]
    pub fn active_policy(&self, target: impl IntoTarget) -> Option<&'static str> {
        let target = target.into_target().ok()?;
        self.installer.get(&target).map(Installation::strategy)
    }

    /// Targets with an installed substitute, sorted
    #[must_use]
    pub fn installed_targets(&self) -> Vec<TargetId> {
        let mut targets: Vec<TargetId> = self.installer.targets().cloned().collect();
        targets.sort();
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwire_runtime::{
        AttributePrimitive, CallError, ConstantPrimitive, OverridePrimitive, Reflection,
    };
    use mockall::{mock, predicate::eq, Sequence};
    use pretty_assertions::assert_eq;

    mock! {
        pub Host {}

        impl OverridePrimitive for Host {
            fn install_override(&self, target: &TargetId, substitute: Function) -> std::result::Result<(), CallError>;
            fn backup_original(&self, target: &TargetId) -> std::result::Result<(), CallError>;
            fn restore_original(&self, target: &TargetId) -> std::result::Result<(), CallError>;
        }

        impl AttributePrimitive for Host {
            fn set_flags(&self, target: &TargetId, flags: AccessFlags) -> std::result::Result<(), CallError>;
        }

        impl ConstantPrimitive for Host {
            fn redefine_constant(&self, name: &str, value: Value) -> std::result::Result<(), CallError>;
        }

        impl Reflection for Host {
            fn parameter_names(&self, target: &TargetId) -> std::result::Result<Vec<String>, CallError>;
            fn is_substitute(&self, target: &TargetId) -> std::result::Result<bool, CallError>;
        }
    }

    fn lookup() -> TargetId {
        TargetId::method("Repo", "lookup").unwrap()
    }

    #[test]
    fn conditional_return_refuses_substitutes() {
        let mut host = MockHost::new();
        host.expect_is_substitute()
            .with(eq(lookup()))
            .returning(|_| Ok(true));
        host.expect_parameter_names().times(0);
        host.expect_install_override().times(0);

        let mut interceptor = Interceptor::new(host);
        let err = interceptor
            .conditional_return("Repo::lookup", vec![], ResponseSpec::null(), true)
            .unwrap_err();

        assert_eq!(err, InterceptError::UnsupportedTargetKind(lookup()));
        assert!(interceptor.installed_targets().is_empty());
    }

    #[test]
    fn conditional_return_reflects_before_overriding() {
        let mut host = MockHost::new();
        let mut seq = Sequence::new();
        host.expect_is_substitute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        host.expect_parameter_names()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec!["id".to_string()]));
        host.expect_backup_original()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        host.expect_install_override()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut interceptor = Interceptor::new(host);
        interceptor
            .conditional_return(("Repo", "lookup"), vec![], "none", true)
            .unwrap();

        assert!(interceptor.is_backed_up("Repo::lookup"));
        assert_eq!(interceptor.active_policy("Repo::lookup"), Some("conditional"));
    }

    #[test]
    fn conditional_return_on_missing_target() {
        let mut host = MockHost::new();
        host.expect_is_substitute()
            .returning(|t| Err(CallError::UndefinedTarget(t.clone())));
        host.expect_install_override().times(0);

        let mut interceptor = Interceptor::new(host);
        let err = interceptor
            .conditional_return("missing", vec![], ResponseSpec::null(), false)
            .unwrap_err();
        assert!(err.is_undefined_target());
    }

    #[test]
    fn restore_all_attempts_every_target() {
        let mut host = MockHost::new();
        host.expect_backup_original().times(2).returning(|_| Ok(()));
        host.expect_restore_original()
            .with(eq(TargetId::Function("a".into())))
            .times(1)
            .returning(|t| Err(CallError::MissingBackup(t.clone())));
        host.expect_restore_original()
            .with(eq(TargetId::Function("b".into())))
            .times(1)
            .returning(|_| Ok(()));

        let mut interceptor = Interceptor::new(host);
        interceptor.backup("a").unwrap();
        interceptor.backup("b").unwrap();

        let err = interceptor.restore_all().unwrap_err();
        assert!(err.is_missing_backup());
        assert!(interceptor.is_backed_up("a"));
        assert!(!interceptor.is_backed_up("b"));
    }

    #[test]
    fn replace_and_mute_follow_backup_default() {
        let mut host = MockHost::new();
        host.expect_backup_original().times(0);
        host.expect_install_override().times(2).returning(|_, _| Ok(()));

        let mut interceptor = Interceptor::new(host);
        interceptor.replace("now", "fixed_now").unwrap();
        interceptor.mute("log").unwrap();

        assert_eq!(interceptor.active_policy("now"), Some("replace"));
        assert_eq!(interceptor.active_policy("log"), Some("mute"));
        assert_eq!(
            interceptor.installed_targets(),
            vec![TargetId::Function("log".into()), TargetId::Function("now".into())]
        );
    }

    #[test]
    fn backup_by_default_config() {
        let mut host = MockHost::new();
        host.expect_backup_original().times(1).returning(|_| Ok(()));
        host.expect_install_override().times(1).returning(|_, _| Ok(()));

        let config = InterceptorConfig::new().with_backup_by_default(true);
        let mut interceptor = Interceptor::with_config(host, config);
        interceptor.mute("log").unwrap();

        assert!(interceptor.is_backed_up("log"));
    }

    #[test]
    fn malformed_target_rejected_before_host() {
        let mut host = MockHost::new();
        host.expect_install_override().times(0);

        let mut interceptor = Interceptor::new(host);
        let err = interceptor.mute("  ").unwrap_err();
        assert!(matches!(err, InterceptError::InvalidTarget(_)));
        assert!(!interceptor.is_backed_up("  "));
    }

    #[test]
    fn metadata_passes_through() {
        let mut host = MockHost::new();
        host.expect_set_flags()
            .with(eq(TargetId::method("Vault", "secret").unwrap()), eq(AccessFlags::PUBLIC))
            .times(1)
            .returning(|_, _| Ok(()));
        host.expect_redefine_constant()
            .with(eq("LIMIT"), eq(Value::Int(3)))
            .times(1)
            .returning(|_, _| Ok(()));

        let interceptor = Interceptor::new(host);
        interceptor
            .set_access_attributes("Vault::secret", AccessFlags::PUBLIC)
            .unwrap();
        interceptor.redefine_constant("LIMIT", 3).unwrap();
    }

    #[test]
    fn reset_keeps_bookkeeping_for_failed_restores() {
        let mut host = MockHost::new();
        host.expect_backup_original().times(2).returning(|_| Ok(()));
        host.expect_install_override().times(2).returning(|_, _| Ok(()));
        host.expect_restore_original()
            .with(eq(TargetId::Function("a".into())))
            .times(1)
            .returning(|t| Err(CallError::MissingBackup(t.clone())));
        host.expect_restore_original()
            .with(eq(TargetId::Function("b".into())))
            .times(1)
            .returning(|_| Ok(()));

        let mut interceptor = Interceptor::new(host);
        interceptor.simple_return("a", 1, true).unwrap();
        interceptor.mute_with_backup("b", true).unwrap();

        assert!(interceptor.reset().unwrap_err().is_missing_backup());
        assert_eq!(interceptor.installed_targets(), vec![TargetId::Function("a".into())]);
        assert_eq!(interceptor.active_policy("a"), Some("constant"));
        assert_eq!(interceptor.active_policy("b"), None);
    }

    #[test]
    fn explicit_backup_flag_overrides_default() {
        let mut host = MockHost::new();
        host.expect_backup_original()
            .with(eq(TargetId::Function("now".into())))
            .times(1)
            .returning(|_| Ok(()));
        host.expect_install_override().times(2).returning(|_, _| Ok(()));

        let mut interceptor = Interceptor::new(host);
        interceptor.replace_with_backup("now", "fixed_now", true).unwrap();
        interceptor.mute_with_backup("log", false).unwrap();

        assert!(interceptor.is_backed_up("now"));
        assert!(!interceptor.is_backed_up("log"));
        assert_eq!(interceptor.active_policy("now"), Some("replace"));
    }

    #[test]
    fn reset_without_restore_keeps_backups() {
        let rt = Runtime::new();
        rt.define_function("tick", &[], Function::from_fn(|_| Ok(Value::Int(1))))
            .unwrap();

        let config = InterceptorConfig::new().with_restore_on_reset(false);
        let mut interceptor = Interceptor::with_config(rt.clone(), config);
        interceptor.simple_return("tick", 9, true).unwrap();
        interceptor.reset().unwrap();

        assert!(interceptor.installed_targets().is_empty());
        assert!(interceptor.is_backed_up("tick"));
        assert_eq!(rt.call_named("tick", &[]).unwrap(), Value::Int(9));
    }
}
