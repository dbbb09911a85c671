use hookwire_runtime::{CallError, Function, OverridePrimitive, Reflection, Runtime, TargetId, Value};
use proptest::prelude::*;

fn returning(v: i64) -> Function {
    Function::from_fn(move |_| Ok(Value::Int(v)))
}

#[test]
fn test_method_targets_are_independent_of_functions() {
    let rt = Runtime::new();
    let free = rt.define_function("send", &[], returning(1)).unwrap();
    let method = rt
        .define_method("Mailer", "send", &[], Default::default(), returning(2))
        .unwrap();

    rt.install_override(&method, returning(3)).unwrap();

    assert_eq!(rt.call(&free, &[]).unwrap(), Value::Int(1));
    assert_eq!(rt.call(&method, &[]).unwrap(), Value::Int(3));
}

#[test]
fn test_redefinition_does_not_touch_backup() {
    let rt = Runtime::new();
    let t = rt.define_function("version", &[], returning(1)).unwrap();

    rt.backup_original(&t).unwrap();
    rt.define_function("version", &[], returning(2)).unwrap();
    assert_eq!(rt.call(&t, &[]).unwrap(), Value::Int(2));

    rt.restore_original(&t).unwrap();
    assert_eq!(rt.call(&t, &[]).unwrap(), Value::Int(1));
}

#[test]
fn test_second_restore_is_missing_backup() {
    let rt = Runtime::new();
    let t = rt.define_function("version", &[], returning(1)).unwrap();

    rt.backup_original(&t).unwrap();
    rt.restore_original(&t).unwrap();

    assert_eq!(rt.restore_original(&t), Err(CallError::MissingBackup(t)));
}

#[test]
fn test_is_substitute_undefined() {
    let rt = Runtime::new();
    let t = TargetId::Function("ghost".into());
    assert_eq!(rt.is_substitute(&t), Err(CallError::UndefinedTarget(t)));
}

proptest! {
    #[test]
    fn prop_restore_rewinds_to_first_backup(
        original in any::<i64>(),
        overrides in prop::collection::vec(any::<i64>(), 1..8),
        input in any::<i64>(),
    ) {
        let rt = Runtime::new();
        let t = rt
            .define_function("f", &["x"], Function::from_fn(move |args| {
                let x = args[0].as_int().unwrap_or_default();
                Ok(Value::Int(x.wrapping_add(original)))
            }))
            .unwrap();
        let before = rt.call(&t, &[Value::Int(input)]).unwrap();

        for v in overrides {
            rt.backup_original(&t).unwrap();
            rt.install_override(&t, returning(v)).unwrap();
        }
        rt.restore_original(&t).unwrap();

        prop_assert_eq!(rt.call(&t, &[Value::Int(input)]).unwrap(), before);
    }
}
