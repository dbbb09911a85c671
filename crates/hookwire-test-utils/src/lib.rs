//! Testing utilities for hookwire workspace
//!
//! Shared test helpers, fixtures, and tracing setup.

#![allow(missing_docs)]

use hookwire_runtime::{AccessFlags, Function, ObjectRef, Runtime, TargetId, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seeded runtime resembling a small application under test
///
/// - `select_all(table, limit)`: rows of `table`, at most `limit`
/// - `Database::query(sql)`: echoes `"executed: {sql}"`
/// - `Vault::secret()`: private, returns `"s3cr3t"`
/// - `Mailer::send(to, body)`: counts every delivery in `mails_sent`
/// - `now()` / `fixed_now()`: clock and a stand-in
/// - constant `MAX_USERS = 100`
#[derive(Debug, Clone)]
pub struct AppFixture {
    pub runtime: Runtime,
    pub mails_sent: Arc<AtomicUsize>,
    pub select_all: TargetId,
    pub query: TargetId,
    pub secret: TargetId,
    pub send: TargetId,
    pub now: TargetId,
    pub fixed_now: TargetId,
}

impl AppFixture {
    pub fn new() -> Self {
        let runtime = Runtime::new();
        let mails_sent = Arc::new(AtomicUsize::new(0));

        let select_all = runtime
            .define_function("select_all", &["table", "limit"], Function::from_fn(select_rows))
            .unwrap();

        let query = runtime
            .define_method(
                "Database",
                "query",
                &["sql"],
                AccessFlags::PUBLIC,
                Function::from_fn(|args| {
                    let sql = args.first().and_then(Value::as_str).unwrap_or_default();
                    Ok(Value::from(format!("executed: {sql}")))
                }),
            )
            .unwrap();

        let secret = runtime
            .define_method(
                "Vault",
                "secret",
                &[],
                AccessFlags::PRIVATE,
                Function::from_fn(|_| Ok(Value::from("s3cr3t"))),
            )
            .unwrap();

        let counter = Arc::clone(&mails_sent);
        let send = runtime
            .define_method(
                "Mailer",
                "send",
                &["to", "body"],
                AccessFlags::PUBLIC,
                Function::from_fn(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Bool(true))
                }),
            )
            .unwrap();

        let now = runtime
            .define_function("now", &[], Function::from_fn(|_| Ok(Value::Int(1_700_000_000))))
            .unwrap();
        let fixed_now = runtime
            .define_function("fixed_now", &[], Function::from_fn(|_| Ok(Value::Int(0))))
            .unwrap();

        runtime.define_constant("MAX_USERS", 100);

        Self {
            runtime,
            mails_sent,
            select_all,
            query,
            secret,
            send,
            now,
            fixed_now,
        }
    }

    pub fn mails_sent(&self) -> usize {
        self.mails_sent.load(Ordering::SeqCst)
    }

    pub fn call(&self, target: &TargetId, args: &[Value]) -> Value {
        self.runtime.call(target, args).unwrap()
    }
}

impl Default for AppFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn select_rows(args: &[Value]) -> Result<Value, hookwire_runtime::CallError> {
    let table = args.first().and_then(Value::as_str).unwrap_or_default();
    let limit = args
        .get(1)
        .and_then(Value::as_int)
        .and_then(|l| usize::try_from(l).ok())
        .unwrap_or(usize::MAX);

    let rows: Vec<Value> = (1..=3)
        .map(|i| Value::from(format!("{table}#{i}")))
        .take(limit)
        .collect();
    Ok(Value::List(rows))
}

/// User object used as a response prototype
pub fn user_prototype(name: &str) -> ObjectRef {
    ObjectRef::new("User")
        .with_field("name", name)
        .with_field("active", true)
}

/// Function returning its arguments as a list
pub fn echo_args() -> Function {
    Function::from_fn(|args| Ok(Value::List(args.to_vec())))
}
