//! Conditional return dispatch
//!
//! Picks a response per call by matching named arguments against an
//! ordered list of conditions. First match wins; otherwise the default.

use crate::policy::SubstitutePolicy;
use crate::response::ResponseSpec;
use hookwire_runtime::{CallContext, CallError, Value};

/// One `(parameter, expected value, response)` entry
#[derive(Debug, Clone)]
pub struct Condition {
    parameter: String,
    expected: Value,
    response: ResponseSpec,
}

impl Condition {
    /// Create condition
    #[inline]
    #[must_use]
    pub fn new(
        parameter: impl Into<String>,
        expected: impl Into<Value>,
        response: impl Into<ResponseSpec>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            expected: expected.into(),
            response: response.into(),
        }
    }

    /// Parameter name to inspect
    #[inline]
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Value the argument must strictly equal
    #[inline]
    #[must_use]
    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// Response returned on match
    #[inline]
    #[must_use]
    pub fn response(&self) -> &ResponseSpec {
        &self.response
    }

    /// Does this condition match the call?
    ///
    /// `parameters` are the formal parameter names of the original
    /// implementation. A name that is not a parameter, or a position with no
    /// argument supplied, never matches.
    #[must_use]
    pub fn matches(&self, parameters: &[String], args: &[Value]) -> bool {
        parameters
            .iter()
            .position(|p| *p == self.parameter)
            .and_then(|pos| args.get(pos))
            .is_some_and(|arg| arg.strict_eq(&self.expected))
    }
}

/// Per-call response selection by named argument
///
/// Parameter names are captured once from the overridden target
/// when the policy is built and never re-derived per call.
#[derive(Debug, Clone)]
pub struct ConditionalReturn {
    parameters: Vec<String>,
    conditions: Vec<Condition>,
    default: ResponseSpec,
}

impl ConditionalReturn {
    /// Create policy
    #[inline]
    #[must_use]
    pub fn new(parameters: Vec<String>, conditions: Vec<Condition>, default: ResponseSpec) -> Self {
        Self {
            parameters,
            conditions,
            default,
        }
    }

    /// Captured formal parameter names
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Conditions in evaluation order
    #[inline]
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Index of the first matching condition
    #[must_use]
    pub fn matching_index(&self, args: &[Value]) -> Option<usize> {
        self.conditions
            .iter()
            .position(|c| c.matches(&self.parameters, args))
    }
}

impl SubstitutePolicy for ConditionalReturn {
    fn respond(&self, ctx: &CallContext<'_>, args: &[Value]) -> Result<Value, CallError> {
        let matched = self.matching_index(args);
        tracing::trace!(callee = %ctx.target(), ?matched, "conditional dispatch");
        match matched {
            Some(i) => self.conditions[i].response().resolve(),
            None => self.default.resolve(),
        }
    }

    fn name(&self) -> &'static str {
        "conditional"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookwire_runtime::{Runtime, TargetId};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn respond(policy: &ConditionalReturn, args: &[Value]) -> Value {
        let rt = Runtime::new();
        let t = TargetId::Function("select_all".into());
        policy.respond(&CallContext::new(&rt, &t), args).unwrap()
    }

    #[test]
    fn condition_accessors() {
        let condition = Condition::new("table", "user", 3);

        assert_eq!(condition.parameter(), "table");
        assert_eq!(condition.expected(), &Value::from("user"));
        assert_eq!(condition.response().resolve().unwrap(), Value::Int(3));
    }

    #[test]
    fn first_match_wins() {
        let policy = ConditionalReturn::new(
            params(&["table"]),
            vec![
                Condition::new("table", "user", "A"),
                Condition::new("table", "user", "B"),
            ],
            ResponseSpec::null(),
        );

        assert_eq!(respond(&policy, &[Value::from("user")]), Value::from("A"));
        assert_eq!(policy.matching_index(&[Value::from("user")]), Some(0));
    }

    #[test]
    fn default_fallback() {
        let policy = ConditionalReturn::new(
            params(&["id"]),
            vec![Condition::new("id", 1, "x")],
            ResponseSpec::literal("y"),
        );

        assert_eq!(respond(&policy, &[Value::Int(2)]), Value::from("y"));
        assert_eq!(respond(&policy, &[Value::Int(1)]), Value::from("x"));
    }

    #[test]
    fn matches_by_name_not_position() {
        let policy = ConditionalReturn::new(
            params(&["table", "limit"]),
            vec![Condition::new("limit", 10, "ten")],
            ResponseSpec::null(),
        );

        let args = [Value::Int(10), Value::Int(5)];
        assert_eq!(respond(&policy, &args), Value::Null);

        let args = [Value::from("post"), Value::Int(10)];
        assert_eq!(respond(&policy, &args), Value::from("ten"));
    }

    #[test]
    fn unknown_parameter_never_matches() {
        let policy = ConditionalReturn::new(
            params(&["table"]),
            vec![Condition::new("missing", "user", "A")],
            ResponseSpec::literal("default"),
        );
        assert_eq!(respond(&policy, &[Value::from("user")]), Value::from("default"));
    }

    #[test]
    fn missing_argument_never_matches() {
        let policy = ConditionalReturn::new(
            params(&["table", "limit"]),
            vec![Condition::new("limit", Value::Null, "null-limit")],
            ResponseSpec::literal("default"),
        );
        assert_eq!(respond(&policy, &[Value::from("user")]), Value::from("default"));
    }

    #[test]
    fn strict_matching_no_coercion() {
        let policy = ConditionalReturn::new(
            params(&["id"]),
            vec![Condition::new("id", 1, "int")],
            ResponseSpec::literal("other"),
        );
        assert_eq!(respond(&policy, &[Value::from("1")]), Value::from("other"));
        assert_eq!(respond(&policy, &[Value::Float(1.0)]), Value::from("other"));
    }

    #[test]
    fn producer_response_is_lazy() {
        let policy = ConditionalReturn::new(
            params(&["table"]),
            vec![
                Condition::new("table", "user", "users"),
                Condition::new(
                    "table",
                    "post",
                    ResponseSpec::producer(|| Err(CallError::raised("not reached"))),
                ),
            ],
            ResponseSpec::null(),
        );

        assert_eq!(respond(&policy, &[Value::from("user")]), Value::from("users"));
    }

    proptest! {
        #[test]
        fn prop_first_matching_condition_selected(
            expected in prop::collection::vec(0i64..5, 1..10),
            arg in 0i64..5,
        ) {
            let conditions = expected
                .iter()
                .enumerate()
                .map(|(i, e)| Condition::new("n", *e, i64::try_from(i).unwrap()))
                .collect();
            let policy = ConditionalReturn::new(
                params(&["n"]),
                conditions,
                ResponseSpec::literal(-1i64),
            );

            let want = expected
                .iter()
                .position(|e| *e == arg)
                .map_or(-1, |i| i64::try_from(i).unwrap());
            prop_assert_eq!(respond(&policy, &[Value::Int(arg)]), Value::Int(want));
        }
    }
}
