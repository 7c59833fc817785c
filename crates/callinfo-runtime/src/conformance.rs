//! Conformance scenarios for the invocation context
//!
//! Each case builds a fresh `Runtime`, drives the addon adapters the way
//! managed code would and checks what they observed. Cases are grouped into
//! suites and addressed as `"<suite> > <case>"`.

use std::time::Instant;

use callinfo_addons::arguments::{
    FUNCTION_WITH_ARGUMENTS, HOLDER_VALUE, IDENTITY, IS_CONSTRUCT_CALL, THIS_VALUE,
};
use callinfo_engine::{ImplicitReceiver, NativeError, Realm, Value, WellKnownSymbol};

use crate::error::RuntimeError;
use crate::options::RuntimeOptions;
use crate::Runtime;

// ============================================================================
// Result Types
// ============================================================================

/// Outcome of a single case
#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    /// All checks held
    Passed,
    /// A check failed; the message says which
    Failed(String),
    /// The case needs a capability this realm lacks
    Skipped(&'static str),
}

/// Result of a single case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    /// Suite name (e.g., "Holder")
    pub suite: &'static str,
    /// Case name
    pub name: &'static str,
    /// Outcome
    pub outcome: CaseOutcome,
    /// Duration in milliseconds
    pub duration_ms: f64,
}

impl CaseResult {
    /// Full case name (e.g., "Holder > should return the declaring ancestor")
    pub fn full_name(&self) -> String {
        format!("{} > {}", self.suite, self.name)
    }

    /// Whether the case passed
    pub fn passed(&self) -> bool {
        self.outcome == CaseOutcome::Passed
    }
}

/// Collected results of a conformance run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Results in execution order
    pub results: Vec<CaseResult>,
}

impl Report {
    /// Number of passed cases.
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    /// Number of failed cases.
    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, CaseOutcome::Failed(_)))
            .count()
    }

    /// Number of skipped cases.
    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, CaseOutcome::Skipped(_)))
            .count()
    }

    /// Whether any case failed
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Total duration in milliseconds.
    pub fn total_duration_ms(&self) -> f64 {
        self.results.iter().map(|r| r.duration_ms).sum()
    }
}

// ============================================================================
// Running
// ============================================================================

/// Run every case whose full name contains `filter` (all cases when `None`).
///
/// Fails only if a runtime cannot be created; case failures land in the
/// report.
pub fn run(options: &RuntimeOptions, filter: Option<&str>) -> Result<Report, RuntimeError> {
    let mut report = Report::default();

    for case in CASES {
        let full_name = format!("{} > {}", case.suite, case.name);
        if filter.is_some_and(|pattern| !full_name.contains(pattern)) {
            continue;
        }

        let start = Instant::now();
        let outcome = if case.requires_host_interop && !options.engine.host_interop {
            CaseOutcome::Skipped("host interop disabled")
        } else {
            let mut runtime = Runtime::new(options)?;
            match (case.run)(&mut runtime) {
                Ok(()) => CaseOutcome::Passed,
                Err(Failure(message)) => CaseOutcome::Failed(message),
            }
        };
        tracing::debug!(case = %full_name, ?outcome, "case finished");

        report.results.push(CaseResult {
            suite: case.suite,
            name: case.name,
            outcome,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        });
    }

    Ok(report)
}

/// Full names of all cases, in run order
pub fn case_names() -> Vec<String> {
    CASES
        .iter()
        .map(|case| format!("{} > {}", case.suite, case.name))
        .collect()
}

// ── Internal ─────────────────────────────────────────────────────────────

struct Failure(String);

impl From<NativeError> for Failure {
    fn from(err: NativeError) -> Self {
        Failure(format!("unexpected {}: {}", err.kind(), err))
    }
}

type Check = Result<(), Failure>;

struct Case {
    suite: &'static str,
    name: &'static str,
    requires_host_interop: bool,
    run: fn(&mut Runtime) -> Check,
}

const fn case(suite: &'static str, name: &'static str, run: fn(&mut Runtime) -> Check) -> Case {
    Case {
        suite,
        name,
        requires_host_interop: false,
        run,
    }
}

const CASES: &[Case] = &[
    case("IsConstructCall", "should return false for a regular call", regular_call),
    case("IsConstructCall", "should return true for a construct call", construct_call),
    case("This", "should return correct this value", explicit_this),
    case("This", "should use the implicit receiver for a plain call", implicit_this),
    case("Holder", "should return correct holder value", holder_is_receiver),
    case("Holder", "should return the declaring ancestor", holder_is_ancestor),
    case("Holder", "should return the receiver for an own method", holder_own_method),
    case("Holder", "should fail when nothing declares the function", holder_undeclared),
    case("arg[0]", "should be returned as it is from the identity function", identity_values),
    Case {
        suite: "arg[0]",
        name: "should preserve foreign host values",
        requires_host_interop: true,
        run: identity_foreign,
    },
    case("Arity", "should fail without arguments", identity_arity),
    case("Statelessness", "should not retain state between calls", stateless),
    case("Bound", "should use the bound receiver", bound_receiver),
    case("Bound", "should prepend bound arguments", bound_arguments),
    case("Bound", "should ignore the bound receiver for construct calls", bound_construct),
];

fn expect_same(realm: &Realm, what: &str, actual: &Value, expected: &Value) -> Check {
    if actual.same_value(expected) {
        Ok(())
    } else {
        Err(Failure(format!(
            "{}: expected {}, got {}",
            what,
            realm.describe(expected),
            realm.describe(actual)
        )))
    }
}

fn expect_field(realm: &Realm, target: &Value, key: &str, expected: &Value) -> Check {
    let actual = realm.get(target, &key.into())?;
    expect_same(realm, key, &actual, expected)
}

fn expect_error(result: Result<Value, NativeError>, kind: &str) -> Check {
    match result {
        Err(err) if err.kind() == kind => Ok(()),
        Err(err) => Err(Failure(format!("expected {}, got {}: {}", kind, err.kind(), err))),
        Ok(_) => Err(Failure(format!("expected {}, call returned a value", kind))),
    }
}

// ===== IsConstructCall =====

fn regular_call(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let obj = realm.create_object();
    realm.install_method(&obj, "inspect", &func)?;
    realm.call_with_receiver(&func, obj.clone(), &[])?;
    expect_field(realm, &obj, IS_CONSTRUCT_CALL, &Value::Bool(false))
}

fn construct_call(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let obj = realm.create_object();
    let instance = realm.construct(&func, &[obj])?;
    expect_field(realm, &instance, IS_CONSTRUCT_CALL, &Value::Bool(true))?;
    expect_field(realm, &instance, THIS_VALUE, &instance)
}

// ===== This =====

fn explicit_this(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let expected_this = realm.create_record([("a", Value::Int(123))]);
    realm.install_method(&expected_this, "inspect", &func)?;
    realm.call_with_receiver(&func, expected_this.clone(), &[])?;
    expect_field(realm, &expected_this, THIS_VALUE, &expected_this)
}

fn implicit_this(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let implicit = realm.options().implicit_receiver;
    match implicit {
        ImplicitReceiver::Global => {
            let global = Value::Object(realm.global());
            realm.install_method(&global, "inspect", &func)?;
            realm.call(&func, &[])?;
            expect_field(realm, &global, THIS_VALUE, &global)
        }
        // No chain to find a holder on.
        ImplicitReceiver::Undefined => expect_error(realm.call(&func, &[]), "BindingError"),
    }
}

// ===== Holder =====

fn holder_is_receiver(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let expected_this =
        realm.create_record([("a", Value::Int(123)), ("b", Value::string("test"))]);
    realm.install_method(&expected_this, "inspect", &func)?;
    realm.call_with_receiver(&func, expected_this.clone(), &[])?;
    expect_field(realm, &expected_this, HOLDER_VALUE, &expected_this)
}

fn holder_is_ancestor(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let ancestor = realm.create_object();
    realm.install_method(&ancestor, "inspect", &func)?;
    let receiver = realm.create_object_with_proto(ancestor.as_object());
    realm.set(&receiver, "a", Value::Int(123))?;
    realm.set(&receiver, "b", Value::string("test"))?;

    realm.call_with_receiver(&func, receiver.clone(), &[])?;
    expect_field(realm, &receiver, THIS_VALUE, &receiver)?;
    expect_field(realm, &receiver, HOLDER_VALUE, &ancestor)?;
    if realm.has_own(&ancestor, &THIS_VALUE.into())? {
        return Err(Failure("fields were written onto the holder".to_string()));
    }
    Ok(())
}

fn holder_own_method(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let receiver = realm.create_object();
    realm.install_method(&receiver, "inspect", &func)?;
    realm.invoke_method(&receiver, "inspect", &[])?;
    expect_field(realm, &receiver, HOLDER_VALUE, &receiver)
}

fn holder_undeclared(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let receiver =
        realm.create_record([("a", Value::Int(123)), ("b", Value::string("test"))]);
    expect_error(
        realm.call_with_receiver(&func, receiver.clone(), &[]),
        "BindingError",
    )?;
    if realm.has_own(&receiver, &HOLDER_VALUE.into())? {
        return Err(Failure("adapter ran without a holder".to_string()));
    }
    Ok(())
}

// ===== arg[0] =====

fn identity_values(rt: &mut Runtime) -> Check {
    let id = rt.export(IDENTITY)?;
    let realm = rt.realm_mut();

    let lazy = realm.concat(
        &Value::string("aaaaaaaaaaaaaaaaaaaa"),
        &Value::string("bbbbbbbbbbbbbbbbbbbbbbb"),
    )?;
    if !lazy.as_string().is_some_and(|s| s.is_lazy()) {
        return Err(Failure("concatenation did not produce a lazy string".to_string()));
    }
    let values = vec![
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(0),
        Value::Number(f64::INFINITY),
        Value::Number(f64::NEG_INFINITY),
        Value::Number(std::f64::consts::PI),
        Value::string("string"),
        lazy,
        realm.well_known_symbol(WellKnownSymbol::ToStringTag),
        realm.create_record([("foo", Value::string("bar"))]),
        realm.create_array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
    ];

    for value in values {
        let out = realm.call(&id, &[value.clone()])?;
        expect_same(realm, "identity", &out, &value)?;
    }
    Ok(())
}

fn identity_foreign(rt: &mut Runtime) -> Check {
    let id = rt.export(IDENTITY)?;
    let realm = rt.realm_mut();
    let point = realm.host_object("Point", (42_i32, 211_i32))?;
    let decimal = realm.host_object("Decimal", 3.14_f64)?;

    for value in [&point, &decimal] {
        let out = realm.call(&id, &[value.clone()])?;
        expect_same(realm, "identity", &out, value)?;
    }
    if point == decimal {
        return Err(Failure("distinct foreign values compared equal".to_string()));
    }
    Ok(())
}

// ===== Arity =====

fn identity_arity(rt: &mut Runtime) -> Check {
    let id = rt.export(IDENTITY)?;
    expect_error(rt.realm_mut().call(&id, &[]), "ArityError")
}

// ===== Statelessness =====

fn stateless(rt: &mut Runtime) -> Check {
    let id = rt.export(IDENTITY)?;
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();

    let first = realm.call(&id, &[Value::Int(1)])?;
    let second = realm.call(&id, &[Value::string("x")])?;
    expect_same(realm, "first call", &first, &Value::Int(1))?;
    expect_same(realm, "second call", &second, &Value::string("x"))?;

    let plain = realm.create_object();
    realm.install_method(&plain, "inspect", &func)?;
    realm.call_with_receiver(&func, plain.clone(), &[])?;
    let instance = realm.construct(&func, &[])?;
    expect_field(realm, &plain, IS_CONSTRUCT_CALL, &Value::Bool(false))?;
    expect_field(realm, &instance, IS_CONSTRUCT_CALL, &Value::Bool(true))?;
    expect_field(realm, &instance, THIS_VALUE, &instance)
}

// ===== Bound =====

fn bound_receiver(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let fixed = realm.create_object();
    let other = realm.create_object();
    realm.install_method(&fixed, "inspect", &func)?;
    let bound = realm.bind(&func, fixed.clone(), Vec::new())?;

    realm.call_with_receiver(&bound, other.clone(), &[])?;
    expect_field(realm, &fixed, THIS_VALUE, &fixed)?;
    expect_field(realm, &other, THIS_VALUE, &Value::Undefined)
}

fn bound_arguments(rt: &mut Runtime) -> Check {
    let id = rt.export(IDENTITY)?;
    let realm = rt.realm_mut();
    let token = realm.create_symbol(Some("token"));
    let bound = realm.bind(&id, Value::Undefined, vec![token.clone()])?;
    let out = realm.call(&bound, &[Value::Int(2)])?;
    expect_same(realm, "bound identity", &out, &token)
}

fn bound_construct(rt: &mut Runtime) -> Check {
    let func = rt.export(FUNCTION_WITH_ARGUMENTS)?;
    let realm = rt.realm_mut();
    let fixed = realm.create_object();
    let bound = realm.bind(&func, fixed.clone(), Vec::new())?;

    let instance = realm.construct(&bound, &[])?;
    expect_field(realm, &instance, IS_CONSTRUCT_CALL, &Value::Bool(true))?;
    expect_field(realm, &instance, THIS_VALUE, &instance)?;
    expect_field(realm, &fixed, THIS_VALUE, &Value::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_names_are_unique() {
        let names = case_names();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }

    #[test]
    fn test_filter_selects_suite() {
        let report = run(&RuntimeOptions::default(), Some("Holder >")).unwrap();
        assert_eq!(report.results.len(), 4);
        assert!(report.results.iter().all(|r| r.suite == "Holder"));
    }
}
