//! Invocation Context Integration Tests
//!
//! End-to-end checks of what a native adapter observes through its
//! `InvocationContext`:
//! - Call kind for plain and construct calls
//! - Receiver for implicit, explicit and bound receivers
//! - Holder resolution along prototype chains
//! - Identity of arguments across value kinds
//!
//! # Running Tests
//! ```bash
//! cargo test --test invocation_context
//! ```

use callinfo_engine::{
    EngineOptions, HolderPolicy, InvocationContext, NativeContext, NativeError, NativeFunction,
    NativeResult, Realm, Value,
};
use callinfo_sdk::{JsString, WellKnownSymbol};

/// Records `is_construct_call`, `this` and `holder` onto the receiver.
/// Default (strict) holder policy: callers install it before a plain call.
fn inspector() -> NativeFunction {
    NativeFunction::new("inspect", |ctx, info| {
        let this = info.this().clone();
        ctx.set_property(&this, "construct".into(), Value::Bool(info.is_construct_call()))?;
        ctx.set_property(&this, "seen_this".into(), this.clone())?;
        ctx.set_property(&this, "seen_holder".into(), info.holder().clone())?;
        Ok(Value::Undefined)
    })
}

fn identity() -> NativeFunction {
    NativeFunction::new("identity", |_ctx, info| Ok(info.arg(0)?.clone()))
        .with_length(1)
        .with_holder_policy(HolderPolicy::Lenient)
}

fn lenient(
    name: &str,
    handler: impl Fn(&mut dyn NativeContext, &InvocationContext<'_>) -> NativeResult<Value>
        + Send
        + Sync
        + 'static,
) -> NativeFunction {
    NativeFunction::new(name, handler).with_holder_policy(HolderPolicy::Lenient)
}

fn read(realm: &Realm, target: &Value, key: &str) -> Value {
    realm.get(target, &key.into()).unwrap()
}

// ===== Call Kind =====

#[test]
fn test_plain_and_construct_kinds() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();
    let global = Value::Object(realm.global());
    realm.install_method(&global, "inspect", &f).unwrap();

    realm.call(&f, &[]).unwrap();
    assert_eq!(read(&realm, &global, "construct"), Value::Bool(false));

    let instance = realm.construct(&f, &[]).unwrap();
    assert_eq!(read(&realm, &instance, "construct"), Value::Bool(true));
    assert_eq!(read(&realm, &instance, "seen_this"), instance);
}

#[test]
fn test_call_kind_not_spoofed_by_arguments() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();
    let receiver = realm.create_object();
    realm.install_method(&receiver, "inspect", &f).unwrap();

    realm
        .call_with_receiver(&f, receiver.clone(), &[Value::Bool(true), Value::string("new")])
        .unwrap();
    assert_eq!(read(&realm, &receiver, "construct"), Value::Bool(false));
}

// ===== Receiver =====

#[test]
fn test_explicit_receiver_is_identical() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();
    let receiver = realm.create_record([("a", Value::Int(123))]);
    realm.install_method(&receiver, "inspect", &f).unwrap();

    realm.call_with_receiver(&f, receiver.clone(), &[]).unwrap();
    assert_eq!(read(&realm, &receiver, "seen_this"), receiver);
    assert_eq!(read(&realm, &receiver, "seen_holder"), receiver);
}

#[test]
fn test_apply_with_receiver() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();
    let receiver = realm.create_object();
    realm.install_method(&receiver, "inspect", &f).unwrap();
    let list = realm.create_array(vec![Value::Int(1)]);

    realm.apply(&f, receiver.clone(), &list).unwrap();
    assert_eq!(read(&realm, &receiver, "seen_this"), receiver);
}

// ===== Holder =====

#[test]
fn test_holder_is_declaring_ancestor() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();

    let ancestor = realm.create_object();
    realm.install_method(&ancestor, "inspect", &f).unwrap();
    let middle = realm.create_object_with_proto(ancestor.as_object());
    let receiver = realm.create_object_with_proto(middle.as_object());
    realm.set(&receiver, "a", Value::Int(123)).unwrap();
    realm.set(&receiver, "b", Value::string("test")).unwrap();

    realm.call_with_receiver(&f, receiver.clone(), &[]).unwrap();
    assert_eq!(read(&realm, &receiver, "seen_this"), receiver);
    assert_eq!(read(&realm, &receiver, "seen_holder"), ancestor);
    // Fields land on the receiver, never the holder.
    assert_eq!(realm.get_own(&ancestor, &"seen_this".into()).unwrap(), None);
}

#[test]
fn test_holder_through_method_call() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();
    let ancestor = realm.create_object();
    realm.install_method(&ancestor, "inspect", &f).unwrap();
    let receiver = realm.create_object_with_proto(ancestor.as_object());

    realm.invoke_method(&receiver, "inspect", &[]).unwrap();
    assert_eq!(read(&realm, &receiver, "seen_holder"), ancestor);
    assert_eq!(realm.get_own(&ancestor, &"seen_holder".into()).unwrap(), None);
}

#[test]
fn test_undeclared_holder_is_binding_error() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();
    let receiver = realm.create_record([("a", Value::Int(123)), ("b", Value::string("test"))]);

    let err = realm.call_with_receiver(&f, receiver.clone(), &[]).unwrap_err();
    assert_eq!(err.kind(), "BindingError");
    // The adapter never ran.
    assert_eq!(realm.get_own(&receiver, &"seen_holder".into()).unwrap(), None);

    realm.install_method(&receiver, "inspect", &f).unwrap();
    realm.call_with_receiver(&f, receiver.clone(), &[]).unwrap();
    assert_eq!(read(&realm, &receiver, "seen_holder"), receiver);
}

#[test]
fn test_lenient_holder_is_opt_in() {
    let mut realm = Realm::new();
    let f = realm
        .instantiate(&inspector().with_holder_policy(HolderPolicy::Lenient))
        .unwrap();
    let receiver = realm.create_object();

    realm.call_with_receiver(&f, receiver.clone(), &[]).unwrap();
    assert_eq!(read(&realm, &receiver, "seen_holder"), receiver);
}

#[test]
fn test_construct_holder_is_instance() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();

    let instance = realm.construct(&f, &[]).unwrap();
    assert_eq!(read(&realm, &instance, "seen_holder"), instance);
}

#[test]
fn test_bound_function_holder() {
    let mut realm = Realm::new();
    let f = realm.instantiate(&inspector()).unwrap();
    let ancestor = realm.create_object();
    let receiver = realm.create_object_with_proto(ancestor.as_object());
    let bound = realm.bind(&f, receiver.clone(), vec![]).unwrap();
    realm.install_method(&ancestor, "inspect", &bound).unwrap();

    realm.call(&bound, &[]).unwrap();
    assert_eq!(read(&realm, &receiver, "seen_this"), receiver);
    assert_eq!(read(&realm, &receiver, "seen_holder"), ancestor);
}

#[test]
fn test_deep_chain_is_bounded() {
    let options = EngineOptions {
        max_prototype_depth: 4,
        ..EngineOptions::default()
    };
    let mut realm = Realm::with_options(options);
    let f = realm.instantiate(&inspector()).unwrap();

    let mut receiver = realm.create_object();
    for _ in 0..8 {
        receiver = realm.create_object_with_proto(receiver.as_object());
    }
    assert_eq!(
        realm.call_with_receiver(&f, receiver, &[]).unwrap_err(),
        NativeError::PrototypeChainTooDeep { limit: 4 }
    );
}

// ===== Argument Identity =====

#[test]
fn test_identity_primitives() {
    let mut realm = Realm::new();
    let id = realm.instantiate(&identity()).unwrap();

    let values = [
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(0),
        Value::Number(f64::INFINITY),
        Value::Number(f64::NEG_INFINITY),
        Value::Number(std::f64::consts::PI),
        Value::string("abc"),
    ];
    for value in values {
        let out = realm.call(&id, &[value.clone()]).unwrap();
        assert!(out.same_value(&value), "{:?} came back as {:?}", value, out);
    }
}

#[test]
fn test_identity_lazy_string() {
    let mut realm = Realm::new();
    let id = realm.instantiate(&identity()).unwrap();
    let lazy = realm
        .concat(
            &Value::string("aaaaaaaaaaaaaaaaaaaa"),
            &Value::string("bbbbbbbbbbbbbbbbbbbbbbb"),
        )
        .unwrap();
    assert!(lazy.as_string().unwrap().is_lazy());

    let out = realm.call(&id, &[lazy.clone()]).unwrap();
    let (a, b): (&JsString, &JsString) = (out.as_string().unwrap(), lazy.as_string().unwrap());
    assert!(a.ptr_eq(b));
    assert_eq!(a.len(), 43);
}

#[test]
fn test_identity_references() {
    let mut realm = Realm::new();
    let id = realm.instantiate(&identity()).unwrap();

    let token = realm.create_symbol(Some("token"));
    let tag = realm.well_known_symbol(WellKnownSymbol::ToStringTag);
    let record = realm.create_record([("a", Value::Int(123)), ("b", Value::string("test"))]);
    let list = realm.create_array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    for value in [token, tag, record, list] {
        let out = realm.call(&id, &[value.clone()]).unwrap();
        assert_eq!(out, value);
    }
}

#[test]
fn test_identity_foreign_values() {
    let mut realm = Realm::with_options(EngineOptions::default().with_host_interop(true));
    let id = realm.instantiate(&identity()).unwrap();

    let p1 = realm.host_object("Point", (42, 211)).unwrap();
    let p2 = realm.host_object("Point", (42, 211)).unwrap();
    assert_ne!(p1, p2);

    let out1 = realm.call(&id, &[p1.clone()]).unwrap();
    let out2 = realm.call(&id, &[p2.clone()]).unwrap();
    assert_eq!(out1, p1);
    assert_eq!(out2, p2);
    assert_ne!(out1, p2);
    assert_eq!(
        out1.as_foreign().unwrap().downcast_ref::<(i32, i32)>(),
        Some(&(42, 211))
    );
}

// ===== Arity =====

#[test]
fn test_identity_without_arguments() {
    let mut realm = Realm::new();
    let id = realm.instantiate(&identity()).unwrap();
    let err = realm.call(&id, &[]).unwrap_err();
    assert_eq!(
        err,
        NativeError::ArityError {
            function: "identity".to_string(),
            expected: 1,
            got: 0,
        }
    );
}

#[test]
fn test_extra_arguments_are_not_truncated() {
    let mut realm = Realm::new();
    let f = realm
        .instantiate(&lenient("count", |_ctx, info| {
            Ok(Value::Int(info.len() as i32))
        }))
        .unwrap();
    let args = vec![Value::Undefined; 12];
    assert_eq!(realm.call(&f, &args).unwrap(), Value::Int(12));
}

// ===== Array Keys =====

#[test]
fn test_adapter_writes_huge_index_key() {
    let mut realm = Realm::new();
    let writer = realm
        .instantiate(&lenient("write", |ctx, info| {
            let target = info.arg(0)?.clone();
            ctx.set_property(&target, "18446744073709551615".into(), Value::Int(1))?;
            Ok(Value::Undefined)
        }))
        .unwrap();
    let arr = realm.create_array(vec![Value::Int(10), Value::Int(20)]);

    realm.call(&writer, &[arr.clone()]).unwrap();
    assert_eq!(realm.array_len(&arr).unwrap(), 2);
    assert_eq!(read(&realm, &arr, "18446744073709551615"), Value::Int(1));
    assert!(read(&realm, &arr, "01").is_undefined());
}

// ===== Re-entrancy =====

#[test]
fn test_adapter_calls_back_into_realm() {
    let mut realm = Realm::new();
    let id = realm.instantiate(&identity()).unwrap();
    let outer = realm
        .instantiate(&lenient("outer", |ctx, info| {
            let callee = info.arg(0)?.clone();
            ctx.call_function(&callee, Value::Undefined, &info.args()[1..])
        }))
        .unwrap();

    let out = realm.call(&outer, &[id, Value::Int(5)]).unwrap();
    assert_eq!(out, Value::Int(5));
}
