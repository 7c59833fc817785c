//! Addon Adapter Tests
//!
//! Loads the registered adapters into a realm and drives them the way
//! managed code would: plain calls, `new`, `func.call(receiver, ...)`.

use callinfo_addons::arguments::{
    FUNCTION_WITH_ARGUMENTS, HOLDER_VALUE, IDENTITY, IS_CONSTRUCT_CALL, THIS_VALUE,
};
use callinfo_addons::register_addons;
use callinfo_engine::{NativeError, NativeFunctionRegistry, Realm, Value};

fn load() -> (Realm, Value) {
    let mut registry = NativeFunctionRegistry::new();
    register_addons(&mut registry);
    let mut realm = Realm::new();
    let exports = realm.load_exports(&registry).unwrap();
    (realm, exports)
}

fn export(realm: &Realm, exports: &Value, name: &str) -> Value {
    realm.get(exports, &name.into()).unwrap()
}

// ===== Inspecting adapter =====

#[test]
fn test_plain_call_records_false() {
    let (mut realm, exports) = load();
    let func = export(&realm, &exports, FUNCTION_WITH_ARGUMENTS);
    let obj = realm.create_object();
    realm.install_method(&obj, "inspect", &func).unwrap();

    realm.call_with_receiver(&func, obj.clone(), &[]).unwrap();
    assert_eq!(
        realm.get(&obj, &IS_CONSTRUCT_CALL.into()).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(realm.get(&obj, &HOLDER_VALUE.into()).unwrap(), obj);
}

#[test]
fn test_undeclared_receiver_is_binding_error() {
    let (mut realm, exports) = load();
    let func = export(&realm, &exports, FUNCTION_WITH_ARGUMENTS);
    let obj = realm.create_record([("a", Value::Int(123)), ("b", Value::string("test"))]);

    let err = realm.call_with_receiver(&func, obj.clone(), &[]).unwrap_err();
    assert_eq!(
        err,
        NativeError::BindingError {
            function: FUNCTION_WITH_ARGUMENTS.to_string()
        }
    );
    assert!(!realm.has_own(&obj, &HOLDER_VALUE.into()).unwrap());
}

#[test]
fn test_construct_records_true() {
    let (mut realm, exports) = load();
    let func = export(&realm, &exports, FUNCTION_WITH_ARGUMENTS);

    let instance = realm.construct(&func, &[]).unwrap();
    assert_eq!(
        realm.get(&instance, &IS_CONSTRUCT_CALL.into()).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(realm.get(&instance, &THIS_VALUE.into()).unwrap(), instance);
}

#[test]
fn test_method_call_records_exports_holder() {
    let (mut realm, exports) = load();
    let receiver = realm.create_object_with_proto(exports.as_object());

    realm
        .invoke_method(&receiver, FUNCTION_WITH_ARGUMENTS, &[])
        .unwrap();
    assert_eq!(realm.get(&receiver, &THIS_VALUE.into()).unwrap(), receiver);
    assert_eq!(realm.get(&receiver, &HOLDER_VALUE.into()).unwrap(), exports);
}

#[test]
fn test_primitive_receiver_is_rejected() {
    let (mut realm, exports) = load();
    let func = export(&realm, &exports, FUNCTION_WITH_ARGUMENTS);
    let err = realm
        .call_with_receiver(&func, Value::Int(1), &[])
        .unwrap_err();
    assert_eq!(err.kind(), "BindingError");
}

// ===== Identity adapter =====

#[test]
fn test_identity_returns_first_argument() {
    let (mut realm, exports) = load();
    let id = export(&realm, &exports, IDENTITY);
    let record = realm.create_record([("foo", Value::string("bar"))]);

    let out = realm.call(&id, &[record.clone(), Value::Int(2)]).unwrap();
    assert_eq!(out, record);
}

#[test]
fn test_identity_arity_error() {
    let (mut realm, exports) = load();
    let id = export(&realm, &exports, IDENTITY);
    let err = realm.call(&id, &[]).unwrap_err();
    assert_eq!(err.kind(), "ArityError");
    assert_eq!(
        err.to_string(),
        "Arguments_Identity: expected at least 1 argument(s), got 0"
    );
}

#[test]
fn test_identity_is_not_a_constructor() {
    let (mut realm, exports) = load();
    let id = export(&realm, &exports, IDENTITY);
    assert!(matches!(
        realm.construct(&id, &[Value::Int(1)]),
        Err(NativeError::NotConstructor(_))
    ));
}
