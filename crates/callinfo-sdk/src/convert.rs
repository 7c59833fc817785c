//! Conversions between `Value` and Rust types.
//!
//! Conversions are strict: no coercion between kinds. A `bool` parameter
//! rejects `0`, a `String` rejects a symbol.

use crate::error::{NativeError, NativeResult};
use crate::string::JsString;
use crate::value::{ForeignHandle, ObjectHandle, SymbolId, Value};

/// Convert from `Value` to a Rust type.
pub trait FromValue: Sized {
    /// Convert, returning `TypeMismatch` if the kind does not match
    fn from_value(value: &Value) -> NativeResult<Self>;
}

/// Convert a Rust type into a `Value`.
pub trait ToValue {
    /// Convert to `Value`
    fn to_value(self) -> Value;
}

fn mismatch<T>(expected: &str, value: &Value) -> NativeResult<T> {
    Err(NativeError::mismatch(expected, value.type_name()))
}

impl FromValue for Value {
    fn from_value(value: &Value) -> NativeResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> NativeResult<Self> {
        match value.as_bool() {
            Some(b) => Ok(b),
            None => mismatch("boolean", value),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> NativeResult<Self> {
        match value.as_number() {
            Some(n) => Ok(n),
            None => mismatch("number", value),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> NativeResult<Self> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::Number(n) if n.fract() == 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64 => {
                Ok(*n as i32)
            }
            _ => mismatch("int", value),
        }
    }
}

impl FromValue for JsString {
    fn from_value(value: &Value) -> NativeResult<Self> {
        match value.as_string() {
            Some(s) => Ok(s.clone()),
            None => mismatch("string", value),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> NativeResult<Self> {
        match value.as_string() {
            Some(s) => Ok(s.flatten().to_string()),
            None => mismatch("string", value),
        }
    }
}

impl FromValue for SymbolId {
    fn from_value(value: &Value) -> NativeResult<Self> {
        match value.as_symbol() {
            Some(id) => Ok(id),
            None => mismatch("symbol", value),
        }
    }
}

impl FromValue for ObjectHandle {
    fn from_value(value: &Value) -> NativeResult<Self> {
        match value.as_object() {
            Some(handle) => Ok(handle),
            None => mismatch("object", value),
        }
    }
}

impl FromValue for ForeignHandle {
    fn from_value(value: &Value) -> NativeResult<Self> {
        match value.as_foreign() {
            Some(handle) => Ok(handle.clone()),
            None => mismatch("foreign", value),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> NativeResult<Self> {
        if value.is_nullish() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

macro_rules! to_value_via_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

to_value_via_from!(bool, i32, f64, &str, JsString, ObjectHandle, SymbolId, ForeignHandle);

impl ToValue for Value {
    fn to_value(self) -> Value {
        self
    }
}

impl ToValue for String {
    fn to_value(self) -> Value {
        Value::String(JsString::from(self))
    }
}

impl ToValue for () {
    fn to_value(self) -> Value {
        Value::Undefined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_conversions() {
        assert!(bool::from_value(&Value::Bool(true)).unwrap());
        assert!(bool::from_value(&Value::Int(1)).is_err());
        assert_eq!(i32::from_value(&Value::Number(7.0)).unwrap(), 7);
        assert!(i32::from_value(&Value::Number(7.5)).is_err());
        assert_eq!(f64::from_value(&Value::Int(3)).unwrap(), 3.0);
        assert_eq!(String::from_value(&Value::string("x")).unwrap(), "x");
    }

    #[test]
    fn test_option_accepts_nullish() {
        assert_eq!(Option::<bool>::from_value(&Value::Undefined).unwrap(), None);
        assert_eq!(Option::<bool>::from_value(&Value::Null).unwrap(), None);
        assert_eq!(Option::<bool>::from_value(&Value::Bool(false)).unwrap(), Some(false));
    }

    #[test]
    fn test_mismatch_names_kind() {
        let err = ObjectHandle::from_value(&Value::Int(1)).unwrap_err();
        assert_eq!(err, NativeError::mismatch("object", "number"));
    }

    #[test]
    fn test_to_value() {
        assert_eq!(true.to_value(), Value::Bool(true));
        assert!(().to_value().is_undefined());
    }
}
