//! Value: closed tagged union passed across the native call boundary
//!
//! ```text
//! primitive kinds:  Undefined | Null | Bool | Int | Number | String | Symbol
//! reference kinds:  Object(ObjectHandle)      compared by handle identity
//! foreign kind:     Foreign(ForeignHandle)    compared by pointer identity
//! ```
//!
//! Moving a `Value` through an invocation context never copies the referent:
//! object handles are indices into the engine heap and foreign handles share
//! the host's allocation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::string::JsString;

/// Non-owning handle to an object in the engine heap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(u32);

impl ObjectHandle {
    /// Create from a raw heap index
    #[inline]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Raw heap index
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique symbol token. Descriptions live in the realm's symbol table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Create from a raw symbol table index
    #[inline]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Raw symbol table index
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Well-known symbols with fixed ids, preallocated by every realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownSymbol {
    /// `Symbol.toStringTag`
    ToStringTag,
    /// `Symbol.iterator`
    Iterator,
    /// `Symbol.hasInstance`
    HasInstance,
}

impl WellKnownSymbol {
    /// All well-known symbols in id order
    pub const ALL: [WellKnownSymbol; 3] = [
        WellKnownSymbol::ToStringTag,
        WellKnownSymbol::Iterator,
        WellKnownSymbol::HasInstance,
    ];

    /// Fixed symbol id
    pub const fn id(self) -> SymbolId {
        SymbolId(self as u32)
    }

    /// Description as reported by `Symbol.prototype.description`
    pub const fn description(self) -> &'static str {
        match self {
            WellKnownSymbol::ToStringTag => "Symbol.toStringTag",
            WellKnownSymbol::Iterator => "Symbol.iterator",
            WellKnownSymbol::HasInstance => "Symbol.hasInstance",
        }
    }
}

/// Opaque handle to a value owned by the host type system.
///
/// The binding layer never downcasts or copies the referent; equality is
/// pointer identity of the shared allocation.
#[derive(Clone)]
pub struct ForeignHandle {
    type_name: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl ForeignHandle {
    /// Wrap a host value
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, value: T) -> Self {
        Self {
            type_name: type_name.into(),
            inner: Arc::new(value),
        }
    }

    /// Host type name this handle was created with
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the host value. Only the host side should call this.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Check whether both handles refer to the same host allocation
    pub fn ptr_eq(&self, other: &ForeignHandle) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.inner) as *const (),
            Arc::as_ptr(&other.inner) as *const (),
        )
    }
}

impl PartialEq for ForeignHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ForeignHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Foreign({}@{:p})",
            self.type_name,
            Arc::as_ptr(&self.inner) as *const ()
        )
    }
}

/// Property key: string or symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String-keyed property
    String(Arc<str>),
    /// Symbol-keyed property
    Symbol(SymbolId),
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(Arc::from(s))
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::String(Arc::from(s))
    }
}

impl From<SymbolId> for PropertyKey {
    fn from(id: SymbolId) -> Self {
        PropertyKey::Symbol(id)
    }
}

impl From<WellKnownSymbol> for PropertyKey {
    fn from(sym: WellKnownSymbol) -> Self {
        PropertyKey::Symbol(sym.id())
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => f.write_str(s),
            PropertyKey::Symbol(id) => write!(f, "[{:?}]", id),
        }
    }
}

/// A value visible to managed code and native adapters.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Small integer representation of a number
    Int(i32),
    /// IEEE 754 double
    Number(f64),
    /// String (flat or lazy)
    String(JsString),
    /// Unique symbol token
    Symbol(SymbolId),
    /// Heap object: record, array or function
    Object(ObjectHandle),
    /// Host-owned opaque value
    Foreign(ForeignHandle),
}

impl Value {
    /// Create a string value
    pub fn string(s: &str) -> Self {
        Value::String(JsString::new(s))
    }

    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is null or undefined
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if value is a heap object
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if value is compared by identity rather than by value
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Foreign(_))
    }

    /// Extract boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract a number from either numeric representation
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string
    pub fn as_string(&self) -> Option<&JsString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract symbol id
    pub fn as_symbol(&self) -> Option<SymbolId> {
        match self {
            Value::Symbol(id) => Some(*id),
            _ => None,
        }
    }

    /// Extract object handle
    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            Value::Object(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Extract foreign handle
    pub fn as_foreign(&self) -> Option<&ForeignHandle> {
        match self {
            Value::Foreign(handle) => Some(handle),
            _ => None,
        }
    }

    /// Kind name, close to `typeof` but without consulting the heap
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(_) => "object",
            Value::Foreign(_) => "foreign",
        }
    }

    /// Strict equality (`===`).
    ///
    /// Numbers compare numerically across `Int`/`Number`, NaN is unequal to
    /// itself, strings compare by content, objects and foreign values by
    /// identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Foreign(a), Value::Foreign(b)) => a.ptr_eq(b),
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// SameValue (`Object.is`): like strict equality, but NaN equals NaN and
    /// `+0` differs from `-0`.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(x), Some(y)) => {
                if x.is_nan() && y.is_nan() {
                    true
                } else {
                    x == y && x.is_sign_negative() == y.is_sign_negative()
                }
            }
            _ => self.strict_equals(other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<JsString> for Value {
    fn from(s: JsString) -> Self {
        Value::String(s)
    }
}

impl From<ObjectHandle> for Value {
    fn from(handle: ObjectHandle) -> Self {
        Value::Object(handle)
    }
}

impl From<SymbolId> for Value {
    fn from(id: SymbolId) -> Self {
        Value::Symbol(id)
    }
}

impl From<ForeignHandle> for Value {
    fn from(handle: ForeignHandle) -> Self {
        Value::Foreign(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality() {
        assert!(Value::Int(0).strict_equals(&Value::Number(0.0)));
        assert!(Value::Number(f64::INFINITY).strict_equals(&Value::Number(f64::INFINITY)));
        assert!(!Value::Number(f64::INFINITY).strict_equals(&Value::Number(f64::NEG_INFINITY)));
        assert!(!Value::Number(f64::NAN).strict_equals(&Value::Number(f64::NAN)));
        assert!(Value::Number(f64::NAN).same_value(&Value::Number(f64::NAN)));
        assert!(Value::Int(0).strict_equals(&Value::Number(-0.0)));
        assert!(!Value::Int(0).same_value(&Value::Number(-0.0)));
    }

    #[test]
    fn test_objects_compare_by_handle() {
        let a = Value::Object(ObjectHandle::from_index(3));
        let b = Value::Object(ObjectHandle::from_index(3));
        let c = Value::Object(ObjectHandle::from_index(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_reference());
    }

    #[test]
    fn test_foreign_identity() {
        #[derive(Debug, PartialEq)]
        struct Point(i32, i32);

        let a = ForeignHandle::new("Point", Point(42, 211));
        let b = ForeignHandle::new("Point", Point(42, 211));
        let a2 = a.clone();

        assert_eq!(Value::Foreign(a.clone()), Value::Foreign(a2));
        assert_ne!(Value::Foreign(a.clone()), Value::Foreign(b));
        assert_eq!(a.downcast_ref::<Point>(), Some(&Point(42, 211)));
        assert_eq!(a.type_name(), "Point");
    }

    #[test]
    fn test_kinds_never_cross_compare() {
        assert_ne!(Value::Bool(false), Value::Int(0));
        assert_ne!(Value::string("0"), Value::Int(0));
        assert_ne!(Value::Null, Value::Undefined);
        assert_ne!(
            Value::Symbol(WellKnownSymbol::ToStringTag.id()),
            Value::Symbol(WellKnownSymbol::Iterator.id())
        );
    }

    #[test]
    fn test_well_known_ids_are_dense() {
        for (i, sym) in WellKnownSymbol::ALL.iter().enumerate() {
            assert_eq!(sym.id().index() as usize, i);
        }
    }
}
