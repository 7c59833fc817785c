//! Realm: heap, intrinsics, symbol table and object operations

use std::any::Any;
use std::sync::Arc;

use callinfo_sdk::{
    ForeignHandle, JsString, NativeError, NativeResult, ObjectHandle, PropertyKey, SymbolId,
    Value, WellKnownSymbol,
};

use crate::heap::{array_index, FunctionKind, Heap, HeapObject, ObjectKind, MAX_ARRAY_GROWTH};
use crate::options::{EngineOptions, ImplicitReceiver};

/// A realm owns every object reachable by managed code plus the intrinsic
/// prototypes and the global object.
pub struct Realm {
    pub(crate) heap: Heap,
    symbols: Vec<Option<Arc<str>>>,
    pub(crate) options: EngineOptions,
    global: ObjectHandle,
    object_prototype: ObjectHandle,
    function_prototype: ObjectHandle,
    array_prototype: ObjectHandle,
    pub(crate) call_depth: usize,
}

impl Realm {
    /// Create a realm with default options
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create a realm with specific options
    pub fn with_options(options: EngineOptions) -> Self {
        let mut heap = Heap::new();
        let object_prototype = heap.alloc(None, ObjectKind::Ordinary);
        let function_prototype = heap.alloc(Some(object_prototype), ObjectKind::Ordinary);
        let array_prototype = heap.alloc(Some(object_prototype), ObjectKind::Ordinary);
        let global = heap.alloc(Some(object_prototype), ObjectKind::Ordinary);

        let symbols: Vec<Option<Arc<str>>> = WellKnownSymbol::ALL
            .iter()
            .map(|sym| Some(Arc::from(sym.description())))
            .collect();

        tracing::debug!(?options, "realm created");

        Self {
            heap,
            symbols,
            options,
            global,
            object_prototype,
            function_prototype,
            array_prototype,
            call_depth: 0,
        }
    }

    /// Options this realm was created with
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Object heap (read-only)
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The global object
    pub fn global(&self) -> ObjectHandle {
        self.global
    }

    /// `Object.prototype`
    pub fn object_prototype(&self) -> ObjectHandle {
        self.object_prototype
    }

    /// `Function.prototype`
    pub fn function_prototype(&self) -> ObjectHandle {
        self.function_prototype
    }

    /// `Array.prototype`
    pub fn array_prototype(&self) -> ObjectHandle {
        self.array_prototype
    }

    /// Receiver used for plain calls without an explicit one
    pub fn implicit_receiver(&self) -> Value {
        match self.options.implicit_receiver {
            ImplicitReceiver::Global => Value::Object(self.global),
            ImplicitReceiver::Undefined => Value::Undefined,
        }
    }

    // ========================================================================
    // Value Creation
    // ========================================================================

    /// Allocate an empty object inheriting from `Object.prototype`
    pub fn create_object(&mut self) -> Value {
        Value::Object(self.heap.alloc(Some(self.object_prototype), ObjectKind::Ordinary))
    }

    /// Allocate an empty object with an explicit prototype
    pub fn create_object_with_proto(&mut self, proto: Option<ObjectHandle>) -> Value {
        Value::Object(self.heap.alloc(proto, ObjectKind::Ordinary))
    }

    /// Allocate a record with the given own properties (`{a: 123, b: "test"}`)
    pub fn create_record<K, I>(&mut self, fields: I) -> Value
    where
        K: Into<PropertyKey>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let properties = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Object(self.heap.alloc_with(
            Some(self.object_prototype),
            ObjectKind::Ordinary,
            properties,
        ))
    }

    /// Allocate an array (`[1, 2, 3]`)
    pub fn create_array(&mut self, items: Vec<Value>) -> Value {
        Value::Object(self.heap.alloc(Some(self.array_prototype), ObjectKind::Array(items)))
    }

    /// Concatenate two strings (`a + b`), producing a lazy string when the
    /// result reaches `lazy_string_min_length`
    pub fn concat(&self, left: &Value, right: &Value) -> NativeResult<Value> {
        match (left, right) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(JsString::concat(
                a,
                b,
                self.options.lazy_string_min_length,
            ))),
            (Value::String(_), other) | (other, _) => {
                Err(NativeError::mismatch("string", other.type_name()))
            }
        }
    }

    /// Create a fresh unique symbol (`Symbol(description)`)
    pub fn create_symbol(&mut self, description: Option<&str>) -> Value {
        let id = SymbolId::from_index(self.symbols.len() as u32);
        self.symbols.push(description.map(Arc::from));
        Value::Symbol(id)
    }

    /// A well-known symbol (`Symbol.toStringTag`, ...)
    pub fn well_known_symbol(&self, symbol: WellKnownSymbol) -> Value {
        Value::Symbol(symbol.id())
    }

    /// Description of a symbol
    pub fn symbol_description(&self, id: SymbolId) -> Option<&str> {
        self.symbols
            .get(id.index() as usize)
            .and_then(|d| d.as_deref())
    }

    /// Check whether foreign host values can be created in this realm
    pub fn has_host_interop(&self) -> bool {
        self.options.host_interop
    }

    /// Wrap a host value as an opaque foreign value
    pub fn host_object<T: Any + Send + Sync>(&self, type_name: &str, value: T) -> NativeResult<Value> {
        if !self.options.host_interop {
            return Err(NativeError::HostInteropDisabled);
        }
        Ok(Value::Foreign(ForeignHandle::new(type_name, value)))
    }

    // ========================================================================
    // Object Operations
    // ========================================================================

    pub(crate) fn object(&self, value: &Value) -> NativeResult<(ObjectHandle, &HeapObject)> {
        match value {
            Value::Object(handle) => Ok((*handle, self.heap.get(*handle)?)),
            other => Err(NativeError::mismatch("object", other.type_name())),
        }
    }

    /// Read a property, walking the lookup chain. Missing properties and
    /// primitive targets other than null/undefined read as `undefined`.
    pub fn get(&self, target: &Value, key: &PropertyKey) -> NativeResult<Value> {
        let start = match target {
            Value::Object(handle) => *handle,
            Value::Undefined | Value::Null => {
                return Err(NativeError::mismatch("object", target.type_name()))
            }
            _ => return Ok(Value::Undefined),
        };
        for scope in self.heap.chain(start, self.options.max_prototype_depth) {
            if let Some(value) = self.heap.get(scope?)?.get_own(key) {
                return Ok(value);
            }
        }
        Ok(Value::Undefined)
    }

    /// Read an own property without walking the chain
    pub fn get_own(&self, target: &Value, key: &PropertyKey) -> NativeResult<Option<Value>> {
        let (_, obj) = self.object(target)?;
        Ok(obj.get_own(key))
    }

    /// Check for an own property
    pub fn has_own(&self, target: &Value, key: &PropertyKey) -> NativeResult<bool> {
        let (_, obj) = self.object(target)?;
        Ok(obj.has_own(key))
    }

    /// Define or overwrite an own data property
    pub fn set(&mut self, target: &Value, key: impl Into<PropertyKey>, value: Value) -> NativeResult<()> {
        let handle = match target {
            Value::Object(handle) => *handle,
            other => return Err(NativeError::mismatch("object", other.type_name())),
        };
        let key = key.into();
        let obj = self.heap.get_mut(handle)?;
        if let (ObjectKind::Array(items), PropertyKey::String(name)) = (&mut obj.kind, &key) {
            if let Some(index) = array_index(name) {
                if index >= items.len() {
                    if index - items.len() > MAX_ARRAY_GROWTH {
                        return Err(NativeError::ArgumentError(format!(
                            "array index {} is too far past length {}",
                            index,
                            items.len()
                        )));
                    }
                    items.resize(index, Value::Undefined);
                    items.push(value);
                } else {
                    items[index] = value;
                }
                return Ok(());
            }
        }
        obj.properties.insert(key, value);
        Ok(())
    }

    /// Prototype of an object
    pub fn prototype_of(&self, target: &Value) -> NativeResult<Option<ObjectHandle>> {
        let (_, obj) = self.object(target)?;
        Ok(obj.proto)
    }

    /// Replace an object's prototype. Cyclic chains are rejected.
    pub fn set_prototype(&mut self, target: &Value, proto: Option<ObjectHandle>) -> NativeResult<()> {
        let (handle, _) = self.object(target)?;
        if let Some(start) = proto {
            for scope in self.heap.chain(start, self.options.max_prototype_depth) {
                if scope? == handle {
                    return Err(NativeError::ArgumentError(
                        "cyclic prototype chain".to_string(),
                    ));
                }
            }
        }
        self.heap.get_mut(handle)?.proto = proto;
        Ok(())
    }

    /// Array length
    pub fn array_len(&self, target: &Value) -> NativeResult<usize> {
        match self.object(target)?.1.kind {
            ObjectKind::Array(ref items) => Ok(items.len()),
            _ => Err(NativeError::mismatch("array", self.type_of(target))),
        }
    }

    /// Array element at index
    pub fn array_get(&self, target: &Value, index: usize) -> NativeResult<Value> {
        match self.object(target)?.1.kind {
            ObjectKind::Array(ref items) => Ok(items.get(index).cloned().unwrap_or_default()),
            _ => Err(NativeError::mismatch("array", self.type_of(target))),
        }
    }

    /// `typeof` result
    pub fn type_of(&self, value: &Value) -> &'static str {
        match value {
            Value::Null => "object",
            Value::Object(handle) => match self.heap.get(*handle) {
                Ok(obj) if obj.is_function() => "function",
                _ => "object",
            },
            other => other.type_name(),
        }
    }

    /// Check whether a value is a function object
    pub fn is_callable(&self, value: &Value) -> bool {
        self.type_of(value) == "function"
    }

    /// Check whether `new` may target a value
    pub fn is_constructor(&self, value: &Value) -> bool {
        let mut current = match value {
            Value::Object(handle) => *handle,
            _ => return false,
        };
        // Bound functions are constructible iff their target is.
        for _ in 0..self.options.max_call_depth {
            match self.heap.get(current).map(|obj| &obj.kind) {
                Ok(ObjectKind::Function(FunctionKind::Native(native))) => {
                    return native.is_constructible()
                }
                Ok(ObjectKind::Function(FunctionKind::Bound(bound))) => current = bound.target,
                _ => return false,
            }
        }
        false
    }

    /// Short description of a value for error messages
    pub fn describe(&self, value: &Value) -> String {
        match value {
            Value::String(s) => format!("\"{}\"", s),
            Value::Int(i) => i.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Symbol(id) => match self.symbol_description(*id) {
                Some(desc) => format!("Symbol({})", desc),
                None => "Symbol()".to_string(),
            },
            Value::Object(handle) => match self.heap.get(*handle).map(|obj| &obj.kind) {
                Ok(ObjectKind::Function(_)) => format!("function {}", self.function_name(*handle)),
                Ok(ObjectKind::Array(_)) => "array".to_string(),
                _ => "object".to_string(),
            },
            Value::Foreign(handle) => format!("foreign {}", handle.type_name()),
            other => other.type_name().to_string(),
        }
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}
