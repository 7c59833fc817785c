//! Object heap and lookup chains
//!
//! Objects live in an arena indexed by `ObjectHandle`. Handles are never
//! reused within a realm, so handle equality is object identity.

use callinfo_sdk::{NativeError, NativeFunction, NativeResult, ObjectHandle, PropertyKey, Value};
use rustc_hash::FxHashMap;

/// Largest array index; `2^32 - 1` itself is an ordinary property name
pub const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// Most holes a single index write may open past the end of an array
pub const MAX_ARRAY_GROWTH: usize = 1 << 20;

/// Parse a canonical array index.
///
/// Only the decimal form `index.to_string()` would produce counts, so `"01"`
/// and `"+1"` stay ordinary property names.
pub fn array_index(name: &str) -> Option<usize> {
    let index: u32 = name.parse().ok()?;
    if index > MAX_ARRAY_INDEX || index.to_string() != name {
        return None;
    }
    usize::try_from(index).ok()
}

/// Array `length` as a value, widening to `Number` past `i32::MAX`
pub fn length_value(len: usize) -> Value {
    match i32::try_from(len) {
        Ok(n) => Value::Int(n),
        Err(_) => Value::Number(len as f64),
    }
}

/// Bound function record created by `bind`
#[derive(Debug, Clone)]
pub struct BoundFunction {
    /// Function being wrapped (native or another bound function)
    pub target: ObjectHandle,
    /// Receiver used for plain calls
    pub this: Value,
    /// Arguments prepended to every call
    pub args: Vec<Value>,
}

/// Callable object payload
#[derive(Debug, Clone)]
pub enum FunctionKind {
    /// Registered native adapter
    Native(NativeFunction),
    /// Result of `bind`
    Bound(BoundFunction),
}

/// Object payload
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Plain record
    Ordinary,
    /// Ordered sequence
    Array(Vec<Value>),
    /// Function object
    Function(FunctionKind),
}

/// Heap object: prototype link, own data properties and payload
#[derive(Debug, Clone)]
pub struct HeapObject {
    /// Next scope on the lookup chain
    pub proto: Option<ObjectHandle>,
    /// Own data properties
    pub properties: FxHashMap<PropertyKey, Value>,
    /// Payload
    pub kind: ObjectKind,
}

impl HeapObject {
    /// Create an object with no own properties
    pub fn new(proto: Option<ObjectHandle>, kind: ObjectKind) -> Self {
        Self {
            proto,
            properties: FxHashMap::default(),
            kind,
        }
    }

    /// Own property lookup. Arrays expose `length` and index keys.
    pub fn get_own(&self, key: &PropertyKey) -> Option<Value> {
        if let (ObjectKind::Array(items), PropertyKey::String(name)) = (&self.kind, key) {
            if &**name == "length" {
                return Some(length_value(items.len()));
            }
            if let Some(index) = array_index(name) {
                return items.get(index).cloned();
            }
        }
        self.properties.get(key).cloned()
    }

    /// Check for an own property
    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.get_own(key).is_some()
    }

    /// Check if any own property holds one of `functions`.
    ///
    /// Only data slots are inspected; nothing user-visible runs.
    pub fn declares(&self, functions: &[ObjectHandle]) -> bool {
        self.properties
            .values()
            .any(|v| matches!(v, Value::Object(h) if functions.contains(h)))
    }

    /// Check if this object is callable
    pub fn is_function(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }
}

/// Arena of heap objects
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<HeapObject>,
}

impl Heap {
    /// Create an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an object and return its handle
    pub fn alloc(&mut self, proto: Option<ObjectHandle>, kind: ObjectKind) -> ObjectHandle {
        let handle = ObjectHandle::from_index(self.objects.len() as u32);
        self.objects.push(HeapObject::new(proto, kind));
        handle
    }

    /// Allocate an object with initial own properties
    pub fn alloc_with(
        &mut self,
        proto: Option<ObjectHandle>,
        kind: ObjectKind,
        properties: FxHashMap<PropertyKey, Value>,
    ) -> ObjectHandle {
        let handle = ObjectHandle::from_index(self.objects.len() as u32);
        self.objects.push(HeapObject {
            proto,
            properties,
            kind,
        });
        handle
    }

    /// Borrow an object
    pub fn get(&self, handle: ObjectHandle) -> NativeResult<&HeapObject> {
        self.objects
            .get(handle.index() as usize)
            .ok_or(NativeError::InvalidHandle(handle.index()))
    }

    /// Mutably borrow an object
    pub fn get_mut(&mut self, handle: ObjectHandle) -> NativeResult<&mut HeapObject> {
        self.objects
            .get_mut(handle.index() as usize)
            .ok_or(NativeError::InvalidHandle(handle.index()))
    }

    /// Number of allocated objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Lookup chain starting at `start` itself, at most `limit` scopes long
    pub fn chain(&self, start: ObjectHandle, limit: usize) -> LookupChain<'_> {
        LookupChain {
            heap: self,
            next: Some(start),
            walked: 0,
            limit,
        }
    }
}

/// Ordered lookup scopes: an object, its prototype, its prototype's
/// prototype, and so on.
///
/// Yields `PrototypeChainTooDeep` once and then stops if the chain is longer
/// than the limit (which also bounds cyclic chains).
pub struct LookupChain<'h> {
    heap: &'h Heap,
    next: Option<ObjectHandle>,
    walked: usize,
    limit: usize,
}

impl Iterator for LookupChain<'_> {
    type Item = NativeResult<ObjectHandle>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if self.walked >= self.limit {
            self.next = None;
            return Some(Err(NativeError::PrototypeChainTooDeep { limit: self.limit }));
        }
        self.walked += 1;
        match self.heap.get(current) {
            Ok(obj) => {
                self.next = obj.proto;
                Some(Ok(current))
            }
            Err(e) => {
                self.next = None;
                Some(Err(e))
            }
        }
    }
}
