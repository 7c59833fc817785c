//! Invocation context and the abstract engine interface
//!
//! `InvocationContext` is the per-call snapshot handed to a native adapter.
//! `NativeContext` is the set of engine operations an adapter may perform;
//! the engine's realm implements it, so adapters never depend on engine
//! internals.

use crate::error::{NativeError, NativeResult};
use crate::value::{ObjectHandle, PropertyKey, SymbolId, Value};

/// How the native function was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// `f(...)`, `obj.f(...)`, `f.call(this, ...)`
    Plain,
    /// `new F(...)`
    Construct,
}

/// Immutable snapshot of calling metadata for one native call.
///
/// Built by the engine immediately before the adapter runs and dropped when
/// it returns. `receiver` and `holder` are handles into the caller's heap;
/// the context does not own them.
#[derive(Debug)]
pub struct InvocationContext<'a> {
    kind: CallKind,
    callee: ObjectHandle,
    name: &'a str,
    receiver: Value,
    holder: Value,
    args: &'a [Value],
}

impl<'a> InvocationContext<'a> {
    /// Create a context. Called by the engine only.
    pub fn new(
        kind: CallKind,
        callee: ObjectHandle,
        name: &'a str,
        receiver: Value,
        holder: Value,
        args: &'a [Value],
    ) -> Self {
        Self {
            kind,
            callee,
            name,
            receiver,
            holder,
            args,
        }
    }

    /// Call kind
    #[inline]
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// Check if the call used construction syntax
    #[inline]
    pub fn is_construct_call(&self) -> bool {
        self.kind == CallKind::Construct
    }

    /// The native function object being invoked
    #[inline]
    pub fn callee(&self) -> ObjectHandle {
        self.callee
    }

    /// Registered name of the native function
    #[inline]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Dynamic receiver (`this`). For construct calls, the new instance.
    #[inline]
    pub fn this(&self) -> &Value {
        &self.receiver
    }

    /// Object on the receiver's lookup chain that declares the callee
    #[inline]
    pub fn holder(&self) -> &Value {
        &self.holder
    }

    /// Number of call-site arguments
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if no arguments were supplied
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// All call-site arguments in order
    #[inline]
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Argument at `index`, or `undefined` past the end
    pub fn get(&self, index: usize) -> Value {
        self.args.get(index).cloned().unwrap_or(Value::Undefined)
    }

    /// Required argument at `index`
    pub fn arg(&self, index: usize) -> NativeResult<&'a Value> {
        self.args.get(index).ok_or_else(|| NativeError::ArityError {
            function: self.name.to_string(),
            expected: index + 1,
            got: self.args.len(),
        })
    }
}

/// Abstract engine operations available to native adapters.
pub trait NativeContext {
    // ========================================================================
    // Value Creation
    // ========================================================================

    /// Allocate an empty ordinary object
    fn create_object(&mut self) -> Value;

    /// Allocate an array holding `items` in order
    fn create_array(&mut self, items: Vec<Value>) -> Value;

    /// Create a string, honoring the realm's lazy concatenation threshold
    fn concat_strings(&mut self, left: &Value, right: &Value) -> NativeResult<Value>;

    // ========================================================================
    // Object Operations
    // ========================================================================

    /// Read a property, walking the prototype chain
    fn get_property(&self, target: &Value, key: &PropertyKey) -> NativeResult<Value>;

    /// Define or overwrite an own data property
    fn set_property(&mut self, target: &Value, key: PropertyKey, value: Value) -> NativeResult<()>;

    /// Check for an own property without walking the chain
    fn has_own_property(&self, target: &Value, key: &PropertyKey) -> NativeResult<bool>;

    /// Prototype of an object (`None` at the end of the chain)
    fn prototype_of(&self, target: &Value) -> NativeResult<Option<ObjectHandle>>;

    /// `typeof` result for a value
    fn type_of(&self, value: &Value) -> &'static str;

    /// Description of a symbol, if it has one
    fn symbol_description(&self, id: SymbolId) -> Option<String>;

    // ========================================================================
    // Array Operations
    // ========================================================================

    /// Array length
    fn array_len(&self, target: &Value) -> NativeResult<usize>;

    /// Array element at index (`undefined` past the end)
    fn array_get(&self, target: &Value, index: usize) -> NativeResult<Value>;

    // ========================================================================
    // Function Execution
    // ========================================================================

    /// Call a function with an explicit receiver (re-entrant)
    fn call_function(&mut self, callee: &Value, this: Value, args: &[Value]) -> NativeResult<Value>;
}
