//! Call and construct dispatch
//!
//! Every entry point funnels into `Realm::dispatch`, which resolves bound
//! functions down to their native target, builds the `InvocationContext`
//! and runs the adapter. The context lives on this stack frame only.

use callinfo_sdk::{
    CallKind, InvocationContext, NativeError, NativeFunction, NativeResult, ObjectHandle,
    PropertyKey, Value,
};

use crate::heap::{FunctionKind, ObjectKind};
use crate::holder::resolve_holder;
use crate::realm::Realm;

/// A callee with its bound layers peeled off
struct ResolvedCallee {
    /// Native function object at the bottom of the bound chain
    target: ObjectHandle,
    native: NativeFunction,
    /// Receiver fixed by the innermost bind, if any
    bound_this: Option<Value>,
    /// Bound arguments, innermost first
    bound_args: Vec<Value>,
    /// Every function object on the way down, outermost first
    candidates: Vec<ObjectHandle>,
}

impl Realm {
    /// Plain call without an explicit receiver (`f(...)`)
    pub fn call(&mut self, callee: &Value, args: &[Value]) -> NativeResult<Value> {
        let receiver = self.implicit_receiver();
        self.call_with_receiver(callee, receiver, args)
    }

    /// Plain call with an explicit receiver (`f.call(this, ...)`)
    pub fn call_with_receiver(
        &mut self,
        callee: &Value,
        this: Value,
        args: &[Value],
    ) -> NativeResult<Value> {
        self.dispatch(CallKind::Plain, callee, Some(this), args)
    }

    /// `f.apply(this, list)`: `list` may be null/undefined (no arguments) or
    /// an array supplying the arguments in order
    pub fn apply(&mut self, callee: &Value, this: Value, list: &Value) -> NativeResult<Value> {
        let args = match list {
            Value::Undefined | Value::Null => Vec::new(),
            Value::Object(handle) => match &self.heap.get(*handle)?.kind {
                ObjectKind::Array(items) => items.clone(),
                _ => return Err(NativeError::mismatch("array", self.type_of(list))),
            },
            other => return Err(NativeError::mismatch("array", other.type_name())),
        };
        self.call_with_receiver(callee, this, &args)
    }

    /// Method call (`receiver.key(...)`): look `key` up on the receiver's
    /// chain and call the result with `receiver` as `this`
    pub fn invoke_method(
        &mut self,
        receiver: &Value,
        key: impl Into<PropertyKey>,
        args: &[Value],
    ) -> NativeResult<Value> {
        let callee = self.get(receiver, &key.into())?;
        self.call_with_receiver(&callee, receiver.clone(), args)
    }

    /// Construct call (`new F(...)`).
    ///
    /// The instance inherits from `F.prototype` when that is an object and
    /// from `Object.prototype` otherwise. An object returned by the adapter
    /// replaces the instance.
    pub fn construct(&mut self, callee: &Value, args: &[Value]) -> NativeResult<Value> {
        self.dispatch(CallKind::Construct, callee, None, args)
    }

    fn resolve_callee(&self, callee: &Value) -> NativeResult<ResolvedCallee> {
        let mut current = match callee {
            Value::Object(handle) => *handle,
            other => return Err(NativeError::NotCallable(self.describe(other))),
        };
        let mut bound_this = None;
        let mut bound_args: Vec<Value> = Vec::new();
        let mut candidates = Vec::new();

        for _ in 0..self.options.max_call_depth {
            candidates.push(current);
            match &self.heap.get(current)?.kind {
                ObjectKind::Function(FunctionKind::Native(native)) => {
                    return Ok(ResolvedCallee {
                        target: current,
                        native: native.clone(),
                        bound_this,
                        bound_args,
                        candidates,
                    });
                }
                ObjectKind::Function(FunctionKind::Bound(bound)) => {
                    // Inner layers run later, so their arguments come first
                    // and their receiver wins.
                    bound_this = Some(bound.this.clone());
                    let mut args = bound.args.clone();
                    args.append(&mut bound_args);
                    bound_args = args;
                    current = bound.target;
                }
                _ => return Err(NativeError::NotCallable(self.describe(callee))),
            }
        }
        Err(NativeError::CallStackExceeded {
            limit: self.options.max_call_depth,
        })
    }

    fn dispatch(
        &mut self,
        kind: CallKind,
        callee: &Value,
        this: Option<Value>,
        args: &[Value],
    ) -> NativeResult<Value> {
        let resolved = self.resolve_callee(callee)?;

        if self.call_depth >= self.options.max_call_depth {
            return Err(NativeError::CallStackExceeded {
                limit: self.options.max_call_depth,
            });
        }

        let full_args;
        let args = if resolved.bound_args.is_empty() {
            args
        } else {
            full_args = [resolved.bound_args.as_slice(), args].concat();
            full_args.as_slice()
        };

        let (receiver, holder) = match kind {
            CallKind::Plain => {
                let receiver = match resolved.bound_this {
                    Some(bound) => bound,
                    None => this.unwrap_or_else(|| self.implicit_receiver()),
                };
                let holder = resolve_holder(
                    &self.heap,
                    &receiver,
                    &resolved.candidates,
                    resolved.native.name(),
                    resolved.native.holder_policy(),
                    self.options.max_prototype_depth,
                )?;
                (receiver, holder)
            }
            CallKind::Construct => {
                if !resolved.native.is_constructible() {
                    return Err(NativeError::NotConstructor(self.describe(callee)));
                }
                // The fresh instance is its own holder under every policy; it
                // declares nothing yet, so a chain walk could only fail.
                let instance = self.allocate_instance(resolved.target)?;
                (instance.clone(), instance)
            }
        };

        tracing::trace!(
            kind = ?kind,
            function = resolved.native.name(),
            argc = args.len(),
            depth = self.call_depth,
            "native call"
        );

        let info = InvocationContext::new(
            kind,
            resolved.target,
            resolved.native.name(),
            receiver.clone(),
            holder,
            args,
        );

        self.call_depth += 1;
        let result = resolved.native.invoke(self, &info);
        self.call_depth -= 1;

        match result {
            Ok(value) => match kind {
                CallKind::Construct if !value.is_object() => Ok(receiver),
                _ => Ok(value),
            },
            Err(err) => {
                tracing::debug!(
                    function = resolved.native.name(),
                    kind = err.kind(),
                    error = %err,
                    "native call failed"
                );
                Err(err)
            }
        }
    }

    fn allocate_instance(&mut self, target: ObjectHandle) -> NativeResult<Value> {
        let proto = match self.get(&Value::Object(target), &"prototype".into())? {
            Value::Object(proto) => proto,
            _ => self.object_prototype(),
        };
        Ok(self.create_object_with_proto(Some(proto)))
    }
}
