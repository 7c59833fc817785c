//! Function objects: instantiation from registered adapters and `bind`

use callinfo_sdk::{
    NativeError, NativeFunction, NativeFunctionRegistry, NativeResult, ObjectHandle, PropertyKey,
    Value,
};

use crate::heap::{length_value, BoundFunction, FunctionKind, ObjectKind};
use crate::realm::Realm;

impl Realm {
    /// Create a function object for a native adapter.
    ///
    /// The object gets `name` and `length`; constructible functions also get
    /// a fresh `prototype` object whose `constructor` points back. Each call
    /// creates a distinct function object.
    pub fn instantiate(&mut self, native: &NativeFunction) -> NativeResult<Value> {
        let proto = Some(self.function_prototype());
        let func = self
            .heap
            .alloc(proto, ObjectKind::Function(FunctionKind::Native(native.clone())));
        let func_value = Value::Object(func);

        self.set(&func_value, "name", Value::string(native.name()))?;
        self.set(&func_value, "length", length_value(native.length() as usize))?;

        if native.is_constructible() {
            let prototype = self.create_object();
            self.set(&prototype, "constructor", func_value.clone())?;
            self.set(&func_value, "prototype", prototype)?;
        }

        tracing::trace!(function = native.name(), handle = ?func, "instantiated native function");
        Ok(func_value)
    }

    /// Instantiate a registered adapter by name
    pub fn instantiate_registered(
        &mut self,
        registry: &NativeFunctionRegistry,
        name: &str,
    ) -> NativeResult<Value> {
        let native = registry
            .get(name)
            .ok_or_else(|| NativeError::ArgumentError(format!("Unknown native function: {}", name)))?;
        self.instantiate(native)
    }

    /// Build an exports object holding one function per registered adapter
    pub fn load_exports(&mut self, registry: &NativeFunctionRegistry) -> NativeResult<Value> {
        let exports = self.create_object();
        for name in registry.names() {
            let func = self.instantiate_registered(registry, name)?;
            self.set(&exports, name, func)?;
        }
        Ok(exports)
    }

    /// Install `function` as an own property of `target`, making `target`
    /// its holder for receivers that inherit from it
    pub fn install_method(
        &mut self,
        target: &Value,
        key: impl Into<PropertyKey>,
        function: &Value,
    ) -> NativeResult<()> {
        if !self.is_callable(function) {
            return Err(NativeError::NotCallable(self.describe(function)));
        }
        self.set(target, key, function.clone())
    }

    /// `Function.prototype.bind`: fix the receiver and leading arguments.
    ///
    /// The bound function is named `"bound <target>"`, has length
    /// `max(0, target.length - args.len())` and is constructible iff the
    /// target is.
    pub fn bind(&mut self, callee: &Value, this: Value, args: Vec<Value>) -> NativeResult<Value> {
        let target = match callee {
            Value::Object(handle) if self.heap.get(*handle)?.is_function() => *handle,
            other => return Err(NativeError::NotCallable(self.describe(other))),
        };

        let target_length = match self.get(callee, &"length".into())? {
            Value::Int(n) => n as i64,
            Value::Number(n) if n.is_finite() => n as i64,
            _ => 0,
        };
        let remaining = (target_length - args.len() as i64).max(0);
        let length = length_value(usize::try_from(remaining).unwrap_or(usize::MAX));
        let name = format!("bound {}", self.function_name(target));

        let proto = self.heap.get(target)?.proto;
        let bound = self.heap.alloc(
            proto,
            ObjectKind::Function(FunctionKind::Bound(BoundFunction {
                target,
                this,
                args,
            })),
        );
        let bound_value = Value::Object(bound);
        self.set(&bound_value, "name", Value::string(&name))?;
        self.set(&bound_value, "length", length)?;
        Ok(bound_value)
    }

    /// Check whether a function object was produced by `bind`
    pub fn is_bound_function(&self, value: &Value) -> bool {
        match value {
            Value::Object(handle) => matches!(
                self.heap.get(*handle).map(|obj| &obj.kind),
                Ok(ObjectKind::Function(FunctionKind::Bound(_)))
            ),
            _ => false,
        }
    }

    /// Name of a function object (its `name` property, or "" if absent)
    pub fn function_name(&self, handle: ObjectHandle) -> String {
        match self.get(&Value::Object(handle), &"name".into()) {
            Ok(Value::String(s)) => s.to_string(),
            _ => String::new(),
        }
    }
}
