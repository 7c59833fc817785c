//! Native function registration
//!
//! Adapters are registered by symbolic name together with the metadata the
//! engine needs to turn them into function objects: declared arity,
//! constructibility and how the holder is resolved.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::{InvocationContext, NativeContext};
use crate::error::NativeResult;
use crate::value::Value;

/// A native function handler
pub type NativeHandlerFn =
    Arc<dyn Fn(&mut dyn NativeContext, &InvocationContext<'_>) -> NativeResult<Value> + Send + Sync>;

/// How the engine resolves the holder when building an invocation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HolderPolicy {
    /// A declaring object must exist on the receiver's chain; otherwise the
    /// call fails with `BindingError`.
    #[default]
    Strict,
    /// Opt-in: first declaring object on the receiver's chain, or the
    /// receiver itself when the function is not installed on that chain.
    /// For adapters that never read the holder.
    Lenient,
}

/// Registered native function: handler plus call metadata.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    length: u32,
    constructible: bool,
    holder_policy: HolderPolicy,
    handler: NativeHandlerFn,
}

impl NativeFunction {
    /// Create a callable, constructible function with strict holder policy
    pub fn new(
        name: &str,
        handler: impl Fn(&mut dyn NativeContext, &InvocationContext<'_>) -> NativeResult<Value>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            name: Arc::from(name),
            length: 0,
            constructible: true,
            holder_policy: HolderPolicy::default(),
            handler: Arc::new(handler),
        }
    }

    /// Set the declared parameter count (the function's `length`)
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Set whether `new` may target this function
    pub fn constructible(mut self, constructible: bool) -> Self {
        self.constructible = constructible;
        self
    }

    /// Set the holder resolution policy
    pub fn with_holder_policy(mut self, policy: HolderPolicy) -> Self {
        self.holder_policy = policy;
        self
    }

    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter count
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Whether `new` may target this function
    pub fn is_constructible(&self) -> bool {
        self.constructible
    }

    /// Holder resolution policy
    pub fn holder_policy(&self) -> HolderPolicy {
        self.holder_policy
    }

    /// Invoke the handler
    pub fn invoke(
        &self,
        ctx: &mut dyn NativeContext,
        info: &InvocationContext<'_>,
    ) -> NativeResult<Value> {
        (self.handler)(ctx, info)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("length", &self.length)
            .field("constructible", &self.constructible)
            .field("holder_policy", &self.holder_policy)
            .finish_non_exhaustive()
    }
}

/// Registry of native functions indexed by symbolic name.
///
/// Addon crates register their adapters here; the engine instantiates
/// function objects from the registered entries.
#[derive(Default)]
pub struct NativeFunctionRegistry {
    functions: HashMap<String, NativeFunction>,
}

impl NativeFunctionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register a function under its own name, replacing any previous entry
    pub fn register(&mut self, function: NativeFunction) {
        self.functions.insert(function.name().to_string(), function);
    }

    /// Get a function by name
    pub fn get(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.get(name)
    }

    /// Check if a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for NativeFunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunctionRegistry")
            .field("names", &self.names())
            .finish()
    }
}
