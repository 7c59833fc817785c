//! Callinfo Runtime
//!
//! Binds the engine with the native addons: builds a realm from
//! `RuntimeOptions`, registers every addon adapter and loads them as an
//! exports object. Also ships the conformance scenarios run by the CLI.

#![warn(missing_docs)]

pub mod conformance;
pub mod error;
pub mod options;

use callinfo_engine::{NativeError, NativeFunctionRegistry, NativeResult, Realm, Value};

pub use conformance::{run, CaseOutcome, CaseResult, Report};
pub use error::RuntimeError;
pub use options::{RuntimeOptions, DEFAULT_CONFIG_FILE};

/// A realm with the addon unit loaded.
pub struct Runtime {
    realm: Realm,
    registry: NativeFunctionRegistry,
    exports: Value,
}

impl Runtime {
    /// Create a realm from `options` and load the addon unit into it
    pub fn new(options: &RuntimeOptions) -> Result<Self, RuntimeError> {
        let mut registry = NativeFunctionRegistry::new();
        callinfo_addons::register_addons(&mut registry);

        let mut realm = Realm::with_options(options.engine.clone());
        let exports = realm.load_exports(&registry)?;
        tracing::debug!(functions = registry.len(), "addon unit loaded");

        Ok(Self {
            realm,
            registry,
            exports,
        })
    }

    /// The realm
    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    /// The realm, mutably
    pub fn realm_mut(&mut self) -> &mut Realm {
        &mut self.realm
    }

    /// Registered adapters
    pub fn registry(&self) -> &NativeFunctionRegistry {
        &self.registry
    }

    /// Exports object of the addon unit
    pub fn exports(&self) -> &Value {
        &self.exports
    }

    /// Exported function by registered name
    pub fn export(&self, name: &str) -> NativeResult<Value> {
        match self.realm.get(&self.exports, &name.into())? {
            Value::Undefined => Err(NativeError::ArgumentError(format!(
                "Unknown export: {}",
                name
            ))),
            value => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_loads_addons() {
        let runtime = Runtime::new(&RuntimeOptions::default()).unwrap();
        assert_eq!(runtime.registry().len(), 2);
        let identity = runtime.export("Arguments_Identity").unwrap();
        assert!(runtime.realm().is_callable(&identity));
        assert!(runtime.export("Arguments_Missing").is_err());
    }
}
