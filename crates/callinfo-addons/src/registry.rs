//! Symbolic registration of the addon adapters
//!
//! Registers every adapter by name (e.g. "Arguments_Identity") into a
//! `NativeFunctionRegistry`. The engine instantiates one function object per
//! entry when the addon unit is loaded.

use callinfo_sdk::{HolderPolicy, NativeFunction, NativeFunctionRegistry};

use crate::arguments;

/// Register all addon adapters into the given registry.
pub fn register_addons(registry: &mut NativeFunctionRegistry) {
    register_arguments(registry);
}

/// Register the `Arguments_*` adapters
fn register_arguments(registry: &mut NativeFunctionRegistry) {
    registry.register(NativeFunction::new(
        arguments::FUNCTION_WITH_ARGUMENTS,
        arguments::function_with_arguments,
    ));
    // Identity never reads its holder, so it may be called from anywhere.
    registry.register(
        NativeFunction::new(arguments::IDENTITY, arguments::identity)
            .with_length(1)
            .constructible(false)
            .with_holder_policy(HolderPolicy::Lenient),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_addons() {
        let mut registry = NativeFunctionRegistry::new();
        register_addons(&mut registry);

        assert_eq!(
            registry.names(),
            vec!["Arguments_FunctionWithArguments", "Arguments_Identity"]
        );
        let identity = registry.get(arguments::IDENTITY).unwrap();
        assert_eq!(identity.length(), 1);
        assert!(!identity.is_constructible());
        assert_eq!(identity.holder_policy(), HolderPolicy::Lenient);

        let inspect = registry.get(arguments::FUNCTION_WITH_ARGUMENTS).unwrap();
        assert!(inspect.is_constructible());
        assert_eq!(inspect.holder_policy(), HolderPolicy::Strict);
    }
}
