//! Callinfo Addons
//!
//! Native adapters that expose what they observe through their
//! `InvocationContext`. They depend on the SDK alone and are registered by
//! symbolic name into a `NativeFunctionRegistry`.

#![warn(missing_docs)]

pub mod arguments;
pub mod registry;

pub use registry::register_addons;
