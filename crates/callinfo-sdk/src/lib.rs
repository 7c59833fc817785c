//! Callinfo SDK - Lightweight SDK for writing native adapters
//!
//! This crate provides the value model, the per-call invocation context and
//! the registration types needed to write native functions without depending
//! on the full callinfo-engine.
//!
//! # Example
//!
//! ```ignore
//! use callinfo_sdk::{NativeFunction, NativeFunctionRegistry};
//!
//! let mut registry = NativeFunctionRegistry::new();
//! registry.register(
//!     NativeFunction::new("unit.first", |_ctx, info| Ok(info.arg(0)?.clone()))
//!         .with_length(1),
//! );
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod convert;
pub mod error;
pub mod handler;
pub mod string;
pub mod types;
pub mod value;

pub use context::{CallKind, InvocationContext, NativeContext};
pub use convert::{FromValue, ToValue};
pub use error::{NativeError, NativeResult};
pub use handler::{HolderPolicy, NativeFunction, NativeFunctionRegistry, NativeHandlerFn};
pub use string::JsString;
pub use types::{NativeArray, NativeObject};
pub use value::{ForeignHandle, ObjectHandle, PropertyKey, SymbolId, Value, WellKnownSymbol};
