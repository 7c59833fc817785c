//! Callinfo Engine
//!
//! The embedding layer between managed code and native adapters:
//! - **Heap**: object arena with prototype links (`heap` module)
//! - **Realm**: intrinsics, symbols and object operations (`realm` module)
//! - **Dispatch**: plain, explicit-receiver and construct calls (`dispatch` module)
//! - **Holder resolution**: lookup-chain walk for the declaring scope (`holder` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use callinfo_engine::Realm;
//! use callinfo_sdk::{HolderPolicy, NativeFunction, Value};
//!
//! let mut realm = Realm::new();
//! let first = NativeFunction::new("first", |_ctx, info| Ok(info.arg(0)?.clone()))
//!     .with_holder_policy(HolderPolicy::Lenient);
//! let f = realm.instantiate(&first)?;
//! let out = realm.call(&f, &[Value::Int(1)])?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod heap;
pub mod holder;
pub mod options;
pub mod realm;

mod context;
mod dispatch;
mod export;
mod function;

pub use heap::{
    array_index, BoundFunction, FunctionKind, Heap, HeapObject, LookupChain, ObjectKind,
    MAX_ARRAY_GROWTH, MAX_ARRAY_INDEX,
};
pub use holder::resolve_holder;
pub use options::{EngineOptions, ImplicitReceiver};
pub use realm::Realm;

// Re-export SDK types so embedders need a single dependency
pub use callinfo_sdk::{
    CallKind, ForeignHandle, HolderPolicy, InvocationContext, JsString, NativeContext,
    NativeError, NativeFunction, NativeFunctionRegistry, NativeResult, ObjectHandle, PropertyKey,
    SymbolId, Value, WellKnownSymbol,
};
