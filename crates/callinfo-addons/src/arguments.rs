//! `Arguments_*` adapters
//!
//! `Arguments_FunctionWithArguments` records its call metadata onto the
//! receiver; `Arguments_Identity` hands back its first argument untouched.

use callinfo_sdk::{InvocationContext, NativeContext, NativeObject, NativeResult, Value};

/// Registered name of the inspecting adapter
pub const FUNCTION_WITH_ARGUMENTS: &str = "Arguments_FunctionWithArguments";

/// Registered name of the identity adapter
pub const IDENTITY: &str = "Arguments_Identity";

/// Property receiving `info.is_construct_call()`
pub const IS_CONSTRUCT_CALL: &str = "isConstructCall";

/// Property receiving `info.this()`
pub const THIS_VALUE: &str = "thisValue";

/// Property receiving `info.holder()`
pub const HOLDER_VALUE: &str = "holderValue";

/// Write the call kind, receiver and holder onto the receiver.
///
/// A receiver that is not an object fails with a type mismatch.
pub fn function_with_arguments(
    ctx: &mut dyn NativeContext,
    info: &InvocationContext<'_>,
) -> NativeResult<Value> {
    let mut receiver = NativeObject::wrap(ctx, info.this())?;
    receiver.set(IS_CONSTRUCT_CALL, info.is_construct_call())?;
    receiver.set(THIS_VALUE, info.this().clone())?;
    receiver.set(HOLDER_VALUE, info.holder().clone())?;
    Ok(Value::Undefined)
}

/// Return `arguments[0]` as is
pub fn identity(_ctx: &mut dyn NativeContext, info: &InvocationContext<'_>) -> NativeResult<Value> {
    Ok(info.arg(0)?.clone())
}
