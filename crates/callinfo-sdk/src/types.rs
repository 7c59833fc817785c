//! Wrapper types for object and array values
//!
//! These give adapters named, typed access to heap values through the
//! `NativeContext` trait without depending on engine internals.

use crate::context::NativeContext;
use crate::convert::{FromValue, ToValue};
use crate::error::{NativeError, NativeResult};
use crate::value::{ObjectHandle, PropertyKey, Value};

// ============================================================================
// NativeObject
// ============================================================================

/// Wrapper for an object value with named property access.
pub struct NativeObject<'a> {
    handle: ObjectHandle,
    value: Value,
    ctx: &'a mut dyn NativeContext,
}

impl<'a> NativeObject<'a> {
    /// Wrap a value as an object. Returns error if not an object.
    pub fn wrap(ctx: &'a mut dyn NativeContext, val: &Value) -> NativeResult<Self> {
        let handle = val
            .as_object()
            .ok_or_else(|| NativeError::mismatch("object", val.type_name()))?;
        Ok(Self {
            handle,
            value: val.clone(),
            ctx,
        })
    }

    /// Object handle
    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Read a property (walks the prototype chain)
    pub fn get(&self, key: impl Into<PropertyKey>) -> NativeResult<Value> {
        self.ctx.get_property(&self.value, &key.into())
    }

    /// Read a property and convert it
    pub fn get_as<T: FromValue>(&self, key: impl Into<PropertyKey>) -> NativeResult<T> {
        T::from_value(&self.get(key)?)
    }

    /// Define or overwrite an own property
    pub fn set(&mut self, key: impl Into<PropertyKey>, value: impl ToValue) -> NativeResult<()> {
        self.ctx
            .set_property(&self.value, key.into(), value.to_value())
    }

    /// Check for an own property
    pub fn has_own(&self, key: impl Into<PropertyKey>) -> NativeResult<bool> {
        self.ctx.has_own_property(&self.value, &key.into())
    }

    /// Unwrap back into a value
    pub fn into_value(self) -> Value {
        self.value
    }
}

// ============================================================================
// NativeArray
// ============================================================================

/// Wrapper for an array value with indexed access.
pub struct NativeArray<'a> {
    value: Value,
    ctx: &'a dyn NativeContext,
}

impl<'a> NativeArray<'a> {
    /// Wrap a value as an array. Returns error if the engine does not treat
    /// it as an array.
    pub fn wrap(ctx: &'a dyn NativeContext, val: &Value) -> NativeResult<Self> {
        ctx.array_len(val)?;
        Ok(Self {
            value: val.clone(),
            ctx,
        })
    }

    /// Get array length
    pub fn len(&self) -> NativeResult<usize> {
        self.ctx.array_len(&self.value)
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> NativeResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Get element at index
    pub fn get(&self, index: usize) -> NativeResult<Value> {
        self.ctx.array_get(&self.value, index)
    }

    /// Get element and convert it
    pub fn get_as<T: FromValue>(&self, index: usize) -> NativeResult<T> {
        T::from_value(&self.get(index)?)
    }

    /// Collect all elements in order
    pub fn to_vec(&self) -> NativeResult<Vec<Value>> {
        (0..self.len()?).map(|i| self.get(i)).collect()
    }
}
