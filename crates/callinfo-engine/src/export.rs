//! Preparing values for the host side of an interop boundary

use callinfo_sdk::{JsString, NativeResult, Value};

use crate::realm::Realm;

impl Realm {
    /// Convert a value before it leaves the realm.
    ///
    /// Lazy strings are flattened. With `bind_member_functions`, a function
    /// read off `this` is bound to it so the host can call it detached,
    /// unless `this` is undefined or the function is already bound. All
    /// other values pass through unchanged.
    pub fn export_value(
        &mut self,
        value: &Value,
        this: &Value,
        bind_member_functions: bool,
    ) -> NativeResult<Value> {
        match value {
            Value::String(s) if s.is_lazy() => Ok(Value::String(JsString::new(&s.flatten()))),
            Value::Object(_) if self.is_callable(value) => {
                if bind_member_functions && !this.is_undefined() && !self.is_bound_function(value) {
                    self.bind(value, this.clone(), Vec::new())
                } else {
                    Ok(value.clone())
                }
            }
            _ => Ok(value.clone()),
        }
    }
}
