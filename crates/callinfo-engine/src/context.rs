//! `NativeContext` implementation for the realm

use callinfo_sdk::{NativeContext, NativeResult, ObjectHandle, PropertyKey, SymbolId, Value};

use crate::realm::Realm;

impl NativeContext for Realm {
    fn create_object(&mut self) -> Value {
        Realm::create_object(self)
    }

    fn create_array(&mut self, items: Vec<Value>) -> Value {
        Realm::create_array(self, items)
    }

    fn concat_strings(&mut self, left: &Value, right: &Value) -> NativeResult<Value> {
        self.concat(left, right)
    }

    fn get_property(&self, target: &Value, key: &PropertyKey) -> NativeResult<Value> {
        self.get(target, key)
    }

    fn set_property(&mut self, target: &Value, key: PropertyKey, value: Value) -> NativeResult<()> {
        self.set(target, key, value)
    }

    fn has_own_property(&self, target: &Value, key: &PropertyKey) -> NativeResult<bool> {
        self.has_own(target, key)
    }

    fn prototype_of(&self, target: &Value) -> NativeResult<Option<ObjectHandle>> {
        Realm::prototype_of(self, target)
    }

    fn type_of(&self, value: &Value) -> &'static str {
        Realm::type_of(self, value)
    }

    fn symbol_description(&self, id: SymbolId) -> Option<String> {
        Realm::symbol_description(self, id).map(str::to_string)
    }

    fn array_len(&self, target: &Value) -> NativeResult<usize> {
        Realm::array_len(self, target)
    }

    fn array_get(&self, target: &Value, index: usize) -> NativeResult<Value> {
        Realm::array_get(self, target, index)
    }

    fn call_function(&mut self, callee: &Value, this: Value, args: &[Value]) -> NativeResult<Value> {
        self.call_with_receiver(callee, this, args)
    }
}
