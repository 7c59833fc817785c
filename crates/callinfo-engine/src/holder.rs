//! Holder resolution
//!
//! The holder of a native call is the first scope on the receiver's lookup
//! chain, starting at the receiver itself, that declares the invoked
//! function as an own property. Construct calls do not come through here:
//! their holder is the freshly allocated instance.

use callinfo_sdk::{HolderPolicy, NativeError, NativeResult, ObjectHandle, Value};

use crate::heap::Heap;

/// Find the object declaring one of `functions` on `receiver`'s chain.
///
/// `functions` lists the callee and, for bound functions, every function it
/// wraps; a scope declaring any of them is a holder. When nothing on the
/// chain declares the callee, `Lenient` falls back to the receiver and
/// `Strict` fails with `BindingError`.
pub fn resolve_holder(
    heap: &Heap,
    receiver: &Value,
    functions: &[ObjectHandle],
    name: &str,
    policy: HolderPolicy,
    max_depth: usize,
) -> NativeResult<Value> {
    if let Value::Object(start) = receiver {
        for scope in heap.chain(*start, max_depth) {
            let scope = scope?;
            if heap.get(scope)?.declares(functions) {
                return Ok(Value::Object(scope));
            }
        }
    }

    match policy {
        HolderPolicy::Lenient => {
            tracing::debug!(function = name, "no declaring scope, holder is the receiver");
            Ok(receiver.clone())
        }
        HolderPolicy::Strict => Err(NativeError::BindingError {
            function: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::ObjectKind;

    struct Fixture {
        heap: Heap,
        func: ObjectHandle,
        ancestor: ObjectHandle,
        receiver: ObjectHandle,
    }

    fn fixture() -> Fixture {
        let mut heap = Heap::new();
        let func = heap.alloc(None, ObjectKind::Ordinary);
        let ancestor = heap.alloc(None, ObjectKind::Ordinary);
        let parent = heap.alloc(Some(ancestor), ObjectKind::Ordinary);
        let receiver = heap.alloc(Some(parent), ObjectKind::Ordinary);
        heap.get_mut(ancestor)
            .unwrap()
            .properties
            .insert("sample".into(), Value::Object(func));
        Fixture {
            heap,
            func,
            ancestor,
            receiver,
        }
    }

    #[test]
    fn test_holder_is_declaring_ancestor() {
        let f = fixture();
        let holder = resolve_holder(
            &f.heap,
            &Value::Object(f.receiver),
            &[f.func],
            "sample",
            HolderPolicy::Strict,
            16,
        )
        .unwrap();
        assert_eq!(holder, Value::Object(f.ancestor));
    }

    #[test]
    fn test_own_declaration_wins() {
        let mut f = fixture();
        f.heap
            .get_mut(f.receiver)
            .unwrap()
            .properties
            .insert("sample".into(), Value::Object(f.func));
        let holder = resolve_holder(
            &f.heap,
            &Value::Object(f.receiver),
            &[f.func],
            "sample",
            HolderPolicy::Strict,
            16,
        )
        .unwrap();
        assert_eq!(holder, Value::Object(f.receiver));
    }

    #[test]
    fn test_undeclared_lenient_and_strict() {
        let mut f = fixture();
        let other = f.heap.alloc(None, ObjectKind::Ordinary);
        let receiver = Value::Object(other);

        let lenient =
            resolve_holder(&f.heap, &receiver, &[f.func], "sample", HolderPolicy::Lenient, 16);
        assert_eq!(lenient.unwrap(), receiver);

        let strict =
            resolve_holder(&f.heap, &receiver, &[f.func], "sample", HolderPolicy::Strict, 16);
        assert_eq!(
            strict.unwrap_err(),
            NativeError::BindingError {
                function: "sample".to_string()
            }
        );
    }

    #[test]
    fn test_primitive_receiver() {
        let f = fixture();
        let receiver = Value::Int(5);
        let holder =
            resolve_holder(&f.heap, &receiver, &[f.func], "sample", HolderPolicy::Lenient, 16);
        assert_eq!(holder.unwrap(), receiver);
    }

    #[test]
    fn test_depth_limit_surfaces() {
        let f = fixture();
        let err = resolve_holder(
            &f.heap,
            &Value::Object(f.receiver),
            &[f.func],
            "sample",
            HolderPolicy::Lenient,
            2,
        )
        .unwrap_err();
        assert_eq!(err, NativeError::PrototypeChainTooDeep { limit: 2 });
    }
}
