//! JsString: flat or lazily concatenated string values
//!
//! Concatenating two strings whose combined length reaches the realm's lazy
//! threshold produces a rope node instead of copying. The rope is flattened
//! on first content access and the flat form is cached in the node, so the
//! same `JsString` handle keeps its identity across flattening.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

static EMPTY: Lazy<Arc<str>> = Lazy::new(|| Arc::from(""));

/// Immutable string value with an optional lazy concatenation form.
#[derive(Clone)]
pub struct JsString(Repr);

#[derive(Clone)]
enum Repr {
    Flat(Arc<str>),
    Lazy(Arc<LazyConcat>),
}

struct LazyConcat {
    left: JsString,
    right: JsString,
    len: usize,
    flat: OnceCell<Arc<str>>,
}

impl JsString {
    /// Create a flat string
    pub fn new(s: &str) -> Self {
        JsString(Repr::Flat(Arc::from(s)))
    }

    /// Concatenate two strings.
    ///
    /// Results shorter than `lazy_min_len` are flattened eagerly. Empty
    /// operands return the other operand unchanged.
    pub fn concat(left: &JsString, right: &JsString, lazy_min_len: usize) -> JsString {
        if left.is_empty() {
            return right.clone();
        }
        if right.is_empty() {
            return left.clone();
        }
        let len = left.len() + right.len();
        if len < lazy_min_len {
            let mut out = String::with_capacity(len);
            out.push_str(&left.flatten());
            out.push_str(&right.flatten());
            return JsString(Repr::Flat(Arc::from(out)));
        }
        JsString(Repr::Lazy(Arc::new(LazyConcat {
            left: left.clone(),
            right: right.clone(),
            len,
            flat: OnceCell::new(),
        })))
    }

    /// Length in bytes of the UTF-8 content
    pub fn len(&self) -> usize {
        match &self.0 {
            Repr::Flat(s) => s.len(),
            Repr::Lazy(node) => node.len,
        }
    }

    /// Check if the string is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if this string is still an unflattened-by-construction rope
    pub fn is_lazy(&self) -> bool {
        matches!(self.0, Repr::Lazy(_))
    }

    /// Flat content of this string. Ropes cache their flattened form.
    pub fn flatten(&self) -> Arc<str> {
        match &self.0 {
            Repr::Flat(s) => s.clone(),
            Repr::Lazy(node) => node
                .flat
                .get_or_init(|| {
                    let mut out = String::with_capacity(node.len);
                    node.append_to(&mut out);
                    Arc::from(out)
                })
                .clone(),
        }
    }

    /// Check whether both handles share the same underlying allocation
    pub fn ptr_eq(&self, other: &JsString) -> bool {
        match (&self.0, &other.0) {
            (Repr::Flat(a), Repr::Flat(b)) => Arc::ptr_eq(a, b),
            (Repr::Lazy(a), Repr::Lazy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn append_to(&self, out: &mut String) {
        match &self.0 {
            Repr::Flat(s) => out.push_str(s),
            Repr::Lazy(node) => match node.flat.get() {
                Some(flat) => out.push_str(flat),
                None => node.append_to(out),
            },
        }
    }
}

impl LazyConcat {
    fn append_to(&self, out: &mut String) {
        // Deep left-leaning ropes come from repeated `+=`; walk the left
        // spine iteratively so flattening does not recurse per append.
        let mut spine = vec![&self.right];
        let mut cursor = &self.left;
        while let Repr::Lazy(node) = &cursor.0 {
            if node.flat.get().is_some() {
                break;
            }
            spine.push(&node.right);
            cursor = &node.left;
        }
        cursor.append_to(out);
        for part in spine.into_iter().rev() {
            part.append_to(out);
        }
    }
}

impl Drop for LazyConcat {
    fn drop(&mut self) {
        // Unlink children onto a work list so a deep rope is released
        // without one stack frame per node.
        let mut pending = Vec::new();
        detach(&mut self.left, &mut pending);
        detach(&mut self.right, &mut pending);
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(node) {
                detach(&mut node.left, &mut pending);
                detach(&mut node.right, &mut pending);
            }
        }
    }
}

fn detach(part: &mut JsString, pending: &mut Vec<Arc<LazyConcat>>) {
    if part.is_lazy() {
        let taken = std::mem::replace(part, JsString(Repr::Flat(EMPTY.clone())));
        if let Repr::Lazy(node) = taken.0 {
            pending.push(node);
        }
    }
}

impl PartialEq for JsString {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.len() == other.len() && self.flatten() == other.flatten()
    }
}

impl Eq for JsString {}

impl PartialEq<str> for JsString {
    fn eq(&self, other: &str) -> bool {
        self.len() == other.len() && &*self.flatten() == other
    }
}

impl PartialEq<&str> for JsString {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString::new(s)
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString(Repr::Flat(Arc::from(s)))
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flatten())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_lazy() {
            write!(f, "JsString::Lazy({:?})", &*self.flatten())
        } else {
            write!(f, "JsString({:?})", &*self.flatten())
        }
    }
}
