//! Error types for native calls

/// Result type for native calls and context operations
pub type NativeResult<T> = Result<T, NativeError>;

/// Errors surfaced to the caller of a native function.
///
/// Every failure propagates synchronously to the call site. Nothing in the
/// binding layer retries or swallows these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NativeError {
    /// A required argument was omitted
    #[error("{function}: expected at least {expected} argument(s), got {got}")]
    ArityError {
        /// Name of the native function
        function: String,
        /// Minimum number of arguments
        expected: usize,
        /// Number of arguments supplied
        got: usize,
    },

    /// No holder could be resolved on the receiver's lookup chain
    #[error("{function}: no object on the receiver's lookup chain declares this function")]
    BindingError {
        /// Name of the native function
        function: String,
    },

    /// Type mismatch during conversion or object access
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Call target is not a function
    #[error("{0} is not a function")]
    NotCallable(String),

    /// Construct target is not a constructor
    #[error("{0} is not a constructor")]
    NotConstructor(String),

    /// Lookup chain is cyclic or deeper than the configured limit
    #[error("Prototype chain exceeds {limit} entries")]
    PrototypeChainTooDeep {
        /// Configured maximum depth
        limit: usize,
    },

    /// Re-entrant native calls nested deeper than the configured limit
    #[error("Maximum call stack size exceeded ({limit})")]
    CallStackExceeded {
        /// Configured maximum depth
        limit: usize,
    },

    /// Foreign values were requested but host interop is not enabled
    #[error("Host interop is not available in this realm")]
    HostInteropDisabled,

    /// Object handle does not refer to a live heap slot
    #[error("Invalid object handle: {0}")]
    InvalidHandle(u32),

    /// Invalid argument
    #[error("Argument error: {0}")]
    ArgumentError(String),
}

impl NativeError {
    /// Short kind name, stable across message changes
    pub fn kind(&self) -> &'static str {
        match self {
            NativeError::ArityError { .. } => "ArityError",
            NativeError::BindingError { .. } => "BindingError",
            NativeError::TypeMismatch { .. } => "TypeError",
            NativeError::NotCallable(_) => "TypeError",
            NativeError::NotConstructor(_) => "TypeError",
            NativeError::PrototypeChainTooDeep { .. } => "RangeError",
            NativeError::CallStackExceeded { .. } => "RangeError",
            NativeError::HostInteropDisabled => "InteropError",
            NativeError::InvalidHandle(_) => "InternalError",
            NativeError::ArgumentError(_) => "TypeError",
        }
    }

    /// Build a type mismatch error
    pub fn mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        NativeError::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

impl From<String> for NativeError {
    fn from(s: String) -> Self {
        NativeError::ArgumentError(s)
    }
}

impl From<&str> for NativeError {
    fn from(s: &str) -> Self {
        NativeError::ArgumentError(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message() {
        let err = NativeError::ArityError {
            function: "Arguments_Identity".to_string(),
            expected: 1,
            got: 0,
        };
        assert_eq!(err.kind(), "ArityError");
        assert_eq!(
            err.to_string(),
            "Arguments_Identity: expected at least 1 argument(s), got 0"
        );
    }

    #[test]
    fn test_binding_kind() {
        let err = NativeError::BindingError {
            function: "method".to_string(),
        };
        assert_eq!(err.kind(), "BindingError");
        assert!(err.to_string().contains("method"));
    }

    #[test]
    fn test_from_str() {
        let err: NativeError = "bad input".into();
        assert_eq!(err, NativeError::ArgumentError("bad input".to_string()));
    }
}
