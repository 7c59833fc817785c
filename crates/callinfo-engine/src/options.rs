//! Engine options

use serde::Deserialize;

/// Receiver used for plain calls that do not name one (`f(x)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplicitReceiver {
    /// The realm's global object (sloppy-mode semantics)
    #[default]
    Global,
    /// `undefined` (strict-mode semantics)
    Undefined,
}

/// Options for creating a `Realm`, loaded from `[engine]` in `callinfo.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Maximum number of scopes walked on a lookup chain
    pub max_prototype_depth: usize,

    /// Maximum nesting of re-entrant native calls
    pub max_call_depth: usize,

    /// Concatenations at least this long produce lazy strings
    pub lazy_string_min_length: usize,

    /// Receiver for plain calls
    pub implicit_receiver: ImplicitReceiver,

    /// Whether foreign host values can be created in this realm
    pub host_interop: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_prototype_depth: 1024,
            max_call_depth: 256,
            lazy_string_min_length: 20,
            implicit_receiver: ImplicitReceiver::Global,
            host_interop: false,
        }
    }
}

impl EngineOptions {
    /// Enable or disable host interop
    pub fn with_host_interop(mut self, enabled: bool) -> Self {
        self.host_interop = enabled;
        self
    }

    /// Set the implicit receiver for plain calls
    pub fn with_implicit_receiver(mut self, receiver: ImplicitReceiver) -> Self {
        self.implicit_receiver = receiver;
        self
    }
}
