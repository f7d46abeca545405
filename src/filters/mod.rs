//! Filter preset registry and built-in preset tables.

pub mod presets;

pub use presets::DEFAULT_FILTER;

use crate::core::error::ConfigError;
use crate::core::kernel::KernelMatrix;
use indexmap::IndexMap;

/// Factory producing a fresh kernel for a preset.
pub type PresetFactory = fn() -> KernelMatrix;

/// Registry entry: human-readable description plus the kernel factory.
#[derive(Clone)]
pub struct PresetEntry {
    /// One-line description shown by the CLI listing.
    pub description: &'static str,
    factory: PresetFactory,
}

/// Registry of filter presets, keyed by their CLI token.
///
/// Iteration order is registration order, so listings stay stable.
pub struct PresetRegistry {
    presets: IndexMap<&'static str, PresetEntry>,
}

impl PresetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            presets: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in presets.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("box_blur", "Uniform 3x3 blur", presets::box_blur);
        registry.register("edge", "Edge detection", presets::edge);
        registry.register("gaussian", "Gaussian 3x3 blur", presets::gaussian);
        registry.register("h_emboss", "Horizontal emboss", presets::h_emboss);
        registry.register("identity", "Pass-through", presets::identity);
        registry.register("v_emboss", "Vertical emboss", presets::v_emboss);
        registry.register("sharpen", "Center-weighted sharpen", presets::sharpen);
        registry
    }

    /// Register a preset under a token.
    pub fn register(
        &mut self,
        token: &'static str,
        description: &'static str,
        factory: PresetFactory,
    ) {
        self.presets
            .insert(token, PresetEntry { description, factory });
    }

    /// Build the kernel for a token.
    pub fn create(&self, token: &str) -> Result<KernelMatrix, ConfigError> {
        self.presets
            .get(token)
            .map(|entry| (entry.factory)())
            .ok_or_else(|| ConfigError::UnknownFilter {
                token: token.to_string(),
            })
    }

    /// Whether a token is registered.
    pub fn contains(&self, token: &str) -> bool {
        self.presets.contains_key(token)
    }

    /// Registered tokens, in registration order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.keys().copied()
    }

    /// Registered tokens with their descriptions, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PresetEntry)> + '_ {
        self.presets.iter().map(|(token, entry)| (*token, entry))
    }

    /// Number of registered presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the registry holds no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tokens() {
        let registry = PresetRegistry::with_builtins();
        for token in [
            "box_blur", "edge", "gaussian", "h_emboss", "identity", "v_emboss", "sharpen",
        ] {
            assert!(registry.contains(token), "missing preset: {token}");
        }
        assert_eq!(registry.len(), 7);
        assert!(registry.contains(DEFAULT_FILTER));
    }

    #[test]
    fn test_unknown_token_is_config_error() {
        let registry = PresetRegistry::with_builtins();
        let err = registry.create("swirl").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFilter { token } if token == "swirl"));
    }

    #[test]
    fn test_create_returns_fresh_kernel() {
        let registry = PresetRegistry::with_builtins();
        let kernel = registry.create("gaussian").unwrap();
        assert_eq!(kernel.dim(), 3);
        assert_eq!(kernel.weights()[4], 4.0 / 16.0);
    }

    #[test]
    fn test_registration_order_is_stable() {
        let registry = PresetRegistry::with_builtins();
        let tokens: Vec<_> = registry.tokens().collect();
        assert_eq!(tokens[0], "box_blur");
        assert_eq!(tokens[6], "sharpen");
    }
}
