// ABOUTME: Builds the default ExtractorRegistry with every built-in site extractor.
// ABOUTME: Provides load_builtin_registry() used when a Client is built without a custom registry.

use crate::extractors::kbjfan::KbjFan;
use crate::extractors::pmvhaven::{PmvHaven, PmvHavenProfile};
use crate::extractors::registry::ExtractorRegistry;

/// Loads the registry of built-in extractors.
///
/// Within one host, extractors are tried in registration order.
pub fn load_builtin_registry() -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new();
    registry.register(PmvHaven::new());
    registry.register(PmvHavenProfile::new());
    registry.register(KbjFan::new());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn load_builtin_registry_succeeds() {
        let registry = load_builtin_registry();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn builtin_registry_routes_each_site() {
        let registry = load_builtin_registry();
        let cases = [
            ("https://pmvhaven.com/video/NEW-RULES_66799ca1ca817a3e12107c75", "pmvhaven"),
            ("https://www.pmvhaven.com/profile/wombatpmv", "pmvhaven:profile"),
            ("https://www.kbjfan.com/2026/01/20/korean-bj-13457457832-2025-10-13/", "kbjfan"),
        ];
        for (url, name) in cases {
            let url = Url::parse(url).unwrap();
            let found = registry.find(&url);
            assert_eq!(found.map(|e| e.name()), Some(name), "{}", url);
        }
    }

    #[test]
    fn builtin_registry_rejects_unknown_paths() {
        let registry = load_builtin_registry();
        let url = Url::parse("https://pmvhaven.com/about").unwrap();
        assert!(registry.find(&url).is_none());
    }
}
