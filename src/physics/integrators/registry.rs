//! Name resolution for integrators
//!
//! Configuration files, the command line and decoded configuration text all
//! refer to integrators by name. The registry maps canonical names and their
//! short aliases onto [`IntegratorKind`].

use super::IntegratorKind;
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Resource)]
pub struct IntegratorRegistry {
    names: HashMap<String, IntegratorKind>,
}

impl IntegratorRegistry {
    /// Create an empty registry without any registered integrators.
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// Register every integrator that ships with the simulation.
    pub fn with_standard_integrators(mut self) -> Self {
        for kind in IntegratorKind::ALL {
            self.register(kind);
        }
        self
    }

    pub fn register(&mut self, kind: IntegratorKind) {
        let integrator = kind.integrator();
        self.names.insert(integrator.name().to_string(), kind);
        for alias in integrator.aliases() {
            self.names.insert(alias.to_string(), kind);
        }
    }

    pub fn resolve(&self, name: &str) -> Result<IntegratorKind, String> {
        let key = name.trim().to_ascii_lowercase();
        self.names.get(&key).copied().ok_or_else(|| {
            let aliases: Vec<String> = self.list_aliases().into_iter().map(|(a, _)| a).collect();
            format!(
                "Unknown integrator: '{}'. Available integrators: {}. Aliases: {}",
                name,
                self.list_available().join(", "),
                aliases.join(", ")
            )
        })
    }

    pub fn list_available(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .names
            .values()
            .map(|kind| kind.integrator().name().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn list_aliases(&self) -> Vec<(String, String)> {
        let mut aliases: Vec<(String, String)> = self
            .names
            .iter()
            .filter(|(key, kind)| key.as_str() != kind.integrator().name())
            .map(|(key, kind)| (key.clone(), kind.integrator().name().to_string()))
            .collect();
        aliases.sort_by(|a, b| a.0.cmp(&b.0));
        aliases
    }
}

impl Default for IntegratorRegistry {
    fn default() -> Self {
        Self::new().with_standard_integrators()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_canonical_and_aliases() {
        let registry = IntegratorRegistry::default();

        assert_eq!(registry.resolve("rk4"), Ok(IntegratorKind::Rk4));
        assert_eq!(
            registry.resolve("runge_kutta_fourth_order"),
            Ok(IntegratorKind::Rk4)
        );
        assert_eq!(registry.resolve("verlet"), Ok(IntegratorKind::Verlet));
        assert_eq!(registry.resolve("Velocity_Verlet"), Ok(IntegratorKind::Verlet));
    }

    #[test]
    fn test_unknown_integrator_lists_choices() {
        let registry = IntegratorRegistry::default();
        let error = registry.resolve("leapfrog").unwrap_err();

        assert!(error.contains("Unknown integrator: 'leapfrog'"));
        assert!(error.contains("runge_kutta_fourth_order"));
        assert!(error.contains("velocity_verlet"));
    }

    #[test]
    fn test_listing() {
        let registry = IntegratorRegistry::default();
        assert_eq!(
            registry.list_available(),
            vec!["runge_kutta_fourth_order", "velocity_verlet"]
        );
        assert_eq!(
            registry.list_aliases(),
            vec![
                ("rk4".to_string(), "runge_kutta_fourth_order".to_string()),
                ("verlet".to_string(), "velocity_verlet".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        assert!(IntegratorRegistry::new().resolve("rk4").is_err());
    }
}
