//! Variable bindings shared by one evaluation session.

use std::collections::BTreeMap;

use serde::Serialize;

/// Golden ratio, bound to `phi` in a fresh environment.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Mutable store of variable name to value bindings.
///
/// An environment is owned by the caller and handed to every evaluation, so
/// separate sessions never observe each other's assignments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    bindings: BTreeMap<String, f64>,
}

impl Environment {
    /// Create an environment seeded with the named constants `pi`, `e` and `phi`.
    pub fn new() -> Self {
        let mut env = Self::empty();
        env.bind("pi", std::f64::consts::PI);
        env.bind("e", std::f64::consts::E);
        env.bind("phi", PHI);
        env
    }

    /// Create an environment without any bindings.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    /// Bind `name` to `value`, returning the previous value if there was one.
    pub fn bind(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.bindings.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.bindings.get(name).copied()
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Iterate over all bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_seeded() {
        let env = Environment::new();
        assert_eq!(env.get("pi"), Some(std::f64::consts::PI));
        assert_eq!(env.get("e"), Some(std::f64::consts::E));
        assert!((env.get("phi").unwrap() - (1.0 + 5f64.sqrt()) / 2.0).abs() < 1e-15);
        assert_eq!(env.len(), 3);
    }

    #[test]
    fn test_bind_overwrites() {
        let mut env = Environment::empty();
        assert!(env.is_empty());
        assert_eq!(env.bind("x", 1.0), None);
        assert_eq!(env.bind("x", 2.0), Some(1.0));
        assert_eq!(env.get("x"), Some(2.0));
        assert!(!env.is_bound("y"));
    }

    #[test]
    fn test_iter_is_sorted() {
        let mut env = Environment::empty();
        env.bind("b", 2.0);
        env.bind("a", 1.0);
        let names: Vec<_> = env.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
