//! Team and collision-type identifiers and their name registries.

use std::collections::HashMap;
use std::fmt;

use crate::error::ConfigError;

/// Logical collision category ("player", "enemy", "wall").
///
/// Assigned from configuration and fixed for an object's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Team(pub u16);

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team#{}", self.0)
    }
}

/// Tag carried by a hit box and reported in contacts ("hurt", "solid").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CollisionType(pub u16);

impl fmt::Display for CollisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Identifier types that can be handed out by a [`NameRegistry`].
pub trait RegistryId: Copy + Eq {
    fn from_index(index: u16) -> Self;

    fn index(self) -> u16;

    /// Builds the "name not found" error for this kind of identifier.
    fn unknown(name: &str) -> ConfigError;
}

impl RegistryId for Team {
    fn from_index(index: u16) -> Self {
        Team(index)
    }

    fn index(self) -> u16 {
        self.0
    }

    fn unknown(name: &str) -> ConfigError {
        ConfigError::UnknownTeam {
            name: name.to_owned(),
        }
    }
}

impl RegistryId for CollisionType {
    fn from_index(index: u16) -> Self {
        CollisionType(index)
    }

    fn index(self) -> u16 {
        self.0
    }

    fn unknown(name: &str) -> ConfigError {
        ConfigError::UnknownCollisionType {
            name: name.to_owned(),
        }
    }
}

/// Maps configuration names to small integer ids.
///
/// Passed explicitly to the configuration functions that need it.
#[derive(Debug, Clone)]
pub struct NameRegistry<T> {
    ids: HashMap<String, T>,
    names: Vec<String>,
}

/// Registry resolving team names.
pub type TeamRegistry = NameRegistry<Team>;

/// Registry resolving hit box type names.
pub type CollisionTypeRegistry = NameRegistry<CollisionType>;

impl<T> Default for NameRegistry<T> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }
}

impl<T: RegistryId> NameRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name, returning its id. Registering an existing name returns the existing id.
    ///
    /// Fails once every `u16` id is taken.
    pub fn register(&mut self, name: &str) -> Result<T, ConfigError> {
        if let Some(id) = self.ids.get(name) {
            return Ok(*id);
        }
        let index = u16::try_from(self.names.len()).map_err(|_| ConfigError::TooManyNames {
            name: name.to_owned(),
        })?;
        let id = T::from_index(index);
        self.ids.insert(name.to_owned(), id);
        self.names.push(name.to_owned());
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<T> {
        self.ids.get(name).copied()
    }

    /// Look a name up, failing with a configuration error if it was never registered.
    pub fn resolve(&self, name: &str) -> Result<T, ConfigError> {
        self.get(name).ok_or_else(|| T::unknown(name))
    }

    /// Name registered for an id.
    pub fn name(&self, id: T) -> Option<&str> {
        self.names.get(usize::from(id.index())).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut teams = TeamRegistry::new();
        let player = teams.register("player").unwrap();
        let enemy = teams.register("enemy").unwrap();
        assert_ne!(player, enemy);
        assert_eq!(teams.register("player"), Ok(player));
        assert_eq!(teams.len(), 2);
        assert_eq!(teams.name(enemy), Some("enemy"));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let teams = TeamRegistry::new();
        assert_eq!(
            teams.resolve("ghost"),
            Err(ConfigError::UnknownTeam {
                name: "ghost".into()
            })
        );

        let types = CollisionTypeRegistry::new();
        assert!(matches!(
            types.resolve("hurt"),
            Err(ConfigError::UnknownCollisionType { .. })
        ));
    }

    #[test]
    fn test_register_fails_when_ids_run_out() {
        let mut teams = TeamRegistry::new();
        for i in 0..=u16::MAX {
            teams.register(&format!("t{i}")).unwrap();
        }
        assert_eq!(teams.len(), 65_536);
        assert_eq!(teams.resolve("t65535"), Ok(Team(u16::MAX)));

        assert_eq!(
            teams.register("t65536"),
            Err(ConfigError::TooManyNames {
                name: "t65536".into()
            })
        );
        assert_eq!(teams.get("t65536"), None);
        assert_eq!(teams.resolve("t0"), Ok(Team(0)));
        // Existing names still resolve after the registry is full.
        assert_eq!(teams.register("t7"), Ok(Team(7)));
    }

    #[test]
    fn test_name_lookup_by_id() {
        let mut types = CollisionTypeRegistry::new();
        let solid = types.register("solid").unwrap();
        let hurt = types.register("hurt").unwrap();
        assert_eq!(types.name(solid), Some("solid"));
        assert_eq!(types.name(hurt), Some("hurt"));
        assert_eq!(types.name(CollisionType(9)), None);
    }
}
