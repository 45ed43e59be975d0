use serde::{Deserialize, Serialize};

use super::abilities::AbilitySet;
use super::error::ConfigError;
use super::groups::Facing;

/// Respawn snapshot taken at the last checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Save {
    pub x: f32,
    pub y: f32,
    pub room_x: i32,
    pub room_y: i32,
    pub facing: Facing,
    pub abilities: AbilitySet,
}

impl Save {
    pub fn new(x: f32, y: f32, room_x: i32, room_y: i32, facing: Facing, abilities: AbilitySet) -> Self {
        Self { x, y, room_x, room_y, facing, abilities }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ability;

    #[test]
    fn snapshot_does_not_alias_abilities() {
        let mut live = AbilitySet::empty();
        live.insert(Ability::Gun);
        let save = Save::new(10.0, 20.0, 0, 1, Facing::Left, live);
        live.insert(Ability::Run);
        assert!(!save.abilities.contains(Ability::Run));
        assert!(save.abilities.contains(Ability::Gun));
    }

    #[test]
    fn json_round_trip() {
        let save = Save::new(64.0, 96.0, -1, 2, Facing::Right, AbilitySet::empty());
        assert_eq!(Save::from_json(&save.to_json()).unwrap(), save);
    }
}
