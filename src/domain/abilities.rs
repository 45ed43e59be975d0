use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Run,
    DoubleJump,
    WallJump,
    Gun,
    Rebreather,
    FullAuto,
    Spread,
    Gravity,
}

impl Ability {
    pub const ALL: [Ability; 8] = [
        Ability::Run,
        Ability::DoubleJump,
        Ability::WallJump,
        Ability::Gun,
        Ability::Rebreather,
        Ability::FullAuto,
        Ability::Spread,
        Ability::Gravity,
    ];

    /// Powerup tile digit `0`..`7`.
    pub fn from_digit(digit: u32) -> Option<Self> {
        Self::ALL.get(digit as usize).copied()
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Unlocked abilities. `Copy`, so a save snapshot never aliases the live set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Ability>", from = "Vec<Ability>")]
pub struct AbilitySet(u8);

impl AbilitySet {
    pub const fn empty() -> Self {
        AbilitySet(0)
    }

    pub fn insert(&mut self, ability: Ability) -> bool {
        let had = self.contains(ability);
        self.0 |= ability.bit();
        !had
    }

    pub fn remove(&mut self, ability: Ability) {
        self.0 &= !ability.bit();
    }

    pub fn contains(&self, ability: Ability) -> bool {
        self.0 & ability.bit() != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Ability> + '_ {
        Ability::ALL.into_iter().filter(|a| self.contains(*a))
    }
}

impl From<AbilitySet> for Vec<Ability> {
    fn from(set: AbilitySet) -> Self {
        set.iter().collect()
    }
}

impl From<Vec<Ability>> for AbilitySet {
    fn from(list: Vec<Ability>) -> Self {
        let mut set = AbilitySet::empty();
        for ability in list {
            set.insert(ability);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_new_unlocks() {
        let mut set = AbilitySet::empty();
        assert!(set.insert(Ability::Gun));
        assert!(!set.insert(Ability::Gun));
        assert!(set.contains(Ability::Gun));
        assert!(!set.contains(Ability::Run));
    }

    #[test]
    fn serializes_as_names() {
        let mut set = AbilitySet::empty();
        set.insert(Ability::DoubleJump);
        set.insert(Ability::Rebreather);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["double_jump","rebreather"]"#);
        let back: AbilitySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
