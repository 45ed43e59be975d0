use serde::{Deserialize, Serialize};

/// Number of groups that take part in the tables (everything but `None`).
pub const GROUP_COUNT: usize = 10;

/// Collision category of a body. `None` never blocks and is never blocked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionGroup {
    #[default]
    None,
    Player,
    Bullets,
    Enemies,
    Walls,
    Debris,
    Chaser,
    Springs,
    Boss,
    Flyer,
    EnemyBullets,
}

impl CollisionGroup {
    /// Table order. `None` is not part of it.
    pub const ALL: [CollisionGroup; GROUP_COUNT] = [
        CollisionGroup::Player,
        CollisionGroup::Bullets,
        CollisionGroup::Enemies,
        CollisionGroup::Walls,
        CollisionGroup::Debris,
        CollisionGroup::Chaser,
        CollisionGroup::Springs,
        CollisionGroup::Boss,
        CollisionGroup::Flyer,
        CollisionGroup::EnemyBullets,
    ];

    /// Row/column in the tables, `None` for the group that has none.
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            CollisionGroup::None => None,
            CollisionGroup::Player => Some(0),
            CollisionGroup::Bullets => Some(1),
            CollisionGroup::Enemies => Some(2),
            CollisionGroup::Walls => Some(3),
            CollisionGroup::Debris => Some(4),
            CollisionGroup::Chaser => Some(5),
            CollisionGroup::Springs => Some(6),
            CollisionGroup::Boss => Some(7),
            CollisionGroup::Flyer => Some(8),
            CollisionGroup::EnemyBullets => Some(9),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            CollisionGroup::None => "none",
            CollisionGroup::Player => "player",
            CollisionGroup::Bullets => "bullets",
            CollisionGroup::Enemies => "enemies",
            CollisionGroup::Walls => "walls",
            CollisionGroup::Debris => "debris",
            CollisionGroup::Chaser => "chaser",
            CollisionGroup::Springs => "springs",
            CollisionGroup::Boss => "boss",
            CollisionGroup::Flyer => "flyer",
            CollisionGroup::EnemyBullets => "enemy_bullets",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        std::iter::once(CollisionGroup::None)
            .chain(Self::ALL)
            .find(|g| g.key() == key)
    }
}

/// Side of the mover on which a collision was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    pub fn from_sign(value: f32) -> Option<Self> {
        if value > 0.0 {
            Some(Facing::Right)
        } else if value < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for group in CollisionGroup::ALL {
            assert_eq!(CollisionGroup::from_key(group.key()), Some(group));
        }
        assert_eq!(CollisionGroup::from_key("none"), Some(CollisionGroup::None));
        assert_eq!(CollisionGroup::from_key("lava"), None);
    }

    #[test]
    fn indices_follow_table_order() {
        for (i, group) in CollisionGroup::ALL.iter().enumerate() {
            assert_eq!(group.index(), Some(i));
        }
        assert_eq!(CollisionGroup::None.index(), None);
    }
}
