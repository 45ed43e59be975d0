//! Group compatibility and bounce tables.
//!
//! Rows are the moving body, columns the obstacle. The two cells of a pair are
//! independent: walls never move, so `walls` rows only list what a moving
//! wall-group body (a platform) is stopped by.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::groups::{CollisionGroup, GROUP_COUNT};

const T: bool = true;
const F: bool = false;

// player, bullets, enemies, walls, debris, chaser, springs, boss, flyer, enemy_bullets
const STANDARD_COLLIDE: [[bool; GROUP_COUNT]; GROUP_COUNT] = [
    [F, F, T, T, F, T, T, T, T, F], // player
    [F, F, T, T, F, T, F, T, T, F], // bullets
    [F, T, F, T, F, F, T, T, F, F], // enemies
    [F, F, F, T, F, F, F, F, F, F], // walls
    [F, F, F, F, F, F, F, F, F, F], // debris
    [F, T, F, F, F, F, F, F, F, F], // chaser
    [F, F, F, F, F, F, F, F, F, F], // springs
    [T, F, T, T, F, F, T, F, F, F], // boss
    [T, F, F, T, F, F, F, F, F, F], // flyer
    [T, F, T, T, F, T, T, F, T, F], // enemy_bullets
];

const STANDARD_BOUNCE: [[f32; GROUP_COUNT]; GROUP_COUNT] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.5, 0.5, 0.0, 0.5, 0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.5, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0],
];

/// Immutable collide/bounce lookup injected into every room.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionTables {
    collide: [[bool; GROUP_COUNT]; GROUP_COUNT],
    bounce: [[f32; GROUP_COUNT]; GROUP_COUNT],
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct TablesBundle {
    #[serde(default)]
    collide: Vec<(String, String)>,
    #[serde(default)]
    bounce: Vec<(String, String, f32)>,
}

impl CollisionTables {
    /// The game's own tables.
    pub fn standard() -> Self {
        Self { collide: STANDARD_COLLIDE, bounce: STANDARD_BOUNCE }
    }

    /// Nothing collides, every coefficient is 0. Starting point for fixtures.
    pub fn empty() -> Self {
        Self { collide: [[false; GROUP_COUNT]; GROUP_COUNT], bounce: [[0.0; GROUP_COUNT]; GROUP_COUNT] }
    }

    /// Sets the single cell `(mover, obstacle)`. Pairs involving `None` are ignored.
    pub fn with_collision(mut self, mover: CollisionGroup, obstacle: CollisionGroup, value: bool) -> Self {
        if let (Some(a), Some(b)) = (mover.index(), obstacle.index()) {
            self.collide[a][b] = value;
        }
        self
    }

    pub fn with_bounce(mut self, mover: CollisionGroup, obstacle: CollisionGroup, value: f32) -> Self {
        if let (Some(a), Some(b)) = (mover.index(), obstacle.index()) {
            self.bounce[a][b] = value;
        }
        self
    }

    /// Whether `mover` is blocked by `obstacle`. Always false when either side is `None`.
    #[inline]
    pub fn can_collide(&self, mover: CollisionGroup, obstacle: CollisionGroup) -> bool {
        match (mover.index(), obstacle.index()) {
            (Some(a), Some(b)) => self.collide[a][b],
            _ => false,
        }
    }

    #[inline]
    pub fn bounce_coefficient(&self, mover: CollisionGroup, obstacle: CollisionGroup) -> f32 {
        match (mover.index(), obstacle.index()) {
            (Some(a), Some(b)) => self.bounce[a][b],
            _ => 0.0,
        }
    }

    /// Pairs whose two cells disagree, each listed once as `(a, b)` with `a` before `b`.
    pub fn asymmetric_pairs(&self) -> Vec<(CollisionGroup, CollisionGroup)> {
        let mut pairs = Vec::new();
        for (i, a) in CollisionGroup::ALL.iter().enumerate() {
            for (j, b) in CollisionGroup::ALL.iter().enumerate().skip(i + 1) {
                if self.collide[i][j] != self.collide[j][i] {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }

    /// Builds tables from `{"collide": [[a, b], ...], "bounce": [[a, b, c], ...]}`.
    /// Cells not listed stay false / 0.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let bundle: TablesBundle = serde_json::from_str(json)?;
        Self::from_bundle(bundle)
    }

    fn from_bundle(bundle: TablesBundle) -> Result<Self, ConfigError> {
        let mut tables = Self::empty();
        for (a, b) in &bundle.collide {
            let (i, j) = (table_index(a)?, table_index(b)?);
            tables.collide[i][j] = true;
        }
        for (a, b, value) in &bundle.bounce {
            let (i, j) = (table_index(a)?, table_index(b)?);
            if !(0.0..=1.0).contains(value) {
                return Err(ConfigError::InvalidCoefficient { a: a.clone(), b: b.clone(), value: *value });
            }
            tables.bounce[i][j] = *value;
        }
        Ok(tables)
    }

    pub fn to_json(&self) -> String {
        let mut bundle = TablesBundle::default();
        for (i, a) in CollisionGroup::ALL.iter().enumerate() {
            for (j, b) in CollisionGroup::ALL.iter().enumerate() {
                if self.collide[i][j] {
                    bundle.collide.push((a.key().to_string(), b.key().to_string()));
                }
                if self.bounce[i][j] != 0.0 {
                    bundle.bounce.push((a.key().to_string(), b.key().to_string(), self.bounce[i][j]));
                }
            }
        }
        serde_json::to_string(&bundle).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for CollisionTables {
    fn default() -> Self {
        Self::standard()
    }
}

fn table_index(key: &str) -> Result<usize, ConfigError> {
    let group = CollisionGroup::from_key(key).ok_or_else(|| ConfigError::UnknownGroup(key.to_string()))?;
    group.index().ok_or(ConfigError::NoneGroup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use CollisionGroup as G;

    #[test]
    fn none_never_collides() {
        let tables = CollisionTables::standard();
        for group in G::ALL {
            assert!(!tables.can_collide(G::None, group));
            assert!(!tables.can_collide(group, G::None));
        }
        let permissive = G::ALL.iter().fold(CollisionTables::empty(), |t, a| {
            G::ALL.iter().fold(t, |t, b| t.with_collision(*a, *b, true))
        });
        assert!(!permissive.can_collide(G::None, G::Walls));
    }

    #[test]
    fn mutually_mobile_pairs_are_symmetric() {
        let tables = CollisionTables::standard();
        let asymmetric = tables.asymmetric_pairs();
        for pair in [
            (G::Player, G::Boss),
            (G::Player, G::Flyer),
            (G::Bullets, G::Enemies),
            (G::Bullets, G::Chaser),
            (G::Enemies, G::Boss),
        ] {
            assert!(tables.can_collide(pair.0, pair.1));
            assert!(tables.can_collide(pair.1, pair.0));
            assert!(!asymmetric.contains(&pair));
        }
        // Static obstacles block movers without moving themselves.
        assert!(asymmetric.contains(&(G::Player, G::Walls)));
    }

    #[test]
    fn cells_are_independent() {
        let tables = CollisionTables::empty().with_collision(G::Player, G::Walls, true);
        assert!(tables.can_collide(G::Player, G::Walls));
        assert!(!tables.can_collide(G::Walls, G::Player));
        assert_eq!(tables.asymmetric_pairs(), vec![(G::Player, G::Walls)]);
    }

    #[test]
    fn standard_coefficients() {
        let tables = CollisionTables::standard();
        assert_eq!(tables.bounce_coefficient(G::Player, G::Walls), 0.0);
        assert_eq!(tables.bounce_coefficient(G::Bullets, G::Walls), 0.5);
        assert_eq!(tables.bounce_coefficient(G::Walls, G::Walls), 1.0);
        assert_eq!(tables.bounce_coefficient(G::EnemyBullets, G::Player), 0.5);
    }

    #[test]
    fn json_round_trip_matches_standard() {
        let json = CollisionTables::standard().to_json();
        assert_eq!(CollisionTables::from_json(&json).unwrap(), CollisionTables::standard());
    }

    #[test]
    fn json_rejects_bad_input() {
        assert!(matches!(
            CollisionTables::from_json(r#"{"collide": [["player", "lava"]]}"#),
            Err(ConfigError::UnknownGroup(_))
        ));
        assert!(matches!(
            CollisionTables::from_json(r#"{"collide": [["none", "walls"]]}"#),
            Err(ConfigError::NoneGroup)
        ));
        assert!(matches!(
            CollisionTables::from_json(r#"{"bounce": [["player", "walls", 1.5]]}"#),
            Err(ConfigError::InvalidCoefficient { .. })
        ));
        assert!(matches!(CollisionTables::from_json("{"), Err(ConfigError::Json(_))));
    }
}
