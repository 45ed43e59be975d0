use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::core::Vec2;

/// Pixels per art pixel. Every speed and size below is expressed in multiples of it.
pub const SCALE: f32 = 4.0;

/// Global physics settings shared by every room of a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub scale: f32,
    pub tile_size: f32,
    /// Room size in tiles.
    pub room_width: u32,
    pub room_height: u32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub spring_launch_velocity: f32,
    /// Relative speed above which an impact asks for a bump sound.
    pub bump_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            scale: SCALE,
            tile_size: 8.0 * SCALE,
            room_width: 20,
            room_height: 15,
            gravity: 0.25 * SCALE,
            terminal_velocity: 8.0 * SCALE,
            spring_launch_velocity: 3.0 * SCALE,
            bump_speed: SCALE,
        }
    }
}

impl PhysicsConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("scale", self.scale),
            ("tile_size", self.tile_size),
            ("terminal_velocity", self.terminal_velocity),
            ("room_width", self.room_width as f32),
            ("room_height", self.room_height as f32),
        ];
        for (field, value) in checks {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }

    pub fn room_pixel_width(&self) -> f32 {
        self.room_width as f32 * self.tile_size
    }

    pub fn room_pixel_height(&self) -> f32 {
        self.room_height as f32 * self.tile_size
    }

    /// Scales `velocity` down to the terminal speed, keeping its direction.
    pub fn limit_speed(&self, velocity: Vec2) -> Vec2 {
        velocity.clamp_length(self.terminal_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scale() {
        let config = PhysicsConfig::default();
        assert_eq!(config.tile_size, 32.0);
        assert_eq!(config.gravity, 1.0);
        assert_eq!(config.terminal_velocity, 32.0);
        assert_eq!(config.room_pixel_width(), 640.0);
        assert_eq!(config.room_pixel_height(), 480.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PhysicsConfig::from_json(r#"{"tile_size": 8.0}"#).unwrap();
        assert_eq!(config.tile_size, 8.0);
        assert_eq!(config.gravity, 1.0);
    }

    #[test]
    fn rejects_zero_tiles() {
        assert!(matches!(
            PhysicsConfig::from_json(r#"{"tile_size": 0.0}"#),
            Err(ConfigError::InvalidValue { field: "tile_size", .. })
        ));
    }
}
