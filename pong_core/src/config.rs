use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::board::Aabb;
use crate::components::{CollisionMesh, Side, Transform};
use crate::error::ConfigError;
use crate::params::Params;

/// Keys that drive one paddle. Names follow `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinds {
    pub up: String,
    pub down: String,
    /// `null` unbinds rotation; leaving it out keeps `g`.
    #[serde(default = "default_rotate_key")]
    pub rotate: Option<String>,
}

fn default_rotate_key() -> Option<String> {
    Some("g".to_string())
}

impl KeyBinds {
    pub fn new(up: &str, down: &str) -> Self {
        Self {
            up: up.to_string(),
            down: down.to_string(),
            rotate: default_rotate_key(),
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board_width: f32,
    pub board_height: f32,
    pub wall_thickness: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_rotate_step: f32,
    pub paddle_spin: f32,
    pub paddle_x_fraction: f32,
    pub ball_diameter: f32,
    pub serve_speed: f32,
    pub gravity: f32,
    pub win_score: u32,
    pub tick_interval_ms: u64,
    pub left_keys: KeyBinds,
    pub right_keys: KeyBinds,
    pub start_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_width: Params::BOARD_WIDTH,
            board_height: Params::BOARD_HEIGHT,
            wall_thickness: Params::WALL_THICKNESS,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_speed: Params::PADDLE_SPEED,
            paddle_rotate_step: Params::PADDLE_ROTATE_STEP,
            paddle_spin: Params::PADDLE_SPIN,
            paddle_x_fraction: Params::PADDLE_X_FRACTION,
            ball_diameter: Params::BALL_DIAMETER,
            serve_speed: Params::SERVE_SPEED,
            gravity: Params::GRAVITY,
            win_score: Params::WIN_SCORE,
            tick_interval_ms: Params::TICK_INTERVAL_MS,
            left_keys: KeyBinds::new("w", "s"),
            right_keys: KeyBinds::new("ArrowUp", "ArrowDown"),
            start_key: " ".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.board_width > 0.0 && self.board_height > 0.0) {
            return invalid("board dimensions must be positive");
        }
        if !(self.paddle_width > 0.0 && self.paddle_height > 0.0) {
            return invalid("paddle dimensions must be positive");
        }
        if self.paddle_height > self.board_height || self.paddle_width > self.board_width {
            return invalid("paddle does not fit on the board");
        }
        if !(self.paddle_x_fraction > 0.0 && self.paddle_x_fraction < 0.5) {
            return invalid("paddle_x_fraction must lie in (0, 0.5)");
        }
        let paddle = CollisionMesh::rect(self.paddle_width, self.paddle_height);
        let board = self.board();
        for side in Side::BOTH {
            let spawn = Transform::at(self.paddle_spawn(side));
            if !paddle.world_vertices(&spawn).into_iter().all(|v| board.contains(v)) {
                return invalid("paddle overhangs the board at its spawn point");
            }
        }
        if !(self.ball_diameter > 0.0) {
            return invalid("ball_diameter must be positive");
        }
        if !(self.wall_thickness > 0.0) {
            return invalid("wall_thickness must be positive");
        }
        if self.win_score == 0 {
            return invalid("win_score must be at least 1");
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick_interval_ms must be at least 1");
        }
        for keys in [&self.left_keys, &self.right_keys] {
            if keys.up.is_empty() || keys.down.is_empty() || keys.up == keys.down {
                return invalid("paddle up/down keys must be distinct and non-empty");
            }
        }
        if self.start_key.is_empty() {
            return invalid("start_key must not be empty");
        }
        Ok(())
    }

    /// The playfield, origin at the top-left corner.
    pub fn board(&self) -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::new(self.board_width, self.board_height))
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_diameter * 0.5
    }

    /// Board centre, where the ball starts every round.
    pub fn ball_spawn(&self) -> Vec2 {
        self.board().center()
    }

    /// Starting position of a side's paddle
    pub fn paddle_spawn(&self, side: Side) -> Vec2 {
        let fraction = match side {
            Side::Left => self.paddle_x_fraction,
            Side::Right => 1.0 - self.paddle_x_fraction,
        };
        Vec2::new(self.board_width * fraction, self.board_height * 0.5)
    }

    pub fn keys(&self, side: Side) -> &KeyBinds {
        match side {
            Side::Left => &self.left_keys,
            Side::Right => &self.right_keys,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paddle_spawn() {
        let config = Config::new();
        assert_eq!(
            config.paddle_spawn(Side::Left),
            Vec2::new(128.0, 360.0),
            "Left paddle at 10% of the board"
        );
        assert_eq!(
            config.paddle_spawn(Side::Right),
            Vec2::new(1152.0, 360.0),
            "Right paddle at 90% of the board"
        );
    }

    #[test]
    fn test_config_ball_spawn_is_center() {
        let config = Config::new();
        assert_eq!(config.ball_spawn(), Vec2::new(640.0, 360.0));
        assert_eq!(config.ball_radius(), 20.0);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json_str(r#"{ "win_score": 3, "gravity": 0.0 }"#).unwrap();
        assert_eq!(config.win_score, 3);
        assert_eq!(config.gravity, 0.0);
        assert_eq!(config.board_width, Params::BOARD_WIDTH);
        assert_eq!(config.left_keys.up, "w");
    }

    #[test]
    fn test_invalid_json_values_rejected() {
        let err = Config::from_json_str(r#"{ "win_score": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = Config::from_json_str(r#"{ "paddle_height": 900.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        // 300 wide at x = 128 reaches x = -22.
        let err = Config::from_json_str(r#"{ "paddle_width": 300.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "Paddle must spawn on the board");

        let err = Config::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_custom_key_binds() {
        let config = Config::from_json_str(
            r#"{ "left_keys": { "up": "q", "down": "a" }, "start_key": "Enter" }"#,
        )
        .unwrap();
        assert_eq!(config.keys(Side::Left).up, "q");
        assert_eq!(
            config.keys(Side::Left).rotate.as_deref(),
            Some("g"),
            "Partial override keeps the rotate key"
        );
        assert_eq!(config.keys(Side::Right).up, "ArrowUp");
        assert_eq!(config.start_key, "Enter");
    }

    #[test]
    fn test_rotate_key_can_be_unbound() {
        let config = Config::from_json_str(
            r#"{ "right_keys": { "up": "i", "down": "k", "rotate": null } }"#,
        )
        .unwrap();
        assert_eq!(config.keys(Side::Right).rotate, None);
        assert_eq!(config.keys(Side::Left).rotate.as_deref(), Some("g"));
    }
}
