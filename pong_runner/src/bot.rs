//! Scripted players for headless matches.

use glam::Vec2;
use pong_core::{Config, GameWorld, KeyEvent, PongGameManager, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic randomness for one bot.
pub struct BotRng(pub StdRng);

impl BotRng {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Tracks the ball and holds the paddle's up/down keys like a person would:
/// press when the target drifts out of reach, release once it is lined up.
pub struct Bot {
    side: Side,
    rng: BotRng,
    held: Option<Direction>,
    aim_offset: f32,
    starts_rounds: bool,
}

impl Bot {
    pub fn new(side: Side, seed: u64) -> Self {
        Self {
            side,
            rng: BotRng::new(seed),
            held: None,
            aim_offset: 0.0,
            starts_rounds: side == Side::Left,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Key events to send before the next tick.
    pub fn think(&mut self, world: &GameWorld) -> Vec<KeyEvent> {
        let mut keys = Vec::new();
        let Some(manager) = world.manager() else {
            return keys;
        };
        let config = world.config();

        if !manager.round_running() {
            if self.starts_rounds && manager.winner().is_none() {
                keys.push(KeyEvent::down(&config.start_key));
            }
            self.release(config, &mut keys);
            return keys;
        }

        if world.events().ball_hit_paddle || world.events().round_started {
            let jitter = config.paddle_height * 0.4;
            self.aim_offset = self.rng.0.gen_range(-jitter..=jitter);
        }

        let Some((paddle, ball, ball_velocity)) = observe(world, &manager, self.side) else {
            return keys;
        };
        let target = self.target_y(config, ball, ball_velocity);
        let diff = target - paddle.y;
        let deadzone = config.paddle_speed;

        let want = if diff < -deadzone {
            Some(Direction::Up)
        } else if diff > deadzone {
            Some(Direction::Down)
        } else {
            None
        };
        if want != self.held {
            self.release(config, &mut keys);
            if let Some(direction) = want {
                let binds = config.keys(self.side);
                let key = match direction {
                    Direction::Up => &binds.up,
                    Direction::Down => &binds.down,
                };
                keys.push(KeyEvent::down(key));
            }
            self.held = want;
        }
        keys
    }

    /// Where the ball will cross this paddle's line, or the middle of the
    /// board while it heads away.
    fn target_y(&self, config: &Config, ball: Vec2, velocity: Vec2) -> f32 {
        let paddle_x = config.paddle_spawn(self.side).x;
        let incoming = match self.side {
            Side::Left => velocity.x < 0.0,
            Side::Right => velocity.x > 0.0,
        };
        if !incoming {
            return config.board_height * 0.5;
        }

        let time_to_reach = (paddle_x - ball.x) / velocity.x;
        let predicted = ball.y + velocity.y * time_to_reach + self.aim_offset;
        let half = config.paddle_height * 0.5;
        predicted.clamp(half, config.board_height - half)
    }

    fn release(&mut self, config: &Config, keys: &mut Vec<KeyEvent>) {
        if let Some(direction) = self.held.take() {
            let binds = config.keys(self.side);
            let key = match direction {
                Direction::Up => &binds.up,
                Direction::Down => &binds.down,
            };
            keys.push(KeyEvent::up(key));
        }
    }
}

fn observe(world: &GameWorld, manager: &PongGameManager, side: Side) -> Option<(Vec2, Vec2, Vec2)> {
    let registry = world.registry();
    let paddle = registry.transform(manager.paddle(side)).ok()?.position;
    let ball = registry.transform(manager.ball).ok()?.position;
    let velocity = registry.physics(manager.ball).ok()?.velocity;
    Some((paddle, ball, velocity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pong_core::{new_match, NullRenderer, Transform};

    fn running_world() -> GameWorld {
        let mut world = new_match(Config::new(), Box::new(NullRenderer));
        world.queue_key(KeyEvent::down(" "));
        world.tick();
        world
    }

    #[test]
    fn test_left_bot_starts_idle_match() {
        let world = new_match(Config::new(), Box::new(NullRenderer));
        let mut left = Bot::new(Side::Left, 1);
        let mut right = Bot::new(Side::Right, 2);

        assert_eq!(left.think(&world), vec![KeyEvent::down(" ")]);
        assert!(right.think(&world).is_empty(), "Only one bot serves");
    }

    #[test]
    fn test_bot_chases_incoming_ball() {
        let mut world = running_world();
        let manager = world.manager().unwrap();
        {
            let registry = world.registry_mut();
            registry.ecs.get::<&mut Transform>(manager.ball).unwrap().position =
                Vec2::new(640.0, 600.0);
            registry.set_velocity(manager.ball, Vec2::new(-15.0, 0.0)).unwrap();
        }
        let mut bot = Bot::new(Side::Left, 7);
        bot.aim_offset = 0.0;

        assert_eq!(bot.think(&world), vec![KeyEvent::down("s")]);
        // Already holding the key; nothing new to send.
        assert!(bot.think(&world).is_empty());
    }

    #[test]
    fn test_bot_releases_when_lined_up() {
        let world = running_world();
        let mut bot = Bot::new(Side::Right, 3);
        bot.held = Some(Direction::Up);

        // The ball heads left, so the right bot wants the centre it sits on.
        assert_eq!(bot.think(&world), vec![KeyEvent::up("ArrowUp")]);
    }

    #[test]
    fn test_same_seed_same_aim() {
        let mut a = Bot::new(Side::Left, 42);
        let mut b = Bot::new(Side::Left, 42);
        let world = running_world();
        a.think(&world);
        b.think(&world);
        assert_eq!(a.aim_offset, b.aim_offset);
    }
}
