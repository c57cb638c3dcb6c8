//! Round and score bookkeeping for a match.
//!
//! The manager is an ordinary entity with no transform-driven behaviour; the
//! wall hooks call [`award_point`], the start key calls [`start_round`], and
//! [`update`] runs once per tick.

use glam::Vec2;
use hecs::Entity;
use serde::Serialize;

use crate::components::{Side, Transform};
use crate::render::Overlay;
use crate::resources::Score;
use crate::world::Registry;

/// Match states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchPhase {
    /// No round played yet
    Idle,
    RoundRunning,
    /// A point was scored, nobody has won
    RoundEnded,
    MatchWon(Side),
}

/// Actions that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    StartRound,
    PointScored,
}

/// The game-state entity's component.
#[derive(Debug, Clone, PartialEq)]
pub struct PongGameManager {
    pub left_paddle: Entity,
    pub right_paddle: Entity,
    pub ball: Entity,
    pub score: Score,
    phase: MatchPhase,
    overlay: Overlay,
}

impl PongGameManager {
    pub fn new(left_paddle: Entity, right_paddle: Entity, ball: Entity) -> Self {
        let mut manager = Self {
            left_paddle,
            right_paddle,
            ball,
            score: Score::new(),
            phase: MatchPhase::Idle,
            overlay: Overlay::default(),
        };
        manager.overlay = Overlay::for_manager(&manager);
        manager
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn round_running(&self) -> bool {
        self.phase == MatchPhase::RoundRunning
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::MatchWon(side) => Some(side),
            _ => None,
        }
    }

    /// Overlay as of the end of the last tick.
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn paddle(&self, side: Side) -> Entity {
        match side {
            Side::Left => self.left_paddle,
            Side::Right => self.right_paddle,
        }
    }

    pub fn check_win_condition(&self, win_score: u32) -> Option<Side> {
        self.score.has_winner(win_score)
    }

    /// Next phase for `action`, if the transition is allowed.
    pub fn next_phase(&self, action: MatchAction) -> Option<MatchPhase> {
        match (self.phase, action) {
            (MatchPhase::Idle, MatchAction::StartRound) => Some(MatchPhase::RoundRunning),
            (MatchPhase::RoundEnded, MatchAction::StartRound) => Some(MatchPhase::RoundRunning),
            (MatchPhase::MatchWon(_), MatchAction::StartRound) => Some(MatchPhase::RoundRunning),
            (MatchPhase::RoundRunning, MatchAction::PointScored) => Some(MatchPhase::RoundEnded),
            _ => None,
        }
    }

    /// Clear the tally and the winner.
    pub fn reset_game(&mut self) {
        self.score.reset();
        if self.winner().is_some() {
            self.phase = MatchPhase::Idle;
        }
    }

    /// Promote to `MatchWon` when a side has reached `win_score` and no round
    /// is running.
    fn evaluate_win(&mut self, win_score: u32) -> Option<Side> {
        if self.round_running() {
            return None;
        }
        let winner = self.check_win_condition(win_score)?;
        if self.phase == MatchPhase::MatchWon(winner) {
            return None;
        }
        self.phase = MatchPhase::MatchWon(winner);
        Some(winner)
    }

    /// Serve toward the side with fewer points; ties go left.
    fn serve_velocity(&self, speed: f32) -> Vec2 {
        if self.score.right < self.score.left {
            Vec2::new(speed, 0.0)
        } else {
            Vec2::new(-speed, 0.0)
        }
    }
}

/// Start a round if none is running. A finished match is reset first.
/// Returns whether a round started.
pub fn start_round(registry: &mut Registry, manager: Entity) -> bool {
    let serve_speed = registry.config.serve_speed;
    let (ball, velocity, score) = {
        let Ok(mut state) = registry.ecs.get::<&mut PongGameManager>(manager) else {
            return false;
        };
        let Some(next) = state.next_phase(MatchAction::StartRound) else {
            return false;
        };
        if state.winner().is_some() {
            state.reset_game();
        }
        state.phase = next;
        (state.ball, state.serve_velocity(serve_speed), state.score)
    };

    if let Err(err) = registry.set_velocity(ball, velocity) {
        log::warn!("cannot serve: {err}");
    }
    registry.events.round_started = true;
    log::info!(
        "round started at {}:{}, serving {}",
        score.left,
        score.right,
        if velocity.x > 0.0 { "right" } else { "left" }
    );
    true
}

/// Give `side` a point and end the round. Ignored unless a round is running.
pub fn award_point(registry: &mut Registry, side: Side) {
    let Some(manager) = registry.game_manager() else {
        return;
    };
    {
        let Ok(mut state) = registry.ecs.get::<&mut PongGameManager>(manager) else {
            return;
        };
        if state.next_phase(MatchAction::PointScored).is_none() {
            log::trace!("point for {side:?} ignored: no round running");
            return;
        }
        state.score.increment(side);
        log::info!("{side:?} scores: {}:{}", state.score.left, state.score.right);
    }
    registry.events.record_score(side);
    reset_round(registry, manager);
}

/// End the running round: evaluate the win condition, stop the ball and put
/// it back on the centre spot. Scores are never touched.
pub fn reset_round(registry: &mut Registry, manager: Entity) {
    let win_score = registry.config.win_score;
    let spawn = registry.config.ball_spawn();
    let (ball, winner) = {
        let Ok(mut state) = registry.ecs.get::<&mut PongGameManager>(manager) else {
            return;
        };
        if let Some(next) = state.next_phase(MatchAction::PointScored) {
            state.phase = next;
        }
        (state.ball, state.evaluate_win(win_score))
    };

    if let Some(side) = winner {
        registry.events.match_won = Some(side);
        log::info!("{side:?} won the match");
    }
    if let Err(err) = registry.set_velocity(ball, Vec2::ZERO) {
        log::warn!("cannot stop ball: {err}");
    }
    if let Ok(mut transform) = registry.ecs.get::<&mut Transform>(ball) {
        transform.position = spawn;
    }
}

/// Per-tick game-state work: settle the win condition and refresh the
/// overlay handed to the renderer.
pub fn update(registry: &mut Registry, manager: Entity) {
    let win_score = registry.config.win_score;
    let Ok(mut state) = registry.ecs.get::<&mut PongGameManager>(manager) else {
        return;
    };
    let winner = state.evaluate_win(win_score);
    state.overlay = Overlay::for_manager(&state);
    drop(state);

    if let Some(side) = winner {
        registry.events.match_won = Some(side);
        log::info!("{side:?} won the match");
    }
}
