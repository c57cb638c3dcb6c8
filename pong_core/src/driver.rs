//! Fixed-interval tick loop.
//!
//! Key events may come from any thread through an [`InputSender`]; they are
//! queued and applied at the start of the next tick, never mid-tick.

use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crate::input::KeyEvent;
use crate::world::GameWorld;

pub type InputSender = Sender<KeyEvent>;

pub struct TickDriver {
    world: GameWorld,
    interval: Duration,
    input_tx: Sender<KeyEvent>,
    input_rx: Receiver<KeyEvent>,
}

impl TickDriver {
    pub fn new(world: GameWorld, interval: Duration) -> Self {
        let (input_tx, input_rx) = mpsc::channel();
        Self {
            world,
            interval,
            input_tx,
            input_rx,
        }
    }

    /// Driver ticking at the world's configured interval.
    pub fn from_world(world: GameWorld) -> Self {
        let interval = world.config().tick_interval();
        Self::new(world, interval)
    }

    pub fn sender(&self) -> InputSender {
        self.input_tx.clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    pub fn into_world(self) -> GameWorld {
        self.world
    }

    /// Hand over input received since the last tick, then tick once.
    pub fn step(&mut self) {
        while let Ok(event) = self.input_rx.try_recv() {
            self.world.queue_key(event);
        }
        self.world.tick();
    }

    /// Tick `ticks` times back to back, without pacing.
    pub fn run_for(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Tick once per interval until `on_tick` breaks. Returns the number of
    /// ticks run.
    ///
    /// Pacing follows a monotonic clock. A tick that overruns its slot is
    /// logged and the schedule restarts from now rather than bursting to
    /// catch up.
    pub fn run<F>(&mut self, mut on_tick: F) -> u64
    where
        F: FnMut(&GameWorld) -> ControlFlow<()>,
    {
        let mut ticks = 0;
        let mut deadline = Instant::now() + self.interval;

        loop {
            self.step();
            ticks += 1;
            if on_tick(&self.world).is_break() {
                return ticks;
            }

            let now = Instant::now();
            if now < deadline {
                std::thread::sleep(deadline - now);
                deadline += self.interval;
            } else {
                log::warn!(
                    "tick {} overran its {:?} slot by {:?}",
                    self.world.registry().tick_count(),
                    self.interval,
                    now - deadline
                );
                deadline = now + self.interval;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Side;
    use crate::config::Config;
    use crate::render::NullRenderer;
    use glam::Vec2;

    fn driver() -> TickDriver {
        let world = crate::new_match(Config::new(), Box::new(NullRenderer));
        TickDriver::from_world(world)
    }

    fn left_paddle_position(driver: &TickDriver) -> Vec2 {
        let registry = driver.world().registry();
        let manager = driver.world().manager().unwrap();
        registry.transform(manager.paddle(Side::Left)).unwrap().position
    }

    #[test]
    fn test_interval_comes_from_config() {
        assert_eq!(driver().interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_queued_input_applies_at_next_tick() {
        let mut driver = driver();
        driver.sender().send(KeyEvent::down("w")).unwrap();
        assert_eq!(
            left_paddle_position(&driver),
            Vec2::new(128.0, 360.0),
            "Nothing happens before a tick"
        );

        driver.step();
        assert_eq!(left_paddle_position(&driver), Vec2::new(128.0, 350.0));
    }

    #[test]
    fn test_input_from_another_thread() {
        let mut driver = driver();
        let tx = driver.sender();
        std::thread::spawn(move || {
            tx.send(KeyEvent::down(" ")).unwrap();
        })
        .join()
        .unwrap();

        driver.step();
        assert!(driver.world().manager().unwrap().round_running());
        assert!(driver.world().events().round_started);
    }

    #[test]
    fn test_run_for_counts_ticks() {
        let mut driver = driver();
        driver.run_for(25);
        assert_eq!(driver.world().registry().tick_count(), 25);
    }

    #[test]
    fn test_run_stops_when_callback_breaks() {
        let world = crate::new_match(Config::new(), Box::new(NullRenderer));
        let mut driver = TickDriver::new(world, Duration::from_millis(1));

        let ran = driver.run(|world| {
            if world.registry().tick_count() >= 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert_eq!(ran, 5);
        assert_eq!(driver.into_world().registry().tick_count(), 5);
    }
}
