use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pong_core::{new_match, Config, Frame, Renderer, Side, TickDriver};

mod bot;
mod logging;

use bot::Bot;

/// Headless Pong: two bots play a match, narrated through the log
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Stop after this many ticks even if nobody has won
    #[arg(short, long, default_value_t = 6000)]
    ticks: u64,

    /// Override the configured tick interval
    #[arg(long)]
    interval_ms: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the bots' aim
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Logs a one-line summary of every `every`-th frame at debug level.
struct LogRenderer {
    every: u64,
}

impl Renderer for LogRenderer {
    fn present(&mut self, frame: &Frame) {
        if frame.tick % self.every != 0 {
            return;
        }
        let scores = frame.overlay.as_ref().map(|o| o.scores).unwrap_or_default();
        let shapes: Vec<String> = frame
            .items
            .iter()
            .map(|item| format!("{:?}", item.kind))
            .collect();
        log::debug!(
            "frame {}: {}:{} [{}]",
            frame.tick,
            scores[0],
            scores[1],
            shapes.join(", ")
        );
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(ms) = args.interval_ms {
        config.tick_interval_ms = ms;
        config.validate().context("invalid --interval-ms")?;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = load_config(&args)?;
    let world = new_match(config, Box::new(LogRenderer { every: 100 }));
    let mut driver = TickDriver::from_world(world);
    let input = driver.sender();
    let mut bots = [
        Bot::new(Side::Left, args.seed),
        Bot::new(Side::Right, args.seed.wrapping_add(1)),
    ];

    log::info!(
        "running up to {} ticks every {:?}",
        args.ticks,
        driver.interval()
    );

    let ran = driver.run(|world| {
        let events = world.events();
        if events.ball_hit_paddle {
            log::debug!("tick {}: paddle hit", world.registry().tick_count());
        }
        if world.manager().and_then(|m| m.winner()).is_some()
            || world.registry().tick_count() >= args.ticks
        {
            return ControlFlow::Break(());
        }

        for bot in &mut bots {
            for event in bot.think(world) {
                if input.send(event).is_err() {
                    log::warn!("input channel closed; {:?} bot stopped", bot.side());
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    });

    let world = driver.into_world();
    let manager = world
        .manager()
        .context("match has no game state")?;
    match manager.winner() {
        Some(side) => log::info!(
            "{side:?} wins {}:{} after {ran} ticks",
            manager.score.left,
            manager.score.right
        ),
        None => log::info!(
            "stopped at {}:{} after {ran} ticks",
            manager.score.left,
            manager.score.right
        ),
    }
    Ok(())
}
