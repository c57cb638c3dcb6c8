pub mod collision;
pub mod movement;

pub use collision::*;
pub use movement::*;

use crate::world::Registry;

/// One stage of the tick pipeline, run over every entity in order.
pub trait System {
    fn name(&self) -> &'static str;
    fn execute(&mut self, registry: &mut Registry);
}
