//! The registry that owns every entity, and the world that ticks it.

use glam::Vec2;
use hecs::{Entity, EntityBuilder};

use crate::components::{CollisionMesh, ComponentKind, EntityKind, PhysicsBody, Transform};
use crate::config::Config;
use crate::error::WorldError;
use crate::game_state::PongGameManager;
use crate::hooks;
use crate::input::{self, KeyEvent};
use crate::render::{self, Frame};
use crate::resources::Events;
use crate::systems::System;

/// Entity storage plus the state every system may read: the tick order,
/// the configuration and this tick's events.
pub struct Registry {
    pub ecs: hecs::World,
    order: Vec<Entity>,
    pub config: Config,
    pub events: Events,
    tick: u64,
}

impl Registry {
    pub fn new(config: Config) -> Self {
        Self {
            ecs: hecs::World::new(),
            order: Vec::new(),
            config,
            events: Events::new(),
            tick: 0,
        }
    }

    /// Spawn an entity at the end of the tick order.
    pub fn spawn(&mut self, builder: &mut EntityBuilder) -> Entity {
        let entity = self.ecs.spawn(builder.build());
        self.order.push(entity);
        entity
    }

    pub fn despawn(&mut self, entity: Entity) -> Result<(), WorldError> {
        self.ecs.despawn(entity)?;
        self.order.retain(|e| *e != entity);
        Ok(())
    }

    /// Entities in insertion order; systems visit them in this order.
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn kind(&self, entity: Entity) -> Option<EntityKind> {
        self.ecs.get::<&EntityKind>(entity).ok().map(|k| *k)
    }

    pub fn has_component(&self, entity: Entity, kind: ComponentKind) -> bool {
        let Ok(entity_ref) = self.ecs.entity(entity) else {
            return false;
        };
        match kind {
            ComponentKind::Transform => entity_ref.has::<Transform>(),
            ComponentKind::PhysicsBody => entity_ref.has::<PhysicsBody>(),
            ComponentKind::CollisionMesh => entity_ref.has::<CollisionMesh>(),
        }
    }

    pub fn transform(&self, entity: Entity) -> Result<Transform, WorldError> {
        self.ecs
            .get::<&Transform>(entity)
            .map(|t| *t)
            .map_err(|_| self.missing(entity, ComponentKind::Transform))
    }

    pub fn physics(&self, entity: Entity) -> Result<PhysicsBody, WorldError> {
        self.ecs
            .get::<&PhysicsBody>(entity)
            .map(|b| *b)
            .map_err(|_| self.missing(entity, ComponentKind::PhysicsBody))
    }

    pub fn mesh(&self, entity: Entity) -> Result<CollisionMesh, WorldError> {
        self.ecs
            .get::<&CollisionMesh>(entity)
            .map(|m| (*m).clone())
            .map_err(|_| self.missing(entity, ComponentKind::CollisionMesh))
    }

    pub fn set_velocity(&mut self, entity: Entity, velocity: Vec2) -> Result<(), WorldError> {
        let mut body = self
            .ecs
            .get::<&mut PhysicsBody>(entity)
            .map_err(|_| self.missing(entity, ComponentKind::PhysicsBody))?;
        body.velocity = velocity;
        Ok(())
    }

    /// The game-state entity, if the match has one.
    pub fn game_manager(&self) -> Option<Entity> {
        self.ecs
            .query::<&PongGameManager>()
            .iter()
            .next()
            .map(|(entity, _)| entity)
    }

    fn missing(&self, entity: Entity, kind: ComponentKind) -> WorldError {
        if self.ecs.contains(entity) {
            WorldError::MissingComponent(kind)
        } else {
            WorldError::NoSuchEntity
        }
    }
}

/// Registry plus the ordered system pipeline.
pub struct GameWorld {
    registry: Registry,
    systems: Vec<Box<dyn System>>,
    pending_keys: Vec<KeyEvent>,
}

impl GameWorld {
    pub fn new(config: Config) -> Self {
        Self {
            registry: Registry::new(config),
            systems: Vec::new(),
            pending_keys: Vec::new(),
        }
    }

    pub fn add_system(&mut self, system: Box<dyn System>) {
        log::debug!("adding system {}", system.name());
        self.systems.push(system);
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn add_entity(&mut self, builder: &mut EntityBuilder) -> Entity {
        self.registry.spawn(builder)
    }

    /// Not used by the match itself; hosts may drop entities between ticks.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<(), WorldError> {
        self.registry.despawn(entity)?;
        log::debug!("removed entity {entity:?}");
        Ok(())
    }

    /// One tick: queued key events, every system over all entities, then
    /// every entity's own update.
    pub fn tick(&mut self) {
        self.registry.events.clear();

        for event in std::mem::take(&mut self.pending_keys) {
            input::apply_key(&mut self.registry, &event);
        }

        for system in &mut self.systems {
            system.execute(&mut self.registry);
        }

        for entity in self.registry.entities().to_vec() {
            hooks::update(&mut self.registry, entity);
        }

        self.registry.tick += 1;
    }

    /// Apply a key event right away. Events it records are cleared by the
    /// next tick.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        input::apply_key(&mut self.registry, event);
    }

    /// Hold a key event until the start of the next tick.
    pub fn queue_key(&mut self, event: KeyEvent) {
        self.pending_keys.push(event);
    }

    /// Move an entity through its own move rule (paddles are bounds-checked).
    pub fn move_entity(&mut self, entity: Entity, delta: Vec2) {
        hooks::translate(&mut self.registry, entity, delta);
    }

    /// Snapshot of the current state for a renderer.
    pub fn frame(&self) -> Frame {
        render::capture(&self.registry)
    }

    /// Copy of the game-state component.
    pub fn manager(&self) -> Option<PongGameManager> {
        let entity = self.registry.game_manager()?;
        self.registry
            .ecs
            .get::<&PongGameManager>(entity)
            .ok()
            .map(|m| (*m).clone())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn events(&self) -> &Events {
        &self.registry.events
    }

    pub fn config(&self) -> &Config {
        &self.registry.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Ball;

    struct Counter(std::rc::Rc<std::cell::Cell<u32>>);

    impl System for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn execute(&mut self, _registry: &mut Registry) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn ball_builder(pos: Vec2) -> EntityBuilder {
        let mut builder = EntityBuilder::new();
        builder.add(EntityKind::Ball).add(Ball).add(Transform::at(pos));
        builder
    }

    #[test]
    fn test_tick_runs_every_system() {
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut world = GameWorld::new(Config::new());
        world.add_system(Box::new(Counter(calls.clone())));
        world.add_system(Box::new(Counter(calls.clone())));

        world.tick();
        world.tick();

        assert_eq!(calls.get(), 4);
        assert_eq!(world.registry().tick_count(), 2);
        assert_eq!(world.system_names(), vec!["counter", "counter"]);
    }

    #[test]
    fn test_queued_key_waits_for_tick() {
        let mut world = GameWorld::new(Config::new());
        let mut builder = EntityBuilder::new();
        builder.add(EntityKind::GameState).add(crate::PongGameManager::new(
            hecs::Entity::DANGLING,
            hecs::Entity::DANGLING,
            hecs::Entity::DANGLING,
        ));
        world.add_entity(&mut builder);

        world.queue_key(KeyEvent::down(" "));
        assert!(!world.manager().unwrap().round_running());

        world.tick();
        assert!(world.manager().unwrap().round_running());
        assert!(world.events().round_started, "Input events survive the tick that applied them");
    }

    #[test]
    fn test_entities_keep_insertion_order() {
        let mut world = GameWorld::new(Config::new());
        let a = world.add_entity(&mut ball_builder(Vec2::ZERO));
        let b = world.add_entity(&mut ball_builder(Vec2::ONE));
        let c = world.add_entity(&mut ball_builder(Vec2::X));
        assert_eq!(world.registry().entities(), &[a, b, c]);

        world.remove_entity(b).unwrap();
        assert_eq!(world.registry().entities(), &[a, c]);
        assert_eq!(world.remove_entity(b), Err(WorldError::NoSuchEntity));
    }

    #[test]
    fn test_component_lookup() {
        let mut world = GameWorld::new(Config::new());
        let ball = world.add_entity(&mut ball_builder(Vec2::new(3.0, 4.0)));
        let registry = world.registry();

        assert_eq!(registry.kind(ball), Some(EntityKind::Ball));
        assert_eq!(registry.transform(ball).unwrap().position, Vec2::new(3.0, 4.0));
        assert!(!registry.has_component(ball, ComponentKind::PhysicsBody));
        assert_eq!(
            registry.physics(ball),
            Err(WorldError::MissingComponent(ComponentKind::PhysicsBody))
        );
        assert_eq!(
            registry.mesh(ball),
            Err(WorldError::MissingComponent(ComponentKind::CollisionMesh))
        );
    }

    #[test]
    fn test_missing_transform_is_not_a_missing_entity() {
        let mut world = GameWorld::new(Config::new());
        let mut builder = EntityBuilder::new();
        builder.add(EntityKind::Wall);
        let bare = world.add_entity(&mut builder);
        let registry = world.registry();

        assert!(!registry.has_component(bare, ComponentKind::Transform));
        assert_eq!(
            registry.transform(bare),
            Err(WorldError::MissingComponent(ComponentKind::Transform))
        );

        world.remove_entity(bare).unwrap();
        assert_eq!(world.registry().transform(bare), Err(WorldError::NoSuchEntity));
    }
}
