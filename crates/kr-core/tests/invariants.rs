//! Properties that hold whatever happens to a creature

use kr_core::creature::{BodyPart, CreatureTemplate, LastingEffect, ModifierType};
use kr_core::geom::Vec2;
use kr_core::world::{GridLevel, MessageLog, NoOpController, StatId, World};
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn lone_world(template: CreatureTemplate) -> (World, kr_core::creature::CreatureId) {
    let mut world = World::new(Box::new(GridLevel::new(8, 8)), 17);
    let tribe = world.add_tribe("solitary");
    let id = world
        .spawn(template, tribe, Vec2::new(3, 3), Box::new(NoOpController))
        .unwrap();
    (world, id)
}

fn body_part() -> impl Strategy<Value = BodyPart> {
    prop_oneof![
        Just(BodyPart::Arm),
        Just(BodyPart::Leg),
        Just(BodyPart::Wing),
        Just(BodyPart::Head),
    ]
}

proptest! {
    #[test]
    fn prop_body_stays_consistent(
        blows in prop::collection::vec((body_part(), any::<bool>()), 0..30),
    ) {
        let (mut world, id) = lone_world(CreatureTemplate::humanoid("dummy", 12, 12, 100));
        for (part, sever) in blows {
            world.injure_body_part(id, part, sever);
            let body = world.creature(id).unwrap().body();
            prop_assert!(body.is_consistent());
            prop_assert!(body.healthy(part) >= 0);
        }
    }

    #[test]
    fn prop_modifiers_never_negative(
        strength in 0i32..40,
        dexterity in 0i32..40,
        wounds in prop::collection::vec(body_part(), 0..8),
        panic in any::<bool>(),
    ) {
        let (mut world, id) = lone_world(CreatureTemplate::humanoid("recruit", strength, dexterity, 100));
        for part in wounds {
            world.injure_body_part(id, part, false);
        }
        if panic {
            let mut log = MessageLog::new();
            world.creature_mut(id).unwrap().add_effect(LastingEffect::Panic, 10.0, false, &mut log);
        }
        let c = world.creature(id).unwrap();
        for kind in ModifierType::iter() {
            prop_assert!(c.modifier(kind) >= 0, "{kind} went negative");
        }
    }

    #[test]
    fn prop_health_stays_in_bounds(
        steps in prop::collection::vec((0.0f64..0.6, 0.0f64..0.6), 1..20),
    ) {
        let (mut world, id) = lone_world(CreatureTemplate::humanoid("patient", 12, 12, 100));
        for (hurt, cure) in steps {
            let mut log = MessageLog::new();
            let c = world.creature_mut(id).unwrap();
            c.bleed(hurt);
            c.heal(cure, false, &mut log);
            prop_assert!(c.health() <= 1.0);
        }
        world.tick(1000.0);
        prop_assert!(world.creature(id).unwrap().health() >= 0.0);
    }

    #[test]
    fn prop_effect_lasts_exactly_its_duration(duration in 1u32..100, elapsed in 0u32..200) {
        let (mut world, id) = lone_world(CreatureTemplate::humanoid("dreamer", 12, 12, 100));
        let mut log = MessageLog::new();
        world
            .creature_mut(id)
            .unwrap()
            .add_effect(LastingEffect::Blind, duration as f64, false, &mut log);
        world.tick(elapsed as f64);
        let blind = world.creature(id).unwrap().is_affected(LastingEffect::Blind);
        prop_assert_eq!(blind, elapsed <= duration);
    }

    #[test]
    fn prop_death_counted_once(calls in 1usize..6, drop in any::<bool>()) {
        let (mut world, id) = lone_world(CreatureTemplate::humanoid("victim", 12, 12, 100));
        for _ in 0..calls {
            world.die(id, None, drop, drop);
        }
        prop_assert_eq!(world.stats().get(StatId::Death), 1);
        prop_assert_eq!(world.level().items_at(Vec2::new(3, 3)).len(), usize::from(drop));
        prop_assert!(!world.is_alive(id));
    }

    #[test]
    fn prop_everyone_reaches_the_horizon(speeds in prop::collection::vec(20i32..300, 1..5)) {
        let mut world = World::new(Box::new(GridLevel::new(8, 8)), 2);
        let tribe = world.add_tribe("runners");
        for (i, speed) in speeds.iter().enumerate() {
            world.spawn(
                CreatureTemplate::humanoid("runner", 10, 10, *speed),
                tribe,
                Vec2::new(i as i32, 0),
                Box::new(NoOpController),
            );
        }
        world.run_until(20.0);
        for id in world.living() {
            prop_assert!(world.creature(id).unwrap().time() >= 20.0);
        }
    }
}
