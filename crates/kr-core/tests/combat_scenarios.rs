//! End-to-end fights through the public world API

use kr_core::combat::{AttackLevel, AttackType, EffectStrength, EffectType, HitOutcome};
use kr_core::creature::{BodyPart, CreatureFlags, CreatureId, CreatureTemplate, LastingEffect, TribeId};
use kr_core::geom::Vec2;
use kr_core::object::Item;
use kr_core::world::{
    CommandKind, GameEvent, GridLevel, NoOpController, ScriptedController, StatId, World,
};

struct Arena {
    world: World,
    red: TribeId,
    blue: TribeId,
}

fn arena(seed: u64) -> Arena {
    let mut world = World::new(Box::new(GridLevel::new(12, 12)), seed);
    let red = world.add_tribe("red");
    let blue = world.add_tribe("blue");
    world.tribes_mut().make_enemies(red, blue);
    Arena { world, red, blue }
}

fn spawn(world: &mut World, template: CreatureTemplate, tribe: TribeId, pos: Vec2) -> CreatureId {
    world
        .spawn(template, tribe, pos, Box::new(NoOpController))
        .unwrap()
}

fn armed_knight(world: &mut World, tribe: TribeId, pos: Vec2) -> CreatureId {
    let id = spawn(world, CreatureTemplate::humanoid("knight", 18, 14, 100), tribe, pos);
    let sword = world.next_item_id();
    world.give(id, Item::weapon(sword, "sword", AttackType::Cut, 6));
    let equip = world.equip(id, sword).unwrap();
    assert!(world.perform(equip));
    id
}

#[test]
fn test_leg_blow_collapses_creature() {
    let Arena { mut world, red, .. } = arena(1);
    let id = spawn(&mut world, CreatureTemplate::humanoid("squire", 10, 10, 100), red, Vec2::new(4, 4));
    world.injure_body_part(id, BodyPart::Leg, false);

    let c = world.creature(id).unwrap();
    assert_eq!(c.body().injured(BodyPart::Leg), 1);
    assert_eq!(c.body().lost(BodyPart::Leg), 0);
    assert!(c.is_collapsed());
    assert!(world.messages().contains("collapses"));
}

#[test]
fn test_knight_cuts_down_goblin() {
    let Arena { mut world, red, blue } = arena(99);
    let knight = armed_knight(&mut world, red, Vec2::new(3, 3));
    let goblin = spawn(
        &mut world,
        CreatureTemplate::humanoid("goblin", 8, 10, 100).with_flags(CreatureFlags::INNOCENT),
        blue,
        Vec2::new(4, 3),
    );

    let mut blows = 0;
    while world.is_alive(goblin) && blows < 200 {
        world.execute_attack(knight, goblin, None);
        blows += 1;
    }
    assert!(!world.is_alive(goblin));
    assert_eq!(world.creature(knight).unwrap().kills(), &[goblin]);
    assert_eq!(world.stats().get(StatId::Death), 1);
    assert_eq!(world.stats().get(StatId::InnocentKilled), 1);
    assert!(world
        .events()
        .iter()
        .any(|e| *e == GameEvent::Kill { victim: goblin, killer: Some(knight) }));
    assert!(world
        .level()
        .items_at(Vec2::new(4, 3))
        .iter()
        .any(|i| i.name == "goblin corpse"));
    assert_eq!(world.execute_attack(knight, goblin, None), None);
}

#[test]
fn test_scheduled_duel_ends_with_one_standing() {
    let Arena { mut world, red, blue } = arena(5);
    let knight = armed_knight(&mut world, red, Vec2::new(3, 3));
    let orc = spawn(&mut world, CreatureTemplate::humanoid("orc", 10, 10, 100), blue, Vec2::new(4, 4));
    let script = std::iter::repeat_n(
        CommandKind::Attack {
            target: orc,
            level: None,
        },
        100,
    );
    world.set_controller(knight, Box::new(ScriptedController::new(script)));
    world.run_until(100.0);
    assert!(world.is_alive(knight));
    assert!(!world.is_alive(orc));
    assert_eq!(world.living(), vec![knight]);
}

#[test]
fn test_strike_from_stranger_makes_enemy() {
    let mut world = World::new(Box::new(GridLevel::new(6, 6)), 3);
    let villagers = world.add_tribe("villagers");
    let travellers = world.add_tribe("travellers");
    let farmer = spawn(&mut world, CreatureTemplate::humanoid("farmer", 10, 10, 100), villagers, Vec2::new(1, 1));
    let pilgrim = spawn(&mut world, CreatureTemplate::humanoid("pilgrim", 10, 10, 100), travellers, Vec2::new(2, 1));
    assert!(!world.is_enemy(farmer, pilgrim));

    world.execute_attack(pilgrim, farmer, Some(AttackLevel::Low));
    if world.is_alive(farmer) {
        assert!(world.creature(farmer).unwrap().private_enemies().contains(&pilgrim));
        assert!(world.is_enemy(farmer, pilgrim));
    }
}

#[test]
fn test_poisoned_creature_recovers_or_dies_in_time() {
    let Arena { mut world, red, .. } = arena(8);
    let id = spawn(&mut world, CreatureTemplate::humanoid("taster", 10, 10, 100), red, Vec2::new(5, 5));
    world.apply_effect(id, EffectType::Lasting(LastingEffect::Poison), EffectStrength::Normal);
    assert!(world.creature(id).unwrap().is_affected(LastingEffect::Poison));
    world.run_until(300.0);
    if let Some(c) = world.creature(id).filter(|c| !c.is_dead()) {
        assert!(!c.is_affected(LastingEffect::Poison));
        assert!(c.health() > 0.0);
    } else {
        assert!(world.messages().contains("dies of poisoning") || world.messages().contains("dies of bleeding"));
    }
}

#[test]
fn test_sleeping_target_wakes_when_hit() {
    let Arena { mut world, red, blue } = arena(21);
    let knight = armed_knight(&mut world, red, Vec2::new(3, 3));
    let troll = spawn(
        &mut world,
        CreatureTemplate::humanoid("troll", 30, 8, 100),
        blue,
        Vec2::new(3, 4),
    );
    world.apply_effect(troll, EffectType::Lasting(LastingEffect::Sleep), EffectStrength::Strong);
    assert!(world.creature(troll).unwrap().is_affected(LastingEffect::Sleep));

    let mut outcome = None;
    for _ in 0..50 {
        match world.execute_attack(knight, troll, Some(AttackLevel::Middle)) {
            Some(HitOutcome::Dodged) => continue,
            other => {
                outcome = other;
                break;
            }
        }
    }
    assert!(outcome.is_some());
    if world.is_alive(troll) {
        assert!(!world.creature(troll).unwrap().is_affected(LastingEffect::Sleep));
    }
}
