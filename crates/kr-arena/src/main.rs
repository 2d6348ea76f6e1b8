//! Headless arena
//!
//! Pits two small war bands against each other and narrates the fight.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use kr_core::combat::{AttackType, EffectType};
use kr_core::creature::{
    CreatureFlags, CreatureId, CreatureSize, CreatureTemplate, LastingEffect, SkillId,
};
use kr_core::geom::Vec2;
use kr_core::object::Item;
use kr_core::world::{Audience, CommandKind, Controller, GridLevel, Tuning, World};

/// Creature combat arena
#[derive(Parser, Debug)]
#[command(name = "kr-arena")]
#[command(author, version, about = "Run a headless skirmish between two war bands", long_about = None)]
struct Args {
    /// RNG seed
    #[arg(short, long, default_value_t = 7)]
    seed: u64,

    /// Tuning overrides (JSON)
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    /// Stop after this much simulation time
    #[arg(long, default_value_t = 200.0)]
    max_time: f64,

    /// Write a snapshot of the final state here
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print messages only the acting creature would see
    #[arg(short, long)]
    verbose: bool,
}

/// Walks toward the nearest visible enemy and hits it
#[derive(Debug, Default)]
struct MeleeController;

impl Controller for MeleeController {
    fn make_move(&mut self, world: &World, me: CreatureId) -> Option<CommandKind> {
        let c = world.creature(me)?;
        let pos = c.position();
        let target = c
            .visible_enemies()
            .iter()
            .filter_map(|id| world.creature(*id))
            .filter(|e| !e.is_dead())
            .min_by_key(|e| (e.position().dist8(pos), e.id))?;
        let delta = target.position() - pos;
        if delta.length8() == 1 {
            return Some(CommandKind::Attack {
                target: target.id,
                level: None,
            });
        }
        let step = Vec2::new(delta.x.signum(), delta.y.signum());
        if world.level().can_occupy(pos + step) {
            Some(CommandKind::Move(step))
        } else {
            None
        }
    }
}

fn build_arena(seed: u64, tuning: Tuning) -> World {
    let mut level = GridLevel::new(16, 9);
    for y in 2..7 {
        level.set_wall(Vec2::new(8, y), y != 4);
    }
    let mut world = World::with_tuning(Box::new(level), seed, tuning);
    let keepers = world.add_tribe("keepers");
    let raiders = world.add_tribe("raiders");
    world.tribes_mut().make_enemies(keepers, raiders);

    let knight = CreatureTemplate::humanoid("knight", 18, 14, 100).with_skill(SkillId::WeaponMelee, 0.6);
    let archer = CreatureTemplate::humanoid("archer", 12, 16, 110);
    let golem = CreatureTemplate::humanoid("stone golem", 22, 8, 70)
        .with_size(CreatureSize::Large)
        .with_flags(CreatureFlags::NOT_LIVING)
        .with_barehanded(AttackType::Punch, 4);
    let orc = CreatureTemplate::humanoid("orc", 14, 12, 100);
    let spider = CreatureTemplate::beast("spider", 6, 16, 120)
        .with_flags(CreatureFlags::HARMLESS_APPLY)
        .with_attack_effect(EffectType::Lasting(LastingEffect::Poison));
    let wolf = CreatureTemplate::beast("wolf", 12, 15, 140);

    let bands = [
        (keepers, vec![(knight, Vec2::new(2, 3)), (archer, Vec2::new(2, 5)), (golem, Vec2::new(1, 4))]),
        (raiders, vec![(orc, Vec2::new(13, 3)), (spider, Vec2::new(13, 5)), (wolf, Vec2::new(14, 4))]),
    ];
    for (tribe, members) in bands {
        for (template, pos) in members {
            let name = template.name.clone();
            match world.spawn(template, tribe, pos, Box::new(MeleeController)) {
                Some(id) if name == "knight" || name == "orc" => {
                    let item_id = world.next_item_id();
                    let weapon = if name == "knight" {
                        Item::weapon(item_id, "sword", AttackType::Cut, 6)
                    } else {
                        Item::weapon(item_id, "axe", AttackType::Cut, 5)
                    };
                    world.give(id, weapon);
                    if let Ok(equip) = world.equip(id, item_id) {
                        world.perform(equip);
                    }
                }
                Some(_) => {}
                None => error!(%name, %pos, "could not place creature"),
            }
        }
    }
    world.messages_mut().clear();
    world
}

fn band_alive(world: &World, tribe_name: &str) -> bool {
    world
        .living()
        .into_iter()
        .filter_map(|id| world.creature(id))
        .any(|c| world.tribes().get(c.tribe()).is_some_and(|t| t.name == tribe_name))
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(t) => t,
            Err(e) => {
                error!(path = %path.display(), error = %e, "cannot load tuning");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let mut world = build_arena(args.seed, tuning);
    info!(seed = args.seed, "arena ready");
    let mut printed = 0;
    let mut clock = 0.0;
    while clock < args.max_time && band_alive(&world, "keepers") && band_alive(&world, "raiders") {
        clock += 1.0;
        world.run_until(clock);
        for message in world.messages().iter().skip(printed) {
            match message.audience {
                Audience::Everyone | Audience::Onlookers => println!("{}", message.third_person),
                Audience::Subject if args.verbose => println!("  ({})", message.first_person),
                Audience::Subject => {}
            }
        }
        printed = world.messages().len();
    }

    println!();
    for id in world.ids() {
        if let Some(c) = world.creature(id) {
            let state = if c.is_dead() { "dead" } else { "alive" };
            println!("{:<12} {:<6} {}", c.name, state, c.description());
        }
    }

    if let Some(path) = &args.save {
        if let Err(e) = kr_save::save_world(&world, args.seed, path) {
            error!(path = %path.display(), error = %e, "cannot save snapshot");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
