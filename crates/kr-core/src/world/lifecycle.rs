//! Death, consumption and departure
//!
//! Every way a creature leaves the simulation goes through here. Removal is
//! terminal: the creature stays in the world's table so messages and
//! history can still name it, but it is off the level, out of its tribe, and
//! driven by a [`NoOpController`].

use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, info};

use super::message::sentence;
use super::{GameEvent, MsgType, NoOpController, StatId, World};
use crate::combat::{AttackType, EffectType};
use crate::consts::{HUMANOID_ARMS, HUMANOID_HEADS, HUMANOID_LEGS};
use crate::creature::{
    AttrType, BodyPart, Creature, CreatureFlags, CreatureId, CreatureSize, Gender, LastingEffect,
    SkillId, part_count_name,
};
use crate::object::Item;

impl World {
    /// Kill a creature.
    ///
    /// With `drop_inventory` the creature's items spill onto its square, and
    /// with `drop_corpse` as well a corporeal creature leaves a corpse. Does
    /// nothing if the creature is already dead. Narrating the death is up to
    /// the caller.
    pub fn die(
        &mut self,
        victim: CreatureId,
        attacker: Option<CreatureId>,
        drop_inventory: bool,
        drop_corpse: bool,
    ) {
        let Some(c) = self.creatures.get_mut(&victim) else {
            return;
        };
        if c.dead {
            debug!(%victim, "already dead");
            return;
        }
        c.last_attacker = attacker;
        let pos = c.position();
        let tribe = c.tribe();
        let innocent = c.flags.contains(CreatureFlags::INNOCENT);
        let victim_points = c.difficulty_points();
        let victim_level = c.exp_level_f64();
        let inventory = if drop_inventory {
            c.equipment.take_all()
        } else {
            Vec::new()
        };
        c.dead = true;
        c.health = c.health.max(0.0);
        let corpse = (drop_inventory && drop_corpse && c.is_corporeal())
            .then(|| (format!("{} corpse", c.name), c.weight));
        info!(creature = %c.name, %victim, killer = ?attacker, "died");

        if let Some(controller) = self.controllers.get_mut(&victim) {
            controller.on_killed(victim, attacker);
        }
        self.level.drop_items(pos, inventory);
        if let Some((name, weight)) = corpse {
            let id = self.next_item_id();
            self.level.drop_item(pos, Item::corpse(id, name, weight));
        }
        if self.level.creature_at(pos) == Some(victim) {
            self.level.remove_creature(pos);
        }
        if let Some(t) = self.tribes.get_mut(tribe) {
            t.remove_member(victim);
        }
        self.events.push(GameEvent::Kill {
            victim,
            killer: attacker,
        });

        if let Some(killer_id) = attacker {
            if let Some(killer) = self.creatures.get_mut(&killer_id).filter(|k| !k.dead) {
                killer.kills.push(victim);
                killer.on_kill(victim_points, victim_level, &mut self.rng, &self.tuning);
                self.tribes
                    .on_member_killed(tribe, killer_id, self.tuning.member_kill_standing);
            }
        }
        if innocent {
            self.stats.add(StatId::InnocentKilled);
        }
        self.stats.add(StatId::Death);
        self.controllers.insert(victim, Box::new(NoOpController));
    }

    /// `consumer` absorbs `target`: body parts, better traits and skills may
    /// carry over, then the target dies leaving nothing behind.
    pub(crate) fn consume_creature(&mut self, consumer: CreatureId, target: CreatureId) {
        if consumer == target || !self.is_alive(consumer) || !self.is_alive(target) {
            return;
        }
        let Some(other) = self.creatures.get(&target) else {
            return;
        };
        let absorbed = Absorbed::from(other);
        let chance = self.tuning.consume_trait_chance;
        let Some(me) = self.creatures.get_mut(&consumer) else {
            return;
        };
        self.messages.you(me, MsgType::Consume, &absorbed.the_name);
        let mut adjectives: Vec<&'static str> = Vec::new();

        for part in [BodyPart::Arm, BodyPart::Leg, BodyPart::Wing, BodyPart::Head] {
            let theirs = absorbed.parts[part.index()];
            if theirs > me.body.count(part) && self.rng.chance(chance) {
                let added = me.body.grow_to(part, theirs);
                if added > 0 {
                    self.messages
                        .you(me, MsgType::Grow, part_count_name(part, added));
                }
            }
        }
        if absorbed.humanoid
            && !me.is_humanoid()
            && me.body.count(BodyPart::Arm) >= HUMANOID_ARMS
            && me.body.count(BodyPart::Leg) >= HUMANOID_LEGS
            && me.body.count(BodyPart::Head) >= HUMANOID_HEADS
        {
            me.flags.insert(CreatureFlags::HUMANOID);
            self.messages.you(me, MsgType::Become, "a humanoid");
        }

        for (kind, adjective) in [
            (AttrType::Strength, "stronger"),
            (AttrType::Dexterity, "more agile"),
            (AttrType::Speed, "faster"),
        ] {
            let i = kind.index();
            if absorbed.attr[i] > me.attr[i] && self.rng.chance(chance) {
                me.attr[i] = absorbed.attr[i];
                adjectives.push(adjective);
            }
        }
        if absorbed.size > me.size && self.rng.chance(chance) {
            me.size = absorbed.size;
            adjectives.push("larger");
        }
        if absorbed.weight > me.weight && self.rng.chance(chance) {
            me.weight = absorbed.weight;
        }
        if absorbed.barehanded_damage > me.barehanded_damage && self.rng.chance(chance) {
            me.barehanded_damage = absorbed.barehanded_damage;
            adjectives.push("more dangerous");
        }
        if me.barehanded_attack.is_none()
            && absorbed.barehanded_attack.is_some()
            && self.rng.chance(chance)
        {
            me.barehanded_attack = absorbed.barehanded_attack;
        }
        if me.attack_effect.is_none() && absorbed.attack_effect.is_some() && self.rng.chance(chance)
        {
            me.attack_effect = absorbed.attack_effect;
        }
        if me.passive_attack.is_none()
            && absorbed.passive_attack.is_some()
            && self.rng.chance(chance)
        {
            me.passive_attack = absorbed.passive_attack;
        }
        if me.gender != absorbed.gender
            && absorbed.gender != Gender::It
            && self.rng.chance(chance)
        {
            me.gender = absorbed.gender;
            adjectives.push(match absorbed.gender {
                Gender::Male => "more masculine",
                Gender::Female | Gender::It => "more feminine",
            });
        }

        let mut skilled = false;
        for (skill, level) in &absorbed.skills {
            let better = if skill.is_discrete() {
                skill.transfers_on_consumption() && !me.skills.has(*skill)
            } else {
                *level > me.skills.level(*skill)
            };
            if better && self.rng.chance(chance) {
                me.skills.insert(*skill, *level);
                skilled = true;
            }
        }
        if skilled {
            adjectives.push("more skillful");
        }
        if !adjectives.is_empty() {
            self.messages
                .you(me, MsgType::Become, adjectives.join(" and "));
        }

        for effect in &absorbed.permanent {
            if !me.is_affected(*effect) && self.rng.chance(chance) {
                me.add_permanent_effect(*effect, &mut self.messages);
            }
        }
        debug!(%consumer, %target, "consumed");
        self.die(target, Some(consumer), false, false);
    }

    /// The creature takes off and leaves the level for good.
    pub(crate) fn fly_away_now(&mut self, id: CreatureId) {
        self.depart(id, "flies away.");
    }

    /// The creature vanishes without a trace.
    pub(crate) fn disappear_now(&mut self, id: CreatureId) {
        self.depart(id, "disappears.");
    }

    fn depart(&mut self, id: CreatureId, how: &str) {
        let Some(c) = self.creatures.get_mut(&id).filter(|c| !c.dead) else {
            return;
        };
        self.messages
            .global(c, format!("{} {how}", sentence(&c.the_name())));
        c.dead = true;
        let pos = c.position();
        let tribe = c.tribe();
        info!(creature = %c.name, %id, how, "left the level");
        if self.level.creature_at(pos) == Some(id) {
            self.level.remove_creature(pos);
        }
        if let Some(t) = self.tribes.get_mut(tribe) {
            t.remove_member(id);
        }
        self.controllers.insert(id, Box::new(NoOpController));
    }

    /// Sunlight falls on a creature. Undead burn and may crumble.
    pub fn shine_light(&mut self, id: CreatureId) {
        let Some(c) = self.creatures.get(&id).filter(|c| !c.dead) else {
            return;
        };
        if !c.is_undead() {
            return;
        }
        self.messages.you(c, MsgType::Are, "burnt by the sun");
        if self.rng.one_in(10) {
            self.messages.you(c, MsgType::Your, "body crumbles to dust");
            self.die(id, None, true, true);
        }
    }
}

/// What a consumer can take from its meal, copied out so the consumer can
/// be borrowed mutably.
struct Absorbed {
    the_name: String,
    parts: [i32; BodyPart::COUNT],
    humanoid: bool,
    attr: [i32; 3],
    size: CreatureSize,
    weight: f64,
    barehanded_damage: i32,
    barehanded_attack: Option<AttackType>,
    attack_effect: Option<EffectType>,
    passive_attack: Option<EffectType>,
    gender: Gender,
    skills: Vec<(SkillId, f64)>,
    permanent: Vec<LastingEffect>,
}

impl From<&Creature> for Absorbed {
    fn from(c: &Creature) -> Self {
        let mut parts = [0; BodyPart::COUNT];
        for part in [BodyPart::Arm, BodyPart::Leg, BodyPart::Wing, BodyPart::Head] {
            parts[part.index()] = c.body.count(part);
        }
        let mut skills: Vec<(SkillId, f64)> = c.skills.iter().collect();
        skills.sort_by_key(|(s, _)| *s as u8);
        Self {
            the_name: c.the_name(),
            parts,
            humanoid: c.is_humanoid(),
            attr: c.attr,
            size: c.size,
            weight: c.weight,
            barehanded_damage: c.barehanded_damage,
            barehanded_attack: c.barehanded_attack,
            attack_effect: c.attack_effect,
            passive_attack: c.passive_attack,
            gender: c.gender,
            skills,
            permanent: LastingEffect::iter()
                .filter(|e| c.is_permanently_affected(*e))
                .collect(),
        }
    }
}
