//! Melee resolution
//!
//! An attack is rolled from the attacker's ACCURACY and DAMAGE, each jittered
//! by two uniform draws, then offered to the defender's dodge. A blow that
//! lands goes through [`World::take_damage`].

use tracing::{debug, trace};

use super::{Attack, AttackLevel, AttackType, EffectStrength, HitOutcome, injury_message};
use crate::creature::{Creature, CreatureFlags, CreatureId, LastingEffect, ModifierType, TribeId};
use crate::world::{GameEvent, MsgType, World};

/// Message announcing a blow that was not dodged
fn attack_message(attack: AttackType, weapon: Option<&str>, level: AttackLevel) -> MsgType {
    if weapon.is_some() {
        return if attack == AttackType::Stab {
            MsgType::ThrustWeapon
        } else {
            MsgType::SwingWeapon
        };
    }
    match attack {
        AttackType::Bite | AttackType::Eat => MsgType::Bite,
        AttackType::Punch if level == AttackLevel::Low => MsgType::Kick,
        AttackType::Punch => MsgType::Punch,
        AttackType::Hit => MsgType::Hit,
        AttackType::Possess => MsgType::Touch,
        AttackType::Cut | AttackType::Stab | AttackType::Crush | AttackType::Shoot | AttackType::Spell => {
            panic!("{attack} needs a weapon")
        }
    }
}

impl Creature {
    /// Try to dodge an incoming blow. Counts the attack against this turn,
    /// and remembers unseen or foreign attackers.
    pub(crate) fn dodge_attack(
        &mut self,
        accuracy: i32,
        attacker: CreatureId,
        attacker_tribe: TribeId,
        sees_attacker: bool,
    ) -> bool {
        self.attacks_this_turn += 1;
        if !sees_attacker && !self.unknown_attackers.contains(&attacker) {
            self.unknown_attackers.push(attacker);
        }
        self.note_private_enemy(attacker, attacker_tribe);
        sees_attacker && accuracy <= self.modifier(ModifierType::Accuracy)
    }
}

/// What the target needs to know about whoever hit it
struct AttackerInfo {
    id: CreatureId,
    tribe: TribeId,
    adjacent: bool,
    larger: bool,
    harmless_apply: bool,
    the_name: String,
}

impl World {
    /// Roll and deliver one melee blow. `level` defaults to a random height
    /// the attacker can reach.
    ///
    /// Returns `None` if either creature is gone.
    pub fn execute_attack(
        &mut self,
        attacker_id: CreatureId,
        target_id: CreatureId,
        level: Option<AttackLevel>,
    ) -> Option<HitOutcome> {
        if !self.is_alive(attacker_id) || !self.is_alive(target_id) {
            return None;
        }
        let attacker_sees = self.can_see(attacker_id, target_id);
        let target_sees = self.can_see(target_id, attacker_id);
        let attacker = self.creatures.get(&attacker_id)?;
        let level = match level {
            Some(l) => l,
            None => *self.rng.choose(&attacker.attack_levels())?,
        };
        let mut accuracy = attacker.modifier(ModifierType::Accuracy);
        let mut damage = attacker.modifier(ModifierType::Damage);
        let attack_type = attacker.attack_type();
        let weapon = attacker.weapon().map(|w| w.name.clone());
        let effect = attacker
            .weapon()
            .and_then(|w| w.attack_effect)
            .or(attacker.attack_effect);
        let tribe = attacker.tribe();

        let acc_var = 1 + accuracy / 3;
        let dam_var = 1 + damage / 3;
        accuracy += self.rng.range_inclusive(-acc_var, acc_var)
            + self.rng.range_inclusive(-acc_var, acc_var);
        damage += self.rng.range_inclusive(-dam_var, dam_var)
            + self.rng.range_inclusive(-dam_var, dam_var);

        let backstab = !target_sees && attacker_sees;
        let target_name = self.creatures.get(&target_id)?.the_name();
        if backstab {
            damage += self.tuning.backstab_bonus;
            if let Some(a) = self.creatures.get(&attacker_id) {
                self.messages.you(a, MsgType::AttackSurprise, &target_name);
            }
        }
        let mut attack =
            Attack::new(Some(attacker_id), level, attack_type, accuracy, damage).with_effect(effect);
        if backstab {
            attack = attack.with_backstab();
        }
        trace!(?attack, "attack rolled");

        let dodged = self
            .creatures
            .get_mut(&target_id)?
            .dodge_attack(accuracy, attacker_id, tribe, target_sees);
        let outcome = if dodged {
            if let Some(a) = self.creatures.get(&attacker_id) {
                self.messages.you(a, MsgType::MissAttack, &target_name);
            }
            HitOutcome::Dodged
        } else {
            if let Some(a) = self.creatures.get(&attacker_id) {
                let kind = attack_message(attack_type, weapon.as_deref(), level);
                let param = weapon.as_deref().unwrap_or(&target_name);
                self.messages.you(a, kind, param);
            }
            self.take_damage(target_id, &attack)
        };
        debug!(attacker = %attacker_id, target = %target_id, ?outcome, "attack resolved");
        self.events.push(GameEvent::Attack {
            attacker: attacker_id,
            target: target_id,
        });
        self.spend_time(attacker_id, 1.0);
        Some(outcome)
    }

    /// Resolve a blow that was not dodged.
    pub fn take_damage(&mut self, target_id: CreatureId, attack: &Attack) -> HitOutcome {
        let Some(target) = self.creatures.get(&target_id).filter(|c| !c.is_dead()) else {
            return HitOutcome::NoDamage;
        };
        let target_pos = target.position();
        let target_name = target.the_name();
        let attacker = attack
            .attacker
            .and_then(|id| self.creatures.get(&id))
            .filter(|a| !a.is_dead())
            .map(|a| AttackerInfo {
                id: a.id,
                tribe: a.tribe(),
                adjacent: a.position().dist8(target_pos) == 1,
                larger: a.is_larger_than(target),
                harmless_apply: a.flags.contains(CreatureFlags::HARMLESS_APPLY),
                the_name: a.the_name(),
            });
        let killer = attacker.as_ref().map(|a| a.id);

        if let (Some(a), Some(t)) = (&attacker, self.creatures.get_mut(&target_id)) {
            t.note_private_enemy(a.id, a.tribe);
        }

        if attack.attack_type == AttackType::Possess {
            if let Some(a) = &attacker {
                if let Some(t) = self.creatures.get(&target_id) {
                    self.messages.you(t, MsgType::Are, format!("possessed by {}", a.the_name));
                }
                self.die(a.id, None, false, false);
            }
            let duration = self.tuning.insanity_duration;
            if let Some(t) = self.creatures.get_mut(&target_id) {
                t.add_effect(LastingEffect::Insanity, duration, true, &mut self.messages);
            }
            return HitOutcome::Possessed;
        }

        if let Some(a) = &attacker {
            if a.adjacent {
                if let Some(passive) = self.creatures.get(&target_id).and_then(|t| t.passive_attack)
                {
                    self.apply_effect(a.id, passive, EffectStrength::Normal);
                    if let Some(ac) = self.creatures.get_mut(&a.id) {
                        ac.last_attacker = Some(target_id);
                    }
                }
            }
        }

        let absorb = self.tuning.magic_shield_absorb;
        let Some(target) = self.creatures.get_mut(&target_id) else {
            return HitOutcome::NoDamage;
        };
        if target.is_affected(LastingEffect::MagicShield) {
            target.effects.shorten(LastingEffect::MagicShield, absorb);
            self.messages
                .global(target, "The magic shield absorbs the attack");
        }
        let defense = target.modifier(ModifierType::Defense);

        let outcome = if attack.strength > defense {
            let mut attack_type = attack.attack_type;
            if attack_type == AttackType::Eat {
                let devour_chance = self.tuning.devour_chance;
                if attacker.as_ref().is_some_and(|a| a.larger) && self.rng.one_in(devour_chance) {
                    if let (Some(a), Some(t)) = (&attacker, self.creatures.get(&target_id)) {
                        self.messages.you(t, MsgType::Are, format!("devoured by {}", a.the_name));
                    }
                    self.die(target_id, killer, false, false);
                    return HitOutcome::Devoured;
                }
                attack_type = AttackType::Bite;
            }
            match self.wound(target_id, attack, attack_type, defense, killer) {
                Some(outcome) if outcome.is_fatal() => return outcome,
                Some(outcome) => outcome,
                None => return HitOutcome::NoDamage,
            }
        } else {
            if let Some(t) = self.creatures.get(&target_id) {
                self.messages
                    .you(t, MsgType::GetHitNoDamage, attack.attack_type.param());
            }
            if let Some(effect) = attack.effect {
                if attacker.as_ref().is_some_and(|a| a.harmless_apply) {
                    self.apply_effect(target_id, effect, EffectStrength::Normal);
                }
            }
            HitOutcome::NoDamage
        };

        if let Some(t) = self.creatures.get_mut(&target_id) {
            if t.is_affected(LastingEffect::Sleep) {
                t.remove_effect(LastingEffect::Sleep, true, &mut self.messages);
            }
        }
        trace!(target = %target_name, ?outcome, "damage taken");
        outcome
    }

    /// The part of a penetrating hit that costs health and limbs.
    fn wound(
        &mut self,
        target_id: CreatureId,
        attack: &Attack,
        attack_type: AttackType,
        defense: i32,
        killer: Option<CreatureId>,
    ) -> Option<HitOutcome> {
        let floor = self.tuning.health_floor;
        let target = self.creatures.get_mut(&target_id)?;
        target.last_attacker = killer;
        let mut dam = if defense == 0 {
            1.0
        } else {
            (attack.strength - defense) as f64 / defense as f64
        };
        dam *= target.damage_multiplier;
        if target.is_living() {
            target.bleed(dam);
        }
        debug!(target = %target.name, dam, health = target.health(), "wounded");

        let mut outcome = None;
        if !target.is_corporeal() {
            self.messages
                .you(target, MsgType::Turn, " into a wisp of smoke");
            self.die(target_id, killer, true, true);
            return Some(HitOutcome::Dissipated);
        }
        if attack_type != AttackType::Spell {
            let part = if attack.backstab && self.rng.one_in(3) {
                crate::creature::BodyPart::Back
            } else {
                target.body_part_for(attack.level, &mut self.rng)
            };
            if dam >= target.min_damage(part) && target.num_good(part) > 0 {
                let (kind, text) = injury_message(part, attack_type, &mut self.rng);
                self.messages.you(target, kind, text);
                self.injure_body_part(target_id, part, attack_type.severs());
                let target = self.creatures.get_mut(&target_id)?;
                if target.is_critical(part) {
                    self.messages.you(target, MsgType::Die, "");
                    self.die(target_id, killer, true, true);
                    return Some(HitOutcome::Killed);
                }
                if target.health <= 0.0 {
                    target.health = floor;
                }
                outcome = Some(HitOutcome::Injured(part));
            }
        }

        let target = self.creatures.get_mut(&target_id)?;
        if outcome.is_none() {
            if target.health <= 0.0 {
                self.messages.you(target, MsgType::Are, "critically wounded");
                self.messages.you(target, MsgType::Die, "");
                self.die(target_id, killer, true, true);
                return Some(HitOutcome::Killed);
            } else if target.health < 0.5 {
                self.messages.you(target, MsgType::Are, "critically wounded");
            } else if target.is_living() {
                self.messages.you(target, MsgType::Are, "wounded");
            } else if attack.effect.is_none() {
                self.messages.you(target, MsgType::Are, "not hurt");
            }
        }
        if let Some(effect) = attack.effect {
            self.apply_effect(target_id, effect, EffectStrength::Weak);
        }
        Some(outcome.unwrap_or(HitOutcome::Wounded))
    }
}
