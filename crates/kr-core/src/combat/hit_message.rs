//! Injury narration
//!
//! Every body part has its own wording for every attack that can reach it.

use super::AttackType;
use crate::creature::BodyPart;
use crate::rng::GameRng;
use crate::world::MsgType;

/// Message for a blow that injures `part` with `attack`.
///
/// # Panics
/// For spells and possession, which never injure a body part.
pub fn injury_message(part: BodyPart, attack: AttackType, rng: &mut GameRng) -> (MsgType, String) {
    let (kind, text) = match part {
        BodyPart::Back => match attack {
            AttackType::Shoot => (MsgType::Are, "shot in the back!"),
            AttackType::Bite | AttackType::Eat => (MsgType::Are, "bitten in the neck!"),
            AttackType::Cut => (MsgType::Your, "throat is cut!"),
            AttackType::Crush => (MsgType::Your, "spine is crushed!"),
            AttackType::Punch => (MsgType::Your, "neck is broken!"),
            AttackType::Hit => (MsgType::Are, "hit in the back of the head!"),
            AttackType::Stab => {
                if rng.one_in(2) {
                    (MsgType::Are, "stabbed in the back!")
                } else {
                    (MsgType::Are, "stabbed in the neck!")
                }
            }
            AttackType::Spell | AttackType::Possess => unreachable_injury(part, attack),
        },
        BodyPart::Head => match attack {
            AttackType::Shoot => (MsgType::Are, "shot in the eye!"),
            AttackType::Bite | AttackType::Eat => (MsgType::Your, "head is bitten off!"),
            AttackType::Cut => (MsgType::Your, "head is chopped off!"),
            AttackType::Crush => (MsgType::Your, "skull is shattered!"),
            AttackType::Punch => (MsgType::Your, "neck is broken!"),
            AttackType::Hit => (MsgType::Are, "hit in the head!"),
            AttackType::Stab => (MsgType::Are, "stabbed in the eye!"),
            AttackType::Spell | AttackType::Possess => unreachable_injury(part, attack),
        },
        BodyPart::Torso => match attack {
            AttackType::Shoot => (MsgType::Are, "shot in the heart!"),
            AttackType::Bite | AttackType::Eat => (MsgType::Your, "internal organs are ripped out!"),
            AttackType::Cut => (MsgType::Are, "cut in half!"),
            AttackType::Stab => (MsgType::Are, "stabbed in the stomach!"),
            AttackType::Crush => (MsgType::Your, "ribs and internal organs are crushed!"),
            AttackType::Hit => (MsgType::Are, "hit in the chest!"),
            AttackType::Punch => (MsgType::Your, "stomach receives a deadly blow!"),
            AttackType::Spell | AttackType::Possess => unreachable_injury(part, attack),
        },
        BodyPart::Arm => match attack {
            AttackType::Shoot => (MsgType::Are, "shot in the arm!"),
            AttackType::Bite | AttackType::Eat => (MsgType::Your, "arm is bitten off!"),
            AttackType::Cut => (MsgType::Your, "arm is chopped off!"),
            AttackType::Stab => (MsgType::Are, "stabbed in the arm!"),
            AttackType::Crush => (MsgType::Your, "arm is smashed!"),
            AttackType::Hit => (MsgType::Are, "hit in the arm!"),
            AttackType::Punch => (MsgType::Your, "arm is broken!"),
            AttackType::Spell | AttackType::Possess => unreachable_injury(part, attack),
        },
        BodyPart::Wing => match attack {
            AttackType::Shoot => (MsgType::Are, "shot in the wing!"),
            AttackType::Bite | AttackType::Eat => (MsgType::Your, "wing is bitten off!"),
            AttackType::Cut => (MsgType::Your, "wing is chopped off!"),
            AttackType::Stab => (MsgType::Are, "stabbed in the wing!"),
            AttackType::Crush => (MsgType::Your, "wing is smashed!"),
            AttackType::Hit => (MsgType::Are, "hit in the wing!"),
            AttackType::Punch => (MsgType::Your, "wing is broken!"),
            AttackType::Spell | AttackType::Possess => unreachable_injury(part, attack),
        },
        BodyPart::Leg => match attack {
            AttackType::Shoot => (MsgType::Are, "shot in the leg!"),
            AttackType::Bite | AttackType::Eat => (MsgType::Your, "leg is bitten off!"),
            AttackType::Cut => (MsgType::Your, "leg is cut off!"),
            AttackType::Stab => (MsgType::Your, "leg is stabbed!"),
            AttackType::Crush => (MsgType::Your, "knee is crushed!"),
            AttackType::Hit => (MsgType::Are, "hit in the leg!"),
            AttackType::Punch => (MsgType::Your, "leg is broken!"),
            AttackType::Spell | AttackType::Possess => unreachable_injury(part, attack),
        },
    };
    (kind, text.to_string())
}

fn unreachable_injury(part: BodyPart, attack: AttackType) -> ! {
    panic!("{attack} attack cannot injure the {part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_physical_combination_has_text() {
        let mut rng = GameRng::new(1);
        for part in BodyPart::iter() {
            for attack in AttackType::iter() {
                if matches!(attack, AttackType::Spell | AttackType::Possess) {
                    continue;
                }
                let (_, text) = injury_message(part, attack, &mut rng);
                assert!(text.ends_with('!'), "{part}/{attack}: {text}");
            }
        }
    }

    #[test]
    fn test_cut_throat() {
        let mut rng = GameRng::new(1);
        let (kind, text) = injury_message(BodyPart::Back, AttackType::Cut, &mut rng);
        assert_eq!(kind, MsgType::Your);
        assert_eq!(text, "throat is cut!");
    }

    #[test]
    #[should_panic]
    fn test_spell_never_injures() {
        let mut rng = GameRng::new(1);
        let _ = injury_message(BodyPart::Torso, AttackType::Spell, &mut rng);
    }
}
