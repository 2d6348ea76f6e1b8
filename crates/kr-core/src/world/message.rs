//! Narrated messages
//!
//! Every message is rendered twice: once in the first person for the creature
//! it happened to, once in the third person for onlookers.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::creature::{Creature, CreatureId};

/// Message templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MsgType {
    Are,
    Your,
    Feel,
    Become,
    Fall,
    FallAsleep,
    WakeUp,
    Panic,
    Rage,
    TurnInvisible,
    TurnVisible,
    BreakFree,
    Collapse,
    StandUp,
    Crawl,
    DropWeapon,
    Die,
    DieOf,
    FallApart,
    BleedingStops,
    Grow,
    Consume,
    Turn,
    AttackSurprise,
    MissAttack,
    GetHitNoDamage,
    SwingWeapon,
    ThrustWeapon,
    Bite,
    Punch,
    Kick,
    Hit,
    Touch,
}

impl MsgType {
    /// Render as (first person, third person). `the` is the subject's definite name.
    pub fn render(self, the: &str, param: &str) -> (String, String) {
        let p = param;
        let (first, third) = match self {
            MsgType::Are => (format!("You are {p}"), format!("{the} is {p}")),
            MsgType::Your => (format!("Your {p}"), format!("{the}'s {p}")),
            MsgType::Feel => (format!("You feel {p}"), format!("{the} looks {p}")),
            MsgType::Become => (format!("You become {p}"), format!("{the} becomes {p}")),
            MsgType::Fall => (format!("You fall on the {p}"), format!("{the} falls on the {p}")),
            MsgType::FallAsleep => ("You fall asleep".into(), format!("{the} falls asleep")),
            MsgType::WakeUp => ("You wake up".into(), format!("{the} wakes up")),
            MsgType::Panic => ("You are suddenly terrified".into(), format!("{the} panics")),
            MsgType::Rage => ("You feel a sudden rage".into(), format!("{the} goes berserk")),
            MsgType::TurnInvisible => (
                "You can see through yourself!".into(),
                format!("{the} disappears!"),
            ),
            MsgType::TurnVisible => (
                "You are no longer invisible".into(),
                format!("{the} appears out of nowhere!"),
            ),
            MsgType::BreakFree => (
                format!("You break free from {p}"),
                format!("{the} breaks free from {p}"),
            ),
            MsgType::Collapse => ("You collapse".into(), format!("{the} collapses")),
            MsgType::StandUp => (
                "You are back on your feet".into(),
                format!("{the} is back on its feet"),
            ),
            MsgType::Crawl => ("You are crawling".into(), format!("{the} is crawling")),
            MsgType::DropWeapon => (
                format!("You drop your {p}"),
                format!("{the} drops the {p}"),
            ),
            MsgType::Die => ("You die!!".into(), format!("{the} is killed!")),
            MsgType::DieOf => (format!("You die of {p}"), format!("{the} dies of {p}")),
            MsgType::FallApart => ("You fall apart".into(), format!("{the} falls apart")),
            MsgType::BleedingStops => (
                "Your bleeding stops".into(),
                format!("{the}'s bleeding stops"),
            ),
            MsgType::Grow => (format!("You grow {p}"), format!("{the} grows {p}")),
            MsgType::Consume => (format!("You absorb {p}"), format!("{the} absorbs {p}")),
            MsgType::Turn => (format!("You turn{p}"), format!("{the} turns{p}")),
            MsgType::AttackSurprise => (
                format!("You sneak attack {p}"),
                format!("{the} sneak attacks {p}"),
            ),
            MsgType::MissAttack => (format!("You miss {p}"), format!("{the} misses {p}")),
            MsgType::GetHitNoDamage => (
                format!("The {p} is harmless"),
                format!("The {p} is harmless"),
            ),
            MsgType::SwingWeapon => (
                format!("You swing your {p}"),
                format!("{the} swings the {p}"),
            ),
            MsgType::ThrustWeapon => (
                format!("You thrust your {p}"),
                format!("{the} thrusts the {p}"),
            ),
            MsgType::Bite => (format!("You bite {p}"), format!("{the} bites {p}")),
            MsgType::Punch => (format!("You punch {p}"), format!("{the} punches {p}")),
            MsgType::Kick => (format!("You kick {p}"), format!("{the} kicks {p}")),
            MsgType::Hit => (format!("You hit {p}"), format!("{the} hits {p}")),
            MsgType::Touch => (format!("You touch {p}"), format!("{the} touches {p}")),
        };
        (sentence(&first), sentence(&third))
    }
}

/// Trim dangling spaces left by empty params and capitalize.
pub(crate) fn sentence(s: &str) -> String {
    let s = s.trim_end();
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Who gets to read a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    /// The subject and anyone watching
    Everyone,
    /// Only the subject
    Subject,
    /// Only onlookers
    Onlookers,
}

/// One narrated line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub subject: CreatureId,
    pub audience: Audience,
    pub first_person: String,
    pub third_person: String,
}

impl Message {
    /// Whether either rendering contains the given text
    pub fn mentions(&self, text: &str) -> bool {
        self.first_person.contains(text) || self.third_person.contains(text)
    }
}

/// Message sink shared by the whole simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrate something that happens to `who`.
    pub fn you(&mut self, who: &Creature, kind: MsgType, param: impl AsRef<str>) {
        let (first_person, third_person) = kind.render(&who.the_name(), param.as_ref());
        self.messages.push(Message {
            subject: who.id,
            audience: Audience::Everyone,
            first_person,
            third_person,
        });
    }

    /// A line only the creature itself perceives.
    pub fn private(&mut self, who: &Creature, text: impl Into<String>) {
        let text = text.into();
        self.messages.push(Message {
            subject: who.id,
            audience: Audience::Subject,
            first_person: text.clone(),
            third_person: text,
        });
    }

    /// A line for onlookers only, such as "The goblin flies away."
    pub fn global(&mut self, who: &Creature, text: impl Into<String>) {
        let text = text.into();
        self.messages.push(Message {
            subject: who.id,
            audience: Audience::Onlookers,
            first_person: text.clone(),
            third_person: text,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages about one creature
    pub fn about(&self, id: CreatureId) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.subject == id)
    }

    /// Whether any message mentions the text
    pub fn contains(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m.mentions(text))
    }

    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_first_and_third_person() {
        let (first, third) = MsgType::Are.render("the goblin", "poisoned");
        assert_eq!(first, "You are poisoned");
        assert_eq!(third, "The goblin is poisoned");
    }

    #[test]
    fn test_render_trims_empty_param() {
        let (first, third) = MsgType::MissAttack.render("the orc", "");
        assert_eq!(first, "You miss");
        assert_eq!(third, "The orc misses");
    }

    #[test]
    fn test_turn_keeps_leading_space_param() {
        let (_, third) = MsgType::Turn.render("the ghost", " into a wisp of smoke");
        assert_eq!(third, "The ghost turns into a wisp of smoke");
    }
}
