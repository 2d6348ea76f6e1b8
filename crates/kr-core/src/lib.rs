//! kr-core: creature combat and status effect simulation
//!
//! This crate contains the rules of melee between creatures: attributes and
//! modifiers, timed and permanent effects, body part injuries, tribal
//! standing, experience, and the death and consumption of creatures. It has
//! no I/O beyond loading a tuning file and is driven entirely through
//! [`world::World`].

pub mod combat;
pub mod creature;
pub mod geom;
pub mod object;
pub mod world;

mod consts;
mod rng;

pub use consts::*;
pub use rng::GameRng;
