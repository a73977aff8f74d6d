//! Interaction with the level around a thing: the hooks into the rest of the
//! game, sector height changes crushing what stands in them, and teleporting.

mod crush;
mod hooks;
mod teleport;

pub use hooks::*;
