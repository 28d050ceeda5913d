//! Static world description and pure movement arithmetic.

pub mod movement;
pub mod world;

pub use movement::step_toward;
pub use world::WorldModel;
