pub mod bullets;
pub mod explosions;
pub mod movement;
