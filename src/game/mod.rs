pub mod armory;
pub mod collision;
pub mod combat;
pub mod components;
pub mod events;
pub mod grenades;
pub mod grid;
pub mod intent;
pub mod lifecycle;
pub mod movement;
pub mod pickups;
pub mod rounds;
pub mod spawn;
pub mod tick;
pub mod types;
