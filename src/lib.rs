//! Simulation core of a local-multiplayer tile platformer brawler.
//!
//! [`SimulationPlugin`](plugins::simulation_plugin::SimulationPlugin) runs one
//! tick per fixed step; [`ControlsPlugin`](plugins::controls_plugin::ControlsPlugin)
//! feeds it keyboard and gamepad input.

pub mod config;
pub mod game;
pub mod plugins;
pub mod storage;
