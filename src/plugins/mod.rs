pub mod controls_plugin;
pub mod simulation_plugin;
