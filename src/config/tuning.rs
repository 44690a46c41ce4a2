use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-player movement parameters. Copied into every player at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementTuning {
    pub width: f32,
    pub height: f32,
    pub max_vel: f32,
    /// Horizontal acceleration (units per second squared).
    pub accel: f32,
    /// Fraction of horizontal velocity shed per second with no input held.
    pub drag: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub slide_duration: f32,
    /// Height multiplier while ducking or sliding.
    pub duck_scale: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            width: 75.0,
            height: 100.0,
            max_vel: 300.0,
            accel: 1200.0,
            drag: 6.0,
            gravity: 2000.0,
            jump_force: 1000.0,
            dash_speed: 3000.0,
            dash_duration: 1.0,
            slide_duration: 0.5,
            duck_scale: 0.3,
        }
    }
}

/// Stats for every gun the spawner places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GunSpec {
    pub width: f32,
    pub height: f32,
    pub ammo: u32,
    /// Shots per second.
    pub fire_rate: f32,
    pub projectile_speed: f32,
    /// Base spread cone (radians).
    pub spread: f32,
    /// Maximum travel distance of a bullet.
    pub range: f32,
}

impl Default for GunSpec {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 30.0,
            ammo: 30,
            fire_rate: 5.0,
            projectile_speed: 800.0,
            spread: 0.15,
            range: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrenadeSpec {
    pub radius: f32,
    pub fuse: f32,
    /// Restitution applied on every bounce.
    pub bounce: f32,
    pub throw_speed: f32,
    /// Upward throw angle above the horizontal (radians).
    pub throw_angle: f32,
    pub gravity: f32,
    pub min_bounce_speed: f32,
    pub fragment_count: u32,
    pub fragment_speed: f32,
    pub fragment_range: f32,
    /// Full width of the random angular offset per fragment (radians).
    pub fragment_jitter: f32,
}

impl Default for GrenadeSpec {
    fn default() -> Self {
        Self {
            radius: 12.0,
            fuse: 2.5,
            bounce: 0.8,
            throw_speed: 700.0,
            throw_angle: std::f32::consts::PI / 5.0,
            gravity: 1500.0,
            min_bounce_speed: 60.0,
            fragment_count: 16,
            fragment_speed: 600.0,
            fragment_range: 400.0,
            fragment_jitter: 0.1,
        }
    }
}

/// All tunable game parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Tuning {
    pub dt: f32,
    /// Seed for the simulation RNG (spread, fragments, spawn search).
    pub seed: u64,
    pub movement: MovementTuning,
    pub max_health: i32,
    pub starting_grenades: u32,
    pub max_grenades: u32,
    pub gun: GunSpec,
    pub grenade: GrenadeSpec,
    pub projectile_damage: i32,
    pub hit_flash_secs: f32,
    pub respawn_secs: f32,
    /// Distance past the grid edge at which a player counts as fallen out.
    pub fall_out_margin: f32,
    pub gun_spawn_interval: f32,
    pub grenade_pickup_spots: Vec<(f32, f32)>,
    pub grenade_pickup_amount: u32,
    pub total_rounds: u32,
    pub round_over_secs: f32,
    /// Map ids cycled through round by round.
    pub map_rotation: Vec<String>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            seed: 0x7113_b7a1,
            movement: MovementTuning::default(),
            max_health: 100,
            starting_grenades: 2,
            max_grenades: 3,
            gun: GunSpec::default(),
            grenade: GrenadeSpec::default(),
            projectile_damage: 25,
            hit_flash_secs: 0.2,
            respawn_secs: 3.0,
            fall_out_margin: 1000.0,
            gun_spawn_interval: 10.0,
            grenade_pickup_spots: vec![(300.0, 200.0), (600.0, 250.0)],
            grenade_pickup_amount: 1,
            total_rounds: 5,
            round_over_secs: 3.0,
            map_rotation: vec!["yard".into(), "towers".into(), "pit".into()],
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("tile_brawl")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::from_ron(&contents) {
                    Ok(tuning) => return tuning,
                    Err(e) => {
                        warn!("Failed to parse tuning.ron: {e}, using defaults");
                    }
                },
                Err(e) => {
                    warn!("Failed to read tuning.ron: {e}, using defaults");
                }
            }
        }
        let tuning = Self::default();
        tuning.save();
        tuning
    }

    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }
}
