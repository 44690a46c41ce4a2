use bevy::prelude::*;

use super::components::Player;
use super::events::CombatEvent;
use super::grid::TileGrid;
use super::types::PlayerId;

/// Kill live players that left the level below or to either side.
pub fn check_fall_out(players: &mut [&mut Player], grid: &TileGrid, margin: f32) -> Vec<CombatEvent> {
    let extent = grid.pixel_size();
    let mut events = Vec::new();
    for player in players.iter_mut().filter(|p| p.is_alive()) {
        let rect = player.body.rect();
        let below = rect.min.y > extent.y + margin;
        let left = rect.max.x < -margin;
        let right = rect.min.x > extent.x + margin;
        if below || left || right {
            player.fall_out();
            info!("Player {} fell out of the level", player.id);
            events.push(CombatEvent::FellOut { victim: player.id });
        }
    }
    events
}

/// Count down hit flash and respawn timers. Returns the dead players whose
/// respawn countdown has run out.
pub fn tick_timers(players: &mut [&mut Player], dt: f32) -> Vec<PlayerId> {
    let mut ready = Vec::new();
    for player in players.iter_mut() {
        player.hit_flash = player.hit_flash.dec(dt);
        if !player.is_alive() {
            player.respawn_timer = player.respawn_timer.dec(dt);
            if player.respawn_timer.is_expired() {
                ready.push(player.id);
            }
        }
    }
    ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tuning::Tuning;
    use crate::game::types::Seconds;

    fn grid() -> TileGrid {
        TileGrid::from_ascii("....\n####").expect("grid")
    }

    #[test]
    fn falling_far_below_kills_without_credit() {
        let tuning = Tuning::default();
        let mut p = Player::new(0, Vec2::new(10.0, 128.0 + 1000.0 + 1.0), &tuning);
        let events = check_fall_out(&mut [&mut p], &grid(), 1000.0);
        assert!(!p.is_alive());
        assert_eq!(p.health, 0);
        assert!(p.respawn_timer.is_expired());
        assert_eq!(events, vec![CombatEvent::FellOut { victim: 0 }]);
    }

    #[test]
    fn both_side_edges_count() {
        let tuning = Tuning::default();
        let mut left = Player::new(0, Vec2::new(-1100.0, 0.0), &tuning);
        let mut right = Player::new(1, Vec2::new(256.0 + 1001.0, 0.0), &tuning);
        let mut near = Player::new(2, Vec2::new(-900.0, 0.0), &tuning);
        let events = check_fall_out(&mut [&mut left, &mut right, &mut near], &grid(), 1000.0);
        assert_eq!(events.len(), 2);
        assert!(near.is_alive());
    }

    #[test]
    fn respawn_ready_after_countdown() {
        let tuning = Tuning::default();
        let mut p = Player::new(0, Vec2::ZERO, &tuning);
        p.status.alive = false;
        p.respawn_timer = Seconds::new(0.05);
        p.hit_flash = Seconds::new(0.2);
        assert!(tick_timers(&mut [&mut p], 0.03).is_empty());
        assert_eq!(tick_timers(&mut [&mut p], 0.03), vec![0]);
        assert!(!p.hit_flash.is_expired());
    }
}
