use glam::Vec2;

use crate::utils::{hex_color, Direction, GridCoord};

/// Pixels per second
pub const ACTOR_SPEED: f32 = 80.0;

/// Index into a room's actor list. The player is always `ActorId::PLAYER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub usize);

impl ActorId {
    pub const PLAYER: ActorId = ActorId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Boulder,
}

impl ActorKind {
    pub fn color(self) -> [f32; 4] {
        match self {
            ActorKind::Player => hex_color(0x0080ff),
            ActorKind::Boulder => hex_color(0xbf6000),
        }
    }
}

/// A movable entity occupying one cell, animated between cells by `offset`
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub kind: ActorKind,
    pub grid: GridCoord,
    pub offset: Vec2,
    pub heading: Option<Direction>,
    pub moving: bool,
    pub speed: f32,
}

impl Actor {
    pub fn new(kind: ActorKind, grid: GridCoord) -> Self {
        Self {
            kind,
            grid,
            offset: Vec2::ZERO,
            heading: None,
            moving: false,
            speed: ACTOR_SPEED,
        }
    }

    pub fn start_moving(&mut self, dir: Direction) {
        self.heading = Some(dir);
        self.moving = true;
    }

    pub fn stop(&mut self) {
        self.heading = None;
        self.moving = false;
    }

    /// Advance the sub-cell offset; returns true once a full tile has been covered
    pub fn advance(&mut self, dt: f32, tile_size: f32) -> bool {
        let Some(dir) = self.heading else {
            return false;
        };
        let (dx, dy) = dir.delta();
        self.offset += Vec2::new(dx as f32, dy as f32) * self.speed * dt;
        self.offset.x.abs() >= tile_size || self.offset.y.abs() >= tile_size
    }

    /// Top-left pixel position relative to the room origin
    pub fn pixel_pos(&self, tile_size: f32) -> Vec2 {
        Vec2::new(self.grid.0 as f32, self.grid.1 as f32) * tile_size + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_reports_tile_crossing() {
        let mut actor = Actor::new(ActorKind::Boulder, GridCoord(2, 2));
        actor.start_moving(Direction::Left);
        assert!(!actor.advance(0.125, 16.0));
        assert_eq!(actor.offset.x, -10.0);
        assert_eq!(actor.offset.y, 0.0);
        assert!(actor.advance(0.125, 16.0));
    }

    #[test]
    fn idle_actor_does_not_move() {
        let mut actor = Actor::new(ActorKind::Player, GridCoord(0, 0));
        assert!(!actor.advance(1.0, 16.0));
        assert_eq!(actor.offset, Vec2::ZERO);
    }

    #[test]
    fn pixel_pos_includes_offset() {
        let mut actor = Actor::new(ActorKind::Player, GridCoord(1, 3));
        actor.offset = Vec2::new(0.0, 4.0);
        assert_eq!(actor.pixel_pos(16.0), Vec2::new(16.0, 52.0));
    }
}
