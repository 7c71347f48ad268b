use tracing::debug;

use crate::model::{ActorId, MoveOutcome, Room, TILE_SIZE};
use crate::utils::Direction;

/// Animates every moving actor and snaps them onto grid cells
pub struct MovementSystem {
    pub tile_size: f32,
    /// Actors in the order they started moving
    moving: Vec<ActorId>,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self {
            tile_size: TILE_SIZE,
            moving: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.moving.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.moving.is_empty()
    }

    /// Start a player move (and push) if the room's collision rules allow it
    pub fn request(&mut self, room: &mut Room, dir: Direction) -> MoveOutcome {
        let outcome = room.try_move_player(dir);
        match outcome {
            MoveOutcome::Pushed(boulder) => {
                debug!(?dir, boulder = boulder.0, "pushing boulder");
                self.moving.push(boulder);
                self.moving.push(ActorId::PLAYER);
            }
            MoveOutcome::Walked => self.moving.push(ActorId::PLAYER),
            MoveOutcome::Blocked | MoveOutcome::Busy => {}
        }
        outcome
    }

    /// Advance all moving actors by `dt` seconds.
    ///
    /// Returns true if at least one actor came to rest this tick. Actors are
    /// processed newest first, so a pusher lands before the boulder it pushes.
    pub fn update(&mut self, room: &mut Room, dt: f32) -> bool {
        let mut any_stopped = false;
        for i in (0..self.moving.len()).rev() {
            let id = self.moving[i];
            let Some(actor) = room.actor_mut(id) else {
                self.moving.remove(i);
                continue;
            };
            if actor.advance(dt, self.tile_size) {
                if let Some(dir) = actor.heading {
                    let next = actor.grid.step(dir);
                    room.move_to(id, next.0, next.1);
                }
            }
            if !room.actor(id).is_some_and(|actor| actor.moving) {
                self.moving.remove(i);
                any_stopped = true;
            }
        }
        any_stopped
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}
