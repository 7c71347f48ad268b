use tracing::debug;

use crate::error::LevelError;
use crate::model::actor::{Actor, ActorId, ActorKind};
use crate::model::level::{ButtonTable, LevelData};
use crate::model::tile::{Tile, BOULDER_GLYPH, PLAYER_GLYPH};
use crate::utils::{Direction, GridCoord};

/// What a cell holds for collision purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Empty,
    Wall,
    Actor(ActorId),
}

impl Occupant {
    pub fn is_empty(self) -> bool {
        self == Occupant::Empty
    }
}

/// Result of asking the player to start a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Player already mid-move; intent ignored
    Busy,
    Blocked,
    Walked,
    Pushed(ActorId),
}

/// Grid state for a single level: terrain, occupancy and actors.
///
/// Cells are stored row-major. Actor 0 is the player, the rest are boulders
/// in reading order of the level file.
#[derive(Debug, Clone)]
pub struct Room {
    width: usize,
    height: usize,
    floor: Vec<Tile>,
    occupied: Vec<Occupant>,
    actors: Vec<Actor>,
    buttons: ButtonTable,
    /// Bumped whenever a floor tile is repainted
    background_revision: u64,
    won: bool,
}

impl Room {
    pub fn new(level: &LevelData) -> Result<Self, LevelError> {
        let height = level.tiles.len();
        let width = level.tiles.first().map(|r| r.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let mut room = Self {
            width,
            height,
            floor: vec![Tile::Floor; width * height],
            occupied: vec![Occupant::Empty; width * height],
            actors: Vec::new(),
            buttons: level.buttons.clone(),
            background_revision: 0,
            won: false,
        };

        let mut player = None;
        let mut boulders = Vec::new();

        for (y, row) in level.tiles.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LevelError::JaggedRow { row: y, expected: width, found });
            }
            for (x, glyph) in row.chars().enumerate() {
                let coord = GridCoord(x as i32, y as i32);
                room.set_floor(glyph, coord.0, coord.1);
                match glyph {
                    PLAYER_GLYPH => {
                        if player.is_some() {
                            return Err(LevelError::DuplicatePlayer { x: coord.0, y: coord.1 });
                        }
                        player = Some(coord);
                    }
                    BOULDER_GLYPH => boulders.push(coord),
                    _ => {}
                }
                if let Some(id) = room.floor[room.idx(coord)].button_id() {
                    if room.buttons.get(id).is_none() {
                        return Err(LevelError::UnboundButton { id, x: coord.0, y: coord.1 });
                    }
                }
            }
        }

        for (&id, binding) in room.buttons.iter() {
            let target = GridCoord(binding.target.x, binding.target.y);
            if !room.in_bounds(target) {
                return Err(LevelError::TargetOutOfBounds {
                    id,
                    x: target.0,
                    y: target.1,
                    width,
                    height,
                });
            }
        }

        let player = player.ok_or(LevelError::MissingPlayer)?;
        room.spawn(ActorKind::Player, player);
        for coord in boulders {
            room.spawn(ActorKind::Boulder, coord);
        }

        Ok(room)
    }

    fn spawn(&mut self, kind: ActorKind, coord: GridCoord) {
        let id = ActorId(self.actors.len());
        self.actors.push(Actor::new(kind, coord));
        let idx = self.idx(coord);
        self.occupied[idx] = Occupant::Actor(id);
    }

    fn idx(&self, coord: GridCoord) -> usize {
        coord.1 as usize * self.width + coord.0 as usize
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.0 >= 0 && coord.1 >= 0 && (coord.0 as usize) < self.width && (coord.1 as usize) < self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells outside the grid behave as walls
    pub fn object_at(&self, x: i32, y: i32) -> Occupant {
        let coord = GridCoord(x, y);
        if !self.in_bounds(coord) {
            return Occupant::Wall;
        }
        self.occupied[self.idx(coord)]
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<Tile> {
        let coord = GridCoord(x, y);
        self.in_bounds(coord).then(|| self.floor[self.idx(coord)])
    }

    pub fn floor_glyph(&self, x: i32, y: i32) -> Option<char> {
        self.tile_at(x, y).map(Tile::glyph)
    }

    /// Repaint one cell's terrain from a level glyph.
    ///
    /// Walls become permanently occupied; any other tile frees the cell unless
    /// an actor is standing on it.
    pub fn set_floor(&mut self, glyph: char, x: i32, y: i32) {
        let coord = GridCoord(x, y);
        if !self.in_bounds(coord) {
            return;
        }
        let idx = self.idx(coord);
        let tile = Tile::from_glyph(glyph);
        self.floor[idx] = tile;
        match self.occupied[idx] {
            Occupant::Actor(_) => {}
            _ if tile.is_solid() => self.occupied[idx] = Occupant::Wall,
            _ => self.occupied[idx] = Occupant::Empty,
        }
        self.background_revision += 1;
    }

    /// Snap an actor onto the cell it has been animating towards.
    ///
    /// An actor on ice only keeps sliding if the next cell is empty and no
    /// other mover is about to land there. The vacated cell is only cleared if it still points at this actor: when
    /// a pusher and its boulder both cross a tile in the same tick, the pusher
    /// may already own the boulder's old cell.
    pub fn move_to(&mut self, id: ActorId, x: i32, y: i32) {
        let dest = GridCoord(x, y);
        if !self.in_bounds(dest) {
            return;
        }
        let Some(old) = self.actors.get(id.0).map(|actor| actor.grid) else {
            return;
        };

        {
            let actor = &mut self.actors[id.0];
            actor.grid = dest;
            actor.offset = glam::Vec2::ZERO;
        }
        let dest_idx = self.idx(dest);
        self.occupied[dest_idx] = Occupant::Actor(id);

        let tile = self.floor[dest_idx];
        let keeps_sliding = tile == Tile::Ice
            && self.actors[id.0]
                .heading
                .map(|dir| {
                    let next = dest.step(dir);
                    self.object_at(next.0, next.1).is_empty() && !self.is_claimed(next, id)
                })
                .unwrap_or(false);

        if !keeps_sliding {
            self.actors[id.0].stop();
            self.press_button_at(dest);
        }

        if self.in_bounds(old) {
            let old_idx = self.idx(old);
            if self.occupied[old_idx] == Occupant::Actor(id) {
                // a wall painted under the actor stays solid once it leaves
                self.occupied[old_idx] = if self.floor[old_idx].is_solid() {
                    Occupant::Wall
                } else {
                    Occupant::Empty
                };
                self.release_button_at(old);
            }
        }
    }

    /// True if another actor is mid-move into `coord` but has not snapped yet
    fn is_claimed(&self, coord: GridCoord, by_other_than: ActorId) -> bool {
        self.actors.iter().enumerate().any(|(i, actor)| {
            i != by_other_than.0
                && actor.moving
                && actor.heading.is_some_and(|dir| actor.grid.step(dir) == coord)
        })
    }

    fn press_button_at(&mut self, coord: GridCoord) {
        let tile = self.floor[self.idx(coord)];
        if let Some(binding) = tile.button_id().and_then(|id| self.buttons.get(id)).copied() {
            debug!(button = ?tile, target = ?binding.target, glyph = %binding.on, "button pressed");
            self.set_floor(binding.on, binding.target.x, binding.target.y);
        }
    }

    fn release_button_at(&mut self, coord: GridCoord) {
        let tile = self.floor[self.idx(coord)];
        if let Some(binding) = tile.button_id().and_then(|id| self.buttons.get(id)).copied() {
            debug!(button = ?tile, target = ?binding.target, glyph = %binding.off, "button released");
            self.set_floor(binding.off, binding.target.x, binding.target.y);
        }
    }

    /// Collision policy for a new player intent.
    ///
    /// A boulder in the way is pushed only when the cell beyond it is empty;
    /// the boulder starts moving before the player does.
    pub fn try_move_player(&mut self, dir: Direction) -> MoveOutcome {
        let player = &self.actors[ActorId::PLAYER.0];
        if player.moving {
            return MoveOutcome::Busy;
        }
        let target = player.grid.step(dir);

        let outcome = match self.object_at(target.0, target.1) {
            Occupant::Wall => return MoveOutcome::Blocked,
            Occupant::Actor(other) => {
                let beyond = target.step(dir);
                if !self.object_at(beyond.0, beyond.1).is_empty() {
                    return MoveOutcome::Blocked;
                }
                self.actors[other.0].start_moving(dir);
                MoveOutcome::Pushed(other)
            }
            Occupant::Empty => MoveOutcome::Walked,
        };

        self.actors[ActorId::PLAYER.0].start_moving(dir);
        outcome
    }

    /// Record whether the player is standing on the exit
    pub fn check_win(&mut self) -> bool {
        let player = self.player().grid;
        if self.tile_at(player.0, player.1) == Some(Tile::Exit) {
            self.won = true;
        }
        self.won
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn player(&self) -> &Actor {
        &self.actors[ActorId::PLAYER.0]
    }

    pub fn boulders(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().skip(1)
    }

    pub fn background_revision(&self) -> u64 {
        self.background_revision
    }

    /// Terrain rows as glyph strings, top to bottom
    pub fn floor_rows(&self) -> Vec<String> {
        self.floor
            .chunks(self.width)
            .map(|row| row.iter().map(|t| t.glyph()).collect())
            .collect()
    }
}
