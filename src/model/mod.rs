// MODEL: Room state and level data
pub mod tile;
pub mod actor;
pub mod level;
pub mod room;

pub use tile::{Tile, TILE_SIZE};
pub use actor::{Actor, ActorId, ActorKind};
pub use level::{ButtonBinding, ButtonTable, ButtonTarget, LevelData, LevelPack};
pub use room::{MoveOutcome, Occupant, Room};
