#![allow(dead_code)]

use slidestone::controller::{MovementSystem, SceneController};
use slidestone::model::{ButtonBinding, ButtonTable, ButtonTarget, LevelData, LevelPack, Room};
use slidestone::utils::Direction;

pub const DT: f32 = 1.0 / 30.0;

pub fn room(rows: &[&str]) -> Room {
    room_with_buttons(rows, ButtonTable::default())
}

pub fn room_with_buttons(rows: &[&str], buttons: ButtonTable) -> Room {
    Room::new(&LevelData::from_rows(&rows.join("\n"), buttons)).unwrap()
}

pub fn binding(id: u8, on: char, off: char, x: i32, y: i32) -> ButtonTable {
    let mut table = ButtonTable::default();
    table.0.insert(id, ButtonBinding { on, off, target: ButtonTarget { x, y } });
    table
}

pub fn bundled_pack() -> LevelPack {
    let text = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/levels.json")).unwrap();
    LevelPack::from_json(&text).unwrap()
}

/// Request one player move and tick until every actor is at rest
pub fn play(system: &mut MovementSystem, room: &mut Room, dir: Direction) {
    system.request(room, dir);
    for _ in 0..1000 {
        system.update(room, DT);
        if system.is_idle() {
            break;
        }
    }
    room.check_win();
}

/// Tap a key through the scene controller: press, one update, release, settle
pub fn tap(game: &mut SceneController, key: &str) {
    game.key_down(key);
    let done = game.update(DT);
    game.key_up(key);
    if done {
        return;
    }
    for _ in 0..1000 {
        if game.update(DT) {
            break;
        }
        let settled = game
            .room()
            .map(|room| room.actors().iter().all(|actor| !actor.moving))
            .unwrap_or(true);
        if settled {
            break;
        }
    }
}
