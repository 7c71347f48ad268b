mod common;

use common::{binding, play, room, room_with_buttons};
use slidestone::controller::MovementSystem;
use slidestone::model::{ActorId, Occupant, Tile};
use slidestone::utils::{Direction, GridCoord};

const BOULDER: ActorId = ActorId(1);

#[test]
fn outside_the_grid_is_wall() {
    let room = room(&["^ ", "  "]);
    for (x, y) in [(-1, 0), (0, -1), (2, 0), (0, 2), (i32::MAX, i32::MIN)] {
        assert_eq!(room.object_at(x, y), Occupant::Wall, "({x}, {y})");
    }
}

#[test]
fn walls_block_the_player() {
    let mut room = room(&["#####", "#^# #", "#####"]);
    let mut system = MovementSystem::new();
    for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
        play(&mut system, &mut room, dir);
    }
    assert_eq!(room.player().grid, GridCoord(1, 1));
}

#[test]
fn pushes_against_wall_or_boulder_change_nothing() {
    let mut room = room(&["^*#"]);
    let mut system = MovementSystem::new();
    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.player().grid, GridCoord(0, 0));
    assert_eq!(room.actor(BOULDER).unwrap().grid, GridCoord(1, 0));

    let mut room = common::room(&["^** "]);
    play(&mut system, &mut room, Direction::Left);
    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.player().grid, GridCoord(0, 0));
    assert_eq!(room.actor(ActorId(1)).unwrap().grid, GridCoord(1, 0));
    assert_eq!(room.actor(ActorId(2)).unwrap().grid, GridCoord(2, 0));
}

#[test]
fn boulder_on_button_opens_the_exit() {
    let buttons = binding(0, '@', '#', 3, 3);
    let mut room = room_with_buttons(&["#####", "#^  #", "# *0#", "#  ##", "#####"], buttons);
    let mut system = MovementSystem::new();

    play(&mut system, &mut room, Direction::Down);
    assert_eq!(room.player().grid, GridCoord(1, 2));

    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.actor(BOULDER).unwrap().grid, GridCoord(3, 2));
    assert_eq!(room.tile_at(3, 3), Some(Tile::Exit));
    assert_eq!(room.object_at(3, 3), Occupant::Empty);

    play(&mut system, &mut room, Direction::Down);
    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.player().grid, GridCoord(3, 3));
    assert!(room.is_won());
}

#[test]
fn stepping_off_a_button_restores_its_target() {
    let buttons = binding(0, ' ', '#', 4, 0);
    let mut room = room_with_buttons(&["^0  #"], buttons);
    let mut system = MovementSystem::new();
    let revision = room.background_revision();

    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.object_at(4, 0), Occupant::Empty);
    assert!(room.background_revision() > revision);

    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.floor_glyph(4, 0), Some('#'));
    assert_eq!(room.object_at(4, 0), Occupant::Wall);
}

#[test]
fn ice_carries_player_to_the_next_obstacle() {
    let mut room = room(&["^~~~ ~~#"]);
    let mut system = MovementSystem::new();
    play(&mut system, &mut room, Direction::Right);
    // ice stops at the first non-ice cell
    assert_eq!(room.player().grid, GridCoord(4, 0));
    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.player().grid, GridCoord(6, 0));
    assert_eq!(room.object_at(5, 0), Occupant::Empty);
}

#[test]
fn pushed_boulder_slides_and_pusher_stays_on_floor() {
    let mut room = room(&["^*~~~ #"]);
    let buttons = binding(0, '@', '#', 6, 0);
    let mut with_button = room_with_buttons(&["^*~~~0#"], buttons);
    let mut system = MovementSystem::new();

    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.player().grid, GridCoord(1, 0));
    assert_eq!(room.object_at(1, 0), Occupant::Actor(ActorId::PLAYER));

    play(&mut system, &mut with_button, Direction::Right);
    assert_eq!(with_button.actor(BOULDER).unwrap().grid, GridCoord(5, 0));
    assert_eq!(with_button.tile_at(6, 0), Some(Tile::Exit));
}

#[test]
fn occupancy_matches_actor_positions_after_play() {
    let mut room = room(&["#######", "#^ *  #", "# ~~* #", "#     #", "#######"]);
    let mut system = MovementSystem::new();
    for dir in [
        Direction::Right,
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Up,
    ] {
        play(&mut system, &mut room, dir);
    }
    for (id, actor) in room.actors().iter().enumerate() {
        assert!(!actor.moving);
        assert_eq!(room.object_at(actor.grid.0, actor.grid.1), Occupant::Actor(ActorId(id)));
    }
    let occupied = (0..room.height() as i32)
        .flat_map(|y| (0..room.width() as i32).map(move |x| (x, y)))
        .filter(|&(x, y)| matches!(room.object_at(x, y), Occupant::Actor(_)))
        .count();
    assert_eq!(occupied, room.actors().len());
}

#[test]
fn floor_glyphs_survive_repainting() {
    let mut room = room(&["^ ~", "@ #"]);
    room.set_floor('x', 2, 0);
    room.set_floor('7', 1, 1);
    assert_eq!(room.floor_rows(), vec!["   ", "@7#"]);
    assert_eq!(room.object_at(0, 0), Occupant::Actor(ActorId::PLAYER));
}

#[test]
fn example_level_toggles_and_wins() {
    let buttons = binding(0, ' ', '#', 4, 1);
    let mut room = room_with_buttons(&["#####", "#^  #", "# *0#", "#  @#", "#####"], buttons);
    let mut system = MovementSystem::new();
    assert_eq!(room.object_at(4, 1), Occupant::Wall);

    play(&mut system, &mut room, Direction::Down);
    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.actor(BOULDER).unwrap().grid, GridCoord(3, 2));
    assert_eq!(room.floor_glyph(4, 1), Some(' '));
    assert!(!room.is_won());

    play(&mut system, &mut room, Direction::Down);
    play(&mut system, &mut room, Direction::Right);
    assert!(room.is_won());
}

#[test]
fn player_behind_a_pushed_boulder_stops_on_ice() {
    let mut room = room(&["   ^   ", "   *   ", "  ~~~~#", "#######"]);
    let mut system = MovementSystem::new();
    for dir in [Direction::Down, Direction::Left, Direction::Down, Direction::Right] {
        play(&mut system, &mut room, dir);
    }

    let player = room.player().grid;
    let boulder = room.actor(BOULDER).unwrap().grid;
    assert_ne!(player, boulder, "two actors share one cell");
    assert_eq!(player, GridCoord(3, 2));
    assert_eq!(boulder, GridCoord(5, 2));
    assert_eq!(room.object_at(3, 2), Occupant::Actor(ActorId::PLAYER));
    assert_eq!(room.object_at(4, 2), Occupant::Empty);
    assert_eq!(room.object_at(5, 2), Occupant::Actor(BOULDER));
}

#[test]
fn wall_raised_under_the_player_stays_solid() {
    let buttons = binding(0, '#', ' ', 1, 0);
    let mut room = room_with_buttons(&["^*0", "   "], buttons);
    let mut system = MovementSystem::new();

    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.player().grid, GridCoord(1, 0));
    assert_eq!(room.floor_glyph(1, 0), Some('#'));

    play(&mut system, &mut room, Direction::Down);
    assert_eq!(room.player().grid, GridCoord(1, 1));
    assert_eq!(room.object_at(1, 0), Occupant::Wall);

    play(&mut system, &mut room, Direction::Up);
    assert_eq!(room.player().grid, GridCoord(1, 1));
}

#[test]
fn pusher_taking_over_a_button_keeps_it_pressed() {
    let buttons = binding(0, ' ', '#', 4, 1);
    let mut room = room_with_buttons(&["^*0  ", "    #"], buttons);
    let mut system = MovementSystem::new();

    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.actor(BOULDER).unwrap().grid, GridCoord(2, 0));
    assert_eq!(room.floor_glyph(4, 1), Some(' '));

    // boulder leaves the button in the same tick the player steps onto it
    play(&mut system, &mut room, Direction::Right);
    assert_eq!(room.player().grid, GridCoord(2, 0));
    assert_eq!(room.actor(BOULDER).unwrap().grid, GridCoord(3, 0));
    assert_eq!(room.floor_glyph(4, 1), Some(' '));
    assert_eq!(room.object_at(4, 1), Occupant::Empty);

    play(&mut system, &mut room, Direction::Down);
    assert_eq!(room.floor_glyph(4, 1), Some('#'));
    assert_eq!(room.object_at(4, 1), Occupant::Wall);
}
