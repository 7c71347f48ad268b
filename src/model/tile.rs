use crate::utils::hex_color;

pub const TILE_SIZE: f32 = 16.0;

pub const PLAYER_GLYPH: char = '^';
pub const BOULDER_GLYPH: char = '*';

/// Static terrain of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Floor,
    Wall,
    Exit,
    Ice,
    Button(u8),
}

impl Tile {
    /// Anything that is not a known terrain glyph is plain floor
    pub fn from_glyph(glyph: char) -> Self {
        match glyph {
            '#' => Tile::Wall,
            '@' => Tile::Exit,
            '~' => Tile::Ice,
            c => match c.to_digit(10) {
                Some(id) => Tile::Button(id as u8),
                None => Tile::Floor,
            },
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => ' ',
            Tile::Wall => '#',
            Tile::Exit => '@',
            Tile::Ice => '~',
            Tile::Button(id) => char::from_digit(id as u32, 10).unwrap_or(' '),
        }
    }

    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall)
    }

    pub fn button_id(self) -> Option<u8> {
        match self {
            Tile::Button(id) => Some(id),
            _ => None,
        }
    }

    pub fn color(self) -> [f32; 4] {
        match self {
            Tile::Floor => hex_color(0xffffff),
            Tile::Wall => hex_color(0x000000),
            Tile::Exit => hex_color(0x00bf00),
            Tile::Ice => hex_color(0x00ffff),
            Tile::Button(_) => hex_color(0x8000ff),
        }
    }
}
