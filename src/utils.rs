use wgpu::util::DeviceExt;
use bytemuck::{NoUninit};

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// CPU-side list of axis-aligned coloured quads in pixel space
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Append one rectangle with its top-left corner at (x, y)
    pub fn push_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&[
            Vertex { pos: [x, y], color },
            Vertex { pos: [x + w, y], color },
            Vertex { pos: [x + w, y + h], color },
            Vertex { pos: [x, y + h], color },
        ]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {

        let vertices = bytemuck::cast_slice(&self.vertices);
        let indices = bytemuck::cast_slice(&self.indices);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: indices,
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Convert a `#rrggbb` colour to linear-ish RGBA floats
pub fn hex_color(rgb: u32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// coordinates of a cell in room space
#[derive(Debug, Eq, Hash, PartialEq, Clone, Copy)]
pub struct GridCoord(pub i32, pub i32);

impl GridCoord {
    pub fn step(&self, dir: Direction) -> GridCoord {
        let (dx, dy) = dir.delta();
        GridCoord(self.0 + dx, self.1 + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Insertion-ordered collection that holds each value at most once.
///
/// Used for held movement keys: pressing pushes to the back (if not already
/// held), releasing removes, and the back is the most recent still-held entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueList<T> {
    items: Vec<T>,
}

impl<T: PartialEq> UniqueList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns false if the value was already present
    pub fn push_unique(&mut self, value: T) -> bool {
        if self.items.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    /// Remove every occurrence of `value`; returns whether anything was removed
    pub fn remove(&mut self, value: &T) -> bool {
        let before = self.items.len();
        self.items.retain(|v| v != value);
        self.items.len() != before
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: PartialEq> Default for UniqueList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_push_ignores_duplicates() {
        let mut list = UniqueList::new();
        assert!(list.push_unique(Direction::Left));
        assert!(list.push_unique(Direction::Up));
        assert!(!list.push_unique(Direction::Left));
        assert_eq!(list.len(), 2);
        assert_eq!(list.latest(), Some(&Direction::Up));
    }

    #[test]
    fn remove_falls_back_to_previous_entry() {
        let mut list = UniqueList::new();
        list.push_unique(Direction::Left);
        list.push_unique(Direction::Down);
        assert!(list.remove(&Direction::Down));
        assert_eq!(list.latest(), Some(&Direction::Left));
        assert!(!list.remove(&Direction::Down));
    }

    #[test]
    fn push_rect_emits_two_triangles() {
        let mut mesh = Mesh::empty();
        mesh.push_rect(0.0, 0.0, 16.0, 16.0, hex_color(0xffffff));
        mesh.push_rect(16.0, 0.0, 16.0, 16.0, hex_color(0x000000));
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn hex_color_splits_channels() {
        assert_eq!(hex_color(0x00bf00), [0.0, 191.0 / 255.0, 0.0, 1.0]);
    }
}
