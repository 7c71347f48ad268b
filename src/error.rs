use thiserror::Error;

/// Reasons a level record cannot become a room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no tile rows")]
    EmptyGrid,
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    JaggedRow { row: usize, expected: usize, found: usize },
    #[error("level has no player glyph '^'")]
    MissingPlayer,
    #[error("second player glyph at ({x}, {y})")]
    DuplicatePlayer { x: i32, y: i32 },
    #[error("button tile {id} at ({x}, {y}) has no binding")]
    UnboundButton { id: u8, x: i32, y: i32 },
    #[error("button {id} targets ({x}, {y}), outside the {width}x{height} grid")]
    TargetOutOfBounds { id: u8, x: i32, y: i32, width: usize, height: usize },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {name}: {message}")]
    Fetch { name: String, message: String },
    #[error("failed to parse {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("resource {0} was never loaded")]
    Missing(String),
    #[error("level {index} is invalid: {source}")]
    InvalidLevel {
        index: usize,
        #[source]
        source: LevelError,
    },
    #[error("no levels in {0}")]
    NoLevels(String),
}

/// Failures while bringing up the GPU surface
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
