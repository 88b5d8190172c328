use thiserror::Error;

/// Errors surfaced at the generator call boundary.
///
/// Degraded-but-valid outcomes (a dungeon short of its room quota, a tile grid with
/// forced cells) are reported on the returned data, not through this type.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("adjacency rules declare no tiles")]
    EmptyTileSet,
    #[error("tile declared more than once: {0}")]
    DuplicateTile(String),
    #[error("tile '{tile}' lists unknown neighbor '{neighbor}'")]
    UnknownTile { tile: String, neighbor: String },
    #[error("no consistent tiling found after {attempts} attempts")]
    Unsatisfiable { attempts: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("config parse error: {0}")]
    ConfigParse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;
