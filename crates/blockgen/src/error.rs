use crate::segments::Edge;
use crate::terrain::TerrainError;

#[derive(Debug, Clone, PartialEq)]
pub enum BlockError {
    /// The extent is not a valid geographic box.
    InvalidExtent,
    /// Terrain sampling failed or returned the wrong number of points.
    TerrainUnavailable(String),
    /// One wall could not be built or added to the scene.
    WallConstruction { edge: Edge, reason: String },
    /// The camera could not be framed on the block.
    CameraFraming(String),
    /// A generation is already running.
    Busy,
    /// The terrain provider never became ready; the session is disabled.
    SessionFailed,
}

impl std::fmt::Display for BlockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockError::InvalidExtent => write!(f, "invalid extent"),
            BlockError::TerrainUnavailable(msg) => write!(f, "terrain unavailable: {msg}"),
            BlockError::WallConstruction { edge, reason } => {
                write!(f, "could not build {edge} wall: {reason}")
            }
            BlockError::CameraFraming(msg) => write!(f, "camera framing failed: {msg}"),
            BlockError::Busy => write!(f, "a block is already being generated"),
            BlockError::SessionFailed => write!(f, "terrain provider failed to initialize"),
        }
    }
}

impl std::error::Error for BlockError {}

impl From<TerrainError> for BlockError {
    fn from(err: TerrainError) -> Self {
        BlockError::TerrainUnavailable(err.to_string())
    }
}
