//! Configuration errors
//!
//! Every input to the builders is an authored constant, so the only failures
//! are authoring mistakes caught when the timelines are constructed.

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("camera segment {index} has zero frames")]
    EmptySegment { index: usize },

    #[error("camera segment {index} has invalid damping {damp} (must be finite and >= 1)")]
    InvalidDamping { index: usize, damp: f32 },

    #[error("camera path needs at least one segment")]
    NoSegments,

    #[error("sorting animation needs at least one box")]
    NoBoxes,

    #[error("group sorting animation needs at least one value")]
    NoGroups,

    #[error("invalid timing: {0}")]
    Timing(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn timing(msg: impl Into<String>) -> Self {
        Self::Timing(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
