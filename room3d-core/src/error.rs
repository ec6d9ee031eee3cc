//! Error type shared by registration and traversal.

/// Errors raised while building or traversing the room scene
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("unknown shape kind '{0}'")]
    UnknownShapeKind(String),
    #[error("shape '{0}' is declared more than once in the catalog")]
    DuplicateShape(String),
    #[error("shape '{0}' is not registered in the shape directory")]
    MissingShape(String),
    #[error("shape '{name}' has an unusable tilt angle ({tilt})")]
    InvalidTilt { name: String, tilt: f32 },
    #[error("index {index} does not fit a 16-bit index buffer")]
    IndexOverflow { index: u32 },
    #[error("transform stack underflow: pop called on an empty stack")]
    StackUnderflow,
    #[error("transform stack left unbalanced at depth {depth}")]
    StackImbalance { depth: usize },
}

impl SceneError {
    /// Configuration errors must abort scene setup; the rest are traversal bugs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SceneError::UnknownShapeKind(_)
                | SceneError::DuplicateShape(_)
                | SceneError::MissingShape(_)
                | SceneError::InvalidTilt { .. }
                | SceneError::IndexOverflow { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SceneError>;
