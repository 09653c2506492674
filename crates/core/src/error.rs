/// Result alias that carries the custom [`PianoRollError`] type.
pub type Result<T> = std::result::Result<T, PianoRollError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum PianoRollError {
    /// Free-form message for failures that do not warrant their own variant.
    #[error("{0}")]
    Message(String),
    /// A note breaks the `duration > 0` / `position >= 0` contract.
    #[error("invalid note `{id}`: {reason}")]
    InvalidNote { id: String, reason: String },
    /// Two notes in the same timeline share an id.
    #[error("duplicate note id `{0}`")]
    DuplicateNoteId(String),
    /// No note in the timeline carries the requested id.
    #[error("no note with id `{0}`")]
    NoteNotFound(String),
    /// Grid length, time signature or subdivision is degenerate.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    /// The tag is not a valid component name.
    #[error("invalid tag name `{0}`")]
    InvalidTagName(String),
    /// A strict `define` was attempted for a tag that already has a factory.
    #[error("component `{0}` has already been defined")]
    AlreadyDefined(String),
    /// No factory is registered for the requested tag.
    #[error("component `{0}` is not defined")]
    NotDefined(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl PianoRollError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub(crate) fn invalid_note(id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidNote {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&str> for PianoRollError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for PianoRollError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
