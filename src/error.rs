use thiserror::Error;

use crate::ast::{BlockKind, InlineKind};

/// Failures at the edges of the crate. Tokenizing and serializing never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("malformed node JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{kind:?} block is missing its payload")]
    MissingBlockPayload { kind: BlockKind },

    #[error("{kind:?} inline node is missing its payload")]
    MissingInlinePayload { kind: InlineKind },

    #[error("heading level {0} is outside 1-6")]
    InvalidHeadingLevel(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
