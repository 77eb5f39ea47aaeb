//! Audio adapter errors

use thiserror::Error;

use crate::backend::InstanceId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioError {
    #[error("depth listener not found: no entity with Player + Transform")]
    ListenerMissing,

    #[error("unknown audio instance {0:?}")]
    UnknownInstance(InstanceId),

    #[error("audio backend error: {0}")]
    Backend(String),
}
