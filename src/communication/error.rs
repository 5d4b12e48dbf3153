//! Communication error management.

use crate::archive::ArchiveError;
use crate::types::Rank;
use derive_more::Display;

#[derive(Debug, Display, PartialEq)]
pub enum CommError {
    #[display(fmt = "communicator not initialized")]
    NotInitialized,
    #[display(fmt = "rank {} is not in the group", _0)]
    InvalidRank(Rank),
    #[display(fmt = "rank {} disconnected", _0)]
    Disconnected(Rank),
    #[display(fmt = "malformed message: {}", _0)]
    Archive(ArchiveError),
}

impl std::error::Error for CommError {}

impl From<ArchiveError> for CommError {
    fn from(e: ArchiveError) -> Self {
        CommError::Archive(e)
    }
}

pub type Result<T> = std::result::Result<T, CommError>;
