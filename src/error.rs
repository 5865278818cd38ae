use std::error;
use std::fmt;
use std::result;

/// Failures reported by the fallible map operations.
///
/// A failed operation never modifies the map it was called on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The requested key is not present in the map.
    KeyNotFound,
    /// The operation needs at least one entry, but the map is empty.
    EmptyContainer,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
            Error::EmptyContainer => write!(f, "container is empty"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
