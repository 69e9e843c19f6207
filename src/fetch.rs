//! Document-fetch collaborator.
//!
//! The library performs no network I/O of its own. Callers that load
//! documents from somewhere other than the local filesystem implement
//! [`Fetch`] and hand it to a parser's `open_fetched`.

use crate::error::Result;

/// Raw bytes returned by a fetch together with its status code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fetched {
    /// Transport status, e.g. an HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl Fetched {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Retrieves a document given its location.
pub trait Fetch {
    /// Fetch `location`.
    ///
    /// A response with a non-success status is still returned as
    /// [`Fetched`]; only transport failures are errors.
    fn fetch(&self, location: &str) -> Result<Fetched>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> Result<Fetched>,
{
    fn fetch(&self, location: &str) -> Result<Fetched> {
        self(location)
    }
}
