//! Bincode-encoded messages
//!
//! Wraps any serde type so it can be used as a request or response.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Message, Unmarshal};
use crate::error::{ChateauError, Result};

/// A serde value carried in bincode's compact binary format
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Bincode<T>(pub T);

impl<T> Bincode<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Bincode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bincode").field(&self.0).finish()
    }
}

impl<T> Message for Bincode<T>
where
    T: Serialize + Send + fmt::Debug + 'static,
{
    fn marshal(&self) -> Result<Vec<u8>> {
        ::bincode::serialize(&self.0).map_err(|e| ChateauError::Marshal(e.to_string()))
    }
}

impl<T> Unmarshal for Bincode<T>
where
    T: Serialize + DeserializeOwned + Send + fmt::Debug + 'static,
{
    fn unmarshal(bytes: &[u8]) -> Result<Self> {
        ::bincode::deserialize(bytes)
            .map(Self)
            .map_err(|e| ChateauError::Decode(e.to_string()))
    }
}
