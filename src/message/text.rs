//! Text and raw byte messages

use bytes::Bytes;

use super::{Message, Unmarshal};
use crate::error::{ChateauError, Result};

/// UTF-8 text message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text(pub String);

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl Message for Text {
    fn marshal(&self) -> Result<Vec<u8>> {
        Ok(self.0.as_bytes().to_vec())
    }
}

impl Unmarshal for Text {
    fn unmarshal(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .map(|s| Self(s.to_string()))
            .map_err(|e| ChateauError::Decode(format!("text payload is not UTF-8: {}", e)))
    }
}

/// Opaque byte message, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob(pub Bytes);

impl Blob {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Message for Blob {
    fn marshal(&self) -> Result<Vec<u8>> {
        Ok(self.0.to_vec())
    }
}

impl Unmarshal for Blob {
    fn unmarshal(bytes: &[u8]) -> Result<Self> {
        Ok(Self(Bytes::copy_from_slice(bytes)))
    }
}
