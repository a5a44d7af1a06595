//! Protocol codec
//!
//! The [`Codec`] trait is how the server finds the handler name inside a
//! frame and turns the rest of the frame into a request message.

use crate::error::{ChateauError, Result};
use crate::message::{Message, RequestType};

use super::frame::FRAME_DELIMITER;

/// Separator between handler name and payload used by [`DelimitedCodec`]
pub const DEFAULT_SEPARATOR: u8 = b':';

/// Frame parsing collaborator used by the server
pub trait Codec: Send + Sync {
    /// Find the handler name in a frame
    ///
    /// Returns the name and the offset at which the payload starts.
    fn extract_handler_name(&self, frame: &[u8]) -> Result<(String, usize)>;

    /// Decode a payload (delimiter already stripped) into the given type
    fn decode_message(&self, payload: &[u8], request_type: &RequestType) -> Result<Box<dyn Message>>;
}

/// `<name><separator><payload>\n` codec
#[derive(Debug, Clone, Copy)]
pub struct DelimitedCodec {
    separator: u8,
}

impl Default for DelimitedCodec {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl DelimitedCodec {
    /// Codec splitting name and payload on `separator`
    pub fn new(separator: u8) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> u8 {
        self.separator
    }

    /// Build a request frame for `name` carrying `payload`
    pub fn encode_frame(&self, name: &str, payload: &[u8]) -> Vec<u8> {
        let mut frame = Vec::with_capacity(name.len() + payload.len() + 2);
        frame.extend_from_slice(name.as_bytes());
        frame.push(self.separator);
        frame.extend_from_slice(payload);
        frame.push(FRAME_DELIMITER);
        frame
    }
}

impl Codec for DelimitedCodec {
    fn extract_handler_name(&self, frame: &[u8]) -> Result<(String, usize)> {
        let pos = frame
            .iter()
            .position(|&b| b == self.separator || b == FRAME_DELIMITER)
            .filter(|&pos| frame[pos] == self.separator)
            .ok_or_else(|| {
                ChateauError::MalformedFrame(format!(
                    "no '{}' separator before the end of the frame",
                    self.separator.escape_ascii()
                ))
            })?;

        if pos == 0 {
            return Err(ChateauError::MalformedFrame("empty handler name".to_string()));
        }

        let name = std::str::from_utf8(&frame[..pos])
            .map_err(|e| ChateauError::MalformedFrame(format!("handler name is not UTF-8: {}", e)))?;

        Ok((name.to_string(), pos + 1))
    }

    fn decode_message(&self, payload: &[u8], request_type: &RequestType) -> Result<Box<dyn Message>> {
        request_type.decode(payload).map_err(|e| match e {
            ChateauError::Decode(msg) => {
                ChateauError::Decode(format!("{} as {}", msg, request_type.name()))
            }
            other => other,
        })
    }
}
