//! Message Module
//!
//! The values exchanged with handlers.
//!
//! A [`Message`] only promises to marshal itself to bytes. Request types
//! also implement [`Unmarshal`] so a [`RequestType`] descriptor can be built
//! for them at registration time; the codec uses that descriptor to turn a
//! frame payload back into a boxed message.
//!
//! ## Shipped Messages
//! - [`Text`]: UTF-8 text
//! - [`Blob`]: opaque bytes
//! - [`Bincode`]: any serde type, bincode-encoded
//!
//! Request payloads travel inside a newline-delimited frame, so a request
//! encoding must not produce a `0x0A` byte. Responses are unframed and have
//! no such restriction.

mod encoded;
mod text;

use std::any::Any;
use std::fmt;

use crate::error::{ChateauError, Result};

pub use encoded::Bincode;
pub use text::{Blob, Text};

/// Conversion into `Any` for recovering the concrete type behind a
/// `Box<dyn Message>`
pub trait AsAny {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T: Any + Send> AsAny for T {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// A value that can be written to a peer
pub trait Message: AsAny + Send + fmt::Debug {
    /// Serialize to the exact bytes written on the wire
    fn marshal(&self) -> Result<Vec<u8>>;
}

/// A message that can be parsed from a frame payload
pub trait Unmarshal: Message + Sized + 'static {
    fn unmarshal(bytes: &[u8]) -> Result<Self>;
}

type DecodeFn = fn(&[u8]) -> Result<Box<dyn Message>>;

/// Describes the request type a handler expects
#[derive(Clone, Copy)]
pub struct RequestType {
    name: &'static str,
    decode: DecodeFn,
}

impl RequestType {
    /// Descriptor for the message type `M`
    pub fn of<M: Unmarshal>() -> Self {
        Self {
            name: std::any::type_name::<M>(),
            decode: decode_boxed::<M>,
        }
    }

    /// Fully qualified type name, for logging
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parse a payload into a boxed message of this type
    pub fn decode(&self, payload: &[u8]) -> Result<Box<dyn Message>> {
        (self.decode)(payload)
    }
}

impl fmt::Debug for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RequestType").field(&self.name).finish()
    }
}

fn decode_boxed<M: Unmarshal>(payload: &[u8]) -> Result<Box<dyn Message>> {
    Ok(Box::new(M::unmarshal(payload)?))
}

/// Recover the concrete request type from a decoded message
///
/// Fails with an internal error when the codec produced a different type
/// than the handler declared.
pub(crate) fn downcast<M: Unmarshal>(msg: Box<dyn Message>) -> Result<M> {
    msg.into_any().downcast::<M>().map(|m| *m).map_err(|_| {
        ChateauError::Internal(format!(
            "incorrect handler format: request is not a {}",
            std::any::type_name::<M>()
        ))
    })
}
