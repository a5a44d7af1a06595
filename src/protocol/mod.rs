//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format
//!
//! One request per connection:
//!
//! ### Request Format
//! ```text
//! ┌──────────────┬─────────┬─────────────────────────┬──────────┐
//! │ Handler name │ Sep (1) │         Payload         │ '\n' (1) │
//! └──────────────┴─────────┴─────────────────────────┴──────────┘
//! ```
//!
//! The separator is `:` for [`DelimitedCodec`].
//!
//! ### Response Format
//! - Success: the marshaled response message, no length prefix, no delimiter
//! - Failure: the ASCII text `error: <message>`, equally unframed
//!
//! The server closes the connection after writing either one, so the client
//! reads until EOF. Success and failure are not distinguishable at the
//! transport level.

mod codec;
mod frame;

pub use codec::{Codec, DelimitedCodec, DEFAULT_SEPARATOR};
pub use frame::{read_frame, Frame, FRAME_DELIMITER};
