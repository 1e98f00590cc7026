//! Packet Protocol
//!
//! This module implements the length-prefixed framing used by every packet
//! operation of a [`Connection`](crate::Connection).
//!
//! ## Example
//!
//! ```
//! use framesock::protocol::{encode_frame, parse_frame};
//! use bytes::BytesMut;
//!
//! let frame = encode_frame(b"ping").unwrap();
//! assert_eq!(&frame[..], b"|\x00\x00\x00\x04ping|");
//!
//! let mut buffer = BytesMut::from(&frame[..]);
//! let payload = parse_frame(&mut buffer).unwrap().unwrap();
//! assert_eq!(&payload[..], b"ping");
//! ```

pub mod frame;

pub use frame::{
    encode_frame, parse_frame, FrameError, FrameParser, FRAME_OVERHEAD, HEADER_LEN, MARKER,
    MAX_PAYLOAD_SIZE,
};
