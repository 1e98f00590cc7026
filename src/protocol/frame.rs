//! Packet Framing
//!
//! Every packet on the wire is wrapped in a frame:
//!
//! ```text
//! ┌─────┬────────────────────┬─────────────────────┬─────┐
//! │ '|' │ length (u32, BE)   │ payload             │ '|' │
//! │ 1 B │ 4 B                │ length B            │ 1 B │
//! └─────┴────────────────────┴─────────────────────┴─────┘
//! ```
//!
//! A frame is `length + 6` bytes. There is no checksum and no compression.
//!
//! ## Incremental Parsing
//!
//! TCP is a stream, so a frame may arrive split over many reads, and one read
//! may carry the end of one frame plus the start of the next. The parser works
//! on an accumulating [`BytesMut`]:
//!
//! - `Ok(Some(payload))` - a whole frame was at the front of the buffer; it
//!   has been split off and any surplus bytes are left in place
//! - `Ok(None)` - the buffer holds a frame prefix, read more and retry
//! - `Err(FrameError)` - the buffer does not start with a frame
//!
//! The trailing marker is written on every frame. On decode a wrong trailer
//! is logged but the payload is still returned.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use tracing::warn;

/// Marker byte opening and closing every frame
pub const MARKER: u8 = b'|';

/// Opening marker plus the length field
pub const HEADER_LEN: usize = 5;

/// Bytes a frame adds around its payload
pub const FRAME_OVERHEAD: usize = HEADER_LEN + 1;

/// Largest payload the length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize;

/// Errors that can occur while framing or parsing packets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The first buffered byte is not the frame marker
    #[error("unexpected frame marker: {0:#04x}")]
    UnexpectedMarker(u8),

    /// The payload exceeds what the length field or the configured limit allows
    #[error("payload too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

/// Wraps `payload` in a frame.
///
/// The frame is built in one buffer so it can be sent with a single write.
pub fn encode_frame(payload: &[u8]) -> Result<Bytes, FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(payload.len() + FRAME_OVERHEAD);
    buf.put_u8(MARKER);
    buf.put_u32(payload.len() as u32);
    buf.put_slice(payload);
    buf.put_u8(MARKER);
    Ok(buf.freeze())
}

/// An incremental frame parser.
///
/// The parser itself is stateless apart from its payload limit; all partial
/// data lives in the caller's buffer.
#[derive(Debug, Clone, Copy)]
pub struct FrameParser {
    max_payload: usize,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Creates a parser that accepts any payload the length field can describe.
    pub fn new() -> Self {
        Self {
            max_payload: MAX_PAYLOAD_SIZE,
        }
    }

    /// Creates a parser that rejects frames declaring more than `max_payload` bytes.
    pub fn with_max_payload(max_payload: usize) -> Self {
        Self {
            max_payload: max_payload.min(MAX_PAYLOAD_SIZE),
        }
    }

    /// Returns the size of the complete frame at the front of `buf`, if any.
    ///
    /// Nothing is consumed.
    pub fn frame_len(&self, buf: &[u8]) -> Result<Option<usize>, FrameError> {
        let Some(&first) = buf.first() else {
            return Ok(None);
        };
        if first != MARKER {
            return Err(FrameError::UnexpectedMarker(first));
        }
        if buf.len() < HEADER_LEN {
            return Ok(None);
        }

        let length = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
        if length > self.max_payload {
            return Err(FrameError::PayloadTooLarge {
                size: length,
                max: self.max_payload,
            });
        }

        let total = length
            .checked_add(FRAME_OVERHEAD)
            .ok_or(FrameError::PayloadTooLarge {
                size: length,
                max: self.max_payload,
            })?;

        if buf.len() < total {
            return Ok(None);
        }
        Ok(Some(total))
    }

    /// Splits one frame off the front of `buf` and returns its payload.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(payload))` - a frame was consumed; surplus bytes stay in `buf`
    /// - `Ok(None)` - incomplete, `buf` is untouched
    /// - `Err(e)` - `buf` does not start with a valid frame header
    pub fn parse(&self, buf: &mut BytesMut) -> Result<Option<Bytes>, FrameError> {
        let Some(total) = self.frame_len(buf)? else {
            return Ok(None);
        };

        let trailer = buf[total - 1];
        if trailer != MARKER {
            warn!(trailer = trailer, "Frame trailer is not the marker byte");
        }

        let frame = buf.split_to(total).freeze();
        Ok(Some(frame.slice(HEADER_LEN..total - 1)))
    }
}

/// Parses one frame with the default payload limit.
pub fn parse_frame(buf: &mut BytesMut) -> Result<Option<Bytes>, FrameError> {
    FrameParser::new().parse(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(payload: &[u8]) -> Bytes {
        encode_frame(payload).unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let encoded = frame(b"ping");
        assert_eq!(&encoded[..], b"|\x00\x00\x00\x04ping|");
    }

    #[test]
    fn test_encode_empty_payload() {
        let encoded = frame(b"");
        assert_eq!(&encoded[..], b"|\x00\x00\x00\x00|");
        assert_eq!(encoded.len(), FRAME_OVERHEAD);
    }

    #[test]
    fn test_encode_length_is_big_endian() {
        let payload = vec![7u8; 0x0102_03];
        let encoded = frame(&payload);
        assert_eq!(&encoded[1..5], &[0x00, 0x01, 0x02, 0x03]);
        assert_eq!(encoded.len(), payload.len() + FRAME_OVERHEAD);
    }

    #[test]
    fn test_parse_complete_frame() {
        let mut buf = BytesMut::from(&b"|\x00\x00\x00\x05hello|"[..]);
        let payload = parse_frame(&mut buf).unwrap().unwrap();
        assert_eq!(payload, Bytes::from("hello"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_parse_empty_buffer_needs_data() {
        let mut buf = BytesMut::new();
        assert!(parse_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_parse_incomplete_header() {
        let mut buf = BytesMut::from(&b"|\x00\x00"[..]);
        assert!(parse_frame(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_parse_incomplete_payload() {
        let mut buf = BytesMut::from(&b"|\x00\x00\x00\x05hel"[..]);
        assert!(parse_frame(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_parse_missing_trailer_is_incomplete() {
        let mut buf = BytesMut::from(&b"|\x00\x00\x00\x05hello"[..]);
        assert!(parse_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_parse_rejects_bad_marker() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\n"[..]);
        assert_eq!(
            parse_frame(&mut buf),
            Err(FrameError::UnexpectedMarker(b'G'))
        );
    }

    #[test]
    fn test_parse_tolerates_bad_trailer() {
        let mut buf = BytesMut::from(&b"|\x00\x00\x00\x02hi#"[..]);
        let payload = parse_frame(&mut buf).unwrap().unwrap();
        assert_eq!(payload, Bytes::from("hi"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_parse_keeps_surplus_for_next_frame() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&frame(b"first"));
        buf.extend_from_slice(&frame(b"second")[..4]);

        let payload = parse_frame(&mut buf).unwrap().unwrap();
        assert_eq!(payload, Bytes::from("first"));
        assert_eq!(&buf[..], &frame(b"second")[..4]);

        // Rest of the second frame arrives
        buf.extend_from_slice(&frame(b"second")[4..]);
        let payload = parse_frame(&mut buf).unwrap().unwrap();
        assert_eq!(payload, Bytes::from("second"));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_parse_back_to_back_frames() {
        let mut buf = BytesMut::new();
        for payload in [&b"a"[..], b"", b"ccc"] {
            buf.extend_from_slice(&frame(payload));
        }

        assert_eq!(parse_frame(&mut buf).unwrap().unwrap(), Bytes::from("a"));
        assert_eq!(parse_frame(&mut buf).unwrap().unwrap(), Bytes::from(""));
        assert_eq!(parse_frame(&mut buf).unwrap().unwrap(), Bytes::from("ccc"));
        assert!(parse_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_parse_byte_at_a_time() {
        let encoded = frame(b"split across many reads");
        let mut buf = BytesMut::new();

        for (i, byte) in encoded.iter().enumerate() {
            buf.extend_from_slice(&[*byte]);
            let parsed = parse_frame(&mut buf).unwrap();
            if i + 1 < encoded.len() {
                assert!(parsed.is_none(), "frame completed early at byte {}", i);
            } else {
                assert_eq!(parsed, Some(Bytes::from("split across many reads")));
            }
        }
    }

    #[test]
    fn test_parse_every_two_way_split() {
        let encoded = frame(b"boundary");
        for split in 1..encoded.len() {
            let mut buf = BytesMut::from(&encoded[..split]);
            assert!(parse_frame(&mut buf).unwrap().is_none());
            buf.extend_from_slice(&encoded[split..]);
            assert_eq!(
                parse_frame(&mut buf).unwrap(),
                Some(Bytes::from("boundary")),
                "split at {}",
                split
            );
        }
    }

    #[test]
    fn test_parse_irregular_chunks() {
        // Deterministic pseudo-random chunk sizes over two frames
        let first: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
        let second = b"tail".to_vec();
        let mut stream = frame(&first).to_vec();
        stream.extend_from_slice(&frame(&second));

        let mut seed = 0x2545_f491u32;
        let mut offset = 0;
        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();

        while offset < stream.len() {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let chunk = 1 + (seed as usize % 97);
            let end = (offset + chunk).min(stream.len());
            buf.extend_from_slice(&stream[offset..end]);
            offset = end;

            while let Some(payload) = parse_frame(&mut buf).unwrap() {
                decoded.push(payload);
            }
        }

        assert_eq!(decoded.len(), 2);
        assert_eq!(&decoded[0][..], &first[..]);
        assert_eq!(&decoded[1][..], &second[..]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_parser_enforces_max_payload() {
        let parser = FrameParser::with_max_payload(8);
        let mut buf = BytesMut::from(&frame(b"0123456789")[..]);
        assert_eq!(
            parser.parse(&mut buf),
            Err(FrameError::PayloadTooLarge { size: 10, max: 8 })
        );

        let mut buf = BytesMut::from(&frame(b"01234567")[..]);
        assert_eq!(parser.parse(&mut buf).unwrap(), Some(Bytes::from("01234567")));
    }

    #[test]
    fn test_frame_len_does_not_consume() {
        let encoded = frame(b"peek");
        let parser = FrameParser::new();
        assert_eq!(parser.frame_len(&encoded).unwrap(), Some(encoded.len()));
        assert_eq!(parser.frame_len(&encoded[..6]).unwrap(), None);
    }
}
