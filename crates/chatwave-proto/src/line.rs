//! Line-based codec for tokio.
//!
//! Frames the connection's byte stream into newline-terminated lines.
//! Decoded lines are handed to the command parser with the terminator
//! already stripped; encoded lines get CRLF appended, so callers never
//! deal with terminators on either side.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Codec for CRLF/LF-terminated UTF-8 lines with a length limit.
pub struct LineCodec {
    /// Index of next byte to check for newline.
    next_index: usize,
    /// Maximum line length in bytes, terminator included.
    max_len: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_len(crate::DEFAULT_MAX_LINE_LEN)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        // Look for a newline starting from where we left off last call.
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let text = std::str::from_utf8(&line).map_err(|e| ProtocolError::InvalidUtf8 {
                byte_pos: e.valid_up_to(),
                details: e.to_string(),
            })?;

            Ok(Some(text.trim_end_matches(['\r', '\n']).to_string()))
        } else {
            // No complete line yet; remember where the scan stopped.
            self.next_index = src.len();

            // A partial line over the limit will never become valid.
            if src.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_complete_line_strips_terminator() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("LOGIN alice\r\n");

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, Some("LOGIN alice".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_bare_lf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("LIST_USERS\n");

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, Some("LIST_USERS".to_string()));
    }

    #[test]
    fn decode_partial_line_waits() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("MSG bob hel");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"lo\r\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("MSG bob hello".to_string())
        );
    }

    #[test]
    fn decode_two_lines_in_one_buffer() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("LOGIN alice\r\nLIST_USERS\r\n");

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("LOGIN alice".into()));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("LIST_USERS".into()));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn decode_too_long() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("this line is way too long\n");

        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::LineTooLong { .. })
        ));
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"MSG bob \xff\xfe\n"[..]);

        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn encode_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode("OK LOGIN alice".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"OK LOGIN alice\r\n");
    }
}
