use super::*;
use byteorder::{BigEndian, ByteOrder};
use std::ops::{Deref, DerefMut};

/// A cursor over a binary document.
pub struct LlsdBytes(Bytes);

impl Deref for LlsdBytes {
    type Target = Bytes;
    fn deref(&self) -> &Bytes { &self.0 }
}

impl DerefMut for LlsdBytes {
    fn deref_mut(&mut self) -> &mut Bytes { &mut self.0 }
}

impl From<Bytes> for LlsdBytes {
    fn from(b: Bytes) -> Self { LlsdBytes(b) }
}

impl From<Vec<u8>> for LlsdBytes {
    fn from(v: Vec<u8>) -> Self { LlsdBytes(Bytes::from(v)) }
}

impl<'a> From<&'a [u8]> for LlsdBytes {
    fn from(s: &'a [u8]) -> Self { LlsdBytes(Bytes::from(s)) }
}

impl std::fmt::Debug for LlsdBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "LlsdBytes({} bytes remaining)", self.len())
    }
}

impl LlsdBytes {
    #[inline]
    fn take_byte(&mut self) -> Result<u8, Error> {
        let byte = self.peek_byte()?;
        self.advance(1);
        Ok(byte)
    }

    #[inline]
    fn peek_byte(&self) -> Result<u8, Error> {
        if !self.is_empty() {
            Ok(self[0])
        } else {
            Err(LlsdError::UnexpectedEof { need: 1, rem: 0 }.into())
        }
    }

    #[inline]
    fn read_many(&mut self, len: usize) -> Result<Bytes, Error> {
        if self.len() >= len {
            Ok(self.split_to(len))
        } else {
            Err(LlsdError::UnexpectedEof {
                need: len,
                rem: self.len(),
            }
            .into())
        }
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, Error> {
        let bs = self.read_many(4)?;
        Ok(BigEndian::read_u32(&bs))
    }

    #[inline]
    fn read_f64(&mut self) -> Result<f64, Error> {
        let bs = self.read_many(8)?;
        Ok(BigEndian::read_f64(&bs))
    }

    /// Reads a 4 byte length and that many bytes.
    #[inline]
    fn read_sized(&mut self) -> Result<Bytes, Error> {
        let len = self.read_u32()? as usize;
        self.read_many(len)
    }

    fn read_text(&mut self, what: &'static str) -> Result<String, Error> {
        let bs = self.read_sized()?;
        match std::str::from_utf8(&bs) {
            Ok(s) => Ok(s.to_owned()),
            Err(_) => Err(LlsdError::InvalidUtf8(what).into()),
        }
    }

    fn expect_byte(&mut self, expected: u8) -> Result<(), Error> {
        let found = self.take_byte()?;
        if found != expected {
            return Err(LlsdError::MissingTerminator {
                expected: expected as char,
                found,
            }
            .into());
        }
        Ok(())
    }

    /// Skips leading whitespace and the document header, if present.
    fn skip_header(&mut self) {
        let ws = self.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let end = ws + BINARY_HEADER.len();
        if self.len() >= end && self[ws..end].eq_ignore_ascii_case(BINARY_HEADER) {
            self.advance(end);
            let nl = self.iter().take_while(|b| b.is_ascii_whitespace()).count();
            self.advance(nl);
        }
    }

    /// Reads one value, recursing into containers.
    ///
    /// Fails with [`LlsdError::TooDeep`] if containers nest deeper than [`MAX_DEPTH`].
    pub fn read_value(&mut self) -> Result<Llsd, Error> { self.read_nested(0) }

    fn read_nested(&mut self, depth: usize) -> Result<Llsd, Error> {
        let tag = self.take_byte()?;
        if (tag == TAG_ARRAY_BEGIN || tag == TAG_MAP_BEGIN) && depth >= MAX_DEPTH {
            return Err(LlsdError::TooDeep(MAX_DEPTH).into());
        }
        let value = match tag {
            TAG_UNDEF => Llsd::Unknown,
            TAG_TRUE => Llsd::Boolean(true),
            TAG_FALSE => Llsd::Boolean(false),
            TAG_INTEGER => Llsd::Integer(self.read_u32()? as i32),
            TAG_REAL => Llsd::Real(self.read_f64()?),
            TAG_UUID => {
                let bs = self.read_many(16)?;
                Llsd::Uuid(uuid::Uuid::from_slice(&bs)?)
            }
            TAG_BINARY => Llsd::Binary(self.read_sized()?),
            TAG_STRING => Llsd::String(self.read_text("string")?),
            TAG_URI => {
                let text = self.read_text("uri")?;
                Llsd::Uri(url::Url::parse(&text).ok())
            }
            TAG_DATE => Llsd::Date(date::from_seconds(self.read_f64()?)),
            TAG_ARRAY_BEGIN => {
                let len = self.read_u32()? as usize;
                // a corrupt count must not reserve more than the input could hold
                let mut arr = Vec::with_capacity(len.min(self.len()));
                for _ in 0..len {
                    arr.push(self.read_nested(depth + 1)?);
                }
                self.expect_byte(TAG_ARRAY_END)?;
                Llsd::Array(arr)
            }
            TAG_MAP_BEGIN => {
                let len = self.read_u32()? as usize;
                let mut map = LlsdMap::with_capacity(len.min(self.len()));
                for _ in 0..len {
                    self.expect_key()?;
                    let key = self.read_text("key")?;
                    let value = self.read_nested(depth + 1)?;
                    map.insert(key, value);
                }
                self.expect_byte(TAG_MAP_END)?;
                Llsd::Map(map)
            }
            unknown => return Err(LlsdError::UnknownTag(unknown, unknown as char).into()),
        };
        Ok(value)
    }

    fn expect_key(&mut self) -> Result<(), Error> {
        match self.take_byte()? {
            TAG_KEY => Ok(()),
            other => bail!("expected map key tag 'k', found {:#04x}", other),
        }
    }
}

/// Decodes a complete binary document. The header is optional.
///
/// # Example
///
/// ```
/// use llsd::{encoding::{decode_full, encode_full}, Llsd};
///
/// let bs = encode_full(&Llsd::from_integer(7));
/// assert_eq!(decode_full(&bs).unwrap(), Llsd::from_integer(7));
///
/// // the header may be left off
/// assert_eq!(decode_full(b"i\x00\x00\x00\x07").unwrap(), Llsd::from_integer(7));
/// ```
pub fn decode_full(bs: &[u8]) -> Result<Llsd, Error> {
    let mut cursor = LlsdBytes::from(bs);
    cursor.skip_header();
    let value = cursor.read_value()?;
    if !cursor.is_empty() {
        warn!(
            "ignoring {} trailing bytes after binary structured data",
            cursor.len()
        );
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downcast(e: &Error) -> &LlsdError { e.downcast_ref::<LlsdError>().unwrap() }

    #[test]
    fn header_and_whitespace_are_optional() {
        let bare = decode_full(b"1").unwrap();
        let full = decode_full(b"  <? llsd/binary ?>\n1").unwrap();
        assert_eq!(bare, Llsd::from_boolean(true));
        assert_eq!(full, bare);
    }

    #[test]
    fn header_case_is_ignored() {
        let mixed = decode_full(b"\t<? LLSD/Binary ?>\ni\x00\x00\x00\x05").unwrap();
        assert_eq!(mixed, Llsd::from_integer(5));

        // shorter than the header
        assert!(decode_full(b"<? LLSD").is_err());
    }

    #[test]
    fn truncated_input() {
        let err = decode_full(b"i\x00\x00").unwrap_err();
        match downcast(&err) {
            LlsdError::UnexpectedEof { need: 4, rem: 2 } => {}
            other => panic!("unexpected error {:?}", other),
        }

        assert!(decode_full(b"").is_err());
        assert!(decode_full(b"s\x00\x00\x00\x09abc").is_err());
    }

    #[test]
    fn unknown_tag() {
        let err = decode_full(b"x").unwrap_err();
        match downcast(&err) {
            LlsdError::UnknownTag(b'x', 'x') => {}
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_terminator() {
        let err = decode_full(b"[\x00\x00\x00\x011}").unwrap_err();
        match downcast(&err) {
            LlsdError::MissingTerminator {
                expected: ']',
                found: b'}',
            } => {}
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn invalid_utf8_string() {
        let err = decode_full(b"s\x00\x00\x00\x01\xff").unwrap_err();
        match downcast(&err) {
            LlsdError::InvalidUtf8("string") => {}
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        assert_eq!(decode_full(b"!junk").unwrap(), Llsd::Unknown);
    }

    #[test]
    fn nesting_is_bounded() {
        fn nested(levels: usize) -> Vec<u8> {
            let mut bs = Vec::new();
            for _ in 0..levels {
                bs.extend_from_slice(b"[\x00\x00\x00\x01");
            }
            bs.push(TAG_UNDEF);
            bs.extend(std::iter::repeat(TAG_ARRAY_END).take(levels));
            bs
        }

        assert!(decode_full(&nested(MAX_DEPTH)).is_ok());

        let err = decode_full(&nested(MAX_DEPTH + 1)).unwrap_err();
        match downcast(&err) {
            LlsdError::TooDeep(MAX_DEPTH) => {}
            other => panic!("unexpected error {:?}", other),
        }

        // no stack overflow on hostile input
        let mut deep = Vec::new();
        for _ in 0..1_000_000 {
            deep.extend_from_slice(b"{\x00\x00\x00\x01k\x00\x00\x00\x00");
        }
        assert!(decode_full(&deep).is_err());
    }

    #[test]
    fn huge_counts_fail_cleanly() {
        assert!(decode_full(b"[\xff\xff\xff\xff").is_err());
        assert!(decode_full(b"{\xff\xff\xff\xff").is_err());
    }

    #[test]
    fn dates_are_big_endian_seconds() {
        let mut bs = vec![TAG_DATE];
        bs.extend_from_slice(&86_400f64.to_bits().to_be_bytes());
        assert_eq!(decode_full(&bs).unwrap().as_long(), 86_400);
    }
}
