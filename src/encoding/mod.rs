//! # Wire formats
//!
//! Codecs for the three wire formats and the dispatcher that picks between them.
//!
//! Every codec implements [`Codec`]. The binary codec is always built; the XML and
//! JSON codecs sit behind the `xml` and `json` cargo features, both on by default.
//!
//! [`deserialize`] and its siblings look at the first few bytes of their input to
//! choose a codec:
//!
//! * `<? llsd/binary ?>` selects the binary codec,
//! * `<llsd>`, `<?xml` or `<? llsd/xml ?>` select the XML codec,
//! * anything else is read as JSON.
//!
//! # Example
//!
//! ```
//! use llsd::prelude::*;
//!
//! let xml = b"  <LLSD><map><key>agents</key><integer>3</integer></map></LLSD>";
//! assert_eq!(detect_format(xml), Format::Xml);
//!
//! let tree = deserialize(xml).unwrap();
//! assert_eq!(tree["agents"].as_integer(), 3);
//!
//! // and back out as binary
//! let bin = serialize(&tree, Format::Binary, false).unwrap();
//! assert!(bin.starts_with(b"<? llsd/binary ?>"));
//! assert_eq!(deserialize(&bin).unwrap(), tree);
//! ```

use crate::{date, error::LlsdError, Llsd, LlsdMap};
use bytes::Bytes;
use failure::{bail, Error};
use hashbrown::HashMap;
use log::{debug, warn};
use std::io::{Read, Seek, SeekFrom};

pub mod ser;
pub use ser::*;
pub mod de;
pub use de::*;
#[cfg(feature = "json")] pub mod json;
#[cfg(feature = "xml")] pub mod xml;
mod constants;
use constants::*;
pub use constants::MAX_DEPTH;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A wire format.
pub enum Format {
    Xml,
    Json,
    Binary,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Format::Xml => "xml",
            Format::Json => "json",
            Format::Binary => "binary",
        };
        write!(f, "{}", name)
    }
}

/// An encoder and decoder for one wire format.
///
/// For every kind the format carries natively, `decode(encode(v))` reproduces `v`.
pub trait Codec {
    /// Writes a complete document. `pretty` asks for human-readable layout where the
    /// format has one.
    fn encode(&self, value: &Llsd, pretty: bool) -> Result<Vec<u8>, Error>;

    /// Reads a complete document.
    fn decode(&self, bs: &[u8]) -> Result<Llsd, Error>;
}

#[derive(Clone, Copy, Debug, Default)]
/// The binary codec. `pretty` has no effect.
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn encode(&self, value: &Llsd, _pretty: bool) -> Result<Vec<u8>, Error> { Ok(encode_full(value)) }

    fn decode(&self, bs: &[u8]) -> Result<Llsd, Error> { decode_full(bs) }
}

impl Format {
    /// The codec for this format.
    ///
    /// # Errors
    ///
    /// Returns [`LlsdError::FormatDisabled`] if the codec was left out of this build.
    pub fn codec(self) -> Result<&'static dyn Codec, Error> {
        match self {
            Format::Binary => Ok(&BinaryCodec),
            #[cfg(feature = "xml")]
            Format::Xml => Ok(&xml::XmlCodec),
            #[cfg(feature = "json")]
            Format::Json => Ok(&json::JsonCodec),
            #[allow(unreachable_patterns)]
            disabled => Err(LlsdError::FormatDisabled(disabled).into()),
        }
    }
}

/// Case-insensitive prefix test.
fn starts_with_ci(haystack: &[u8], marker: &[u8]) -> bool {
    haystack.len() >= marker.len() && haystack[..marker.len()].eq_ignore_ascii_case(marker)
}

fn is_xml(prefix: &[u8]) -> bool { XML_HEADERS.iter().any(|m| starts_with_ci(prefix, m)) }

fn trim_start(bs: &[u8]) -> &[u8] {
    let ws = bs.iter().take_while(|b| b.is_ascii_whitespace()).count();
    &bs[ws..]
}

/// Picks the format of raw bytes.
///
/// The leading bytes are first read as UTF-8 text and, after skipping whitespace,
/// compared against the XML markers. Failing that, the raw bytes are compared against
/// the binary marker and then the XML markers. Anything else is JSON.
///
/// # Example
///
/// ```
/// use llsd::encoding::{detect_format, Format};
///
/// assert_eq!(detect_format(b"<? llsd/binary ?>\n!"), Format::Binary);
/// assert_eq!(detect_format(b"\n\t<?XML version=\"1.0\"?>"), Format::Xml);
/// assert_eq!(detect_format(b"{\"a\": 1}"), Format::Json);
/// ```
pub fn detect_format(bs: &[u8]) -> Format {
    let prefix = &bs[..bs.len().min(HEADER_LEN)];

    // a prefix can cut a multi-byte character in half, so keep the valid part
    let text = match std::str::from_utf8(prefix) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&prefix[..e.valid_up_to()]).unwrap_or_default(),
    };
    if is_xml(text.trim_start().as_bytes()) {
        return Format::Xml;
    }

    let raw = trim_start(prefix);
    if starts_with_ci(raw, BINARY_HEADER) {
        Format::Binary
    } else if is_xml(raw) {
        Format::Xml
    } else {
        Format::Json
    }
}

/// Picks the format of text, skipping leading whitespace.
pub fn detect_format_str(s: &str) -> Format {
    let text = s.trim_start().as_bytes();
    if starts_with_ci(text, BINARY_HEADER) {
        Format::Binary
    } else if is_xml(text) {
        Format::Xml
    } else {
        Format::Json
    }
}

/// Picks the format of a stream from its header, leaving the stream where it was.
///
/// Unlike the byte and text variants, the header is compared byte for byte and
/// leading whitespace is not skipped.
///
/// # Errors
///
/// Fails with [`LlsdError::UnseekableStream`] if the stream cannot report its position,
/// and with [`LlsdError::Io`] if reading or rewinding fails.
pub fn detect_stream_format<R: Read + Seek>(stream: &mut R) -> Result<Format, Error> {
    let start = stream
        .seek(SeekFrom::Current(0))
        .map_err(|_| LlsdError::UnseekableStream)?;

    // one bounded read; a short read just compares fewer bytes
    let mut buf = [0u8; HEADER_LEN];
    let n = stream.read(&mut buf).map_err(LlsdError::from)?;
    stream
        .seek(SeekFrom::Start(start))
        .map_err(LlsdError::from)?;
    let header = &buf[..n];

    let format = if header.starts_with(BINARY_HEADER) {
        Format::Binary
    } else if XML_HEADERS.iter().any(|m| header.starts_with(m)) {
        Format::Xml
    } else {
        Format::Json
    };
    Ok(format)
}

/// Decodes raw bytes with the codec [`detect_format`] picks.
pub fn deserialize(bs: &[u8]) -> Result<Llsd, Error> {
    let format = detect_format(bs);
    debug!("deserializing {} bytes as {}", bs.len(), format);
    format.codec()?.decode(bs)
}

/// Decodes text with the codec [`detect_format_str`] picks.
pub fn deserialize_str(s: &str) -> Result<Llsd, Error> {
    let format = detect_format_str(s);
    debug!("deserializing {} chars as {}", s.len(), format);
    format.codec()?.decode(s.as_bytes())
}

/// Decodes the rest of a seekable stream with the codec [`detect_stream_format`] picks.
///
/// # Example
///
/// ```
/// use llsd::encoding::deserialize_stream;
/// use std::io::Cursor;
///
/// let mut stream = Cursor::new(b"<? llsd/binary ?>\ni\x00\x00\x00\x05".to_vec());
/// assert_eq!(deserialize_stream(&mut stream).unwrap().as_integer(), 5);
/// ```
pub fn deserialize_stream<R: Read + Seek>(stream: &mut R) -> Result<Llsd, Error> {
    let format = detect_stream_format(stream)?;
    debug!("deserializing stream as {}", format);
    let codec = format.codec()?;

    let mut bs = Vec::new();
    stream.read_to_end(&mut bs).map_err(LlsdError::from)?;
    codec.decode(&bs)
}

/// Encodes a tree in the given format.
pub fn serialize(value: &Llsd, format: Format, pretty: bool) -> Result<Vec<u8>, Error> {
    debug!("serializing {:?} node as {}", value.kind(), format);
    format.codec()?.encode(value, pretty)
}

/// Writes a value in the binary layout, without the document header, storing output
/// in `out`.
pub fn encode<T: Ser, S: Serializer>(t: T, out: &mut S) { t.ser(out) }

/// Writes a complete binary document, header included.
///
/// # Example
///
/// ```
/// use llsd::{encoding::encode_full, Llsd};
///
/// assert_eq!(encode_full(&Llsd::from_boolean(true)), b"<? llsd/binary ?>\n1");
/// ```
pub fn encode_full<T: Ser>(t: T) -> Vec<u8> {
    let mut out = Vec::with_capacity(BINARY_HEADER.len() + 1);
    out.put_slice(BINARY_HEADER);
    out.put_u8(b'\n');
    t.ser(&mut out);
    out.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    #[test]
    fn markers_are_case_insensitive() {
        assert_eq!(detect_format(b"  <LLSD><undef /></LLSD>"), Format::Xml);
        assert_eq!(detect_format(b"<? LLSD/XML ?>"), Format::Xml);
        assert_eq!(detect_format(b"<? LLSD/BINARY ?>"), Format::Binary);
        assert_eq!(detect_format_str("\r\n<Llsd>"), Format::Xml);
        assert_eq!(detect_format_str(" <? llsd/Binary ?>"), Format::Binary);
    }

    #[test]
    fn everything_else_is_json() {
        assert_eq!(detect_format(b""), Format::Json);
        assert_eq!(detect_format(b"[1, 2]"), Format::Json);
        assert_eq!(detect_format(b"<html>"), Format::Json);
        assert_eq!(detect_format_str("null"), Format::Json);
    }

    #[test]
    fn split_utf8_prefix() {
        // the 17th byte starts a two byte character
        let mut bs = b"                <llsd>".to_vec();
        bs.insert(16, 0xc3);
        bs.insert(17, 0xa9);
        assert_eq!(detect_format(&bs), Format::Json);

        let mut bs = b"<llsd>          ".to_vec();
        bs.extend_from_slice("é".as_bytes());
        assert_eq!(detect_format(&bs), Format::Xml);

        // invalid utf-8 after a binary marker still sniffs as binary
        let mut bs = BINARY_HEADER.to_vec();
        bs.push(0xff);
        assert_eq!(detect_format(&bs), Format::Binary);
    }

    #[test]
    fn stream_is_rewound() {
        let mut stream = Cursor::new(b"xx<? llsd/binary ?>\n1".to_vec());
        stream.set_position(2);
        assert_eq!(detect_stream_format(&mut stream).unwrap(), Format::Binary);
        assert_eq!(stream.position(), 2);
        assert_eq!(
            deserialize_stream(&mut stream).unwrap(),
            Llsd::from_boolean(true)
        );
    }

    /// Hands out at most `limit` bytes per read.
    struct Trickle {
        inner: Cursor<Vec<u8>>,
        limit: usize,
        reads: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            let len = buf.len().min(self.limit);
            self.inner.read(&mut buf[..len])
        }
    }

    impl Seek for Trickle {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> { self.inner.seek(pos) }
    }

    #[test]
    fn stream_header_is_read_once() {
        let mut stream = Trickle {
            inner: Cursor::new(b"<? llsd/binary ?>\n1".to_vec()),
            limit: HEADER_LEN,
            reads: 0,
        };
        assert_eq!(detect_stream_format(&mut stream).unwrap(), Format::Binary);
        assert_eq!(stream.reads, 1);
        assert_eq!(stream.inner.position(), 0);

        // a short read sees only part of the marker
        let mut stream = Trickle {
            inner: Cursor::new(b"<? llsd/binary ?>\n1".to_vec()),
            limit: 4,
            reads: 0,
        };
        assert_eq!(detect_stream_format(&mut stream).unwrap(), Format::Json);
        assert_eq!(stream.reads, 1);
    }

    #[test]
    fn stream_markers_are_exact() {
        let mut stream = Cursor::new(b"<LLSD><undef/></LLSD>".to_vec());
        assert_eq!(detect_stream_format(&mut stream).unwrap(), Format::Json);

        let mut stream = Cursor::new(b"<?xml version=\"1.0\"?>".to_vec());
        assert_eq!(detect_stream_format(&mut stream).unwrap(), Format::Xml);
    }

    /// A reader that refuses to seek.
    struct Unseekable(Cursor<Vec<u8>>);

    impl Read for Unseekable {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.0.read(buf) }
    }

    impl Seek for Unseekable {
        fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::Other, "not seekable"))
        }
    }

    #[test]
    fn unseekable_stream_fails_fast() {
        let mut stream = Unseekable(Cursor::new(b"<llsd><undef/></llsd>".to_vec()));
        let err = deserialize_stream(&mut stream).unwrap_err();
        match err.downcast_ref::<LlsdError>() {
            Some(LlsdError::UnseekableStream) => {}
            other => panic!("unexpected error {:?}", other),
        }
        // nothing was consumed
        assert_eq!(stream.0.position(), 0);
    }

    #[test]
    fn codecs_are_available() {
        assert!(Format::Binary.codec().is_ok());
        assert_eq!(Format::Xml.codec().is_ok(), cfg!(feature = "xml"));
        assert_eq!(Format::Json.codec().is_ok(), cfg!(feature = "json"));
    }
}
