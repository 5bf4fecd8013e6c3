use crate::encoding::Format;
use failure::Fail;
use std::io;

/// Named failures raised by the codecs and the format dispatcher.
///
/// Every fallible function in this crate returns a [`failure::Error`]; the variants
/// below can be recovered from it with `downcast_ref::<LlsdError>()`.
#[derive(Debug, Fail)]
pub enum LlsdError {
    /// The stream entry point was handed a source that cannot seek.
    #[fail(display = "cannot deserialize structured data from unseekable streams")]
    UnseekableStream,
    /// Reading the stream failed.
    #[fail(display = "io error: {}", _0)]
    Io(#[cause] io::Error),
    /// A binary value ran past the end of the input.
    #[fail(
        display = "unexpected end of input, needed {} bytes but {} remain",
        need, rem
    )]
    UnexpectedEof {
        /// Requested bytes.
        need: usize,
        /// Bytes still available.
        rem: usize,
    },
    /// A binary value started with a byte that is not a known tag.
    #[fail(display = "unknown binary tag {:#04x} ({:?})", _0, _1)]
    UnknownTag(u8, char),
    /// A binary map or array was not closed by its terminator byte.
    #[fail(display = "expected terminator {:?}, found {:#04x}", expected, found)]
    MissingTerminator {
        /// The terminator that should close the container.
        expected: char,
        /// The byte found instead.
        found: u8,
    },
    /// The crate was built without the codec for this format.
    #[fail(display = "the {} codec is not enabled in this build", _0)]
    FormatDisabled(Format),
    /// Containers were nested deeper than the decoder allows.
    #[fail(display = "structured data nested deeper than {} levels", _0)]
    TooDeep(usize),
    /// A string, key or URI payload was not valid UTF-8.
    #[fail(display = "invalid utf-8 in {} payload", _0)]
    InvalidUtf8(&'static str),
}

impl From<io::Error> for LlsdError {
    fn from(e: io::Error) -> LlsdError { LlsdError::Io(e) }
}
