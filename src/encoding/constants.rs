/// Sentinel that opens a binary document.
pub(crate) const BINARY_HEADER: &[u8] = b"<? llsd/binary ?>";
/// Bare XML root tag.
pub(crate) const XML_HEADER: &[u8] = b"<llsd>";
/// XML prolog.
pub(crate) const XML_ALT_HEADER: &[u8] = b"<?xml";
/// Alternate XML sentinel.
pub(crate) const XML_ALT2_HEADER: &[u8] = b"<? llsd/xml ?>";

/// Markers that select the XML codec.
pub(crate) const XML_HEADERS: [&[u8]; 3] = [XML_HEADER, XML_ALT_HEADER, XML_ALT2_HEADER];

/// The number of leading bytes the dispatcher looks at, enough for the longest marker.
pub(crate) const HEADER_LEN: usize = 17;

/// The deepest container nesting the decoders accept.
pub const MAX_DEPTH: usize = 256;

/// `!`
pub(crate) const TAG_UNDEF: u8 = b'!';
/// `1`
pub(crate) const TAG_TRUE: u8 = b'1';
/// `0`
pub(crate) const TAG_FALSE: u8 = b'0';
/// `i`, followed by a 4 byte integer
pub(crate) const TAG_INTEGER: u8 = b'i';
/// `r`, followed by an 8 byte float
pub(crate) const TAG_REAL: u8 = b'r';
/// `u`, followed by 16 bytes
pub(crate) const TAG_UUID: u8 = b'u';
/// `b`, followed by a length and the payload
pub(crate) const TAG_BINARY: u8 = b'b';
/// `s`, followed by a length and UTF-8 text
pub(crate) const TAG_STRING: u8 = b's';
/// `l`, followed by a length and the URI text
pub(crate) const TAG_URI: u8 = b'l';
/// `d`, followed by an 8 byte float of seconds since the epoch
pub(crate) const TAG_DATE: u8 = b'd';
/// `[`, followed by an element count
pub(crate) const TAG_ARRAY_BEGIN: u8 = b'[';
pub(crate) const TAG_ARRAY_END: u8 = b']';
/// `{`, followed by an entry count
pub(crate) const TAG_MAP_BEGIN: u8 = b'{';
pub(crate) const TAG_MAP_END: u8 = b'}';
/// `k`, introduces a map key
pub(crate) const TAG_KEY: u8 = b'k';
