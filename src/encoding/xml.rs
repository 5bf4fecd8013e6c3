//! The XML codec.
//!
//! Documents look like
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <llsd>
//!   <map>
//!     <key>region_id</key>
//!     <uuid>67153d5b-3659-afb4-8510-adda2c034649</uuid>
//!     <key>scale</key>
//!     <real>0.5</real>
//!   </map>
//! </llsd>
//! ```
//!
//! Element names are matched without regard to case. An empty element such as
//! `<integer />` holds its kind's zero value, and scalar text that does not parse falls
//! back to the same zero value.

use super::*;
use crate::convert::{base64_decode, base64_encode};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};
use std::io::Write;

#[derive(Clone, Copy, Debug, Default)]
/// The XML codec. `pretty` indents nested elements by two spaces.
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn encode(&self, value: &Llsd, pretty: bool) -> Result<Vec<u8>, Error> {
        let mut writer = if pretty {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("llsd")))?;
        write_value(&mut writer, value)?;
        writer.write_event(Event::End(BytesEnd::new("llsd")))?;
        Ok(writer.into_inner())
    }

    fn decode(&self, bs: &[u8]) -> Result<Llsd, Error> { XmlReader::new(bs).read_document() }
}

/// Writes `text` inside a `name` element. Empty text is written as an empty element,
/// so that indentation cannot leak into it.
fn write_scalar<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<(), Error> {
    if text.is_empty() {
        w.write_event(Event::Empty(BytesStart::new(name)))?;
    } else {
        w.write_event(Event::Start(BytesStart::new(name)))?;
        w.write_event(Event::Text(BytesText::new(text)))?;
        w.write_event(Event::End(BytesEnd::new(name)))?;
    }
    Ok(())
}

fn write_value<W: Write>(w: &mut Writer<W>, value: &Llsd) -> Result<(), Error> {
    match value {
        Llsd::Unknown => {
            w.write_event(Event::Empty(BytesStart::new("undef")))?;
        }
        Llsd::Boolean(_) => write_scalar(w, "boolean", &value.as_string())?,
        Llsd::Integer(_) => write_scalar(w, "integer", &value.as_string())?,
        Llsd::Real(_) => write_scalar(w, "real", &value.as_string())?,
        Llsd::String(s) => write_scalar(w, "string", s)?,
        Llsd::Uuid(_) => write_scalar(w, "uuid", &value.as_string())?,
        Llsd::Date(_) => write_scalar(w, "date", &value.as_string())?,
        Llsd::Uri(_) => write_scalar(w, "uri", &value.as_string())?,
        Llsd::Binary(b) => {
            let start = BytesStart::new("binary").with_attributes(vec![("encoding", "base64")]);
            if b.is_empty() {
                w.write_event(Event::Empty(start))?;
            } else {
                w.write_event(Event::Start(start))?;
                w.write_event(Event::Text(BytesText::new(&base64_encode(b))))?;
                w.write_event(Event::End(BytesEnd::new("binary")))?;
            }
        }
        Llsd::Map(m) if m.is_empty() => {
            w.write_event(Event::Empty(BytesStart::new("map")))?;
        }
        Llsd::Map(m) => {
            w.write_event(Event::Start(BytesStart::new("map")))?;
            for (k, v) in m.iter() {
                write_scalar(w, "key", k)?;
                write_value(w, v)?;
            }
            w.write_event(Event::End(BytesEnd::new("map")))?;
        }
        Llsd::Array(a) if a.is_empty() => {
            w.write_event(Event::Empty(BytesStart::new("array")))?;
        }
        Llsd::Array(a) => {
            w.write_event(Event::Start(BytesStart::new("array")))?;
            for v in a {
                write_value(w, v)?;
            }
            w.write_event(Event::End(BytesEnd::new("array")))?;
        }
    }
    Ok(())
}

/// The lowercased local name of an element.
fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase()
}

/// The value of the `encoding` attribute, if any.
fn encoding_of(e: &BytesStart) -> Result<Option<String>, Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref().eq_ignore_ascii_case(b"encoding") {
            return Ok(Some(attr.unescape_value()?.to_ascii_lowercase()));
        }
    }
    Ok(None)
}

/// The zero value of a scalar kind, or an empty container.
fn empty_value(name: &str) -> Result<Llsd, Error> {
    let value = match name {
        "undef" => Llsd::Unknown,
        "map" => Llsd::new_map(),
        "array" => Llsd::new_array(),
        scalar => scalar_value(scalar, "", None)?,
    };
    Ok(value)
}

/// Builds a scalar from the text of its element.
fn scalar_value(name: &str, text: &str, encoding: Option<&str>) -> Result<Llsd, Error> {
    let as_text = || Llsd::from_string(text);
    let value = match name {
        "undef" => Llsd::Unknown,
        "boolean" => {
            let t = text.trim();
            Llsd::from_boolean(t == "1" || t.eq_ignore_ascii_case("true"))
        }
        "integer" => Llsd::from_integer(as_text().as_integer()),
        "real" => Llsd::from_real(as_text().as_real()),
        "string" => as_text(),
        "uuid" => Llsd::from_uuid(as_text().as_uuid()),
        "date" => Llsd::from_date(as_text().as_date()),
        "uri" => Llsd::from_uri(as_text().as_uri()),
        "binary" => match encoding {
            None | Some("base64") => match base64_decode(text) {
                Some(bs) => Llsd::from_binary(bs),
                None => {
                    warn!("discarding malformed base64 binary payload");
                    Llsd::from_binary(Vec::new())
                }
            },
            Some(other) => bail!("unsupported binary encoding {:?}", other),
        },
        unknown => bail!("unknown element <{}>", unknown),
    };
    Ok(value)
}

struct XmlReader<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> XmlReader<'a> {
    fn new(bs: &'a [u8]) -> Self {
        XmlReader {
            reader: Reader::from_reader(bs),
        }
    }

    /// The next element event, skipping whitespace, comments and declarations.
    fn next_tag(&mut self) -> Result<Event<'a>, Error> {
        loop {
            match self.reader.read_event()? {
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => continue,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {
                    continue
                }
                Event::Text(_) | Event::CData(_) => bail!("unexpected text between elements"),
                Event::Eof => bail!("unexpected end of xml document"),
                ev => return Ok(ev),
            }
        }
    }

    /// Collects the text of the current element up to its end tag.
    fn read_text(&mut self) -> Result<String, Error> {
        let mut text = String::new();
        loop {
            match self.reader.read_event()? {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => match std::str::from_utf8(&c) {
                    Ok(s) => text.push_str(s),
                    Err(_) => return Err(LlsdError::InvalidUtf8("cdata").into()),
                },
                Event::Comment(_) => {}
                Event::End(_) => return Ok(text),
                Event::Eof => bail!("unexpected end of xml document"),
                other => bail!("unexpected {:?} inside a scalar element", other),
            }
        }
    }

    fn read_document(&mut self) -> Result<Llsd, Error> {
        match self.next_tag()? {
            Event::Empty(ref e) if element_name(e) == "llsd" => Ok(Llsd::Unknown),
            Event::Start(ref e) if element_name(e) == "llsd" => match self.next_tag()? {
                Event::End(_) => Ok(Llsd::Unknown),
                ev => {
                    let value = self.read_value(ev, 0)?;
                    match self.next_tag()? {
                        Event::End(_) => Ok(value),
                        other => bail!("expected </llsd>, found {:?}", other),
                    }
                }
            },
            other => bail!("expected an <llsd> root element, found {:?}", other),
        }
    }

    /// Reads the value that `ev` opens. `depth` counts the enclosing containers.
    fn read_value(&mut self, ev: Event<'a>, depth: usize) -> Result<Llsd, Error> {
        match ev {
            Event::Empty(e) => empty_value(&element_name(&e)),
            Event::Start(e) => match element_name(&e).as_str() {
                "map" | "array" if depth >= MAX_DEPTH => {
                    Err(LlsdError::TooDeep(MAX_DEPTH).into())
                }
                "map" => self.read_map(depth + 1),
                "array" => self.read_array(depth + 1),
                name => {
                    let encoding = encoding_of(&e)?;
                    let text = self.read_text()?;
                    scalar_value(name, &text, encoding.as_ref().map(String::as_str))
                }
            },
            other => bail!("expected a value element, found {:?}", other),
        }
    }

    fn read_map(&mut self, depth: usize) -> Result<Llsd, Error> {
        let mut map = LlsdMap::new();
        loop {
            let key = match self.next_tag()? {
                Event::End(_) => return Ok(Llsd::Map(map)),
                Event::Empty(ref e) if element_name(e) == "key" => String::new(),
                Event::Start(ref e) if element_name(e) == "key" => self.read_text()?,
                other => bail!("expected <key> in map, found {:?}", other),
            };
            let ev = self.next_tag()?;
            let value = self.read_value(ev, depth)?;
            map.insert(key, value);
        }
    }

    fn read_array(&mut self, depth: usize) -> Result<Llsd, Error> {
        let mut arr = Vec::new();
        loop {
            match self.next_tag()? {
                Event::End(_) => return Ok(Llsd::Array(arr)),
                ev => arr.push(self.read_value(ev, depth)?),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> Llsd { XmlCodec.decode(s.as_bytes()).unwrap() }

    #[test]
    fn compact_layout() {
        let mut map = LlsdMap::new();
        map.insert("a".to_owned(), Llsd::from_integer(1));
        let tree = Llsd::Array(vec![Llsd::Map(map), Llsd::Unknown, Llsd::from_string("")]);

        let out = XmlCodec.encode(&tree, false).unwrap();
        assert_eq!(
            std::str::from_utf8(&out).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><llsd><array><map><key>a</key>\
             <integer>1</integer></map><undef/><string/></array></llsd>"
        );
    }

    #[test]
    fn pretty_layout_round_trips() {
        let mut map = LlsdMap::new();
        map.insert("".to_owned(), Llsd::from_string(" padded "));
        map.insert("bin".to_owned(), Llsd::from_binary(vec![0, 1, 2]));
        let tree = Llsd::Array(vec![Llsd::Map(map), Llsd::new_array()]);

        let out = XmlCodec.encode(&tree, true).unwrap();
        assert!(std::str::from_utf8(&out).unwrap().contains("\n  <array>"));
        assert_eq!(XmlCodec.decode(&out).unwrap(), tree);
    }

    #[test]
    fn names_are_case_insensitive() {
        let tree = decode("<LLSD><Map><KEY>x</KEY><Boolean>TRUE</Boolean></Map></LLSD>");
        assert!(tree["x"].as_boolean());
    }

    #[test]
    fn empty_elements_are_zero() {
        let tree = decode(
            "<llsd><array><integer/><real /><boolean/><uuid/><date/><uri/><binary/>\
             <string/><map/><array/></array></llsd>",
        );
        assert_eq!(tree[0], Llsd::from_integer(0));
        assert_eq!(tree[1], Llsd::from_real(0.0));
        assert_eq!(tree[2], Llsd::from_boolean(false));
        assert_eq!(tree[3], Llsd::from_uuid(uuid::Uuid::nil()));
        assert_eq!(tree[4], Llsd::from_date(date::epoch()));
        assert_eq!(tree[5], Llsd::from_uri(None));
        assert_eq!(tree[6], Llsd::from_binary(Vec::new()));
        assert_eq!(tree[7], Llsd::from_string(""));
        assert_eq!(tree[8], Llsd::new_map());
        assert_eq!(tree[9], Llsd::new_array());
    }

    #[test]
    fn unparsable_text_degrades() {
        let tree = decode("<llsd><array><integer>lots</integer><real>x</real></array></llsd>");
        assert_eq!(tree[0].as_integer(), 0);
        assert_eq!(tree[1].as_real(), 0.0);
    }

    #[test]
    fn prolog_comments_and_escapes() {
        let tree = decode(
            "<?xml version=\"1.0\"?>\n<!-- hi --><llsd>\n<string>a &amp; b &lt;c&gt;</string></llsd>",
        );
        assert_eq!(tree.as_string(), "a & b <c>");
        assert!(decode("<llsd></llsd>").is_unknown());
        assert!(decode("<llsd/>").is_unknown());
    }

    #[test]
    fn base64_binary() {
        let tree = decode("<llsd><binary encoding=\"base64\">AQID\n</binary></llsd>");
        assert_eq!(&tree.as_binary()[..], &[1, 2, 3]);
        assert!(XmlCodec
            .decode(b"<llsd><binary encoding=\"base85\">x</binary></llsd>")
            .is_err());
    }

    #[test]
    fn reals_use_compact_text() {
        let tree = Llsd::Array(vec![
            Llsd::from_real(1e300),
            Llsd::from_real(std::f64::NEG_INFINITY),
        ]);
        let out = XmlCodec.encode(&tree, false).unwrap();
        let text = std::str::from_utf8(&out).unwrap();
        assert!(text.contains("<real>1e300</real><real>-Infinity</real>"));
        assert_eq!(XmlCodec.decode(&out).unwrap(), tree);
    }

    #[test]
    fn nesting_is_bounded() {
        fn nested(levels: usize) -> String {
            format!(
                "<llsd>{}<undef/>{}</llsd>",
                "<array>".repeat(levels),
                "</array>".repeat(levels)
            )
        }

        assert!(XmlCodec.decode(nested(MAX_DEPTH).as_bytes()).is_ok());

        let err = XmlCodec.decode(nested(MAX_DEPTH + 1).as_bytes()).unwrap_err();
        match err.downcast_ref::<LlsdError>() {
            Some(LlsdError::TooDeep(MAX_DEPTH)) => {}
            other => panic!("unexpected error {:?}", other),
        }

        let deep = "<map><key>a</key>".repeat(1_000_000);
        assert!(XmlCodec.decode(format!("<llsd>{}", deep).as_bytes()).is_err());
    }

    #[test]
    fn malformed_documents() {
        assert!(XmlCodec.decode(b"<llsd><map><integer>1</integer></map></llsd>").is_err());
        assert!(XmlCodec.decode(b"<llsd><bogus>1</bogus></llsd>").is_err());
        assert!(XmlCodec.decode(b"<llsd><array><integer>1</integer>").is_err());
        assert!(XmlCodec.decode(b"<notllsd/>").is_err());
    }
}
