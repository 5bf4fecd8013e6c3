use super::*;

/// A sink for encoded bytes.
pub trait Serializer {
    /// The type of the output value.
    type Out;
    /// Add a byte to the output value.
    fn put_u8(&mut self, u: u8);
    /// Add a slice to the output value.
    fn put_slice(&mut self, slice: &[u8]);
    /// Return the output value.
    fn finalize(self) -> Self::Out;
}

/// Convenience methods for [`Serializer`].
pub trait SerializerExt: Serializer {
    /// Add a big-endian [`u32`] to the output value.
    fn put_u32(&mut self, u: u32);
    /// Add a big-endian [`f64`] to the output value.
    fn put_f64(&mut self, f: f64);
    /// Add a length-prefixed payload, introduced by `tag`.
    ///
    /// # Arguments
    ///
    /// * `tag: u8` - The tag that introduces the payload.
    /// * `bs: &[u8]` - The payload.
    fn put_sized(&mut self, tag: u8, bs: &[u8]);
    /// Add an array, its elements and its terminator to the output value.
    fn put_arr<S: Ser>(&mut self, v: &[S]);
    /// Add a map, its entries and its terminator to the output value.
    fn put_map<S: Ser>(&mut self, m: &HashMap<String, S>);
}

impl Serializer for Vec<u8> {
    type Out = Self;

    fn put_u8(&mut self, u: u8) { self.push(u) }

    fn put_slice(&mut self, slice: &[u8]) { self.extend_from_slice(slice) }

    fn finalize(self) -> Self::Out { self }
}

impl<S: Serializer> SerializerExt for S {
    fn put_u32(&mut self, u: u32) { self.put_slice(&u.to_be_bytes()) }

    fn put_f64(&mut self, f: f64) { self.put_slice(&f.to_bits().to_be_bytes()) }

    fn put_sized(&mut self, tag: u8, bs: &[u8]) {
        self.put_u8(tag);
        self.put_u32(bs.len() as u32);
        self.put_slice(bs);
    }

    fn put_arr<T: Ser>(&mut self, v: &[T]) {
        self.put_u8(TAG_ARRAY_BEGIN);
        self.put_u32(v.len() as u32);
        for t in v {
            t.ser(self);
        }
        self.put_u8(TAG_ARRAY_END);
    }

    fn put_map<T: Ser>(&mut self, m: &HashMap<String, T>) {
        self.put_u8(TAG_MAP_BEGIN);
        self.put_u32(m.len() as u32);
        for (k, v) in m.iter() {
            self.put_sized(TAG_KEY, k.as_bytes());
            v.ser(self);
        }
        self.put_u8(TAG_MAP_END);
    }
}

/// A value that can be written in the binary layout.
pub trait Ser {
    /// Writes the value, without the document header.
    fn ser<S: Serializer>(&self, s: &mut S);
}

impl Ser for Llsd {
    fn ser<S: Serializer>(&self, s: &mut S) {
        use Llsd::*;
        match self {
            Unknown => s.put_u8(TAG_UNDEF),
            Boolean(true) => s.put_u8(TAG_TRUE),
            Boolean(false) => s.put_u8(TAG_FALSE),
            Integer(i) => {
                s.put_u8(TAG_INTEGER);
                s.put_u32(*i as u32);
            }
            Real(r) => {
                s.put_u8(TAG_REAL);
                s.put_f64(*r);
            }
            Uuid(u) => {
                s.put_u8(TAG_UUID);
                s.put_slice(u.as_bytes());
            }
            Date(d) => {
                s.put_u8(TAG_DATE);
                s.put_f64(date::to_seconds(d));
            }
            String(st) => s.put_sized(TAG_STRING, st.as_bytes()),
            Uri(_) => s.put_sized(TAG_URI, self.as_string().as_bytes()),
            Binary(bs) => s.put_sized(TAG_BINARY, bs),
            Array(a) => s.put_arr(a),
            Map(m) => s.put_map(m),
        }
    }
}

impl<'a, T: Ser> Ser for &'a T {
    fn ser<S: Serializer>(&self, s: &mut S) { (*self).ser(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_layouts() {
        assert_eq!(encode_full(&Llsd::Unknown), b"<? llsd/binary ?>\n!");
        assert_eq!(encode_to_vec(&Llsd::from_integer(-2)), b"i\xff\xff\xff\xfe");
        assert_eq!(
            encode_to_vec(&Llsd::from_real(1.0)),
            b"r\x3f\xf0\x00\x00\x00\x00\x00\x00"
        );
        assert_eq!(encode_to_vec(&Llsd::from_string("hi")), b"s\x00\x00\x00\x02hi");
        assert_eq!(encode_to_vec(&Llsd::from_boolean(false)), b"0");
    }

    #[test]
    fn containers_are_counted_and_terminated() {
        let arr = Llsd::Array(vec![Llsd::from_boolean(true), Llsd::Unknown]);
        assert_eq!(encode_to_vec(&arr), b"[\x00\x00\x00\x021!]");

        let mut map = LlsdMap::new();
        map.insert("a".to_owned(), Llsd::from_integer(1));
        assert_eq!(
            encode_to_vec(&Llsd::Map(map)),
            &b"{\x00\x00\x00\x01k\x00\x00\x00\x01ai\x00\x00\x00\x01}"[..]
        );
    }

    fn encode_to_vec(ls: &Llsd) -> Vec<u8> {
        let mut out = Vec::new();
        encode(ls, &mut out);
        out
    }
}
