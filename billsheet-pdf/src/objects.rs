use crate::fonts::encode_win_ansi;

/// Indirect object identifier: (object number, generation). Objects in
/// a freshly written file are always generation 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(pub u32, pub u16);

/// The object kinds a single-page invoice needs: fonts, one page, its
/// content stream, the page tree, the catalog and the info dictionary.
#[derive(Debug, Clone)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// Stored without the leading `/`.
    Name(String),
    /// WinAnsi bytes, unescaped.
    LiteralString(Vec<u8>),
    Array(Vec<PdfObject>),
    /// Entries are written in insertion order.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    /// Text outside WinAnsi becomes `?`.
    pub fn literal_string(s: &str) -> Self {
        PdfObject::LiteralString(encode_win_ansi(s))
    }

    pub fn reference(obj_num: u32, gen: u16) -> Self {
        PdfObject::Reference(ObjId(obj_num, gen))
    }

    pub fn array(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(keyed(entries))
    }

    pub fn stream(dict_entries: Vec<(&str, PdfObject)>, data: Vec<u8>) -> Self {
        PdfObject::Stream {
            dict: keyed(dict_entries),
            data,
        }
    }

    /// Append the serialized form of this object to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            PdfObject::Integer(n) => out.extend_from_slice(n.to_string().as_bytes()),
            PdfObject::Real(f) => out.extend_from_slice(format_real(*f).as_bytes()),
            PdfObject::Name(name) => {
                out.push(b'/');
                out.extend_from_slice(name.as_bytes());
            }
            PdfObject::LiteralString(bytes) => {
                out.push(b'(');
                out.extend_from_slice(&escape_pdf_bytes(bytes));
                out.push(b')');
            }
            PdfObject::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.write_to(out);
                }
                out.push(b']');
            }
            PdfObject::Dictionary(entries) => {
                out.extend_from_slice(b"<<");
                write_entries(entries, out);
                out.extend_from_slice(b" >>");
            }
            PdfObject::Stream { dict, data } => {
                out.extend_from_slice(b"<<");
                write_entries(dict, out);
                out.extend_from_slice(format!(" /Length {} >>\nstream\n", data.len()).as_bytes());
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
            }
            PdfObject::Reference(id) => {
                out.extend_from_slice(format!("{} {} R", id.0, id.1).as_bytes())
            }
        }
    }
}

fn keyed(entries: Vec<(&str, PdfObject)>) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn write_entries(entries: &[(String, PdfObject)], out: &mut Vec<u8>) {
    for (key, value) in entries {
        out.extend_from_slice(b" /");
        out.extend_from_slice(key.as_bytes());
        out.push(b' ');
        value.write_to(out);
    }
}

/// Backslash-escape the delimiters and line breaks of a literal string.
pub fn escape_pdf_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' | b'(' | b')' => escaped.extend_from_slice(&[b'\\', b]),
            b'\n' => escaped.extend_from_slice(b"\\n"),
            b'\r' => escaped.extend_from_slice(b"\\r"),
            _ => escaped.push(b),
        }
    }
    escaped
}

/// Whole numbers keep one decimal (`842.0`); fractions are trimmed.
fn format_real(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        let s = format!("{:.6}", f);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
