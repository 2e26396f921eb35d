use std::io::{self, Write};

use crate::objects::{ObjId, PdfObject};

/// Byte offset of every indirect object written so far.
#[derive(Debug, Default)]
struct Xref {
    offsets: Vec<(u32, usize)>,
}

impl Xref {
    fn record(&mut self, id: ObjId, offset: usize) {
        self.offsets.push((id.0, offset));
    }

    /// One past the highest object number.
    fn size(&self) -> u32 {
        self.offsets.iter().map(|&(num, _)| num).max().unwrap_or(0) + 1
    }

    /// The `xref` section. Numbers never written become free entries.
    fn render(mut self) -> Vec<u8> {
        self.offsets.sort_by_key(|&(num, _)| num);
        let size = self.size();
        let mut out = format!("xref\n0 {}\n", size).into_bytes();
        out.extend_from_slice(b"0000000000 65535 f\r\n");

        let mut offsets = self.offsets.into_iter().peekable();
        for num in 1..size {
            match offsets.next_if(|&(n, _)| n == num) {
                Some((_, offset)) => {
                    out.extend_from_slice(format!("{:010} 00000 n\r\n", offset).as_bytes())
                }
                None => out.extend_from_slice(b"0000000000 00000 f\r\n"),
            }
        }
        out
    }
}

/// Streams indirect objects to `W` and finishes the file with its
/// cross-reference table and trailer.
pub struct PdfWriter<W: Write> {
    writer: W,
    offset: usize,
    xref: Xref,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        PdfWriter {
            writer,
            offset: 0,
            xref: Xref::default(),
        }
    }

    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.offset += bytes.len();
        Ok(())
    }

    /// `%PDF-1.7` followed by a comment of high bytes marking the file
    /// as binary.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.emit(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n")
    }

    pub fn write_object(&mut self, id: ObjId, obj: &PdfObject) -> io::Result<()> {
        self.xref.record(id, self.offset);
        let mut body = format!("{} {} obj\n", id.0, id.1).into_bytes();
        obj.write_to(&mut body);
        body.extend_from_slice(b"\nendobj\n");
        self.emit(&body)
    }

    /// Xref table, trailer, `startxref` and `%%EOF`.
    pub fn write_xref_and_trailer(&mut self, root: ObjId, info: Option<ObjId>) -> io::Result<()> {
        let xref_offset = self.offset;
        let xref = std::mem::take(&mut self.xref);
        let size = xref.size();
        self.emit(&xref.render())?;

        let mut trailer = format!("trailer\n<< /Size {} /Root {} {} R", size, root.0, root.1);
        if let Some(info) = info {
            trailer.push_str(&format!(" /Info {} {} R", info.0, info.1));
        }
        trailer.push_str(&format!(" >>\nstartxref\n{}\n%%EOF\n", xref_offset));
        self.emit(trailer.as_bytes())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
