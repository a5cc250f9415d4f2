//! La lectura termina en `IEND` o en el primer chunk truncado; el CRC no se
//! valida.

use crate::generation::{GenerationRecord, parse_generation_params};
use tracing::debug;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const GENERATION_KEYWORDS: [&str; 6] = [
    "parameters",
    "workflow",
    "prompt",
    "generation_data",
    "usercomment",
    "description",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub kind: [u8; 4],
    pub data: &'a [u8],
}

pub struct Chunks<'a> {
    rest: &'a [u8],
    done: bool,
}

impl<'a> Chunks<'a> {
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        let rest = bytes.strip_prefix(&PNG_SIGNATURE)?;
        Some(Self { rest, done: false })
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some((header, after_header)) = self.rest.split_first_chunk::<8>() else {
            self.done = true;
            return None;
        };
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let kind = [header[4], header[5], header[6], header[7]];

        if after_header.len() < length {
            debug!(length, "chunk PNG truncado");
            self.done = true;
            return None;
        }
        let (data, after_data) = after_header.split_at(length);
        self.rest = after_data.get(4..).unwrap_or_default();

        if &kind == b"IEND" {
            self.done = true;
        }
        Some(Chunk { kind, data })
    }
}

pub fn read_png_metadata(bytes: &[u8], record: &mut GenerationRecord) {
    let Some(chunks) = Chunks::new(bytes) else {
        return;
    };

    for chunk in chunks {
        match &chunk.kind {
            b"tEXt" | b"iTXt" => {
                let encoding = if &chunk.kind == b"tEXt" {
                    TextEncoding::Latin1
                } else {
                    TextEncoding::Utf8
                };
                if let Some((keyword, text)) = split_keyword(chunk.data, encoding) {
                    debug!(
                        chunk = %String::from_utf8_lossy(&chunk.kind),
                        keyword = %keyword,
                        "chunk de texto PNG"
                    );
                    dispatch_text(&keyword, &text, record);
                }
            }
            b"zTXt" => debug!("chunk zTXt comprimido omitido"),
            _ => {}
        }
    }
}

#[derive(Clone, Copy)]
enum TextEncoding {
    Latin1,
    Utf8,
}

/// Separa `keyword\0resto`. La palabra clave siempre es Latin-1; el texto de
/// `tEXt` también, el de `iTXt` es UTF-8.
///
/// En `iTXt` el resto incluye sin interpretar los campos de compresión, idioma y
/// palabra clave traducida; se entrega tal cual.
fn split_keyword(data: &[u8], encoding: TextEncoding) -> Option<(String, String)> {
    let nul = data.iter().position(|&byte| byte == 0)?;
    let remainder = &data[nul + 1..];
    if remainder.is_empty() {
        return None;
    }
    let text = match encoding {
        TextEncoding::Latin1 => latin1(remainder),
        TextEncoding::Utf8 => String::from_utf8_lossy(remainder).into_owned(),
    };
    Some((latin1(&data[..nul]), text))
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

fn dispatch_text(keyword: &str, text: &str, record: &mut GenerationRecord) {
    let keyword = keyword.to_lowercase();
    if GENERATION_KEYWORDS.contains(&keyword.as_str()) {
        parse_generation_params(text, record);
    } else if keyword == "software" && text.to_lowercase().contains("comfyui") {
        parse_generation_params(text, record);
    }
}
