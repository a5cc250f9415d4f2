use crate::generation::{GenerationRecord, parse_generation_params};
use exif::{In, Tag, Value};
use std::io::Cursor;
use tracing::debug;

const GENERATION_TAGS: [Tag; 5] = [
    Tag::UserComment,
    Tag::ImageDescription,
    Tag::Software,
    Tag::Artist,
    Tag::Copyright,
];

const ASCII_HEADER: &[u8; 8] = b"ASCII\0\0\0";
const UNICODE_HEADER: &[u8; 8] = b"UNICODE\0";

pub fn read_exif_metadata(bytes: &[u8], record: &mut GenerationRecord) {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(error) => {
            debug!(%error, "sin EXIF legible");
            return;
        }
    };

    for tag in GENERATION_TAGS {
        let Some(field) = exif.get_field(tag, In::PRIMARY) else {
            continue;
        };
        let text = field_text(tag, &field.value, exif.little_endian());
        if text.is_empty() {
            continue;
        }
        debug!(%tag, "campo EXIF con texto");
        parse_generation_params(&text, record);
    }
}

fn field_text(tag: Tag, value: &Value, little_endian: bool) -> String {
    match value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|part| String::from_utf8_lossy(part))
            .collect::<Vec<_>>()
            .join(" "),
        Value::Undefined(bytes, _) if tag == Tag::UserComment => {
            user_comment_text(bytes, little_endian)
        }
        Value::Undefined(bytes, _) | Value::Byte(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
        _ => String::new(),
    }
}

/// `UserComment` lleva un encabezado de 8 bytes con el juego de caracteres.
fn user_comment_text(bytes: &[u8], little_endian: bool) -> String {
    if let Some(payload) = bytes.strip_prefix(ASCII_HEADER) {
        return String::from_utf8_lossy(payload).into_owned();
    }
    if let Some(payload) = bytes.strip_prefix(UNICODE_HEADER) {
        return utf16_text(payload, little_endian);
    }
    if bytes.len() >= 8 && bytes[..8].iter().all(|byte| *byte == 0) {
        return String::from_utf8_lossy(&bytes[8..]).into_owned();
    }
    String::from_utf8_lossy(bytes).into_owned()
}

/// Hay escritores que ignoran el orden del TIFF; manda la posición de los
/// bytes altos en cero y, si no es concluyente, el orden del TIFF.
fn utf16_text(payload: &[u8], tiff_little_endian: bool) -> String {
    let little_endian = zero_byte_order(payload).unwrap_or(tiff_little_endian);
    let units = payload.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if little_endian {
            u16::from_le_bytes(pair)
        } else {
            u16::from_be_bytes(pair)
        }
    });

    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect::<String>()
        .trim_end_matches('\0')
        .to_string()
}

fn zero_byte_order(payload: &[u8]) -> Option<bool> {
    let sample = &payload[..payload.len().min(100)];
    let (mut even, mut odd) = (0, 0);
    for (index, byte) in sample.iter().enumerate() {
        if *byte == 0 {
            if index % 2 == 0 {
                even += 1;
            } else {
                odd += 1;
            }
        }
    }
    match odd.cmp(&even) {
        std::cmp::Ordering::Greater => Some(true),
        std::cmp::Ordering::Less => Some(false),
        std::cmp::Ordering::Equal => None,
    }
}
