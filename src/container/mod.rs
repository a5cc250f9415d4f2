//! Detección del contenedor por bytes mágicos y lectura de la metadata de
//! generación de un archivo de imagen.
//!
//! La extensión del archivo nunca se consulta: en la práctica aparecen PNG
//! guardados como `.jpeg` y videos con extensión de imagen.

mod exif_fields;
mod png_text;

pub use exif_fields::read_exif_metadata;
pub use png_text::{Chunk, Chunks, PNG_SIGNATURE, read_png_metadata};

use crate::error::ExtractError;
use crate::generation::GenerationRecord;
use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];
const WEBM_SIGNATURE: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum VideoKind {
    Mp4,
    QuickTime,
    WebM,
    Avi,
}

impl fmt::Display for VideoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mp4 => "MP4",
            Self::QuickTime => "MOV",
            Self::WebM => "WebM",
            Self::Avi => "AVI",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FileKind {
    Png,
    Jpeg,
    Video(VideoKind),
    Unknown,
}

impl FileKind {
    pub fn label(self) -> String {
        match self {
            Self::Png => "PNG".to_string(),
            Self::Jpeg => "JPEG".to_string(),
            Self::Video(kind) => format!("Video {kind}"),
            Self::Unknown => "Desconocido".to_string(),
        }
    }
}

pub fn detect_file_kind(header: &[u8]) -> FileKind {
    if header.len() >= 8 {
        match &header[4..8] {
            b"ftyp" => return FileKind::Video(VideoKind::Mp4),
            b"moov" | b"mdat" => return FileKind::Video(VideoKind::QuickTime),
            _ => {}
        }
    }
    if header.starts_with(&WEBM_SIGNATURE) {
        return FileKind::Video(VideoKind::WebM);
    }
    if header.len() >= 12 && header.starts_with(b"RIFF") && &header[8..12] == b"AVI " {
        return FileKind::Video(VideoKind::Avi);
    }
    if header.starts_with(&PNG_SIGNATURE) {
        return FileKind::Png;
    }
    if header.starts_with(&JPEG_SIGNATURE) {
        return FileKind::Jpeg;
    }
    FileKind::Unknown
}

/// Un formato no reconocido produce un registro vacío; un video se rechaza con
/// [`ExtractError::VideoContainer`].
pub fn extract_generation(bytes: &[u8]) -> Result<GenerationRecord, ExtractError> {
    let mut record = GenerationRecord::new();
    match detect_file_kind(bytes) {
        FileKind::Png => read_png_metadata(bytes, &mut record),
        FileKind::Jpeg => read_exif_metadata(bytes, &mut record),
        FileKind::Video(kind) => return Err(ExtractError::VideoContainer { kind }),
        FileKind::Unknown => debug!("formato no reconocido, sin metadata de generación"),
    }
    Ok(record)
}

pub fn read_generation_metadata(path: &Path) -> Result<GenerationRecord, ExtractError> {
    let bytes = fs::read(path)?;
    extract_generation(&bytes)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub kind: FileKind,
    pub width: u32,
    pub height: u32,
    pub generation: GenerationRecord,
}

pub fn inspect_image(path: &Path) -> Result<ImageInfo, ExtractError> {
    let bytes = fs::read(path)?;
    let kind = detect_file_kind(&bytes);
    if let FileKind::Video(kind) = kind {
        return Err(ExtractError::VideoContainer { kind });
    }

    let (width, height) = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    let generation = extract_generation(&bytes)?;

    Ok(ImageInfo {
        path: path.to_path_buf(),
        kind,
        width,
        height,
        generation,
    })
}
