//! Recorrido de directorios para procesar imágenes por lote.

use crate::container::{ImageInfo, VideoKind, inspect_image};
use crate::error::ExtractError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const SCANNED_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "webp", "mp4", "webm", "avi", "mov"];

#[derive(Clone, Copy, Debug)]
pub struct ScanOptions {
    pub recursive: bool,
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_links: false,
        }
    }
}

#[derive(Debug)]
pub enum ScanOutcome {
    Parsed(ImageInfo),
    SkippedVideo(VideoKind),
    Failed(String),
}

#[derive(Debug)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub outcome: ScanOutcome,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub entries: Vec<ScanEntry>,
}

impl ScanSummary {
    pub fn images(&self) -> impl Iterator<Item = &ImageInfo> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            ScanOutcome::Parsed(info) => Some(info),
            _ => None,
        })
    }

    pub fn into_images(self) -> Vec<ImageInfo> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry.outcome {
                ScanOutcome::Parsed(info) => Some(info),
                _ => None,
            })
            .collect()
    }

    pub fn parsed_count(&self) -> usize {
        self.images().count()
    }

    pub fn with_generation_count(&self) -> usize {
        self.images()
            .filter(|info| !info.generation.is_empty())
            .count()
    }

    pub fn video_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, ScanOutcome::SkippedVideo(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, ScanOutcome::Failed(_)))
            .count()
    }
}

/// Un archivo que falla nunca interrumpe el recorrido.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> ScanSummary {
    let max_depth = if options.recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .max_depth(max_depth)
        .sort_by_file_name();

    let mut summary = ScanSummary::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), %error, "no se pudo recorrer la entrada");
                summary.entries.push(ScanEntry {
                    path,
                    outcome: ScanOutcome::Failed(error.to_string()),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_scanned_extension(entry.path()) {
            continue;
        }

        let path = entry.into_path();
        let outcome = match inspect_image(&path) {
            Ok(info) => {
                debug!(path = %path.display(), vacio = info.generation.is_empty(), "imagen procesada");
                ScanOutcome::Parsed(info)
            }
            Err(ExtractError::VideoContainer { kind }) => {
                warn!(path = %path.display(), %kind, "archivo de video omitido");
                ScanOutcome::SkippedVideo(kind)
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "no se pudo procesar la imagen");
                ScanOutcome::Failed(error.to_string())
            }
        };
        summary.entries.push(ScanEntry { path, outcome });
    }

    summary
}

fn has_scanned_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            SCANNED_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
}
