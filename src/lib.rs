//! PromptLens: extracción de parámetros de generación (prompt, sampler,
//! semilla, LoRAs) embebidos en imágenes PNG y JPEG creadas con herramientas
//! de IA como A1111/Forge, ComfyUI y SwarmUI.

pub mod container;
pub mod error;
pub mod export;
pub mod generation;
pub mod scan;

pub use container::{
    FileKind, ImageInfo, VideoKind, detect_file_kind, extract_generation, inspect_image,
    read_generation_metadata,
};
pub use error::ExtractError;
pub use generation::{GenerationRecord, LoraWeight, parse_generation_params};
pub use scan::{ScanOptions, ScanSummary, scan_directory};
