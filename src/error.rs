use crate::container::VideoKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("error de E/S: {0}")]
    Io(#[from] std::io::Error),
    #[error("el archivo es un video ({kind}), no una imagen")]
    VideoContainer { kind: VideoKind },
    #[error("no se pudieron leer las dimensiones de la imagen: {0}")]
    Dimensions(#[from] image::ImageError),
    #[error("error de JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    pub fn is_video(&self) -> bool {
        matches!(self, Self::VideoContainer { .. })
    }
}
