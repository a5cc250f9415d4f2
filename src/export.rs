use crate::container::ImageInfo;
use crate::error::ExtractError;
use std::fs;
use std::path::Path;

pub fn export_json(images: &[ImageInfo], path: &Path) -> Result<(), ExtractError> {
    let json = serde_json::to_string_pretty(images)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::FileKind;
    use crate::generation::{GenerationRecord, LoraWeight};
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn export_writes_pretty_json_without_absent_fields() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = tempdir()?;
        let path = dir.path().join("catalogo.json");
        let images = vec![ImageInfo {
            path: PathBuf::from("fox.png"),
            kind: FileKind::Png,
            width: 512,
            height: 768,
            generation: GenerationRecord {
                prompt: Some("a fox".to_string()),
                steps: Some(20),
                loras: vec![LoraWeight::new("fur", 0.7)],
                ..GenerationRecord::default()
            },
        }];

        export_json(&images, &path)?;

        let content = fs::read_to_string(&path)?;
        assert!(content.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&content)?;
        let generation = &value[0]["generation"];
        assert_eq!(value[0]["kind"], "Png");
        assert_eq!(value[0]["width"], 512);
        assert_eq!(generation["prompt"], "a fox");
        assert_eq!(generation["steps"], 20);
        assert_eq!(generation["loras"][0]["name"], "fur");
        assert!(generation.get("seed").is_none());

        Ok(())
    }

    #[test]
    fn export_into_missing_directory_fails_with_io() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("no-existe").join("catalogo.json");
        let result = export_json(&[], &path);
        assert!(matches!(result, Err(ExtractError::Io(_))));
        Ok(())
    }
}
