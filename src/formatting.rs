use chrono::{DateTime, Local};
use promptlens::LoraWeight;
use std::fs::Metadata;

const SIZE_UNITS: [(&str, u64); 3] = [("GiB", 1 << 30), ("MiB", 1 << 20), ("KiB", 1 << 10)];

/// `512 × 768 px · 1.4 MiB`; sin tamaño si no se conoce.
pub fn format_dimensions(width: u32, height: u32, file_size: Option<u64>) -> String {
    let dimensions = format!("{width} × {height} px");
    match file_size {
        Some(bytes) => format!("{dimensions} · {}", human_size(bytes)),
        None => dimensions,
    }
}

fn human_size(bytes: u64) -> String {
    SIZE_UNITS
        .iter()
        .find(|(_, scale)| bytes >= *scale)
        .map(|(unit, scale)| format!("{:.1} {unit}", bytes as f64 / *scale as f64))
        .unwrap_or_else(|| format!("{bytes} B"))
}

pub fn format_modified(metadata: &Metadata) -> String {
    metadata
        .modified()
        .map(|time| {
            let datetime: DateTime<Local> = time.into();
            datetime.format("%Y-%m-%d %H:%M").to_string()
        })
        .unwrap_or_else(|_| "No disponible".to_string())
}

pub fn format_loras(loras: &[LoraWeight]) -> String {
    if loras.is_empty() {
        return "Ninguno".to_string();
    }
    loras
        .iter()
        .map(|lora| format!("{} ({:.2})", lora.name, lora.weight))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_optional<T: ToString>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "No disponible".to_string())
}
