//! Extracción de etiquetas `<lora:nombre:peso>` y limpieza del texto restante.

use super::record::LoraWeight;
use once_cell::sync::Lazy;
use regex::Regex;

static LORA_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<lora:([^:]+):([^>]+)>").expect("patrón LoRA inválido"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("patrón de espacios inválido"));

/// Una etiqueta con peso no numérico se elimina del texto pero no se reporta.
pub fn extract_loras(text: &str) -> (String, Vec<LoraWeight>) {
    let loras = LORA_TAG
        .captures_iter(text)
        .filter_map(|caps| {
            let weight = caps[2].parse::<f64>().ok()?;
            Some(LoraWeight::new(&caps[1], round_weight(weight)))
        })
        .collect();

    let stripped = LORA_TAG.replace_all(text, "");
    let cleaned = WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string();

    (cleaned, loras)
}

fn round_weight(weight: f64) -> f64 {
    format!("{weight:.2}").parse().unwrap_or(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tag_and_collapses_spaces() {
        let (cleaned, loras) = extract_loras("a, b <lora:foo:0.8> c");
        assert_eq!(cleaned, "a, b c");
        assert_eq!(loras, vec![LoraWeight::new("foo", 0.8)]);
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let (cleaned, loras) =
            extract_loras("<lora:detail:1> portrait, <lora:style_v2:0.456>\n\nsoft light <lora:detail:1>");
        assert_eq!(cleaned, "portrait, soft light");
        assert_eq!(
            loras,
            vec![
                LoraWeight::new("detail", 1.0),
                LoraWeight::new("style_v2", 0.46),
                LoraWeight::new("detail", 1.0),
            ]
        );
    }

    #[test]
    fn invalid_weight_is_removed_but_not_reported() {
        let (cleaned, loras) = extract_loras("castle <lora:broken:abc> at night");
        assert_eq!(cleaned, "castle at night");
        assert!(loras.is_empty());
    }

    #[test]
    fn text_without_tags_is_only_normalized() {
        let (cleaned, loras) = extract_loras("  line one\n\nline   two ");
        assert_eq!(cleaned, "line one line two");
        assert!(loras.is_empty());
    }
}
