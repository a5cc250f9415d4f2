//! Detección del dialecto de un bloque de metadata y despacho al parser adecuado.

mod comfyui;
mod swarmui;
mod webui;

pub use comfyui::ComfyUi;
pub use swarmui::SwarmUi;
pub use webui::WebUi;

use super::decode::decode_text;
use super::record::{Extraction, GenerationRecord};
use tracing::debug;

pub trait DialectParser: Sync {
    fn name(&self) -> &'static str;

    fn try_parse(&self, text: &str, record: &GenerationRecord) -> Option<Extraction>;
}

/// Orden de prioridad: los dialectos JSON primero, el texto tradicional al final.
static DIALECTS: [&dyn DialectParser; 3] = [&SwarmUi, &ComfyUi, &WebUi];

pub fn parse_generation_params(raw: &str, record: &mut GenerationRecord) {
    let text = decode_text(raw);

    for dialect in DIALECTS {
        if let Some(extraction) = dialect.try_parse(&text, record) {
            debug!(dialect = dialect.name(), "bloque de metadata reconocido");
            record.absorb(extraction);
            return;
        }
    }
}

pub(crate) fn json_object(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (trimmed.starts_with('{') && trimmed.ends_with('}')).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWARM_WITH_KEYWORDS: &str = r#"{"sui_image_params": {"prompt": "Steps: 99, a lighthouse", "model": "sdxl_base", "steps": 30, "seed": 7}}"#;

    #[test]
    fn json_dialect_short_circuits_keyword_parser() {
        let mut record = GenerationRecord::new();
        parse_generation_params(SWARM_WITH_KEYWORDS, &mut record);

        assert_eq!(record.prompt.as_deref(), Some("Steps: 99, a lighthouse"));
        assert_eq!(record.steps, Some(30));
        assert_eq!(record.seed, Some(7));
    }

    #[test]
    fn unknown_json_falls_back_to_traditional_text() {
        let mut record = GenerationRecord::new();
        parse_generation_params(r#"{"foo": "Steps: 12, Seed: 5, end"}"#, &mut record);

        assert_eq!(record.steps, Some(12));
        assert_eq!(record.seed, Some(5));
        assert_eq!(record.prompt, None);
    }

    #[test]
    fn first_source_wins_except_loras() {
        let mut record = GenerationRecord::new();
        parse_generation_params(
            "a knight <lora:armor:0.7>\nSteps: 20, Model: X",
            &mut record,
        );
        parse_generation_params(
            "a wizard <lora:robe:1.2>\nNegative prompt: blurry <lora:neg:0.3>\nSteps: 40, Model: Y",
            &mut record,
        );

        assert_eq!(record.prompt.as_deref(), Some("a knight"));
        assert_eq!(record.model_name.as_deref(), Some("X"));
        assert_eq!(record.steps, Some(20));
        assert_eq!(record.negative_prompt.as_deref(), Some("blurry"));
        let names: Vec<&str> = record.loras.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["armor", "neg"]);
    }

    #[test]
    fn loras_accumulate_across_json_blobs() {
        let mut record = GenerationRecord::new();
        parse_generation_params(
            r#"{"sui_image_params": {"prompt": "forest <lora:moss:0.5>", "model": "X"}}"#,
            &mut record,
        );
        parse_generation_params(
            r#"{"sui_image_params": {"prompt": "desert <lora:sand:0.9>", "model": "Y"}}"#,
            &mut record,
        );

        assert_eq!(record.prompt.as_deref(), Some("forest"));
        assert_eq!(record.model_name.as_deref(), Some("X"));
        let names: Vec<&str> = record.loras.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["moss", "sand"]);
    }

    #[test]
    fn plain_text_becomes_prompt() {
        let mut record = GenerationRecord::new();
        parse_generation_params("UNICODE  a quiet harbor at dawn", &mut record);
        assert_eq!(record.prompt.as_deref(), Some("a quiet harbor at dawn"));
    }

    #[test]
    fn json_shape_requires_braces_at_both_ends() {
        assert_eq!(json_object("  {\"a\": 1}\n"), Some("{\"a\": 1}"));
        assert_eq!(json_object("{\"a\": 1} trailing"), None);
        assert_eq!(json_object("plain"), None);
    }
}
