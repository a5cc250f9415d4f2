//! Formato de texto tradicional de WebUI (bloque "parameters").
//!
//! La extracción `clave: valor` corta en la primera coma, de modo que un valor
//! que contenga comas queda truncado. No existe una gramática formal para este
//! formato; se acepta esa limitación.

use super::DialectParser;
use crate::generation::record::{
    Extraction, GenerationRecord, non_empty, nonzero_seed, positive_cfg, positive_steps,
};

const NEGATIVE_MARKER: &str = "Negative prompt:";
const PARAMETER_MARKERS: [&str; 3] = ["Steps:", "CFG scale:", "Sampler:"];
const PROMPT_TERMINATORS: [&str; 7] = [
    "Steps:",
    "CFG scale:",
    "Sampler:",
    "Model:",
    "Seed:",
    "Size:",
    "Version:",
];

pub struct WebUi;

impl DialectParser for WebUi {
    fn name(&self) -> &'static str {
        "webui"
    }

    fn try_parse(&self, text: &str, record: &GenerationRecord) -> Option<Extraction> {
        let mut extraction = Extraction::default();
        let has_parameters = PARAMETER_MARKERS.iter().any(|marker| text.contains(marker));

        if has_parameters {
            if record.prompt.is_none()
                && let Some(prompt) = leading_prompt(text)
            {
                extraction.set_prompt(&prompt);
            }
            if let Some(negative) = negative_prompt(text) {
                extraction.set_negative_prompt(negative);
            }
        } else if record.prompt.is_none() {
            extraction.set_prompt(text);
        }

        extraction.steps = param(text, "Steps:")
            .and_then(|value| value.parse().ok())
            .and_then(positive_steps);
        extraction.cfg_scale = param(text, "CFG scale:")
            .and_then(|value| value.parse().ok())
            .and_then(positive_cfg);
        extraction.sampler = param(text, "Sampler:").and_then(non_empty);
        extraction.scheduler = if text.contains("Schedule type:") {
            param(text, "Schedule type:").and_then(non_empty)
        } else {
            param(text, "Scheduler:").and_then(non_empty)
        };
        extraction.model_name = param(text, "Model:").and_then(non_empty);
        extraction.model_hash = param(text, "Model hash:").and_then(non_empty);
        extraction.seed = param(text, "Seed:")
            .and_then(|value| value.parse().ok())
            .and_then(nonzero_seed);

        Some(extraction)
    }
}

/// Las líneas en blanco se conservan.
fn leading_prompt(text: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in text.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            lines.push(trimmed);
            continue;
        }
        if trimmed.starts_with(NEGATIVE_MARKER)
            || PROMPT_TERMINATORS
                .iter()
                .any(|marker| trimmed.contains(marker))
        {
            break;
        }
        lines.push(trimmed);
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Texto tras `Negative prompt:` hasta el salto de línea, o hasta `Steps:` si
/// no hay salto, o hasta el final.
fn negative_prompt(text: &str) -> Option<&str> {
    let start = text.find(NEGATIVE_MARKER)? + NEGATIVE_MARKER.len();
    let rest = &text[start..];
    let end = rest
        .find('\n')
        .or_else(|| rest.find("Steps:"))
        .unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn param<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let start = text.find(prefix)? + prefix.len();
    let rest = &text[start..];
    let end = rest.find(',').unwrap_or(rest.len());
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::record::LoraWeight;

    fn parse(text: &str) -> Extraction {
        WebUi
            .try_parse(text, &GenerationRecord::new())
            .expect("el texto tradicional siempre se reconoce")
    }

    #[test]
    fn reads_standard_parameter_block() {
        let extraction = parse(
            "cat girl\nNegative prompt: bad hands\nSteps: 24, Sampler: Euler a, CFG scale: 7, Seed: 12345, Model: foo_v1",
        );

        assert_eq!(extraction.prompt.as_deref(), Some("cat girl"));
        assert_eq!(extraction.negative_prompt.as_deref(), Some("bad hands"));
        assert_eq!(extraction.steps, Some(24));
        assert_eq!(extraction.sampler.as_deref(), Some("Euler a"));
        assert_eq!(extraction.cfg_scale, Some(7.0));
        assert_eq!(extraction.seed, Some(12345));
        assert_eq!(extraction.model_name.as_deref(), Some("foo_v1"));
    }

    #[test]
    fn schedule_type_takes_precedence_and_hash_is_separate() {
        let extraction = parse(
            "sunset\nSteps: 30, Sampler: DPM++ 2M, Schedule type: Karras, Scheduler: simple, CFG scale: 5.5, Seed: 42, Size: 832x1216, Model hash: 4e81a2b9, Model: ponyXL",
        );

        assert_eq!(extraction.scheduler.as_deref(), Some("Karras"));
        assert_eq!(extraction.model_hash.as_deref(), Some("4e81a2b9"));
        assert_eq!(extraction.model_name.as_deref(), Some("ponyXL"));
        assert_eq!(extraction.cfg_scale, Some(5.5));
    }

    #[test]
    fn multi_line_prompt_keeps_loras_from_every_line() {
        let extraction = parse(
            "first line <lora:one:0.5>\n\nsecond line <lora:two:1>\nNegative prompt: ugly <lora:neg:0.25>\nSteps: 20",
        );

        assert_eq!(extraction.prompt.as_deref(), Some("first line second line"));
        assert_eq!(extraction.negative_prompt.as_deref(), Some("ugly"));
        assert_eq!(
            extraction.loras,
            vec![
                LoraWeight::new("one", 0.5),
                LoraWeight::new("two", 1.0),
                LoraWeight::new("neg", 0.25),
            ]
        );
    }

    #[test]
    fn negative_prompt_without_newline_stops_at_steps() {
        let extraction = parse("Negative prompt: lowres, blurry Steps: 20, Seed: 9");
        assert_eq!(extraction.prompt, None);
        assert_eq!(extraction.negative_prompt.as_deref(), Some("lowres, blurry"));
        assert_eq!(extraction.steps, Some(20));
    }

    #[test]
    fn malformed_numbers_are_ignored() {
        let extraction = parse("a cat\nSteps: many, CFG scale: high, Seed: -1, Sampler: Euler");
        assert_eq!(extraction.steps, None);
        assert_eq!(extraction.cfg_scale, None);
        assert_eq!(extraction.seed, Some(-1));
        assert_eq!(extraction.sampler.as_deref(), Some("Euler"));
    }

    #[test]
    fn existing_prompt_is_not_reparsed() {
        let record = GenerationRecord {
            prompt: Some("already".into()),
            ..GenerationRecord::default()
        };
        let extraction = WebUi
            .try_parse("other <lora:skip:1>\nSteps: 10", &record)
            .expect("el texto tradicional siempre se reconoce");
        assert_eq!(extraction.prompt, None);
        assert!(extraction.loras.is_empty());
        assert_eq!(extraction.steps, Some(10));
    }

    #[test]
    fn plain_text_is_whole_prompt() {
        let extraction = parse("a castle in the clouds, <lora:sky:0.9> volumetric light");
        assert_eq!(
            extraction.prompt.as_deref(),
            Some("a castle in the clouds, volumetric light")
        );
        assert_eq!(extraction.loras, vec![LoraWeight::new("sky", 0.9)]);
    }
}
