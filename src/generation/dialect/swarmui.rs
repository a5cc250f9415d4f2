use super::{DialectParser, json_object};
use crate::generation::record::{
    Extraction, GenerationRecord, non_empty, nonzero_seed, positive_cfg, positive_steps,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SwarmDocument {
    #[serde(default)]
    sui_image_params: SwarmParams,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SwarmParams {
    prompt: String,
    negativeprompt: String,
    model: String,
    seed: i64,
    steps: i64,
    cfgscale: f64,
    sampler: String,
    scheduler: String,
}

pub struct SwarmUi;

impl DialectParser for SwarmUi {
    fn name(&self) -> &'static str {
        "swarmui"
    }

    fn try_parse(&self, text: &str, _record: &GenerationRecord) -> Option<Extraction> {
        let document: SwarmDocument = serde_json::from_str(json_object(text)?).ok()?;
        let params = document.sui_image_params;
        if params.prompt.is_empty() {
            return None;
        }

        let mut extraction = Extraction::default();
        extraction.set_prompt(&params.prompt);
        if !params.negativeprompt.is_empty() {
            extraction.set_negative_prompt(&params.negativeprompt);
        }
        extraction.model_name = non_empty(params.model);
        extraction.sampler = non_empty(params.sampler);
        extraction.scheduler = non_empty(params.scheduler);
        extraction.steps = positive_steps(params.steps);
        extraction.cfg_scale = positive_cfg(params.cfgscale);
        extraction.seed = nonzero_seed(params.seed);

        Some(extraction)
    }
}
