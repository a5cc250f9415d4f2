//! Dialecto ComfyUI: un workflow JSON cuyo campo `extraMetadata` contiene otro
//! documento JSON serializado como cadena.

use super::{DialectParser, json_object};
use crate::generation::record::{
    Extraction, GenerationRecord, non_empty, nonzero_seed, positive_cfg, positive_steps,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ComfyWorkflow {
    #[serde(default, rename = "extraMetadata")]
    extra_metadata: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComfyExtraMetadata {
    prompt: String,
    negative_prompt: String,
    steps: i64,
    cfg_scale: f64,
    sampler: String,
    seed: i64,
}

pub struct ComfyUi;

impl DialectParser for ComfyUi {
    fn name(&self) -> &'static str {
        "comfyui"
    }

    fn try_parse(&self, text: &str, _record: &GenerationRecord) -> Option<Extraction> {
        let workflow: ComfyWorkflow = serde_json::from_str(json_object(text)?).ok()?;
        if workflow.extra_metadata.is_empty() {
            return None;
        }

        let meta: ComfyExtraMetadata = match serde_json::from_str(&workflow.extra_metadata) {
            Ok(meta) => meta,
            Err(error) => {
                debug!(%error, "extraMetadata de ComfyUI ilegible");
                return None;
            }
        };

        let mut extraction = Extraction::default();
        if !meta.prompt.is_empty() {
            extraction.set_prompt(&meta.prompt);
        }
        if !meta.negative_prompt.is_empty() {
            extraction.set_negative_prompt(&meta.negative_prompt);
        }
        extraction.sampler = non_empty(meta.sampler);
        extraction.steps = positive_steps(meta.steps);
        extraction.cfg_scale = positive_cfg(meta.cfg_scale);
        extraction.seed = nonzero_seed(meta.seed);

        Some(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMFY_SAMPLE: &str = r#"{"23":{"class_type":"UpscaleModelLoader","inputs":{"model_name":"urn:air:other:upscaler:civitai:147759@164821"},"_meta":{"title":"Load Upscale Model"}},"12":{"class_type":"SaveImage","inputs":{"filename_prefix":"ComfyUI","images":["24",0]},"_meta":{"title":"Save Image"}},"extra":{"airs":["urn:air:other:upscaler:civitai:147759@164821"]},"extraMetadata":"{\"prompt\":\"photography, surrealism, closeup, eyeball, flesh <lora:macro:0.6>\",\"negativePrompt\":\"\",\"steps\":40,\"cfgScale\":3.5,\"sampler\":\"dpmpp_2m\",\"seed\":1966159266,\"workflowId\":\"img2img-upscale\",\"resources\":[{\"modelVersionId\":699332,\"strength\":1}]}"}"#;

    fn parse(text: &str) -> Option<Extraction> {
        ComfyUi.try_parse(text, &GenerationRecord::new())
    }

    #[test]
    fn reads_nested_extra_metadata() {
        let extraction = parse(COMFY_SAMPLE).expect("debería reconocer ComfyUI");

        assert_eq!(
            extraction.prompt.as_deref(),
            Some("photography, surrealism, closeup, eyeball, flesh")
        );
        assert_eq!(extraction.negative_prompt, None);
        assert_eq!(extraction.steps, Some(40));
        assert_eq!(extraction.cfg_scale, Some(3.5));
        assert_eq!(extraction.sampler.as_deref(), Some("dpmpp_2m"));
        assert_eq!(extraction.seed, Some(1966159266));
        assert_eq!(extraction.scheduler, None);
        assert_eq!(extraction.loras.len(), 1);
        assert_eq!(extraction.loras[0].name, "macro");
    }

    #[test]
    fn missing_or_broken_extra_metadata_is_rejected() {
        assert!(parse(r#"{"3": {"class_type": "KSampler"}}"#).is_none());
        assert!(parse(r#"{"extraMetadata": ""}"#).is_none());
        assert!(parse(r#"{"extraMetadata": "{broken"}"#).is_none());
    }
}
