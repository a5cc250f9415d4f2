use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoraWeight {
    pub name: String,
    pub weight: f64,
}

impl LoraWeight {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Un campo en `None` significa que ninguna fuente lo aportó. Los dialectos
/// nunca producen `Some(0)` para `steps`/`seed` ni `Some(0.0)` para `cfg_scale`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_hash: Option<String>,
    #[serde(default)]
    pub loras: Vec<LoraWeight>,
}

impl GenerationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Los campos escalares ya presentes se conservan; el prompt negativo se
    /// reemplaza con cualquier valor nuevo y los LoRAs se acumulan en orden.
    pub fn absorb(&mut self, extraction: Extraction) {
        fill(&mut self.prompt, extraction.prompt);
        fill(&mut self.steps, extraction.steps);
        fill(&mut self.cfg_scale, extraction.cfg_scale);
        fill(&mut self.sampler, extraction.sampler);
        fill(&mut self.scheduler, extraction.scheduler);
        fill(&mut self.seed, extraction.seed);
        fill(&mut self.model_name, extraction.model_name);
        fill(&mut self.model_hash, extraction.model_hash);

        if extraction.negative_prompt.is_some() {
            self.negative_prompt = extraction.negative_prompt;
        }

        self.loras.extend(extraction.loras);
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub steps: Option<u32>,
    pub cfg_scale: Option<f64>,
    pub sampler: Option<String>,
    pub scheduler: Option<String>,
    pub seed: Option<i64>,
    pub model_name: Option<String>,
    pub model_hash: Option<String>,
    pub loras: Vec<LoraWeight>,
}

impl Extraction {
    pub fn set_prompt(&mut self, raw: &str) {
        let (cleaned, loras) = super::lora::extract_loras(raw);
        self.loras.extend(loras);
        self.prompt = non_empty(cleaned);
    }

    pub fn set_negative_prompt(&mut self, raw: &str) {
        let (cleaned, loras) = super::lora::extract_loras(raw);
        self.loras.extend(loras);
        self.negative_prompt = non_empty(cleaned);
    }
}

pub(crate) fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() { None } else { Some(value) }
}

pub(crate) fn positive_steps(value: i64) -> Option<u32> {
    u32::try_from(value).ok().filter(|steps| *steps > 0)
}

pub(crate) fn positive_cfg(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

pub(crate) fn nonzero_seed(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}
