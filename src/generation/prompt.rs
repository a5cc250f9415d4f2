use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::warn;

use super::record::GenerationRecord;

const PAIR_SEPARATOR: &str = "|||";

static ANY_LORA_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<lora:[^>]+>").expect("patrón LoRA inválido"));
static EMPTY_COMMA_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*,\s*").expect("patrón de comas inválido"));
static LEADING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*,\s*").expect("patrón de comas inválido"));
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,\s*$").expect("patrón de comas inválido"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("patrón de espacios inválido"));

pub fn load_excluded_words(path: &Path) -> Vec<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) => {
            warn!(path = %path.display(), %error, "no se pudo leer la lista de palabras excluidas");
            return Vec::new();
        }
    };

    content
        .split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn clean_prompt(prompt: &str, excluded_words: &[String]) -> String {
    if prompt.is_empty() {
        return String::new();
    }

    let mut cleaned = ANY_LORA_TAG.replace_all(prompt, "").into_owned();

    for word in excluded_words.iter().filter(|word| !word.is_empty()) {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(word));
        if let Ok(word_regex) = Regex::new(&pattern) {
            cleaned = word_regex.replace_all(&cleaned, "").into_owned();
        }
    }

    let cleaned = EMPTY_COMMA_RUN.replace_all(&cleaned, ", ");
    let cleaned = LEADING_COMMA.replace_all(&cleaned, "");
    let cleaned = TRAILING_COMMA.replace_all(&cleaned, "");
    let cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

#[derive(Debug, Default)]
pub struct PromptLibrary {
    excluded_words: Vec<String>,
    seen: HashSet<String>,
    entries: Vec<String>,
}

impl PromptLibrary {
    pub fn new(excluded_words: Vec<String>) -> Self {
        Self {
            excluded_words,
            ..Self::default()
        }
    }

    /// Agrega el par del registro. Devuelve `false` si el prompt queda vacío
    /// tras la limpieza o si el par ya existía.
    pub fn add(&mut self, record: &GenerationRecord) -> bool {
        let prompt = clean_prompt(
            record.prompt.as_deref().unwrap_or_default(),
            &self.excluded_words,
        );
        if prompt.is_empty() {
            return false;
        }
        let negative = clean_prompt(
            record.negative_prompt.as_deref().unwrap_or_default(),
            &self.excluded_words,
        );

        let line = format!("{prompt}{PAIR_SEPARATOR}{negative}");
        if !self.seen.insert(line.clone()) {
            return false;
        }
        self.entries.push(line);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut output = self.entries.join("\n");
        if !output.is_empty() {
            output.push('\n');
        }
        fs::write(path, output)
    }
}
