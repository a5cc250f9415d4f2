pub mod decode;
pub mod dialect;
pub mod lora;
pub mod prompt;
pub mod record;

pub use decode::decode_text;
pub use dialect::{DialectParser, parse_generation_params};
pub use lora::extract_loras;
pub use prompt::{PromptLibrary, clean_prompt, load_excluded_words};
pub use record::{Extraction, GenerationRecord, LoraWeight};
