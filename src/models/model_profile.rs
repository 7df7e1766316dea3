use serde::Serialize;

pub const DEFAULT_MODEL: &str = "gemma2-9b-it";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelProfile {
    pub temperature: f32,
    pub max_retries: usize,
    pub question_prefix: &'static str,
}

impl ModelProfile {
    pub const DEFAULT: ModelProfile = ModelProfile {
        temperature: 0.5,
        max_retries: 3,
        question_prefix: "",
    };

    pub fn lookup(model_name: &str) -> Option<ModelProfile> {
        MODEL_PROFILES
            .iter()
            .find(|(name, _)| *name == model_name)
            .map(|(_, profile)| *profile)
    }

    /// Profile for `model_name`, falling back to [`ModelProfile::DEFAULT`].
    pub fn for_model(model_name: &str) -> ModelProfile {
        Self::lookup(model_name).unwrap_or(Self::DEFAULT)
    }

    pub fn model_names() -> impl Iterator<Item = &'static str> {
        MODEL_PROFILES.iter().map(|(name, _)| *name)
    }
}

pub static MODEL_PROFILES: [(&str, ModelProfile); 3] = [
    (
        "deepseek-r1-distill-qwen-32b",
        ModelProfile {
            temperature: 0.3,
            max_retries: 5,
            question_prefix: "SQL question:",
        },
    ),
    (
        "gemma2-9b-it",
        ModelProfile {
            temperature: 0.5,
            max_retries: 4,
            question_prefix: "",
        },
    ),
    (
        "llama-3.3-70b-versatile",
        ModelProfile {
            temperature: 0.4,
            max_retries: 3,
            question_prefix: "",
        },
    ),
];
