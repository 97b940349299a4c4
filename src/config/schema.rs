use serde::{Deserialize, Serialize};

pub const DEFAULT_AVERAGE: f64 = 2.5;
pub const DEFAULT_PRESETS: [f64; 5] = [2.0, 2.5, 3.0, 3.5, 4.0];
pub const DEFAULT_STORAGE_KEY: &str = "last_used_rating";

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// default_average: 2.5
/// presets: [2.0, 2.5, 3.0, 3.5, 4.0]
/// storage_key: last_used_rating
/// form:
///   question_prefix: q
///   scale_size: 5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Prompt default when no rating has been stored yet
    #[serde(default = "default_average")]
    pub default_average: f64,

    /// One-shot targets selectable with `--preset N`
    #[serde(default = "default_presets")]
    pub presets: Vec<f64>,

    /// Key the last used rating is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default)]
    pub form: FormConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_average: default_average(),
            presets: default_presets(),
            storage_key: default_storage_key(),
            form: FormConfig::default(),
        }
    }
}

/// How question groups are recognised on a survey page.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormConfig {
    /// Radio `name` prefix of question groups; option ids are `{prefix}{question}{score}`
    #[serde(default = "default_question_prefix")]
    pub question_prefix: String,

    /// Radios per question
    #[serde(default = "default_scale_size")]
    pub scale_size: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            question_prefix: default_question_prefix(),
            scale_size: default_scale_size(),
        }
    }
}

fn default_average() -> f64 {
    DEFAULT_AVERAGE
}

fn default_presets() -> Vec<f64> {
    DEFAULT_PRESETS.to_vec()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_question_prefix() -> String {
    "q".to_string()
}

fn default_scale_size() -> usize {
    5
}
