use serde::Deserialize;

/// Default body limit for form extraction: 32 MiB.
pub const DEFAULT_MAX_FORM_BYTES: usize = 32 << 20;

/// Settings for the HTTP extractors.
///
/// Every field has a default, so a partial document is enough:
///
/// ```
/// let cfg = mox::BindConfig::from_json(r#"{"validate": false}"#).unwrap();
/// assert!(!cfg.validate);
/// assert_eq!(cfg.max_form_bytes, mox::config::DEFAULT_MAX_FORM_BYTES);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Largest accepted form body, in bytes.
    pub max_form_bytes: usize,
    /// Run the validator after a successful bind.
    pub validate: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            max_form_bytes: DEFAULT_MAX_FORM_BYTES,
            validate: true,
        }
    }
}

impl BindConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn max_form_bytes(mut self, limit: usize) -> Self {
        self.max_form_bytes = limit;
        self
    }

    pub fn validate(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }
}
