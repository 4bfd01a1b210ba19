use serde::Deserialize;

/// One entry in the static model listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelEntry {
    /// Model identifier clients pass as `model`
    pub id: String,
    /// Organisation reported as the model owner
    #[serde(default = "default_owner")]
    pub owned_by: String,
}

impl ModelEntry {
    /// Create an entry owned by the default organisation
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owned_by: default_owner(),
        }
    }
}

fn default_owner() -> String {
    "google".to_owned()
}

pub(crate) fn default_models() -> Vec<ModelEntry> {
    vec![ModelEntry::new("gemini-2.5-pro"), ModelEntry::new("gemini-2.5-flash")]
}
