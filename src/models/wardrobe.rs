use crate::data_url::DataUrl;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A garment the user can put on the model. Lives for the session only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeItem {
    pub id: String,
    pub name: String,
    pub url: DataUrl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl WardrobeItem {
    pub fn new(name: impl Into<String>, url: DataUrl) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            url,
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}
