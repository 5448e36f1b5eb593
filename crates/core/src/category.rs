//! Initiative categories.
//!
//! The dashboard offers a fixed set of labels; anything else a client sends
//! is kept verbatim and classified as [`Category::Other`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CATEGORY_IRRIGATION: &str = "ري وموارد مائية";
pub const CATEGORY_LIVESTOCK: &str = "تربية حيوانية";
pub const CATEGORY_ORGANIC_FARMING: &str = "زراعة عضوية";
pub const CATEGORY_MODERN_TECHNIQUES: &str = "تقنيات حديثة";
pub const CATEGORY_TRAINING: &str = "تدريب وتوعية";
pub const CATEGORY_OTHER: &str = "أخرى";

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The category of an initiative. Serialized as its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Irrigation,
    Livestock,
    OrganicFarming,
    ModernTechniques,
    Training,
    /// The explicit "other" label or any free-text label.
    Other(String),
}

impl Category {
    /// Classify a label. Never fails; unknown labels become [`Category::Other`].
    pub fn parse(label: &str) -> Self {
        match label {
            CATEGORY_IRRIGATION => Self::Irrigation,
            CATEGORY_LIVESTOCK => Self::Livestock,
            CATEGORY_ORGANIC_FARMING => Self::OrganicFarming,
            CATEGORY_MODERN_TECHNIQUES => Self::ModernTechniques,
            CATEGORY_TRAINING => Self::Training,
            other => Self::Other(other.to_string()),
        }
    }

    /// The label as stored and displayed.
    pub fn label(&self) -> &str {
        match self {
            Self::Irrigation => CATEGORY_IRRIGATION,
            Self::Livestock => CATEGORY_LIVESTOCK,
            Self::OrganicFarming => CATEGORY_ORGANIC_FARMING,
            Self::ModernTechniques => CATEGORY_MODERN_TECHNIQUES,
            Self::Training => CATEGORY_TRAINING,
            Self::Other(label) => label,
        }
    }

    /// Whether the label is empty. Only possible for records written
    /// outside this service.
    pub fn is_empty(&self) -> bool {
        self.label().is_empty()
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}
