//! The llama record and its fixed vocabularies.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use llama_client::Resource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Accepted age in years.
pub const AGE_RANGE: RangeInclusive<u32> = 0..=30;

/// Accepted weight in pounds.
pub const WEIGHT_RANGE: RangeInclusive<u32> = 0..=500;

/// Parse a label case-insensitively, ignoring `-`, `_` and spaces, so
/// `Suri Llama`, `suri-llama` and `SURI_LLAMA` all match.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

// ── Breed ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breed {
    #[serde(rename = "Classic Llama")]
    Classic,
    #[serde(rename = "Suri Llama")]
    Suri,
    #[serde(rename = "Wooly Llama")]
    Wooly,
    #[serde(rename = "Silky Llama")]
    Silky,
    #[serde(rename = "Huacaya Llama")]
    Huacaya,
}

impl Breed {
    pub const ALL: [Breed; 5] = [
        Breed::Classic,
        Breed::Suri,
        Breed::Wooly,
        Breed::Silky,
        Breed::Huacaya,
    ];

    /// Display label, identical to the wire value.
    pub fn label(self) -> &'static str {
        match self {
            Breed::Classic => "Classic Llama",
            Breed::Suri => "Suri Llama",
            Breed::Wooly => "Wooly Llama",
            Breed::Silky => "Silky Llama",
            Breed::Huacaya => "Huacaya Llama",
        }
    }
}

impl fmt::Display for Breed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Breed {
    type Err = String;

    /// Accepts the full label or the bare prefix (`suri`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Breed::ALL
            .into_iter()
            .find(|b| {
                let label = normalize(b.label());
                label == wanted || label.strip_suffix("llama") == Some(wanted.as_str())
            })
            .ok_or_else(|| format!("unknown breed '{}'", s))
    }
}

// ── Temperament ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temperament {
    Gentle,
    Playful,
    Calm,
    Energetic,
    Friendly,
    Independent,
    Curious,
}

impl Temperament {
    pub const ALL: [Temperament; 7] = [
        Temperament::Gentle,
        Temperament::Playful,
        Temperament::Calm,
        Temperament::Energetic,
        Temperament::Friendly,
        Temperament::Independent,
        Temperament::Curious,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Temperament::Gentle => "Gentle",
            Temperament::Playful => "Playful",
            Temperament::Calm => "Calm",
            Temperament::Energetic => "Energetic",
            Temperament::Friendly => "Friendly",
            Temperament::Independent => "Independent",
            Temperament::Curious => "Curious",
        }
    }
}

impl fmt::Display for Temperament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Temperament {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Temperament::ALL
            .into_iter()
            .find(|t| normalize(t.label()) == wanted)
            .ok_or_else(|| format!("unknown temperament '{}'", s))
    }
}

// ── Llama ───────────────────────────────────────────────────────────

/// A catalog record.
///
/// `id` is assigned by the backend on create and never changes after.
/// Updates always resend the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Llama {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub breed: Breed,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperament: Option<Temperament>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_fact: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Fields the backend holds that the catalog does not model
    /// (timestamps, owners). Carried through edits and resent unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Llama {
    /// Minimal record with only the required fields set.
    pub fn new(name: impl Into<String>, breed: Breed, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            breed,
            color: color.into(),
            temperament: None,
            age: None,
            weight: None,
            image_url: None,
            fun_fact: None,
            is_favorite: false,
            extra: Map::new(),
        }
    }

    /// The same record with the favorite flag flipped.
    pub fn toggled_favorite(&self) -> Self {
        Self {
            is_favorite: !self.is_favorite,
            ..self.clone()
        }
    }
}

impl Resource for Llama {
    fn collection() -> &'static str {
        "llamas"
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
