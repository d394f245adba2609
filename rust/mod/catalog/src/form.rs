//! The create/edit form bound to at most one record.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::model::{Breed, Llama, Temperament, AGE_RANGE, WEIGHT_RANGE};

// ── FormField ───────────────────────────────────────────────────────

/// Form inputs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Breed,
    Color,
    Temperament,
    Age,
    Weight,
    ImageUrl,
    FunFact,
    IsFavorite,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Name,
        FormField::Breed,
        FormField::Color,
        FormField::Temperament,
        FormField::Age,
        FormField::Weight,
        FormField::ImageUrl,
        FormField::FunFact,
        FormField::IsFavorite,
    ];

    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Breed => "breed",
            FormField::Color => "color",
            FormField::Temperament => "temperament",
            FormField::Age => "age",
            FormField::Weight => "weight",
            FormField::ImageUrl => "imageUrl",
            FormField::FunFact => "funFact",
            FormField::IsFavorite => "isFavorite",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, FormField::Name | FormField::Breed | FormField::Color)
    }

    /// Prompt shown next to a blank required field.
    pub fn required_message(self) -> Option<&'static str> {
        match self {
            FormField::Name => Some("Please enter a name"),
            FormField::Breed => Some("Please select a breed"),
            FormField::Color => Some("Please enter a color"),
            _ => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = String;

    /// Accepts the wire name or its kebab-case form (`image-url`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '-' && *c != '_').collect();
        FormField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(&wanted))
            .or(match wanted.to_ascii_lowercase().as_str() {
                "favorite" => Some(FormField::IsFavorite),
                "image" => Some(FormField::ImageUrl),
                _ => None,
            })
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

// ── FormState ───────────────────────────────────────────────────────

/// Current contents of the form.
///
/// Text inputs hold raw strings; numeric inputs hold already-checked
/// values, so an out-of-range age or weight never reaches the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub breed: Option<Breed>,
    pub color: String,
    pub temperament: Option<Temperament>,
    pub age: Option<u32>,
    pub weight: Option<u32>,
    pub image_url: String,
    pub fun_fact: String,
    pub is_favorite: bool,
    /// Backend fields of the record being edited, handed back on save.
    pub extra: Map<String, Value>,
}

impl FormState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pre-fill every field from an existing record.
    pub fn from_llama(llama: &Llama) -> Self {
        Self {
            name: llama.name.clone(),
            breed: Some(llama.breed),
            color: llama.color.clone(),
            temperament: llama.temperament,
            age: llama.age,
            weight: llama.weight,
            image_url: llama.image_url.clone().unwrap_or_default(),
            fun_fact: llama.fun_fact.clone().unwrap_or_default(),
            is_favorite: llama.is_favorite,
            extra: llama.extra.clone(),
        }
    }

    /// Apply raw input to one field. An empty value clears optional fields.
    ///
    /// On error the form is left unchanged.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), ValidationError> {
        let trimmed = value.trim();
        match field {
            FormField::Name => self.name = value.to_string(),
            FormField::Color => self.color = value.to_string(),
            FormField::ImageUrl => self.image_url = value.to_string(),
            FormField::FunFact => self.fun_fact = value.to_string(),
            FormField::Breed => {
                self.breed = parse_choice(field, trimmed)?;
            }
            FormField::Temperament => {
                self.temperament = parse_choice(field, trimmed)?;
            }
            FormField::Age => {
                self.age = parse_bounded(field, trimmed, *AGE_RANGE.start(), *AGE_RANGE.end())?;
            }
            FormField::Weight => {
                self.weight =
                    parse_bounded(field, trimmed, *WEIGHT_RANGE.start(), *WEIGHT_RANGE.end())?;
            }
            FormField::IsFavorite => {
                self.is_favorite = parse_switch(trimmed).ok_or_else(|| ValidationError::Invalid {
                    field,
                    reason: format!("expected on/off, got '{}'", value),
                })?;
            }
        }
        Ok(())
    }

    /// Required fields that are currently blank, in form order.
    pub fn missing_required(&self) -> Vec<FormField> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(FormField::Name);
        }
        if self.breed.is_none() {
            missing.push(FormField::Breed);
        }
        if self.color.trim().is_empty() {
            missing.push(FormField::Color);
        }
        missing
    }

    /// Build the full record to submit.
    pub fn to_llama(&self, id: Option<String>) -> Result<Llama, ValidationError> {
        let missing = self.missing_required();
        let Some(breed) = self.breed.filter(|_| missing.is_empty()) else {
            return Err(ValidationError::MissingFields(missing));
        };

        Ok(Llama {
            id,
            name: self.name.trim().to_string(),
            breed,
            color: self.color.trim().to_string(),
            temperament: self.temperament,
            age: self.age,
            weight: self.weight,
            image_url: non_blank(&self.image_url),
            fun_fact: non_blank(&self.fun_fact),
            is_favorite: self.is_favorite,
            extra: self.extra.clone(),
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_choice<T: FromStr<Err = String>>(
    field: FormField,
    value: &str,
) -> Result<Option<T>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|reason| ValidationError::Invalid { field, reason })
}

fn parse_bounded(
    field: FormField,
    value: &str,
    min: u32,
    max: u32,
) -> Result<Option<u32>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    let n: i64 = value.parse().map_err(|_| ValidationError::Invalid {
        field,
        reason: format!("'{}' is not a whole number", value),
    })?;
    if n < i64::from(min) || n > i64::from(max) {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(Some(n as u32))
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" | "" => Some(false),
        _ => None,
    }
}
