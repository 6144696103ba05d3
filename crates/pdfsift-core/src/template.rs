//! Template library model and loading.
//!
//! A library is a list of [`DocumentTemplate`]s, each with ordered criteria
//! regions (the gate) and named entity regions (the payload). Region geometry
//! is validated and normalized here, once, so consumers only ever see a
//! non-negative [`Rectangle`] or a recorded reason why the region is unusable.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{RegionError, SchemaError};
use crate::geometry::{BBox, Rectangle};

/// Name used when a template or entity has no name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Geometry of a template region after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionBox {
    /// Well-formed, normalized rectangle.
    Rect(Rectangle),
    /// The box key is absent or null.
    Missing,
    /// The box is present but unusable.
    Invalid(String),
}

impl RegionBox {
    /// Build from the raw JSON value of a `criteria_box` / `coordinates` key.
    pub fn from_value(value: Option<&Value>) -> Self {
        let obj = match value {
            None | Some(Value::Null) => return RegionBox::Missing,
            Some(Value::Object(obj)) => obj,
            Some(other) => return RegionBox::Invalid(format!("expected an object, got {other}")),
        };

        let mut vals = [0.0f64; 4];
        for (slot, key) in vals.iter_mut().zip(["x", "y", "width", "height"]) {
            match obj.get(key).and_then(Value::as_f64) {
                Some(v) if v.is_finite() => *slot = v,
                Some(_) => return RegionBox::Invalid(format!("'{key}' is not finite")),
                None => {
                    return RegionBox::Invalid(format!("'{key}' is missing or not a number"));
                }
            }
        }
        RegionBox::Rect(Rectangle::new(vals[0], vals[1], vals[2], vals[3]).normalized())
    }

    /// The normalized rectangle, or why there is none.
    pub fn rect(&self) -> Result<Rectangle, RegionError> {
        match self {
            RegionBox::Rect(r) => Ok(*r),
            RegionBox::Missing => Err(RegionError::Malformed("missing box".to_string())),
            RegionBox::Invalid(reason) => Err(RegionError::Malformed(reason.clone())),
        }
    }

    /// The region as a page bounding box.
    pub fn bbox(&self) -> Result<BBox, RegionError> {
        self.rect().map(|r| r.to_bbox())
    }
}

impl From<Rectangle> for RegionBox {
    fn from(rect: Rectangle) -> Self {
        RegionBox::Rect(rect.normalized())
    }
}

/// "The text clipped from `criteria_box` must contain `criteria`."
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct CriteriaRegion {
    pub criteria: String,
    pub criteria_box: RegionBox,
}

impl CriteriaRegion {
    pub fn new(criteria: impl Into<String>, criteria_box: impl Into<RegionBox>) -> Self {
        Self {
            criteria: criteria.into(),
            criteria_box: criteria_box.into(),
        }
    }

    /// Check the region is usable and return its box.
    pub fn bbox(&self) -> Result<BBox, RegionError> {
        if self.criteria.is_empty() {
            return Err(RegionError::Malformed("empty criteria text".to_string()));
        }
        self.criteria_box.bbox().map_err(|e| match e {
            RegionError::Malformed(reason) => {
                RegionError::Malformed(format!("criteria_box for '{}': {reason}", self.criteria))
            }
            other => other,
        })
    }
}

impl From<Value> for CriteriaRegion {
    fn from(value: Value) -> Self {
        let criteria = value
            .get("criteria")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let criteria_box = match &value {
            Value::Object(_) => RegionBox::from_value(value.get("criteria_box")),
            other => RegionBox::Invalid(format!("criteria set is not an object: {other}")),
        };
        Self {
            criteria,
            criteria_box,
        }
    }
}

/// A named field extracted from a matched page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct EntityRegion {
    pub name: String,
    pub coordinates: RegionBox,
    /// Expected value recorded by the authoring tool (`"text"`), if any.
    pub expected_text: Option<String>,
}

impl EntityRegion {
    pub fn new(name: impl Into<String>, coordinates: impl Into<RegionBox>) -> Self {
        Self {
            name: name.into(),
            coordinates: coordinates.into(),
            expected_text: None,
        }
    }
}

impl From<Value> for EntityRegion {
    fn from(value: Value) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_NAME)
            .to_string();
        let coordinates = match &value {
            Value::Object(_) => RegionBox::from_value(value.get("coordinates")),
            other => RegionBox::Invalid(format!("entity is not an object: {other}")),
        };
        let expected_text = value
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            name,
            coordinates,
            expected_text,
        }
    }
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

/// One page "type": criteria that must all hold, and the fields to extract.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentTemplate {
    #[serde(default = "unknown_name")]
    pub document_name: String,
    #[serde(default)]
    pub criteria_sets: Vec<CriteriaRegion>,
    #[serde(default)]
    pub entities: Vec<EntityRegion>,
}

impl DocumentTemplate {
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            criteria_sets: Vec::new(),
            entities: Vec::new(),
        }
    }

    pub fn with_criteria(mut self, criteria: CriteriaRegion) -> Self {
        self.criteria_sets.push(criteria);
        self
    }

    pub fn with_entity(mut self, entity: EntityRegion) -> Self {
        self.entities.push(entity);
        self
    }

    /// Look up an entity by name. The last one wins when names repeat.
    pub fn entity(&self, name: &str) -> Option<&EntityRegion> {
        self.entities.iter().rev().find(|e| e.name == name)
    }

    /// Entity names that occur more than once, in first-seen order.
    pub fn duplicate_entity_names(&self) -> Vec<&str> {
        let mut dups: Vec<&str> = Vec::new();
        for (i, entity) in self.entities.iter().enumerate() {
            let name = entity.name.as_str();
            if self.entities[..i].iter().any(|e| e.name == name) && !dups.contains(&name) {
                dups.push(name);
            }
        }
        dups
    }
}

/// The full set of templates for a run. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateLibrary {
    documents: Vec<DocumentTemplate>,
}

impl TemplateLibrary {
    pub fn new(documents: Vec<DocumentTemplate>) -> Self {
        Self { documents }
    }

    /// Parse a library from JSON text.
    ///
    /// Accepts `{"documents": [...]}` and a bare `[...]` array of templates.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let root: Value = serde_json::from_str(json)?;
        let templates = match root {
            Value::Object(mut obj) => match obj.remove("documents") {
                Some(docs @ Value::Array(_)) => docs,
                Some(other) => {
                    return Err(SchemaError::Shape(format!(
                        "'documents' must be an array, got {}",
                        json_type_name(&other)
                    )));
                }
                None => {
                    return Err(SchemaError::Shape(
                        "root object has no 'documents' key".to_string(),
                    ));
                }
            },
            docs @ Value::Array(_) => docs,
            other => {
                return Err(SchemaError::Shape(format!(
                    "root must be an object or an array, got {}",
                    json_type_name(&other)
                )));
            }
        };
        let documents: Vec<DocumentTemplate> = serde_json::from_value(templates)?;
        let library = Self { documents };
        library.warn_duplicates();
        Ok(library)
    }

    /// Read and parse a library file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let library = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            templates = library.len(),
            "loaded template library"
        );
        Ok(library)
    }

    pub fn documents(&self) -> &[DocumentTemplate] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// First template with the given name.
    pub fn find(&self, document_name: &str) -> Option<&DocumentTemplate> {
        self.documents
            .iter()
            .find(|d| d.document_name == document_name)
    }

    fn warn_duplicates(&self) {
        for template in &self.documents {
            let dups = template.duplicate_entity_names();
            if !dups.is_empty() {
                tracing::warn!(
                    document = %template.document_name,
                    names = ?dups,
                    "duplicate entity names; the last region for each name wins"
                );
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
