//! Data model for the 3D container-packing engine.
//!
//! Defines the container, the caller-facing cargo specification, the internal
//! `Item` the placer moves, the committed `Placement`, and the extreme-point
//! frontier candidates.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToSchema;

/// Validation error for cargo and container input.
#[derive(Debug, Clone)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidWeight(String),
    InvalidQuantity(String),
    EmptyCargo,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidWeight(msg) => write!(f, "Invalid weight: {}", msg),
            ValidationError::InvalidQuantity(msg) => write!(f, "Invalid quantity: {}", msg),
            ValidationError::EmptyCargo => write!(f, "At least one cargo item must be specified"),
        }
    }
}

impl std::error::Error for ValidationError {}

fn validate_dimension(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

fn validate_weight_value(value: f64) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidWeight(format!(
            "Weight must be positive, got: {}",
            value
        )));
    }
    Ok(())
}

/// Immutable container dimensions and payload limit. Millimetres and kilograms
/// are the conventional units for the named presets; the engine itself is
/// unit-agnostic as long as cargo dimensions use the same axes.
#[derive(Clone, Copy, Debug, Serialize, ToSchema)]
pub struct Container {
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub max_weight: f64,
}

impl Container {
    /// `(key, length, height, width, max_weight)` for the three fixed presets.
    const PRESETS: &'static [(&'static str, f64, f64, f64, f64)] = &[
        ("40HC", 1203.0, 269.0, 235.0, 28500.0),
        ("40GP", 1203.0, 239.0, 235.0, 26000.0),
        ("20GP", 589.0, 239.0, 235.0, 28000.0),
    ];

    /// Looks up one of the three named container presets.
    pub fn preset(key: &str) -> Option<Container> {
        Self::PRESETS
            .iter()
            .find(|(name, ..)| *name == key)
            .map(|&(_, length, height, width, max_weight)| Container {
                length,
                height,
                width,
                max_weight,
            })
    }

    pub fn volume(&self) -> f64 {
        self.length * self.height * self.width
    }
}

/// Caller-supplied cargo group: a family of identical boxes with a quantity.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct CargoSpec {
    pub name: String,
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub weight: f64,
    pub quantity: u32,
    #[serde(default = "default_stack_limit")]
    pub stack_limit: u32,
    #[serde(default)]
    pub allow_rotate: bool,
}

fn default_stack_limit() -> u32 {
    10
}

impl CargoSpec {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_dimension(self.length, "length")?;
        validate_dimension(self.height, "height")?;
        validate_dimension(self.width, "width")?;
        validate_weight_value(self.weight)?;
        if self.quantity == 0 {
            return Err(ValidationError::InvalidQuantity(format!(
                "quantity must be positive, got: {}",
                self.quantity
            )));
        }
        Ok(())
    }
}

/// Identity under which items count as stackable copies of the same product.
///
/// Derived from `(name, length, height, width)` before any rotation, exactly once
/// during normalization, and carried unchanged on every `Item` and `Placement`.
#[derive(Clone, Debug)]
pub struct FamilyKey(pub(crate) String);

impl FamilyKey {
    pub fn new(name: &str, length: f64, height: f64, width: f64) -> Self {
        FamilyKey(format!("{name}\u{0}{length}\u{0}{height}\u{0}{width}"))
    }
}

impl PartialEq for FamilyKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for FamilyKey {}

impl Hash for FamilyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// The unit the placer moves: possibly aggregated and/or rotated, with the
/// original (pre-aggregation, pre-rotation) dimensions kept for reporting.
#[derive(Clone, Debug)]
pub struct Item {
    pub name: String,
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub weight: f64,
    pub stack_limit: u32,
    pub allow_rotate: bool,
    pub is_agg: bool,
    pub agg_count: u32,
    pub family: FamilyKey,
    pub orig_length: f64,
    pub orig_height: f64,
    pub orig_width: f64,
}

impl Item {
    pub fn volume(&self) -> f64 {
        self.length * self.height * self.width
    }

    /// Rebuilds this item with length and width swapped and rotation disabled
    /// on the resulting view. The original item is left untouched.
    pub fn rotated(&self) -> Item {
        Item {
            length: self.width,
            width: self.length,
            allow_rotate: false,
            ..self.clone()
        }
    }
}

/// A committed placement: an item with its minimum-corner position, effective
/// dimensions, and computed stack-layer index.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Placement {
    pub name: String,
    pub length: f64,
    pub height: f64,
    pub width: f64,
    pub weight: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub is_agg: bool,
    pub agg_count: u32,
    pub stack_layer: u32,
    pub stack_limit: u32,
    pub orig_length: f64,
    pub orig_height: f64,
    pub orig_width: f64,
    #[serde(skip)]
    pub family: FamilyKey,
}

/// An item that could not be placed anywhere in the container, and why.
#[derive(Clone, Debug)]
pub struct Unplaced {
    pub item: Item,
    pub reason: UnplacedReason,
}

/// Why an item could not be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnplacedReason {
    TooHeavyForContainer,
    DimensionsExceedContainer,
    NoStablePosition,
}

impl UnplacedReason {
    pub fn code(&self) -> &'static str {
        match self {
            UnplacedReason::TooHeavyForContainer => "too_heavy_for_container",
            UnplacedReason::DimensionsExceedContainer => "dimensions_exceed_container",
            UnplacedReason::NoStablePosition => "no_stable_position",
        }
    }
}

impl fmt::Display for UnplacedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnplacedReason::TooHeavyForContainer => {
                write!(f, "item exceeds the container's weight capacity")
            }
            UnplacedReason::DimensionsExceedContainer => {
                write!(f, "item does not fit inside the container in any orientation")
            }
            UnplacedReason::NoStablePosition => {
                write!(f, "no stable position found for the item in the container")
            }
        }
    }
}

/// A candidate corner at which the next item's minimum corner may be placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtremePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ExtremePoint {
    pub const ORIGIN: ExtremePoint = ExtremePoint {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}
