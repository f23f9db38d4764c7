// argus_core/src/perception/config.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PerceptionError, Result};
use crate::perception::modifiers::bounding_box_occlusion::MAX_POINTS_PER_SIDE;
use crate::perception::modifiers::{
    BoundingBoxOcclusion, DimensionsModifier, DistanceFilter, HeadingModifier, PerceptionModifier,
    PositionModifier, SimpleOcclusion, WallOcclusion,
};

// =========================================================================
// == Perception Configuration ==
// =========================================================================

/// Everything an observer needs to perceive: the viewing cone and the ordered
/// sensor-error stages applied to whatever falls inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerceptionConfig {
    /// Full opening angle in degrees, symmetric about the observer's heading.
    pub viewing_angle: f64,
    /// Metres.
    pub viewing_range: f64,
    /// Applied in the order given.
    #[serde(default)]
    pub modifiers: Vec<ModifierSpec>,
}

impl PerceptionConfig {
    pub fn new(viewing_angle: f64, viewing_range: f64) -> Self {
        Self {
            viewing_angle,
            viewing_range,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<ModifierSpec>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    /// Checks the viewing cone and resolves every modifier stage.
    pub fn validate(&self) -> Result<Vec<ModifierConfig>> {
        if !self.viewing_angle.is_finite() || !(0.0..=360.0).contains(&self.viewing_angle) {
            return Err(PerceptionError::invalid(format!(
                "viewing angle must be within [0, 360] degrees, got {}",
                self.viewing_angle
            )));
        }
        if !self.viewing_range.is_finite() || self.viewing_range < 0.0 {
            return Err(PerceptionError::invalid(format!(
                "viewing range must be a non-negative number of metres, got {}",
                self.viewing_range
            )));
        }
        self.modifiers.iter().map(ModifierConfig::from_spec).collect()
    }
}

// =========================================================================
// == Modifier Configuration ==
// =========================================================================

/// The untyped `{ kind, params... }` form a modifier stage arrives in from
/// configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierSpec {
    pub kind: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, f64>,
}

impl ModifierSpec {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }
}

/// A validated, typed modifier stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModifierConfig {
    /// Drops an object if more than `max_occluders` closer objects sit in a
    /// corridor of `corridor_width` metres along its line of sight.
    SimpleOcclusion {
        corridor_width: f64,
        max_occluders: u32,
    },
    /// Drops objects hidden behind the observer's surrounding walls.
    WallOcclusion,
    /// Drops objects with fewer than `detection_threshold` visible samples on
    /// their observer-facing footprint edges.
    BoundingBoxOcclusion {
        points_per_side: u32,
        detection_threshold: u32,
    },
    /// Drops objects with probability `base + slope * distance / range`.
    DistanceFilter { base: f64, slope: f64 },
    /// Gaussian position error along and across the line of sight.
    PositionModifier {
        longitudinal_std_dev: f64,
        lateral_std_dev: f64,
    },
    /// Gaussian heading error in degrees plus a constant bias.
    HeadingModifier { std_dev: f64, bias: f64 },
    /// Gaussian error on each vehicle dimension.
    DimensionsModifier {
        length_std_dev: f64,
        width_std_dev: f64,
        height_std_dev: f64,
    },
}

impl ModifierConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ModifierConfig::SimpleOcclusion { .. } => "SimpleOcclusion",
            ModifierConfig::WallOcclusion => "WallOcclusion",
            ModifierConfig::BoundingBoxOcclusion { .. } => "BoundingBoxOcclusion",
            ModifierConfig::DistanceFilter { .. } => "DistanceFilter",
            ModifierConfig::PositionModifier { .. } => "PositionModifier",
            ModifierConfig::HeadingModifier { .. } => "HeadingModifier",
            ModifierConfig::DimensionsModifier { .. } => "DimensionsModifier",
        }
    }

    /// Resolves an untyped stage. Unknown kinds, unknown parameter names and
    /// out-of-range values are all configuration errors.
    pub fn from_spec(spec: &ModifierSpec) -> Result<Self> {
        let mut p = Params::new(spec);
        let config = match spec.kind.as_str() {
            "SimpleOcclusion" => ModifierConfig::SimpleOcclusion {
                corridor_width: p.positive("corridor_width", 2.0)?,
                max_occluders: p.count("max_occluders", 0)?,
            },
            "WallOcclusion" => ModifierConfig::WallOcclusion,
            "BoundingBoxOcclusion" => {
                let points_per_side = p.count("points_per_side", 2)?;
                if !(2..=MAX_POINTS_PER_SIDE).contains(&points_per_side) {
                    return Err(PerceptionError::invalid(format!(
                        "BoundingBoxOcclusion.points_per_side must be between 2 and \
                         {MAX_POINTS_PER_SIDE}, got {points_per_side}"
                    )));
                }
                ModifierConfig::BoundingBoxOcclusion {
                    points_per_side,
                    detection_threshold: p.count("detection_threshold", 2)?,
                }
            }
            "DistanceFilter" => ModifierConfig::DistanceFilter {
                base: p.finite("base", 0.0)?,
                slope: p.finite("slope", 1.0)?,
            },
            "PositionModifier" => ModifierConfig::PositionModifier {
                longitudinal_std_dev: p.non_negative("longitudinal_std_dev", 1.0)?,
                lateral_std_dev: p.non_negative("lateral_std_dev", 1.0)?,
            },
            "HeadingModifier" => ModifierConfig::HeadingModifier {
                std_dev: p.non_negative("std_dev", 10.0)?,
                bias: p.finite("bias", 0.0)?,
            },
            "DimensionsModifier" => ModifierConfig::DimensionsModifier {
                length_std_dev: p.non_negative("length_std_dev", 1.0)?,
                width_std_dev: p.non_negative("width_std_dev", 0.0)?,
                height_std_dev: p.non_negative("height_std_dev", 0.0)?,
            },
            other => {
                return Err(PerceptionError::invalid(format!(
                    "unknown modifier kind '{other}'"
                )))
            }
        };
        p.finish()?;
        Ok(config)
    }

    /// Instantiates the stage. Parameters are assumed validated.
    pub fn build(&self) -> Result<Box<dyn PerceptionModifier>> {
        Ok(match *self {
            ModifierConfig::SimpleOcclusion {
                corridor_width,
                max_occluders,
            } => Box::new(SimpleOcclusion::new(corridor_width, max_occluders)),
            ModifierConfig::WallOcclusion => Box::new(WallOcclusion),
            ModifierConfig::BoundingBoxOcclusion {
                points_per_side,
                detection_threshold,
            } => Box::new(BoundingBoxOcclusion::new(points_per_side, detection_threshold)),
            ModifierConfig::DistanceFilter { base, slope } => {
                Box::new(DistanceFilter::new(base, slope))
            }
            ModifierConfig::PositionModifier {
                longitudinal_std_dev,
                lateral_std_dev,
            } => Box::new(PositionModifier::new(longitudinal_std_dev, lateral_std_dev)?),
            ModifierConfig::HeadingModifier { std_dev, bias } => {
                Box::new(HeadingModifier::new(std_dev, bias)?)
            }
            ModifierConfig::DimensionsModifier {
                length_std_dev,
                width_std_dev,
                height_std_dev,
            } => Box::new(DimensionsModifier::new(
                length_std_dev,
                width_std_dev,
                height_std_dev,
            )?),
        })
    }
}

impl From<ModifierConfig> for ModifierSpec {
    fn from(config: ModifierConfig) -> Self {
        let spec = ModifierSpec::new(config.kind());
        match config {
            ModifierConfig::SimpleOcclusion {
                corridor_width,
                max_occluders,
            } => spec
                .with_param("corridor_width", corridor_width)
                .with_param("max_occluders", max_occluders as f64),
            ModifierConfig::WallOcclusion => spec,
            ModifierConfig::BoundingBoxOcclusion {
                points_per_side,
                detection_threshold,
            } => spec
                .with_param("points_per_side", points_per_side as f64)
                .with_param("detection_threshold", detection_threshold as f64),
            ModifierConfig::DistanceFilter { base, slope } => {
                spec.with_param("base", base).with_param("slope", slope)
            }
            ModifierConfig::PositionModifier {
                longitudinal_std_dev,
                lateral_std_dev,
            } => spec
                .with_param("longitudinal_std_dev", longitudinal_std_dev)
                .with_param("lateral_std_dev", lateral_std_dev),
            ModifierConfig::HeadingModifier { std_dev, bias } => {
                spec.with_param("std_dev", std_dev).with_param("bias", bias)
            }
            ModifierConfig::DimensionsModifier {
                length_std_dev,
                width_std_dev,
                height_std_dev,
            } => spec
                .with_param("length_std_dev", length_std_dev)
                .with_param("width_std_dev", width_std_dev)
                .with_param("height_std_dev", height_std_dev),
        }
    }
}

/// Typed access to a spec's parameters that remembers which names were read.
struct Params<'a> {
    spec: &'a ModifierSpec,
    consumed: Vec<&'static str>,
}

impl<'a> Params<'a> {
    fn new(spec: &'a ModifierSpec) -> Self {
        Self {
            spec,
            consumed: Vec::new(),
        }
    }

    fn raw(&mut self, name: &'static str, default: f64) -> f64 {
        self.consumed.push(name);
        self.spec.params.get(name).copied().unwrap_or(default)
    }

    fn error(&self, name: &str, requirement: &str, value: f64) -> PerceptionError {
        PerceptionError::invalid(format!(
            "{}.{name} must be {requirement}, got {value}",
            self.spec.kind
        ))
    }

    fn finite(&mut self, name: &'static str, default: f64) -> Result<f64> {
        let v = self.raw(name, default);
        if v.is_finite() {
            Ok(v)
        } else {
            Err(self.error(name, "a finite number", v))
        }
    }

    fn non_negative(&mut self, name: &'static str, default: f64) -> Result<f64> {
        let v = self.raw(name, default);
        if v.is_finite() && v >= 0.0 {
            Ok(v)
        } else {
            Err(self.error(name, "a non-negative number", v))
        }
    }

    fn positive(&mut self, name: &'static str, default: f64) -> Result<f64> {
        let v = self.raw(name, default);
        if v.is_finite() && v > 0.0 {
            Ok(v)
        } else {
            Err(self.error(name, "a positive number", v))
        }
    }

    fn count(&mut self, name: &'static str, default: u32) -> Result<u32> {
        let v = self.raw(name, default as f64);
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
            Ok(v as u32)
        } else {
            Err(self.error(name, "a non-negative whole number", v))
        }
    }

    fn finish(self) -> Result<()> {
        match self
            .spec
            .params
            .keys()
            .find(|k| !self.consumed.contains(&k.as_str()))
        {
            Some(unknown) => Err(PerceptionError::invalid(format!(
                "unknown parameter '{unknown}' for modifier '{}'",
                self.spec.kind
            ))),
            None => Ok(()),
        }
    }
}
