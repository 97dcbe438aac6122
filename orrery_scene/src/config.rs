// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node configuration records and where they come from.
//!
//! All records use one flat schema: the fields of a rotation (`x`, `y`, `z`, `angle`) sit at
//! the top level of the record, and quaternion nodes add an ordered `rotations` list.

use alloc::boxed::Box;
use alloc::vec::Vec;

use orrery_rotation::AxisAngle;

use crate::data::TraversalData;
use crate::error::ConfigError;

/// Builds a configuration record from traversal data.
///
/// Absent fields take their defaults; present fields of the wrong type are errors.
pub trait FromData: Sized {
    /// Read the record's fields by name.
    fn from_data(data: &TraversalData) -> Result<Self, ConfigError>;
}

/// A function from traversal data to a configuration record, evaluated on every visit.
pub type DynamicConfig<C> = Box<dyn Fn(&TraversalData) -> Result<C, ConfigError>>;

/// Where a transform node gets its configuration.
pub enum ConfigSource<C> {
    /// Applied once at construction; the node may cache across traversals.
    Static(C),
    /// Re-evaluated on every visit; the node never caches its composed transform.
    Dynamic(DynamicConfig<C>),
}

impl<C> ConfigSource<C> {
    /// Wrap a configuration function.
    pub fn dynamic(f: impl Fn(&TraversalData) -> Result<C, ConfigError> + 'static) -> Self {
        Self::Dynamic(Box::new(f))
    }

    /// Whether this is a [`ConfigSource::Static`] source.
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

impl<C: FromData + 'static> ConfigSource<C> {
    /// A dynamic source that reads the record from traversal data by field name.
    pub fn from_data() -> Self {
        Self::dynamic(C::from_data)
    }
}

impl<C: core::fmt::Debug> core::fmt::Debug for ConfigSource<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Static(config) => f.debug_tuple("Static").field(config).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl FromData for AxisAngle {
    fn from_data(data: &TraversalData) -> Result<Self, ConfigError> {
        Ok(Self::new(
            data.number_or("x", 0.0)?,
            data.number_or("y", 0.0)?,
            data.number_or("z", 0.0)?,
            data.number_or("angle", 0.0)?,
        ))
    }
}

/// Configuration of a translate node. Fields default to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TranslateConfig {
    /// Offset along X.
    pub x: f32,
    /// Offset along Y.
    pub y: f32,
    /// Offset along Z.
    pub z: f32,
}

impl FromData for TranslateConfig {
    fn from_data(data: &TraversalData) -> Result<Self, ConfigError> {
        Ok(Self {
            x: data.number_or("x", 0.0)?,
            y: data.number_or("y", 0.0)?,
            z: data.number_or("z", 0.0)?,
        })
    }
}

/// Configuration of a scale node. Fields default to one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScaleConfig {
    /// Factor along X.
    pub x: f32,
    /// Factor along Y.
    pub y: f32,
    /// Factor along Z.
    pub z: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }
}

impl FromData for ScaleConfig {
    fn from_data(data: &TraversalData) -> Result<Self, ConfigError> {
        Ok(Self {
            x: data.number_or("x", 1.0)?,
            y: data.number_or("y", 1.0)?,
            z: data.number_or("z", 1.0)?,
        })
    }
}

/// Configuration of a quaternion node.
///
/// The node starts from the base rotation (`x`, `y`, `z`, `angle`, all defaulting to zero, which
/// is the identity) and then accumulates each entry of `rotations` in order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuaternionConfig {
    /// Base rotation axis X component.
    pub x: f32,
    /// Base rotation axis Y component.
    pub y: f32,
    /// Base rotation axis Z component.
    pub z: f32,
    /// Base rotation angle in degrees.
    pub angle: f32,
    /// Rotations accumulated on top of the base, in order.
    pub rotations: Vec<AxisAngle>,
}

impl QuaternionConfig {
    /// A configuration with only a base rotation.
    pub fn new(base: AxisAngle) -> Self {
        Self {
            x: base.x,
            y: base.y,
            z: base.z,
            angle: base.angle,
            rotations: Vec::new(),
        }
    }

    /// Append a rotation to accumulate after the existing ones.
    pub fn then(mut self, rotation: AxisAngle) -> Self {
        self.rotations.push(rotation);
        self
    }

    /// The base rotation.
    pub fn base(&self) -> AxisAngle {
        AxisAngle::new(self.x, self.y, self.z, self.angle)
    }
}

impl From<AxisAngle> for QuaternionConfig {
    fn from(value: AxisAngle) -> Self {
        Self::new(value)
    }
}

impl FromData for QuaternionConfig {
    fn from_data(data: &TraversalData) -> Result<Self, ConfigError> {
        let base = AxisAngle::from_data(data)?;
        Ok(Self {
            rotations: data.rotations("rotations")?,
            ..Self::new(base)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataScope;
    use alloc::vec;

    #[test]
    fn quaternion_config_reads_flat_fields() {
        let r = AxisAngle::new(1.0, 0.0, 0.0, 20.0);
        let data = TraversalData::from_scope(
            DataScope::new()
                .with("z", 1.0)
                .with("angle", 45.0)
                .with("rotations", vec![r]),
        );
        let config = QuaternionConfig::from_data(&data).unwrap();
        assert_eq!(config.base(), AxisAngle::new(0.0, 0.0, 1.0, 45.0));
        assert_eq!(config.rotations, vec![r]);
    }

    #[test]
    fn missing_fields_default() {
        let data = TraversalData::new();
        assert_eq!(
            QuaternionConfig::from_data(&data),
            Ok(QuaternionConfig::default())
        );
        assert_eq!(ScaleConfig::from_data(&data), Ok(ScaleConfig::default()));
        assert_eq!(
            TranslateConfig::from_data(&data),
            Ok(TranslateConfig::default())
        );
    }

    #[test]
    fn non_numeric_field_is_an_error() {
        let data = TraversalData::from_scope(DataScope::new().with("y", "up"));
        assert!(TranslateConfig::from_data(&data).is_err());
        assert!(AxisAngle::from_data(&data).is_err());
    }

    #[test]
    fn builder_appends_in_order() {
        let a = AxisAngle::new(0.0, 0.0, 1.0, 45.0);
        let b = AxisAngle::new(1.0, 0.0, 0.0, 20.0);
        let config = QuaternionConfig::default().then(a).then(b);
        assert_eq!(config.rotations, vec![a, b]);
        assert!(ConfigSource::Static(config).is_static());
        assert!(!ConfigSource::<QuaternionConfig>::from_data().is_static());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let scale: ScaleConfig = serde_json::from_str(r#"{"y": 2.0}"#).unwrap();
        let expected = ScaleConfig {
            y: 2.0,
            ..ScaleConfig::default()
        };
        assert_eq!(scale, expected);

        let translate: TranslateConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(translate, TranslateConfig::default());

        let json = r#"{"z": 1.0, "angle": 45.0, "rotations": [{"x": 1.0, "angle": 20.0}]}"#;
        let config: QuaternionConfig = serde_json::from_str(json).unwrap();
        let expected = QuaternionConfig::new(AxisAngle::new(0.0, 0.0, 1.0, 45.0))
            .then(AxisAngle::new(1.0, 0.0, 0.0, 20.0));
        assert_eq!(config, expected);

        let round_trip = serde_json::to_string(&config).unwrap();
        assert_eq!(
            serde_json::from_str::<QuaternionConfig>(&round_trip).unwrap(),
            config
        );
    }
}
