// Copyright 2025 the Orrery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-render traversal data: scoped key/value lookups for dynamic configuration.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use orrery_rotation::AxisAngle;
use smallvec::SmallVec;

use crate::error::ConfigError;

/// A value stored in a [`DataScope`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A number.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// A string.
    Text(String),
    /// A single rotation.
    Rotation(AxisAngle),
    /// An ordered sequence of rotations.
    Rotations(Vec<AxisAngle>),
}

impl Value {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "a number",
            Self::Bool(_) => "a boolean",
            Self::Text(_) => "text",
            Self::Rotation(_) => "a rotation",
            Self::Rotations(_) => "a rotation sequence",
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<AxisAngle> for Value {
    fn from(value: AxisAngle) -> Self {
        Self::Rotation(value)
    }
}

impl From<Vec<AxisAngle>> for Value {
    fn from(value: Vec<AxisAngle>) -> Self {
        Self::Rotations(value)
    }
}

/// One layer of traversal data.
///
/// Scopes are pushed by the caller of a render pass and by
/// [`NodeKind::Data`](crate::NodeKind::Data) nodes for the duration of their subtree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataScope {
    values: HashMap<String, Value>,
}

impl DataScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Look up a value in this scope only.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the scope has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The stack of [`DataScope`]s visible at the current point of a traversal.
///
/// Lookups search from the innermost scope outwards, so inner scopes shadow outer ones.
#[derive(Clone, Debug, Default)]
pub struct TraversalData {
    scopes: SmallVec<[Rc<DataScope>; 4]>,
}

impl TraversalData {
    /// Create traversal data with no scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create traversal data with a single outermost scope.
    pub fn from_scope(scope: DataScope) -> Self {
        let mut data = Self::new();
        data.push(Rc::new(scope));
        data
    }

    /// Number of scopes currently pushed.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub(crate) fn push(&mut self, scope: Rc<DataScope>) {
        self.scopes.push(scope);
    }

    pub(crate) fn pop(&mut self) -> Option<Rc<DataScope>> {
        self.scopes.pop()
    }

    /// Look up `key`, innermost scope first.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(key))
    }

    /// Look up a number, falling back to `default` when the key is absent.
    pub fn number_or(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Number(n)) => {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Node configuration is single precision, like the matrices it feeds."
                )]
                let n = *n as f32;
                Ok(n)
            }
            Some(other) => Err(wrong_type(key, "a number", other)),
        }
    }

    /// Look up a single rotation.
    pub fn rotation(&self, key: &str) -> Result<Option<AxisAngle>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Rotation(r)) => Ok(Some(*r)),
            Some(other) => Err(wrong_type(key, "a rotation", other)),
        }
    }

    /// Look up a rotation sequence. An absent key is an empty sequence and a single rotation is a
    /// sequence of one.
    pub fn rotations(&self, key: &str) -> Result<Vec<AxisAngle>, ConfigError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Rotations(rs)) => Ok(rs.clone()),
            Some(Value::Rotation(r)) => Ok(vec![*r]),
            Some(other) => Err(wrong_type(key, "a rotation sequence", other)),
        }
    }
}

fn wrong_type(key: &str, expected: &'static str, found: &Value) -> ConfigError {
    ConfigError::WrongType {
        key: key.into(),
        expected,
        found: found.kind(),
    }
}
