//! Typed attribute values.
//!
//! [`Value`] is what an attribute reader hands back. [`FromValue`] pulls a
//! concrete Rust type out of it, reporting a type mismatch instead of panicking.

use crate::util::{Error, Mat4, Result, Vec3};

/// A typed attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    Token(String),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    Vec3Array(Vec<Vec3>),
    Matrix(Mat4),
}

impl Value {
    /// Short name of the held type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Token(_) => "token",
            Self::IntArray(_) => "int[]",
            Self::FloatArray(_) => "float[]",
            Self::Vec3Array(_) => "float3[]",
            Self::Matrix(_) => "matrix4d",
        }
    }

    /// Borrow the token text, if this is a token.
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(t) => Some(t),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(token: &str) -> Self {
        Self::Token(token.to_string())
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Self::IntArray(v)
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Self::FloatArray(v)
    }
}

impl From<Vec<Vec3>> for Value {
    fn from(v: Vec<Vec3>) -> Self {
        Self::Vec3Array(v)
    }
}

impl From<Mat4> for Value {
    fn from(m: Mat4) -> Self {
        Self::Matrix(m)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Conversion out of a [`Value`].
pub trait FromValue: Sized {
    /// Name of the expected type, for diagnostics.
    const TYPE_NAME: &'static str;

    /// Extract `Self`, or `None` on a type mismatch.
    fn from_value(value: Value) -> Option<Self>;

    /// Extract `Self`, reporting a mismatch against `attribute`.
    fn try_from_value(attribute: &str, value: Value) -> Result<Self> {
        let actual = value.type_name();
        Self::from_value(value).ok_or_else(|| Error::TypeMismatch {
            attribute: attribute.to_string(),
            expected: Self::TYPE_NAME.to_string(),
            actual: actual.to_string(),
        })
    }
}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl FromValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(i32, Int, "int");
impl_from_value!(f32, Float, "float");
impl_from_value!(String, Token, "token");
impl_from_value!(Vec<i32>, IntArray, "int[]");
impl_from_value!(Vec<f32>, FloatArray, "float[]");
impl_from_value!(Vec<Vec3>, Vec3Array, "float3[]");
impl_from_value!(Mat4, Matrix, "matrix4d");
