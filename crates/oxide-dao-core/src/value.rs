//! SQL values and conversions.
//!
//! Values are always bound as parameters, never interpolated into SQL text.

use crate::geometry::Geometry;

/// An enumerated value: its symbolic name and the integer code stored in
/// the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Variant name, kept for diagnostics.
    pub variant: String,
    /// Integer code bound in its place.
    pub code: i64,
}

/// Implemented by host enums that are persisted as integer codes.
///
/// ```rust
/// use oxide_dao_core::value::{SqlEnum, SqlValue};
///
/// #[derive(Clone, Copy)]
/// enum Status { Active = 1, Retired = 2 }
///
/// impl SqlEnum for Status {
///     fn variant_name(&self) -> &'static str {
///         match self {
///             Self::Active => "Active",
///             Self::Retired => "Retired",
///         }
///     }
///     fn code(&self) -> i64 {
///         *self as i64
///     }
/// }
///
/// let value = SqlValue::enumeration(&Status::Retired);
/// assert_eq!(value.normalized(), SqlValue::Int(2));
/// ```
pub trait SqlEnum {
    /// The variant's symbolic name.
    fn variant_name(&self) -> &'static str;
    /// The integer code persisted for the variant.
    fn code(&self) -> i64;
}

/// A SQL value that can be used as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
    /// Enumerated value, bound as its integer code.
    Enum(EnumValue),
    /// Geometry value, bound as text through the dialect's codec.
    Geometry(Geometry),
}

impl SqlValue {
    /// Creates an enum value from a host enum.
    pub fn enumeration<E: SqlEnum>(value: &E) -> Self {
        Self::Enum(EnumValue {
            variant: String::from(value.variant_name()),
            code: value.code(),
        })
    }

    /// Returns true for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the geometry if this is a geometry value.
    #[must_use]
    pub const fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Self::Geometry(g) => Some(g),
            _ => None,
        }
    }

    /// Replaces enum values with their integer code. Other values are
    /// returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Enum(e) => Self::Int(e.code),
            other => other,
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for i16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u16 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for f32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(f64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for Vec<u8> {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self)
    }
}

impl ToSqlValue for &[u8] {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Blob(self.to_vec())
    }
}

impl ToSqlValue for Geometry {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Geometry(self)
    }
}

impl ToSqlValue for EnumValue {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Enum(self)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Zoning {
        Residential,
        Commercial,
    }

    impl SqlEnum for Zoning {
        fn variant_name(&self) -> &'static str {
            match self {
                Self::Residential => "Residential",
                Self::Commercial => "Commercial",
            }
        }

        fn code(&self) -> i64 {
            match self {
                Self::Residential => 10,
                Self::Commercial => 20,
            }
        }
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(true.to_sql_value(), SqlValue::Bool(true));
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(2.5_f64.to_sql_value(), SqlValue::Float(2.5));
        assert_eq!(
            "hello".to_sql_value(),
            SqlValue::Text(String::from("hello"))
        );
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(42_i32).to_sql_value(), SqlValue::Int(42));
    }

    #[test]
    fn test_enum_value() {
        let value = SqlValue::enumeration(&Zoning::Commercial);
        assert_eq!(
            value,
            SqlValue::Enum(EnumValue {
                variant: String::from("Commercial"),
                code: 20,
            })
        );
        assert_eq!(value.normalized(), SqlValue::Int(20));
        assert_eq!(
            SqlValue::enumeration(&Zoning::Residential).normalized(),
            SqlValue::Int(10)
        );
    }

    #[test]
    fn test_geometry_value() {
        let value = Geometry::point(1.0, 2.0).with_srid(4326).to_sql_value();
        assert_eq!(value.as_geometry().map(|g| g.srid), Some(4326));
        assert!(SqlValue::Null.as_geometry().is_none());
    }
}
