//! Database-agnostic criteria.
//!
//! Criteria name object attributes, not columns. The query builder maps
//! them through a [`ClassMapping`](crate::mapping::ClassMapping) and the
//! dialect decides how each expression is spelled.
//!
//! ```rust
//! use oxide_dao_core::criteria::{Criteria, Expression};
//! use oxide_dao_core::geometry::Geometry;
//!
//! let area = Geometry::polygon([vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]])
//!     .with_srid(4326);
//!
//! let criteria = Criteria::new()
//!     .filter(Expression::eq("zoning", "R1"))
//!     .filter(Expression::intersects("shape", area))
//!     .order_by("-id");
//! assert_eq!(criteria.expressions().len(), 2);
//! ```

use std::fmt;

use crate::geometry::Geometry;
use crate::value::{SqlValue, ToSqlValue};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
}

impl CompareOp {
    /// Returns the operator matching exactly the rows this one rejects.
    #[must_use]
    pub const fn negate(self) -> Self {
        match self {
            Self::Eq => Self::Ne,
            Self::Ne => Self::Eq,
            Self::Gt => Self::Lte,
            Self::Lte => Self::Gt,
            Self::Lt => Self::Gte,
            Self::Gte => Self::Lt,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "<>"),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
        }
    }
}

/// How the top-level expressions of a [`Criteria`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolOp {
    /// All expressions must hold.
    #[default]
    And,
    /// Any expression may hold.
    Or,
}

impl BoolOp {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// Direction of a distance comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceKind {
    /// Distance is less than the threshold.
    Lesser,
    /// Distance is greater than the threshold.
    Greater,
}

/// A single predicate over mapped attributes.
///
/// Every variant carries a `negated` flag, toggled by [`Expression::not`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `attribute op value`
    Compare {
        attribute: String,
        op: CompareOp,
        value: SqlValue,
        negated: bool,
    },
    /// `attribute BETWEEN low AND high`
    Between {
        attribute: String,
        low: SqlValue,
        high: SqlValue,
        negated: bool,
    },
    /// `attribute IN (values)`
    In {
        attribute: String,
        values: Vec<SqlValue>,
        negated: bool,
    },
    /// `attribute LIKE pattern`
    Like {
        attribute: String,
        pattern: String,
        negated: bool,
    },
    /// `attribute IS NULL`
    IsNull { attribute: String, negated: bool },
    /// `attribute mod divisor = remainder`
    Modulus {
        attribute: String,
        divisor: i64,
        remainder: i64,
        negated: bool,
    },
    /// A nested criteria, with its own AND/OR combinator.
    Group { criteria: Criteria, negated: bool },
    /// The attribute's shape intersects `shape`.
    Intersects {
        attribute: String,
        shape: Geometry,
        negated: bool,
    },
    /// The attribute's shape lies within `shape`.
    Within {
        attribute: String,
        shape: Geometry,
        negated: bool,
    },
    /// The attribute's shape contains `shape`.
    Contains {
        attribute: String,
        shape: Geometry,
        negated: bool,
    },
    /// Planar distance between the attribute's shape and `shape`, compared
    /// against `distance`.
    Distance {
        attribute: String,
        shape: Geometry,
        kind: DistanceKind,
        distance: f64,
        negated: bool,
    },
    /// Great-circle distance comparison.
    DistanceSphere {
        attribute: String,
        shape: Geometry,
        kind: DistanceKind,
        distance: f64,
        negated: bool,
    },
}

impl Expression {
    fn compare<V: ToSqlValue>(attribute: &str, op: CompareOp, value: V) -> Self {
        Self::Compare {
            attribute: attribute.to_string(),
            op,
            value: value.to_sql_value(),
            negated: false,
        }
    }

    /// Creates an equality expression. A `Null` value means IS NULL.
    pub fn eq<V: ToSqlValue>(attribute: &str, value: V) -> Self {
        Self::compare(attribute, CompareOp::Eq, value)
    }

    /// Creates an inequality expression.
    pub fn ne<V: ToSqlValue>(attribute: &str, value: V) -> Self {
        Self::compare(attribute, CompareOp::Ne, value)
    }

    /// Creates a greater-than expression.
    pub fn gt<V: ToSqlValue>(attribute: &str, value: V) -> Self {
        Self::compare(attribute, CompareOp::Gt, value)
    }

    /// Creates a greater-than-or-equal expression.
    pub fn gte<V: ToSqlValue>(attribute: &str, value: V) -> Self {
        Self::compare(attribute, CompareOp::Gte, value)
    }

    /// Creates a less-than expression.
    pub fn lt<V: ToSqlValue>(attribute: &str, value: V) -> Self {
        Self::compare(attribute, CompareOp::Lt, value)
    }

    /// Creates a less-than-or-equal expression.
    pub fn lte<V: ToSqlValue>(attribute: &str, value: V) -> Self {
        Self::compare(attribute, CompareOp::Lte, value)
    }

    /// Creates a BETWEEN expression.
    pub fn between<V: ToSqlValue>(attribute: &str, low: V, high: V) -> Self {
        Self::Between {
            attribute: attribute.to_string(),
            low: low.to_sql_value(),
            high: high.to_sql_value(),
            negated: false,
        }
    }

    /// Creates an IN list expression.
    pub fn in_list<V: ToSqlValue>(attribute: &str, values: Vec<V>) -> Self {
        Self::In {
            attribute: attribute.to_string(),
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
            negated: false,
        }
    }

    /// Creates a LIKE expression. Use `%` for wildcards.
    #[must_use]
    pub fn like(attribute: &str, pattern: &str) -> Self {
        Self::Like {
            attribute: attribute.to_string(),
            pattern: pattern.to_string(),
            negated: false,
        }
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(attribute: &str) -> Self {
        Self::IsNull {
            attribute: attribute.to_string(),
            negated: false,
        }
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(attribute: &str) -> Self {
        Self::is_null(attribute).not()
    }

    /// Creates a modulus expression: `attribute mod divisor = remainder`.
    #[must_use]
    pub fn modulus(attribute: &str, divisor: i64, remainder: i64) -> Self {
        Self::Modulus {
            attribute: attribute.to_string(),
            divisor,
            remainder,
            negated: false,
        }
    }

    /// Wraps a nested criteria.
    #[must_use]
    pub const fn group(criteria: Criteria) -> Self {
        Self::Group {
            criteria,
            negated: false,
        }
    }

    /// Creates an intersects expression.
    #[must_use]
    pub fn intersects(attribute: &str, shape: Geometry) -> Self {
        Self::Intersects {
            attribute: attribute.to_string(),
            shape,
            negated: false,
        }
    }

    /// Creates an intersects expression with the shape named first.
    ///
    /// Intersection is symmetric, so this builds the same expression as
    /// [`Expression::intersects`].
    #[must_use]
    pub fn shape_intersects(shape: Geometry, attribute: &str) -> Self {
        Self::intersects(attribute, shape)
    }

    /// Creates a within expression.
    #[must_use]
    pub fn within(attribute: &str, shape: Geometry) -> Self {
        Self::Within {
            attribute: attribute.to_string(),
            shape,
            negated: false,
        }
    }

    /// Creates a contains expression.
    #[must_use]
    pub fn contains(attribute: &str, shape: Geometry) -> Self {
        Self::Contains {
            attribute: attribute.to_string(),
            shape,
            negated: false,
        }
    }

    /// Distance from `shape` is less than `distance`.
    #[must_use]
    pub fn distance_lesser(attribute: &str, shape: Geometry, distance: f64) -> Self {
        Self::Distance {
            attribute: attribute.to_string(),
            shape,
            kind: DistanceKind::Lesser,
            distance,
            negated: false,
        }
    }

    /// Distance from `shape` is greater than `distance`.
    #[must_use]
    pub fn distance_greater(attribute: &str, shape: Geometry, distance: f64) -> Self {
        Self::Distance {
            attribute: attribute.to_string(),
            shape,
            kind: DistanceKind::Greater,
            distance,
            negated: false,
        }
    }

    /// Great-circle distance from `shape` is less than `distance`.
    #[must_use]
    pub fn sphere_distance_lesser(attribute: &str, shape: Geometry, distance: f64) -> Self {
        Self::DistanceSphere {
            attribute: attribute.to_string(),
            shape,
            kind: DistanceKind::Lesser,
            distance,
            negated: false,
        }
    }

    /// Negates the expression.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        match &mut self {
            Self::Compare { negated, .. }
            | Self::Between { negated, .. }
            | Self::In { negated, .. }
            | Self::Like { negated, .. }
            | Self::IsNull { negated, .. }
            | Self::Modulus { negated, .. }
            | Self::Group { negated, .. }
            | Self::Intersects { negated, .. }
            | Self::Within { negated, .. }
            | Self::Contains { negated, .. }
            | Self::Distance { negated, .. }
            | Self::DistanceSphere { negated, .. } => *negated = !*negated,
        }
        self
    }

    /// Returns the expression type name, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Compare { .. } => "Compare",
            Self::Between { .. } => "Between",
            Self::In { .. } => "In",
            Self::Like { .. } => "Like",
            Self::IsNull { .. } => "IsNull",
            Self::Modulus { .. } => "Modulus",
            Self::Group { .. } => "Group",
            Self::Intersects { .. } => "Intersects",
            Self::Within { .. } => "Within",
            Self::Contains { .. } => "Contains",
            Self::Distance { .. } => "Distance",
            Self::DistanceSphere { .. } => "DistanceSphere",
        }
    }

    /// Returns the target attribute. Groups have none.
    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::Compare { attribute, .. }
            | Self::Between { attribute, .. }
            | Self::In { attribute, .. }
            | Self::Like { attribute, .. }
            | Self::IsNull { attribute, .. }
            | Self::Modulus { attribute, .. }
            | Self::Intersects { attribute, .. }
            | Self::Within { attribute, .. }
            | Self::Contains { attribute, .. }
            | Self::Distance { attribute, .. }
            | Self::DistanceSphere { attribute, .. } => Some(attribute),
            Self::Group { .. } => None,
        }
    }
}

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order (ASC)
    Asc,
    /// Descending order (DESC)
    Desc,
}

/// An ordering specification over an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Attribute to order by.
    pub attribute: String,
    /// Order direction.
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Creates an ascending order specification.
    #[must_use]
    pub fn asc(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            direction: OrderDirection::Asc,
        }
    }

    /// Creates a descending order specification.
    #[must_use]
    pub fn desc(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
            direction: OrderDirection::Desc,
        }
    }

    /// Parses `"name"` as ascending and `"-name"` as descending.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        spec.strip_prefix('-')
            .map_or_else(|| Self::asc(spec), Self::desc)
    }
}

/// An ordered list of expressions plus sort orders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Criteria {
    expressions: Vec<Expression>,
    boolean: BoolOp,
    orders: Vec<OrderBy>,
}

impl Criteria {
    /// Creates criteria whose expressions are ANDed together.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates criteria whose expressions are ORed together.
    #[must_use]
    pub fn any() -> Self {
        Self {
            boolean: BoolOp::Or,
            ..Self::default()
        }
    }

    /// Adds an expression.
    #[must_use]
    pub fn filter(mut self, expression: Expression) -> Self {
        self.expressions.push(expression);
        self
    }

    /// Adds a sort order. Prefix with `-` for descending.
    #[must_use]
    pub fn order_by(mut self, spec: &str) -> Self {
        self.orders.push(OrderBy::parse(spec));
        self
    }

    /// Returns the expressions in order.
    #[must_use]
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// Returns the combinator.
    #[must_use]
    pub const fn boolean(&self) -> BoolOp {
        self.boolean
    }

    /// Returns the sort orders.
    #[must_use]
    pub fn orders(&self) -> &[OrderBy] {
        &self.orders
    }
}
