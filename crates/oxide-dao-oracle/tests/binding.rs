//! Tests for Oracle parameter binding: `:paramN` markers, enum codes,
//! CLOB promotion and count mismatches.

mod common;
use common::*;

use oxide_dao_core::value::EnumValue;
use oxide_dao_core::{
    BindValue, Criteria, DaoError, Expression, ParameterBinder, ParameterKind, PropertyValues,
    QueryBuilder, SqlValue,
};
use oxide_dao_oracle::descriptor::MAX_INLINE_STRING_CHARS;
use pretty_assertions::assert_eq;

#[test]
fn rewrites_question_marks_to_named_parameters() {
    let oracle = oracle();
    let bound = ParameterBinder::new(&oracle)
        .bind(
            "SELECT * FROM TABLE WHERE COL = ? AND COL2 = ?",
            vec![SqlValue::Text("foo".into()), SqlValue::Text("bar".into())],
        )
        .unwrap();
    assert_eq!(
        bound.sql,
        "SELECT * FROM TABLE WHERE COL = :param0 AND COL2 = :param1"
    );
    assert_eq!(bound.parameters.len(), 2);
    assert_eq!(bound.parameters[0].name, "param0");
    assert_eq!(bound.parameters[0].value, BindValue::Text("foo".into()));
    assert_eq!(bound.parameters[1].name, "param1");
    assert_eq!(bound.parameters[1].value, BindValue::Text("bar".into()));
}

#[test]
fn null_and_enum_values() {
    let oracle = oracle();
    let bound = ParameterBinder::new(&oracle)
        .bind(
            "UPDATE T SET A = ?, B = ?",
            vec![
                SqlValue::Null,
                SqlValue::Enum(EnumValue {
                    variant: "Retired".into(),
                    code: 4,
                }),
            ],
        )
        .unwrap();
    assert_eq!(bound.parameters[0].value, BindValue::Null);
    assert_eq!(bound.parameters[1].value, BindValue::Int(4));
}

#[test]
fn long_strings_become_clobs() {
    let oracle = oracle();
    let at_limit = "x".repeat(MAX_INLINE_STRING_CHARS);
    let over_limit = "x".repeat(MAX_INLINE_STRING_CHARS + 1);
    let bound = ParameterBinder::new(&oracle)
        .bind(
            "INSERT INTO NOTES (A, B) VALUES (?, ?)",
            vec![SqlValue::Text(at_limit), SqlValue::Text(over_limit.clone())],
        )
        .unwrap();
    assert_eq!(bound.parameters[0].kind, ParameterKind::Inline);
    assert_eq!(bound.parameters[1].kind, ParameterKind::LargeObject);
    assert_eq!(bound.parameters[1].value, BindValue::Text(over_limit));
}

#[test]
fn more_values_than_placeholders_fails_with_context() {
    let oracle = oracle();
    let err = ParameterBinder::new(&oracle)
        .bind("SELECT * FROM T WHERE A = ?", vec![SqlValue::Int(1), SqlValue::Int(2)])
        .unwrap_err();
    assert!(matches!(err, DaoError::ParameterCountMismatch { placeholders: 1, values: 2, .. }));
    assert!(err.to_string().contains("SELECT * FROM T WHERE A = ?"));
}

#[test]
fn quoted_question_marks_are_not_placeholders() {
    let oracle = oracle();
    let bound = ParameterBinder::new(&oracle)
        .bind("SELECT '?' AS Q FROM DUAL WHERE 1 = ?", vec![SqlValue::Int(1)])
        .unwrap();
    assert_eq!(bound.sql, "SELECT '?' AS Q FROM DUAL WHERE 1 = :param0");
}

#[test]
fn modulus_and_enum_criteria_bind_cleanly() {
    let oracle = oracle();
    let criteria = Criteria::new()
        .filter(Expression::modulus("id", 10, 3))
        .filter(Expression::eq(
            "status",
            EnumValue {
                variant: "Active".into(),
                code: 1,
            },
        ));
    let query = QueryBuilder::new(&oracle)
        .build_count(&parcels(), &criteria)
        .unwrap();
    let bound = ParameterBinder::new(&oracle).bind_query(query).unwrap();
    assert_eq!(
        bound.sql,
        "SELECT COUNT(*) FROM PARCELS \
         WHERE (MOD(PARCELS.PARCEL_ID, :param0) = :param1) \
         AND (PARCELS.STATUS = :param2)"
    );
    let values: Vec<_> = bound.parameters.into_iter().map(|p| p.value).collect();
    assert_eq!(values, [BindValue::Int(10), BindValue::Int(3), BindValue::Int(1)]);
}

#[test]
fn plain_oracle_insert_has_no_geometry_wrapping() {
    let oracle = oracle();
    let values = PropertyValues::new()
        .with("PARCEL_ID", 5)
        .with("STATUS", EnumValue { variant: "Active".into(), code: 1 });
    let query = QueryBuilder::new(&oracle)
        .build_insert(&parcels(), values)
        .unwrap();
    let bound = ParameterBinder::new(&oracle).bind_query(query).unwrap();
    assert_eq!(
        bound.sql,
        "INSERT INTO PARCELS (PARCEL_ID, STATUS) VALUES (:param0, :param1)"
    );
}
