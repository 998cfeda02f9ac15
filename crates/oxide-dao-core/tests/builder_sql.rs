//! Tests for statement generation against a spatially enabled dialect:
//! geometry projection, spatial predicate interception, insert/update
//! value placeholders and the bound form of each statement.

mod common;
use common::*;

use oxide_dao_core::geometry::{Geometry, GeometryCodec};
use oxide_dao_core::{
    BindValue, Criteria, DaoError, Dialect, Expression, GenericDialect, ParameterBinder,
    PropertyValues, QueryBuilder, SqlValue,
};
use pretty_assertions::assert_eq;

#[test]
fn select_projects_geometry_as_srid_token() {
    let q = QueryBuilder::new(&SpatialDialect)
        .build_select(&parcels(), &Criteria::new())
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT PARCELS.PARCEL_ID, PARCELS.ZONING, \
         ST_SRID(GEOM) || ':' || ST_AsText(GEOM) AS GEOM FROM PARCELS"
    );
}

#[test]
fn select_projects_geometry_plainly_without_spatial_support() {
    let q = QueryBuilder::new(&GenericDialect)
        .build_select(&parcels(), &Criteria::new())
        .unwrap();
    assert_eq!(
        q.sql(),
        "SELECT PARCELS.PARCEL_ID, PARCELS.ZONING, PARCELS.GEOM FROM PARCELS"
    );
}

#[test]
fn intersects_puts_literal_second() {
    let square = unit_square(4326);
    for expr in [
        Expression::intersects("shape", square.clone()),
        Expression::shape_intersects(square.clone(), "shape"),
    ] {
        let q = QueryBuilder::new(&SpatialDialect)
            .build_count(&parcels(), &Criteria::new().filter(expr))
            .unwrap();
        assert_eq!(
            q.sql(),
            "SELECT COUNT(*) FROM PARCELS \
             WHERE (ST_Intersects(PARCELS.GEOM, ST_GeomFromText(?, 4326)) = 1)"
        );
        assert_eq!(
            q.params(),
            [SqlValue::Text(String::from(
                "POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))"
            ))]
        );
    }
}

#[test]
fn within_contains_and_negation() {
    let criteria = Criteria::new()
        .filter(Expression::within("shape", unit_square(2193)))
        .filter(Expression::contains("shape", Geometry::point(0.5, 0.5).with_srid(2193)).not());
    let q = QueryBuilder::new(&SpatialDialect)
        .build_delete(&parcels(), &criteria)
        .unwrap();
    assert_eq!(
        q.sql(),
        "DELETE FROM PARCELS \
         WHERE (ST_Within(PARCELS.GEOM, ST_GeomFromText(?, 2193)) = 1) \
         AND (ST_Contains(PARCELS.GEOM, ST_GeomFromText(?, 2193)) = 0)"
    );
    assert_eq!(q.params().len(), 2);
}

#[test]
fn distance_negation_flips_comparison() {
    let point = Geometry::point(3.0, 4.0).with_srid(4326);
    let cases = [
        (Expression::distance_lesser("shape", point.clone(), 10.0), "<"),
        (Expression::distance_lesser("shape", point.clone(), 10.0).not(), ">="),
        (Expression::distance_greater("shape", point.clone(), 10.0), ">"),
        (Expression::distance_greater("shape", point.clone(), 10.0).not(), "<="),
    ];
    for (expr, op) in cases {
        let q = QueryBuilder::new(&SpatialDialect)
            .build_count(&parcels(), &Criteria::new().filter(expr))
            .unwrap();
        assert_eq!(
            q.sql(),
            format!(
                "SELECT COUNT(*) FROM PARCELS \
                 WHERE (ST_Distance(ST_GeomFromText(?, 4326), PARCELS.GEOM) {op} ?)"
            )
        );
        assert_eq!(
            q.params(),
            [SqlValue::Text(String::from("POINT (3 4)")), SqlValue::Float(10.0)]
        );
    }
}

#[test]
fn sphere_distance_is_unsupported() {
    let criteria = Criteria::new().filter(Expression::sphere_distance_lesser(
        "shape",
        Geometry::point(0.0, 0.0).with_srid(4326),
        1000.0,
    ));
    let err = QueryBuilder::new(&SpatialDialect)
        .build_select(&parcels(), &criteria)
        .unwrap_err();
    assert!(matches!(
        err,
        DaoError::UnsupportedExpression { expression: "DistanceSphere", ref attribute }
            if attribute == "shape"
    ));
}

#[test]
fn insert_wraps_geometry_placeholders() {
    let builder = QueryBuilder::new(&SpatialDialect);
    let values = PropertyValues::new()
        .with("PARCEL_ID", 12)
        .with("GEOM", Geometry::point(1.0, 2.0).with_srid(4326));

    let placeholders = builder.value_placeholders(&values);
    assert_eq!(
        placeholders,
        [
            (String::from("PARCEL_ID"), String::from("?")),
            (String::from("GEOM"), String::from("ST_GeomFromText(?, 4326)")),
        ]
    );

    let q = builder.build_insert(&parcels(), values).unwrap();
    assert_eq!(
        q.sql(),
        "INSERT INTO PARCELS (PARCEL_ID, GEOM) VALUES (?, ST_GeomFromText(?, 4326))"
    );
    assert_eq!(
        q.params(),
        [SqlValue::Int(12), SqlValue::Text(String::from("POINT (1 2)"))]
    );
}

#[test]
fn update_preprocesses_like_insert() {
    let builder = QueryBuilder::new(&SpatialDialect);
    let values = PropertyValues::new().with("GEOM", unit_square(4326));
    let q = builder
        .build_update(
            &parcels(),
            values,
            &Criteria::new().filter(Expression::eq("id", 12)),
        )
        .unwrap();
    assert_eq!(
        q.sql(),
        "UPDATE PARCELS SET GEOM = ST_GeomFromText(?, 4326) WHERE (PARCELS.PARCEL_ID = ?)"
    );
    assert_eq!(
        q.params()[0],
        SqlValue::Text(String::from("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))"))
    );
}

#[test]
fn bound_select_uses_native_markers() {
    let dialect = SpatialDialect;
    let criteria = Criteria::new()
        .filter(Expression::eq("zoning", "R1"))
        .filter(Expression::intersects("shape", unit_square(4326)))
        .order_by("-id");
    let q = QueryBuilder::new(&dialect)
        .build_select(&parcels(), &criteria)
        .unwrap();
    let bound = ParameterBinder::new(&dialect).bind_query(q).unwrap();
    assert_eq!(
        bound.sql,
        "SELECT PARCELS.PARCEL_ID, PARCELS.ZONING, \
         ST_SRID(GEOM) || ':' || ST_AsText(GEOM) AS GEOM FROM PARCELS \
         WHERE (PARCELS.ZONING = $param0) \
         AND (ST_Intersects(PARCELS.GEOM, ST_GeomFromText($param1, 4326)) = 1) \
         ORDER BY PARCELS.PARCEL_ID DESC"
    );
    assert_eq!(bound.parameters[0].value, BindValue::Text(String::from("R1")));
}

#[test]
fn select_result_round_trips_through_coercion() {
    let builder = QueryBuilder::new(&SpatialDialect);
    let square = unit_square(4326);
    let token = builder.dialect().geometry_codec().encode_token(&square);
    assert_eq!(token, "4326:POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))");
    let coerced = builder
        .coerce_result(
            parcels().kind_of("shape").unwrap(),
            SqlValue::Text(token),
        )
        .unwrap();
    assert_eq!(coerced, SqlValue::Geometry(square));
}

#[test]
fn released_buffers_are_reused() {
    let builder = QueryBuilder::new(&SpatialDialect);
    let q = builder
        .build_select(&parcels(), &Criteria::new())
        .unwrap();
    let first = q.sql().to_string();
    builder.release(q);
    let again = builder
        .build_select(&parcels(), &Criteria::new())
        .unwrap();
    assert_eq!(again.sql(), first);
}

#[test]
fn one_builder_serves_many_threads() {
    let dialect = SpatialDialect;
    let builder = QueryBuilder::new(&dialect);
    let binder = ParameterBinder::new(&dialect);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8_i64)
            .map(|i| {
                let (builder, binder) = (&builder, &binder);
                scope.spawn(move || {
                    let criteria = Criteria::new()
                        .filter(Expression::eq("id", i))
                        .filter(Expression::within("shape", unit_square(4326)));
                    let mut bound = Vec::new();
                    for _ in 0..50 {
                        let q = builder.build_select(&parcels(), &criteria).unwrap();
                        bound.push(binder.bind_query(q).unwrap());
                    }
                    (i, bound)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, bound) in results {
        for command in bound {
            assert_eq!(
                command.sql,
                "SELECT PARCELS.PARCEL_ID, PARCELS.ZONING, \
                 ST_SRID(GEOM) || ':' || ST_AsText(GEOM) AS GEOM FROM PARCELS \
                 WHERE (PARCELS.PARCEL_ID = $param0) \
                 AND (ST_Within(PARCELS.GEOM, ST_GeomFromText($param1, 4326)) = 1)"
            );
            assert_eq!(command.parameters[0].value, BindValue::Int(i));
        }
    }
}
