//! Tests for the SDE `ST_Geometry` flavour: projection, spatial
//! predicates, geometry values, the codec quirks and identity values.

mod common;
use common::*;

use oxide_dao_core::geometry::{Coord, Geometry, GeometryCodec, WktWriter};
use oxide_dao_core::{
    BindValue, ColumnKind, Criteria, DaoError, Dialect, Expression, ParameterBinder,
    PropertyValues, QueryBuilder, SequenceResolver, SqlValue,
};
use oxide_dao_oracle::SdeStCodec;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn select_projects_srid_and_text() {
    let sde = sde();
    let query = QueryBuilder::new(&sde)
        .build_select(&parcels(), &Criteria::new())
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT PARCELS.PARCEL_ID \"PARCEL_ID\", PARCELS.STATUS \"STATUS\", \
         SDE.ST_SRID(GEOM) || ':' || SDE.ST_AsText(GEOM) \"GEOM\" FROM PARCELS"
    );
}

#[test]
fn order_by_uses_quoted_projection_alias() {
    let sde = sde();
    let criteria = Criteria::new().order_by("-shape").order_by("id");
    let query = QueryBuilder::new(&sde)
        .build_select(&parcels().aliased("P"), &criteria)
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT P.PARCEL_ID \"PARCEL_ID\", P.STATUS \"STATUS\", \
         SDE.ST_SRID(GEOM) || ':' || SDE.ST_AsText(GEOM) \"GEOM\" FROM PARCELS P \
         ORDER BY \"GEOM\" DESC, \"PARCEL_ID\" ASC"
    );
}

#[test]
fn intersects_binds_literal_as_second_argument() {
    let sde = sde();
    for expr in [
        Expression::intersects("shape", square(4326)),
        Expression::shape_intersects(square(4326), "shape"),
    ] {
        let query = QueryBuilder::new(&sde)
            .build_select(&parcels(), &Criteria::new().filter(expr))
            .unwrap();
        let bound = ParameterBinder::new(&sde).bind_query(query).unwrap();
        assert!(
            bound.sql.ends_with(
                "WHERE (SDE.ST_Intersects(PARCELS.GEOM, SDE.ST_Geometry(:param0, 4326)) = 1)"
            ),
            "{}",
            bound.sql
        );
        assert_eq!(
            bound.parameters[0].value,
            BindValue::Text("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))".into())
        );
    }
}

#[test]
fn multipoint_predicates_use_sde_text() {
    let sde = sde();
    let points = Geometry::multi_point([(0.0, 1.0), (2.0, 3.0)]).with_srid(4326);
    let query = QueryBuilder::new(&sde)
        .build_count(&parcels(), &Criteria::new().filter(Expression::contains("shape", points)))
        .unwrap();
    assert_eq!(
        query.params(),
        [SqlValue::Text("MULTIPOINT (0 1, 2 3)".into())]
    );
}

#[test]
fn distance_predicate() {
    let sde = sde();
    let near =
        Expression::distance_lesser("shape", Geometry::point(5.0, 5.0).with_srid(2272), 100.0);
    let query = QueryBuilder::new(&sde)
        .build_count(&parcels(), &Criteria::new().filter(near.not()))
        .unwrap();
    assert_eq!(
        query.sql(),
        "SELECT COUNT(*) FROM PARCELS \
         WHERE (SDE.ST_Distance(SDE.ST_Geometry(?, 2272), PARCELS.GEOM) >= ?)"
    );
}

#[test]
fn sphere_distance_is_rejected() {
    let sde = sde();
    let criteria = Criteria::new().filter(Expression::sphere_distance_lesser(
        "shape",
        Geometry::point(0.0, 0.0).with_srid(4326),
        10.0,
    ));
    assert!(matches!(
        QueryBuilder::new(&sde).build_select(&parcels(), &criteria),
        Err(DaoError::UnsupportedExpression { expression: "DistanceSphere", .. })
    ));
}

#[test]
fn spatial_predicates_need_the_sde_flavour() {
    let plain = oracle();
    let criteria = Criteria::new().filter(Expression::within("shape", square(4326)));
    assert!(matches!(
        QueryBuilder::new(&plain).build_select(&parcels(), &criteria),
        Err(DaoError::UnsupportedExpression { expression: "Within", .. })
    ));
}

#[test]
fn insert_and_update_wrap_geometry_values() {
    let sde = sde();
    let builder = QueryBuilder::new(&sde);
    let values = PropertyValues::new()
        .with("PARCEL_ID", 9)
        .with("GEOM", Geometry::multi_point([(0.0, 1.0), (2.0, 3.0)]).with_srid(4326));

    let insert = ParameterBinder::new(&sde)
        .bind_query(builder.build_insert(&parcels(), values.clone()).unwrap())
        .unwrap();
    assert_eq!(
        insert.sql,
        "INSERT INTO PARCELS (PARCEL_ID, GEOM) VALUES (:param0, SDE.ST_Geometry(:param1, 4326))"
    );
    assert_eq!(
        insert.parameters[1].value,
        BindValue::Text("MULTIPOINT (0 1, 2 3)".into())
    );

    let update = ParameterBinder::new(&sde)
        .bind_query(
            builder
                .build_update(
                    &parcels(),
                    values,
                    &Criteria::new().filter(Expression::eq("id", 9)),
                )
                .unwrap(),
        )
        .unwrap();
    assert_eq!(
        update.sql,
        "UPDATE PARCELS SET PARCEL_ID = :param0, GEOM = SDE.ST_Geometry(:param1, 4326) \
         WHERE (PARCELS.PARCEL_ID = :param2)"
    );
    assert_eq!(update.parameters[1].value, insert.parameters[1].value);
}

#[test]
fn multipoint_writer_quirk() {
    let g = Geometry::multi_point([(0.0, 1.0), (2.0, 3.0)]);
    assert_eq!(WktWriter::new().write(&g), "MULTIPOINT ((0 1), (2 3))");
    assert_eq!(SdeStCodec.encode(&g), "MULTIPOINT (0 1, 2 3)");
}

#[test]
fn results_decode_through_the_descriptor() {
    let sde = sde();
    let builder = QueryBuilder::new(&sde);
    let polygon = builder
        .coerce_result(
            ColumnKind::Geometry,
            SqlValue::Text("4326:((0 0,1 0,1 1,0 0))".into()),
        )
        .unwrap();
    assert_eq!(
        polygon,
        SqlValue::Geometry(
            Geometry::polygon([vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]])
                .with_srid(4326)
        )
    );
    let empty = builder
        .coerce_result(ColumnKind::Geometry, SqlValue::Text("4326:EMPTY".into()))
        .unwrap();
    assert_eq!(empty, SqlValue::Null);
}

#[test]
fn next_value_for_plain_and_registered_tables() {
    let executor = RecordingExecutor::answering(101);

    let plain = oracle();
    assert_eq!(SequenceResolver::new(&plain).next_value(&executor, "EMP_SEQ").unwrap(), 101);
    assert_eq!(executor.last().sql, "SELECT EMP_SEQ.NEXTVAL FROM DUAL");

    let sde = sde();
    let resolver = SequenceResolver::new(&sde);
    assert_eq!(resolver.next_value(&executor, "GIS.PARCELS").unwrap(), 101);
    let command = executor.last();
    assert_eq!(
        command.sql,
        "SELECT sde.version_user_ddl.next_row_id(:param0, (SELECT registration_id \
         FROM sde.table_registry WHERE table_name = :param1 AND owner = :param2)) FROM DUAL"
    );
    let values: Vec<_> = command.parameters.into_iter().map(|p| p.value).collect();
    assert_eq!(
        values,
        [
            BindValue::Text("GIS".into()),
            BindValue::Text("PARCELS".into()),
            BindValue::Text("GIS".into()),
        ]
    );

    let err = resolver.next_value(&executor, "PARCELS").unwrap_err();
    assert!(matches!(err, DaoError::MalformedSequenceName { ref name, .. } if name == "PARCELS"));
    assert_eq!(executor.commands.lock().unwrap().len(), 2);
}

#[test]
fn existence_checks_strip_owner_and_ignore_case() {
    let executor = RecordingExecutor::answering(0);
    let sde = sde();
    let resolver = SequenceResolver::new(&sde);

    assert!(!resolver.table_exists(&executor, "gis.parcels").unwrap());
    let command = executor.last();
    assert_eq!(command.sql, "SELECT COUNT(*) FROM user_tables WHERE table_name = :param0");
    assert_eq!(command.parameters[0].value, BindValue::Text("PARCELS".into()));

    let executor = RecordingExecutor::answering(1);
    assert!(resolver.sequence_exists(&executor, "emp_seq").unwrap());
    assert_eq!(
        executor.last().sql,
        "SELECT COUNT(*) FROM user_sequences WHERE sequence_name = :param0"
    );
}

#[test]
fn descriptor_never_logs_the_password() {
    let sde = sde();
    assert!(!sde.sanitized_connection_string().contains("secret"));
}

fn arb_coord() -> impl Strategy<Value = Coord> {
    (-1.0e5..1.0e5f64, -1.0e5..1.0e5f64).prop_map(|(x, y)| Coord::new(x, y))
}

fn arb_ring() -> impl Strategy<Value = Vec<Coord>> {
    prop::collection::vec(arb_coord(), 1..5)
}

fn arb_geometry() -> impl Strategy<Value = Geometry> {
    let shape = prop_oneof![
        arb_coord().prop_map(|c| Geometry::point(c.x, c.y)),
        arb_ring().prop_map(Geometry::line_string),
        prop::collection::vec(arb_ring(), 1..3).prop_map(Geometry::polygon),
        arb_ring().prop_map(Geometry::multi_point),
        prop::collection::vec(prop::collection::vec(arb_ring(), 1..3), 1..3)
            .prop_map(Geometry::multi_polygon),
    ];
    (shape, 1..100_000i32).prop_map(|(g, srid)| g.with_srid(srid))
}

/// Drops the keyword `SDE.ST_AsText` omits for these kinds.
fn as_sde_returns_it(token: &str) -> String {
    ["MULTIPOLYGON ", "POLYGON ", "LINESTRING "]
        .iter()
        .fold(token.to_string(), |t, keyword| t.replacen(keyword, "", 1))
}

proptest! {
    #[test]
    fn sde_codec_round_trips(g in arb_geometry()) {
        let token = SdeStCodec.encode_token(&g);
        prop_assert_eq!(SdeStCodec.decode(&token).unwrap(), Some(g.clone()));

        let stripped = as_sde_returns_it(&token);
        prop_assert_eq!(SdeStCodec.decode(&stripped).unwrap(), Some(g));
    }
}
