// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use dwgsim_processing::{
    process_drawing, Drawing, Entity, EntityGeometry, EntitySpace, ProcessingConfig, SpaceKind,
    SplineEntity, SplineScenario,
};

const Z: [f64; 3] = [0.0, 0.0, 1.0];

fn line(start: [f64; 3], end: [f64; 3]) -> Entity {
    Entity::new(0, EntityGeometry::Line { start, end, extrusion: Z })
}

fn polyline(vertices: Vec<[f64; 3]>, bulges: Vec<f64>) -> Entity {
    Entity::new(
        1,
        EntityGeometry::Polyline {
            vertices,
            bulges,
            extrusion: Z,
        },
    )
}

fn drawing() -> Drawing {
    let square = vec![
        [0.0, 0.0, 0.0],
        [10.0, 0.0, 0.0],
        [10.0, 10.0, 0.0],
        [0.0, 10.0, 0.0],
    ];
    let mut reversed = square.clone();
    reversed.reverse();

    let mut closed = SplineEntity::through(vec![
        [0.0, 0.0, 0.0],
        [-50.0, -50.0, 0.0],
        [0.0, -100.0, 0.0],
        [0.0, 0.0, 0.0],
    ]);
    closed.periodic = true;

    let model = EntitySpace::new(SpaceKind::Model, "*Model_Space").with_entities(vec![
        line([0.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
        line([20.0, 0.0, 0.0], [30.0, 0.0, 0.0]),
        polyline(square, vec![0.0; 4]),
        polyline(reversed, vec![0.0; 4]),
        Entity::new(2, EntityGeometry::Spline(closed)),
        line([100.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
        Entity::new(
            3,
            EntityGeometry::Other {
                type_name: "mtext".into(),
            },
        ),
    ]);

    let block = EntitySpace::new(SpaceKind::Block, "bolt").with_entities(vec![
        Entity::new(
            0,
            EntityGeometry::Circle {
                center: [1.0, 1.0, 0.0],
                radius: 0.5,
                extrusion: Z,
            },
        ),
        Entity::new(
            0,
            EntityGeometry::Arc {
                center: [1.0, 1.0, 0.0],
                radius: 0.5,
                start_angle: 0.0,
                end_angle: 1.0,
                extrusion: Z,
            },
        ),
        Entity::new(
            0,
            EntityGeometry::Spline(SplineEntity::through(vec![[2.0, 2.0, 2.0], [2.0, 2.0, 2.0]])),
        ),
    ]);

    Drawing {
        spaces: vec![model, block, EntitySpace::new(SpaceKind::Paper, "Layout1")],
    }
}

#[test]
fn full_pipeline_cleans_and_reforms() {
    let mut drawing = drawing();
    let config = ProcessingConfig {
        delete_level: 2,
        warn_level: 2,
        parallel: false,
        ..ProcessingConfig::default()
    };
    let summary = process_drawing(&mut drawing, &config);

    assert_eq!(summary.spaces.len(), 3);
    assert_eq!(summary.splines_reformed(), 1);
    assert_eq!(summary.splines_failed(), 1);

    let model = &summary.spaces[0];
    assert_eq!(model.entities_before, 7);
    // duplicate line, contained line and reversed polyline
    assert_eq!(model.duplicates.removed, 3);
    assert_eq!(model.entities_after, 4);
    assert_eq!(model.duplicates.precise_groups, 2);

    let block = &summary.spaces[1];
    // circle contains the arc
    assert_eq!(block.duplicates.inclusions, 1);
    assert_eq!(block.duplicates.removed, 1);
    assert!(block.error.is_none());

    let kinds: Vec<&str> = drawing.spaces[0]
        .entities
        .iter()
        .map(|e| e.geometry.type_name())
        .collect();
    assert_eq!(kinds, vec!["line", "polyline", "spline", "mtext"]);

    let EntityGeometry::Spline(spline) = &drawing.spaces[0].entities[2].geometry else {
        panic!("spline expected");
    };
    assert_eq!(spline.scenario, SplineScenario::Control);
    assert_eq!(spline.control_points.len(), 6);
    assert_eq!(spline.knots.len(), 10);

    let EntityGeometry::Spline(failed) = &drawing.spaces[1].entities[1].geometry else {
        panic!("spline expected");
    };
    assert_eq!(failed.scenario, SplineScenario::Fit);
}

#[test]
fn parallel_matches_sequential() {
    let sequential_config = ProcessingConfig {
        delete_level: 2,
        parallel: false,
        ..ProcessingConfig::default()
    };
    let parallel_config = ProcessingConfig {
        parallel: true,
        ..sequential_config
    };

    let mut a = drawing();
    let mut b = drawing();
    let sa = process_drawing(&mut a, &sequential_config);
    let sb = process_drawing(&mut b, &parallel_config);
    assert_eq!(sa, sb);
    assert_eq!(a, b);
}

#[test]
fn level_zero_only_reforms() {
    let mut drawing = drawing();
    let summary = process_drawing(&mut drawing, &ProcessingConfig::default());
    assert_eq!(summary.removed(), 0);
    assert_eq!(summary.precise_groups(), 2);
    assert_eq!(summary.splines_reformed(), 1);
    assert_eq!(drawing.spaces[0].entities.len(), 7);
}

#[test]
fn reforming_can_be_disabled() {
    let mut drawing = drawing();
    let config = ProcessingConfig {
        reform_splines: false,
        ..ProcessingConfig::default()
    };
    let summary = process_drawing(&mut drawing, &config);
    assert_eq!(summary.splines_reformed(), 0);
    assert_eq!(summary.splines_failed(), 0);
}

#[test]
fn drawing_and_summary_round_trip_through_json() {
    let mut drawing = drawing();
    let json = serde_json::to_string(&drawing).unwrap();
    assert!(json.contains(r#""type":"line""#));
    assert!(json.contains(r#""kind":"model""#));
    let back: Drawing = serde_json::from_str(&json).unwrap();
    assert_eq!(back, drawing);

    let summary = process_drawing(&mut drawing, &ProcessingConfig::default());
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["spaces"][0]["name"], "*Model_Space");
    assert_eq!(json["spaces"][1]["splines"]["failed"], 1);
}
