// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flatten, plan and cut driven by hand, without the processing pipeline.

use approx::assert_relative_eq;
use tabcut_geometry::{
    flatten, flatten_all, merge_primitives, plan_zones, subtract_zone, BoundingBox, GapPattern,
    Outline, Point2, Polygon2D, Primitive, TabZone,
};

fn square(x: f64, y: f64, size: f64) -> Vec<Point2<f64>> {
    vec![
        Point2::new(x, y),
        Point2::new(x + size, y),
        Point2::new(x + size, y + size),
        Point2::new(x, y + size),
        Point2::new(x, y),
    ]
}

/// Two boards side by side, the first with two holes, plus a loose path
fn sheet() -> Outline {
    let mut board = Polygon2D::with_holes(square(0.0, 0.0, 10.0), vec![square(2.0, 2.0, 2.0)]);
    board.add_hole(square(6.0, 6.0, 2.0));

    Outline::Collection(vec![
        Some(Outline::Polygon(board)),
        None,
        Some(Outline::collection([
            Outline::Polygon(Polygon2D::new(square(12.0, 0.0, 10.0))),
            Outline::path(vec![Point2::new(0.0, -2.0), Point2::new(22.0, -2.0)]),
        ])),
    ])
}

#[test]
fn test_flatten_order_and_associativity() {
    let outline = sheet();
    let flat = flatten(&outline);

    let kinds: Vec<_> = flat.iter().map(|p| p.kind().to_string()).collect();
    assert_eq!(kinds, ["ring", "ring", "ring", "ring", "path"]);

    let Outline::Collection(members) = &outline else {
        unreachable!()
    };
    assert_eq!(flat, flatten_all(members.iter().flatten()));
    assert_eq!(flat, flatten(&Outline::from(flat.clone())));
}

#[test]
fn test_fold_over_zones() {
    let outline = sheet();
    let bbox = outline.bounds().unwrap();
    assert_eq!(bbox, BoundingBox::new(0.0, -2.0, 22.0, 10.0));

    let zones = plan_zones(&bbox, 0.0, 0.5, 0.25, GapPattern::Four).unwrap();
    assert_eq!(zones.len(), 2);

    let mut geometry = outline;
    for zone in &zones {
        let outcome = subtract_zone(&flatten(&geometry), zone);
        assert!(outcome.warnings.is_empty());
        geometry = Outline::from(outcome.primitives);
    }
    let merged = flatten(&merge_primitives(flatten(&geometry)));

    assert!(merged.iter().all(|p| matches!(p, Primitive::Path(_) | Primitive::Ring(_))));
    // The horizontal band at y = 4 crosses both boards; the vertical band at
    // x = 11 falls in the gap between them and only breaks the loose path
    let band = zones[0];
    assert_relative_eq!(band.center().y, 4.0);
    assert_relative_eq!(zones[1].center().x, 11.0);

    // Board one: exterior in two, the lower hole loses its top edge and
    // becomes one path, the upper hole is untouched.
    // Board two: exterior in two. Loose path: in two.
    assert_eq!(merged.len(), 8);
    assert_eq!(
        merged
            .iter()
            .filter(|p| matches!(p, Primitive::Ring(_)))
            .count(),
        1
    );
}

#[test]
fn test_disjoint_zones_leave_geometry_unchanged() {
    let flat = flatten(&sheet());
    let far = [
        TabZone::new(100.0, 100.0, 101.0, 101.0).unwrap(),
        TabZone::new(-50.0, -50.0, -40.0, 50.0).unwrap(),
        TabZone::new(0.0, 30.0, 22.0, 31.0).unwrap(),
    ];
    for zone in &far {
        let outcome = subtract_zone(&flat, zone);
        assert_eq!(outcome.primitives, flat);
        assert!(outcome.warnings.is_empty());
    }
}

#[test]
fn test_zone_covering_everything_removes_everything() {
    let flat = flatten(&sheet());
    let zone = TabZone::new(-1.0, -3.0, 23.0, 11.0).unwrap();
    assert!(subtract_zone(&flat, &zone).primitives.is_empty());
}

#[test]
fn test_rings_stay_rings_when_not_crossed() {
    // Band between the two holes of board one
    let flat = flatten(&sheet());
    let zone = TabZone::new(-1.0, 4.5, 11.0, 5.5).unwrap();
    let outcome = subtract_zone(&flat, &zone);

    let rings: Vec<_> = outcome
        .primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Ring(_)))
        .collect();
    assert_eq!(rings.len(), 3);
}
