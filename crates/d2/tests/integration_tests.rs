//! Integration tests for u-layering-d2.

use approx::assert_relative_eq;
use u_layering_core::{contains_point, is_closed, is_clockwise, truncate};
use u_layering_d2::{
    resolve_visibility, snap_shared_vertices, split_into_shapes, BasePlateShape, BoundingBox,
    Layering, LayeringConfig, OverlayClipper, RegionAccumulator, Ring, Shape, ShapeInput,
    BASE_COLOR,
};

fn square(x: f64, y: f64, size: f64) -> Ring {
    vec![
        (x, y),
        (x + size, y),
        (x + size, y + size),
        (x, y + size),
        (x, y),
    ]
}

fn colored_square(x: f64, y: f64, size: f64, color: &str) -> Shape {
    Shape::from_contour(square(x, y, size), color)
}

fn total_area<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> f64 {
    shapes.into_iter().map(Shape::area).sum()
}

mod geometry_tests {
    use super::*;

    #[test]
    fn test_truncation_idempotent() {
        for &x in &[0.0, 1.23456789, -7.5551, 1234.56789, 1e-7, -0.0049] {
            for p in 0..6 {
                let once = truncate(x, p);
                assert_eq!(truncate(once, p), once, "x = {}, p = {}", x, p);
            }
        }
    }

    #[test]
    fn test_box_merge_laws() {
        let a = BoundingBox::new(0.0, 0.0, 4.0, 2.0);
        let b = BoundingBox::new(-1.0, 1.0, 3.0, 5.0);

        let mut ab = a;
        ab.merge(&b);
        let mut ba = b;
        ba.merge(&a);
        assert_eq!(ab, ba);

        let mut aa = a;
        aa.merge(&a);
        assert_eq!(aa, a);

        let mut with_invalid = a;
        with_invalid.merge(&BoundingBox::invalid());
        assert_eq!(with_invalid, a);
    }

    #[test]
    fn test_point_box_center() {
        let b = BoundingBox::from_point((3.5, -2.0));
        assert_eq!(b.center(), (3.5, -2.0));
    }

    #[test]
    fn test_reversal_flips_orientation() {
        let rings = vec![
            square(0.0, 0.0, 10.0),
            vec![(0.0, 0.0), (5.0, 8.0), (10.0, 0.0), (0.0, 0.0)],
            vec![
                (1.0, 1.0),
                (4.0, 1.0),
                (4.0, 2.0),
                (2.0, 2.0),
                (2.0, 5.0),
                (1.0, 5.0),
                (1.0, 1.0),
            ],
        ];
        for ring in rings {
            let mut reversed = ring.clone();
            reversed.reverse();
            assert_ne!(is_clockwise(&ring), is_clockwise(&reversed));
        }
    }

    #[test]
    fn test_point_in_ring_even_odd() {
        let ring = square(0.0, 0.0, 10.0);
        assert!(contains_point(&ring, (5.0, 5.0)));
        assert!(!contains_point(&ring, (15.0, 5.0)));
    }
}

mod nesting_tests {
    use super::*;

    #[test]
    fn test_square_with_hole() {
        let a = square(0.0, 0.0, 10.0);
        let b = vec![(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0), (3.0, 3.0)];
        let shapes = split_into_shapes(vec![a.clone(), b.clone()], "c", false);

        assert_eq!(shapes.len(), 1);
        let mut reversed_a = a.clone();
        reversed_a.reverse();
        assert!(*shapes[0].contour() == a || *shapes[0].contour() == reversed_a);

        assert_eq!(shapes[0].holes().len(), 1);
        let mut reversed_b = b.clone();
        reversed_b.reverse();
        let hole = &shapes[0].holes()[0];
        assert!(*hole == b || *hole == reversed_b);
    }

    #[test]
    fn test_concentric_rings_alternate() {
        // 4 nested squares: contour, hole, island, hole
        let rings = vec![
            square(3.0, 3.0, 4.0),
            square(0.0, 0.0, 10.0),
            square(2.0, 2.0, 6.0),
            square(1.0, 1.0, 8.0),
        ];
        let shapes = split_into_shapes(rings, "c", false);
        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().all(|s| s.holes().len() == 1));
        assert_relative_eq!(total_area(&shapes), 100.0 - 64.0 + 36.0 - 16.0, epsilon = 1e-9);
    }
}

mod region_tests {
    use super::*;

    #[test]
    fn test_crop_identical_and_disjoint() {
        let mut region = RegionAccumulator::new();
        let a = colored_square(0.0, 0.0, 10.0, "red");
        region.add(&a, &OverlayClipper).unwrap();

        assert!(region.crop(a.clone(), &OverlayClipper).unwrap().is_empty());

        let far = colored_square(100.0, 100.0, 1.0, "red");
        assert_eq!(
            region.crop(far.clone(), &OverlayClipper).unwrap(),
            vec![far]
        );
    }

    #[test]
    fn test_add_area_accounting() {
        let a = colored_square(0.0, 0.0, 10.0, "red");
        let b = colored_square(20.0, 20.0, 10.0, "red");
        let c = colored_square(5.0, 5.0, 10.0, "red");

        let mut disjoint = RegionAccumulator::new();
        disjoint.add_list(&[a.clone(), b.clone()], &OverlayClipper).unwrap();
        assert_eq!(disjoint.len(), 2);
        assert_relative_eq!(disjoint.area(), a.area() + b.area(), epsilon = 1e-6);

        let mut overlapping = RegionAccumulator::new();
        overlapping.add_list(&[a.clone(), c.clone()], &OverlayClipper).unwrap();
        assert!(overlapping.area() < a.area() + c.area());
    }
}

mod visibility_tests {
    use super::*;

    #[test]
    fn test_blue_over_red() {
        let red = colored_square(0.0, 0.0, 10.0, "red");
        let blue = colored_square(5.0, 5.0, 10.0, "blue");
        let partition = resolve_visibility(vec![red, blue], &OverlayClipper).unwrap();

        let area = |color: &str| total_area(partition.shapes.iter().filter(|s| s.color() == color));
        assert_relative_eq!(area("blue"), 100.0, epsilon = 1e-6);
        assert_relative_eq!(area("red"), 75.0, epsilon = 1e-6);

        // the L-shaped red region has exactly six corners
        let red_shape = partition
            .shapes
            .iter()
            .find(|s| s.color() == "red")
            .unwrap();
        assert_eq!(red_shape.contour().len(), 7);

        assert_relative_eq!(total_area(&partition.silhouette), 175.0, epsilon = 1e-6);

        // silhouette is the union octagon: one closed contour, eight corners
        assert_eq!(partition.silhouette.len(), 1);
        let outline = partition.silhouette[0].contour();
        assert!(partition.silhouette[0].holes().is_empty());
        assert!(is_closed(outline));
        assert_eq!(outline.len(), 9);
        let corners = [
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 5.0),
            (15.0, 5.0),
            (15.0, 15.0),
            (5.0, 15.0),
            (5.0, 10.0),
            (0.0, 10.0),
        ];
        for corner in corners {
            assert!(
                outline
                    .iter()
                    .any(|p| (p.0 - corner.0).abs() < 1e-9 && (p.1 - corner.1).abs() < 1e-9),
                "missing corner {:?}",
                corner
            );
        }
    }

    #[test]
    fn test_stacked_colors_disjoint() {
        let shapes = vec![
            colored_square(0.0, 0.0, 10.0, "a"),
            colored_square(3.0, 3.0, 10.0, "b"),
            colored_square(6.0, 0.0, 10.0, "c"),
            colored_square(1.0, 6.0, 4.0, "a"),
        ];
        let partition = resolve_visibility(shapes, &OverlayClipper).unwrap();
        assert_relative_eq!(
            total_area(&partition.shapes),
            total_area(&partition.silhouette),
            epsilon = 1e-6
        );
        // topmost shape is never occluded
        let a_area = total_area(partition.shapes.iter().filter(|s| s.color() == "a"));
        assert!(a_area >= 16.0 - 1e-6);
    }
}

mod snapping_tests {
    use super::*;

    #[test]
    fn test_shared_vertex_inserted_once() {
        let mut shapes = vec![
            Shape::from_contour(vec![(0.0, 0.0), (10.0, 0.0)], "edge"),
            Shape::from_contour(vec![(5.0, 0.0)], "neighbour"),
        ];
        let mut silhouette = Vec::new();

        snap_shared_vertices(&mut shapes, &mut silhouette, 1e-4);
        assert_eq!(
            *shapes[0].contour(),
            vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]
        );

        let before = shapes.clone();
        assert_eq!(snap_shared_vertices(&mut shapes, &mut silhouette, 1e-4), 0);
        assert_eq!(shapes, before);
    }
}

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_accessors_agree() {
        let result = Layering::default()
            .with_input(ShapeInput::new("red").with_ring(square(0.0, 0.0, 10.0)))
            .with_input(ShapeInput::new("blue").with_ring(square(5.0, 5.0, 10.0)))
            .with_input(ShapeInput::new("red").with_ring(square(30.0, 0.0, 5.0)))
            .run_default()
            .unwrap();

        assert_eq!(result.colors().len(), result.count());
        assert_eq!(result.palette(), vec!["red", "blue"]);
        assert!(!result.silhouette().is_empty());
        assert_relative_eq!(result.bounds().width(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_circular_plate_pipeline() {
        let config = LayeringConfig::new()
            .with_object_width(50.0)
            .with_base_buffer(5.0)
            .with_base_plate(BasePlateShape::Circular)
            .with_ignore_document_margins(true);
        let result = Layering::new(
            vec![ShapeInput::new("logo").with_ring(square(0.0, 0.0, 10.0))],
            config,
        )
        .run_default()
        .unwrap();

        assert!(result.has_base_plate());
        assert_eq!(result.palette(), vec!["logo"]);
        assert_eq!(result.depths().get(BASE_COLOR), Some(&0.0));
        // plate is the widest shape and is rescaled to the width left after the buffer
        assert_relative_eq!(result.bounds().width(), 40.0, epsilon = 1e-6);
        assert_eq!(result.silhouette().len(), 1);
    }

    #[test]
    fn test_silhouette_covers_every_color() {
        let mut layering = Layering::new(
            Vec::new(),
            LayeringConfig::new().with_ignore_document_margins(true),
        );
        for (i, color) in ["a", "b", "c", "d"].iter().enumerate() {
            let offset = i as f64 * 3.0;
            layering.add(ShapeInput::new(*color).with_ring(square(offset, offset, 6.0)));
        }
        let result = layering.run_default().unwrap();

        let colored = total_area(result.shapes());
        let silhouette = total_area(result.silhouette());
        assert_relative_eq!(colored, silhouette, max_relative = 1e-3);
    }

    #[test]
    fn test_open_ring_input() {
        let open = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let skipped = Layering::default()
            .with_input(ShapeInput::new("red").with_ring(open.clone()))
            .run_default()
            .unwrap();
        assert!(skipped.is_empty());

        let forced = Layering::default()
            .with_input(ShapeInput::new("red").with_ring(open).with_open_rings(true))
            .run_default()
            .unwrap();
        assert_eq!(forced.count(), 1);
    }
}

mod stress_tests {
    use super::*;

    #[test]
    fn test_grid_of_overlapping_squares() {
        let colors = ["red", "green", "blue"];
        let inputs: Vec<ShapeInput> = (0..36)
            .map(|i| {
                let x = (i % 6) as f64 * 7.0;
                let y = (i / 6) as f64 * 7.0;
                ShapeInput::new(colors[i % colors.len()]).with_ring(square(x, y, 10.0))
            })
            .collect();
        let result = Layering::new(
            inputs,
            LayeringConfig::new().with_ignore_document_margins(true),
        )
        .run_default()
        .unwrap();

        assert_eq!(result.palette().len(), 3);
        assert_relative_eq!(
            total_area(result.shapes()),
            total_area(result.silhouette()),
            max_relative = 1e-3
        );
    }
}
