//! Polygon boolean operations on shapes.
//!
//! The engine treats the boolean primitive as a black-box service behind the
//! [`PolygonClipper`] trait. [`OverlayClipper`] implements it with `i_overlay`
//! using the even-odd fill rule, so hole orientation never matters and a list
//! of mutually disjoint shapes can be passed as one flat set of contours.
//!
//! Raw results are grouped rings; [`ShapeBooleanExt`] re-classifies them into
//! normalized [`Shape`]s through the nesting classifier.

use crate::nesting::split_groups_into_shapes;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use u_layering_core::{Error, Result, Ring, Shape};

/// Boolean operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Subject ∪ clips.
    Union,
    /// Subject \ clips.
    Difference,
    /// Subject ∩ clips.
    Intersection,
}

/// A polygon boolean-operations primitive over rings-with-holes.
pub trait PolygonClipper {
    /// Applies `op` with `subject` on the left and the union of `clips` on the right.
    ///
    /// Returns zero or more ring groups; each group is a contour followed by
    /// its holes, every ring closed (first vertex repeated at the end).
    fn apply(&self, op: BooleanOp, subject: &Shape, clips: &[&Shape]) -> Result<Vec<Vec<Ring>>>;

    /// Subject ∪ clips.
    fn union(&self, subject: &Shape, clips: &[&Shape]) -> Result<Vec<Vec<Ring>>> {
        self.apply(BooleanOp::Union, subject, clips)
    }

    /// Subject \ clips.
    fn difference(&self, subject: &Shape, clips: &[&Shape]) -> Result<Vec<Vec<Ring>>> {
        self.apply(BooleanOp::Difference, subject, clips)
    }

    /// Subject ∩ clips.
    fn intersection(&self, subject: &Shape, clips: &[&Shape]) -> Result<Vec<Vec<Ring>>> {
        self.apply(BooleanOp::Intersection, subject, clips)
    }
}

/// [`PolygonClipper`] backed by `i_overlay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayClipper;

impl OverlayClipper {
    /// Creates a new clipper.
    pub fn new() -> Self {
        Self
    }
}

impl PolygonClipper for OverlayClipper {
    fn apply(&self, op: BooleanOp, subject: &Shape, clips: &[&Shape]) -> Result<Vec<Vec<Ring>>> {
        ensure_finite(subject)?;
        for clip in clips {
            ensure_finite(clip)?;
        }

        let subj = to_contours(subject);
        let clip: Vec<Vec<[f64; 2]>> = clips.iter().flat_map(|s| to_contours(s)).collect();

        let rule = match op {
            BooleanOp::Union => OverlayRule::Union,
            BooleanOp::Difference => OverlayRule::Difference,
            BooleanOp::Intersection => OverlayRule::Intersect,
        };
        let shapes = subj.overlay(&clip, rule, FillRule::EvenOdd);

        Ok(shapes
            .into_iter()
            .map(|shape| {
                shape
                    .into_iter()
                    .filter(|contour| contour.len() >= 3)
                    .map(close_contour)
                    .collect::<Vec<Ring>>()
            })
            .filter(|group| !group.is_empty())
            .collect())
    }
}

fn ensure_finite(shape: &Shape) -> Result<()> {
    if shape.is_finite() {
        Ok(())
    } else {
        Err(Error::BooleanOp(format!(
            "shape '{}' has non-finite coordinates",
            shape.color()
        )))
    }
}

/// Open contours for the overlay: the closing vertex is dropped and rings
/// with fewer than three distinct vertices are skipped.
fn to_contours(shape: &Shape) -> Vec<Vec<[f64; 2]>> {
    shape
        .rings()
        .filter_map(|ring| {
            let mut contour: Vec<[f64; 2]> = ring.iter().map(|&(x, y)| [x, y]).collect();
            if contour.len() > 1 && contour.first() == contour.last() {
                contour.pop();
            }
            (contour.len() >= 3).then_some(contour)
        })
        .collect()
}

fn close_contour(contour: Vec<[f64; 2]>) -> Ring {
    let mut ring: Ring = contour.into_iter().map(|[x, y]| (x, y)).collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    ring
}

/// Boolean operations on a [`Shape`] producing normalized shapes.
pub trait ShapeBooleanExt {
    /// Union with `others`; result fragments take `color`.
    fn union_with(
        &self,
        others: &[&Shape],
        color: &str,
        clipper: &dyn PolygonClipper,
    ) -> Result<Vec<Shape>>;

    /// Removes `others` from this shape; fragments keep this shape's color.
    fn difference_with(&self, others: &[&Shape], clipper: &dyn PolygonClipper)
        -> Result<Vec<Shape>>;

    /// Keeps the part of this shape covered by `others`; fragments keep this shape's color.
    fn intersection_with(
        &self,
        others: &[&Shape],
        clipper: &dyn PolygonClipper,
    ) -> Result<Vec<Shape>>;
}

impl ShapeBooleanExt for Shape {
    fn union_with(
        &self,
        others: &[&Shape],
        color: &str,
        clipper: &dyn PolygonClipper,
    ) -> Result<Vec<Shape>> {
        let groups = clipper.union(self, others)?;
        Ok(split_groups_into_shapes(groups, color, true))
    }

    fn difference_with(
        &self,
        others: &[&Shape],
        clipper: &dyn PolygonClipper,
    ) -> Result<Vec<Shape>> {
        let groups = clipper.difference(self, others)?;
        Ok(split_groups_into_shapes(groups, self.color(), true))
    }

    fn intersection_with(
        &self,
        others: &[&Shape],
        clipper: &dyn PolygonClipper,
    ) -> Result<Vec<Shape>> {
        let groups = clipper.intersection(self, others)?;
        Ok(split_groups_into_shapes(groups, self.color(), true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use u_layering_core::is_closed;

    fn square(x: f64, y: f64, size: f64, color: &str) -> Shape {
        Shape::from_contour(
            vec![
                (x, y),
                (x + size, y),
                (x + size, y + size),
                (x, y + size),
                (x, y),
            ],
            color,
        )
    }

    fn total_area(shapes: &[Shape]) -> f64 {
        shapes.iter().map(Shape::area).sum()
    }

    #[test]
    fn test_union_overlapping() {
        let a = square(0.0, 0.0, 10.0, "red");
        let b = square(5.0, 5.0, 10.0, "red");
        let result = a.union_with(&[&b], "red", &OverlayClipper).unwrap();
        assert_eq!(result.len(), 1);
        assert_relative_eq!(total_area(&result), 175.0, epsilon = 1e-6);
        assert!(result.iter().all(|s| s.color() == "red"));
    }

    #[test]
    fn test_union_disjoint() {
        let a = square(0.0, 0.0, 10.0, "red");
        let b = square(20.0, 0.0, 10.0, "red");
        let result = a.union_with(&[&b], "red", &OverlayClipper).unwrap();
        assert_eq!(result.len(), 2);
        assert_relative_eq!(total_area(&result), 200.0, epsilon = 1e-6);
    }

    #[test]
    fn test_difference_fully_covered() {
        let a = square(0.0, 0.0, 10.0, "red");
        let result = a.difference_with(&[&a.clone()], &OverlayClipper).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_difference_creates_hole() {
        let outer = square(0.0, 0.0, 10.0, "red");
        let inner = square(3.0, 3.0, 4.0, "blue");
        let result = outer.difference_with(&[&inner], &OverlayClipper).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].holes().len(), 1);
        assert_eq!(result[0].color(), "red");
        assert_relative_eq!(result[0].area(), 84.0, epsilon = 1e-6);
    }

    #[test]
    fn test_intersection() {
        let a = square(0.0, 0.0, 10.0, "red");
        let b = square(5.0, 5.0, 10.0, "blue");
        let result = a.intersection_with(&[&b], &OverlayClipper).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].color(), "red");
        assert_relative_eq!(result[0].area(), 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_raw_groups_are_closed() {
        let a = square(0.0, 0.0, 10.0, "red");
        let b = square(5.0, 5.0, 10.0, "red");
        let groups = OverlayClipper.union(&a, &[&b]).unwrap();
        assert!(groups.iter().flatten().all(|ring| is_closed(ring)));
    }

    #[test]
    fn test_non_finite_input_is_error() {
        let a = square(0.0, 0.0, 10.0, "red");
        let bad = Shape::from_contour(
            vec![(0.0, 0.0), (f64::INFINITY, 0.0), (1.0, 1.0), (0.0, 0.0)],
            "bad",
        );
        assert!(matches!(
            OverlayClipper.union(&a, &[&bad]),
            Err(Error::BooleanOp(_))
        ));
    }
}
