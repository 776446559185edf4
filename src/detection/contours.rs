use image::GrayImage;
use imageproc::contours::{find_contours, Contour};

use crate::models::Rectangle;

/// A contour boundary with its enclosed area and axis-aligned bounds.
#[derive(Debug, Clone)]
pub struct Region {
    pub rectangle: Rectangle,
    pub area: f64,
}

/// Extract contour regions from a binary image.
///
/// Uses border following, which yields outer boundaries plus their
/// immediate holes (a two-level hierarchy). Regions are returned in
/// extraction order; callers must treat that order as an implementation
/// detail of the traversal, not a priority.
pub fn extract_regions(binary: &GrayImage) -> Vec<Region> {
    let contours: Vec<Contour<u32>> = find_contours(binary);

    contours
        .iter()
        .filter(|contour| !contour.points.is_empty())
        .map(|contour| Region {
            rectangle: bounding_rectangle(contour),
            area: contour_area(contour),
        })
        .collect()
}

/// Enclosed area of a contour polygon via the shoelace formula.
fn contour_area(contour: &Contour<u32>) -> f64 {
    let points = &contour.points;
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut doubled = 0.0f64;
    for i in 0..n {
        let j = (i + 1) % n;
        let (xi, yi) = (points[i].x as f64, points[i].y as f64);
        let (xj, yj) = (points[j].x as f64, points[j].y as f64);
        doubled += xi * yj - xj * yi;
    }
    doubled.abs() / 2.0
}

/// Axis-aligned bounding rectangle of a contour's points.
fn bounding_rectangle(contour: &Contour<u32>) -> Rectangle {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;

    for point in &contour.points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rectangle::from_bounds(min_x, min_y, max_x, max_y)
}
