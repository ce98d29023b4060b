use crate::alignment::Strand;
use crate::config::TrackConfig;
use crate::viewer::scale::Scale;

pub type Point = (f64, f64);

/// Outline of a read bar in element-local coordinates (top of the row is `y = 0`).
///
/// The bar spans `[pos, pos + ref_length)` minus `end_gap` pixels on the
/// right, with an arrow notch pointing right for the positive strand and left
/// for the negative strand.
pub fn read_outline(
    scale: &Scale,
    pos: u64,
    ref_length: u64,
    strand: Strand,
    config: &TrackConfig,
) -> Vec<Point> {
    let left = scale.x(pos);
    let right = scale.x(pos + ref_length) - config.end_gap;
    let top = 0.0;
    let bottom = config.read_height;
    let middle = (top + bottom) / 2.0;
    let arrow = config.arrow_width;

    match strand {
        Strand::Positive => vec![
            (left, top),
            (right - arrow, top),
            (right, middle),
            (right - arrow, bottom),
            (left, bottom),
        ],
        Strand::Negative => vec![
            (right, top),
            (left + arrow, top),
            (left, middle),
            (left + arrow, bottom),
            (right, bottom),
        ],
    }
}

/// SVG path data for an open polyline, e.g. `M0,0L10,0L12,6`.
pub fn path_data(points: &[Point]) -> String {
    let mut d = String::with_capacity(points.len() * 12);
    for (i, (x, y)) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format!("{x},{y}"));
    }
    d
}

/// Horizontal extent `(min, max)` of an outline.
pub fn x_extent(points: &[Point]) -> Option<(f64, f64)> {
    points.iter().fold(None, |acc, &(x, _)| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_outline_points_right() {
        let scale = Scale::new(0, 99, 100.0, 0.0);
        let config = TrackConfig::default();
        let points = read_outline(&scale, 10, 30, Strand::Positive, &config);
        assert_eq!(
            points,
            vec![(10.0, 0.0), (29.0, 0.0), (35.0, 6.5), (29.0, 13.0), (10.0, 13.0)]
        );
    }

    #[test]
    fn test_negative_outline_points_left() {
        let scale = Scale::new(0, 99, 100.0, 0.0);
        let config = TrackConfig::default();
        let points = read_outline(&scale, 10, 30, Strand::Negative, &config);
        assert_eq!(
            points,
            vec![(35.0, 0.0), (16.0, 0.0), (10.0, 6.5), (16.0, 13.0), (35.0, 13.0)]
        );
    }

    #[test]
    fn test_path_data() {
        assert_eq!(path_data(&[(0.0, 0.0), (10.5, 0.0), (12.0, 6.5)]), "M0,0L10.5,0L12,6.5");
        assert_eq!(path_data(&[]), "");
    }

    #[test]
    fn test_x_extent() {
        assert_eq!(x_extent(&[(3.0, 0.0), (-1.0, 2.0), (7.0, 1.0)]), Some((-1.0, 7.0)));
        assert_eq!(x_extent(&[]), None);
    }
}
