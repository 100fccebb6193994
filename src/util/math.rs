//! Small numeric helpers shared by the distance metrics.

/// Arithmetic mean, or `None` for an empty input.
pub(crate) fn mean(sum: f64, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Length of the diagonal of a `width x height` rectangle.
pub(crate) fn diagonal(width: usize, height: usize) -> f64 {
    (width as f64).hypot(height as f64)
}

/// Radius in cells covered by `fraction` of `extent`, rounded down.
pub(crate) fn window_radius(fraction: f64, extent: usize) -> usize {
    (fraction * extent as f64).floor() as usize
}
