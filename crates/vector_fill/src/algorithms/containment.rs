use crate::raster::PixelPos;

/// Even-odd point-in-polygon test over a closed pixel contour.
///
/// Edges join consecutive points, including the last back to the first. A
/// ray is cast towards +x and each edge straddling the ray's row toggles the
/// result. Edges are half-open in y, so points on the left or top boundary
/// count as inside and points on the right or bottom boundary as outside.
pub fn point_in_contour(points: &[PixelPos], p: PixelPos) -> bool {
    if points.len() < 3 {
        return false;
    }

    let (px, py) = (p.x as f64, p.y as f64);
    let mut inside = false;
    let mut j = points.len() - 1;
    for (i, a) in points.iter().enumerate() {
        let b = points[j];
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);
        if (ay > py) != (by > py) {
            let crossing = ax + (py - ay) * (bx - ax) / (by - ay);
            if px < crossing {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
