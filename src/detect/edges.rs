//! Sobel edge map with non-maximum thinning.
//!
//! Thick gradient ramps left by the blur would make every boundary vote
//! several times at slightly different radii. Thinning keeps one pixel
//! across each boundary, so the number of votes a circle collects tracks its
//! circumference rather than the blur width.

use crate::image::PixelBuffer;

/// Edge pixel with its unit gradient direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EdgePoint {
    pub x: u32,
    pub y: u32,
    pub dx: f32,
    pub dy: f32,
}

/// Returns thinned edge pixels whose gradient magnitude exceeds `threshold`.
///
/// Points come out in row-major order. The one-pixel border never produces
/// edges.
pub(crate) fn edge_points(image: PixelBuffer<'_>, threshold: f32) -> Vec<EdgePoint> {
    let width = image.width();
    let height = image.height();
    if width < 3 || height < 3 {
        return Vec::new();
    }

    let data = image.as_slice();
    let px = |x: usize, y: usize| i32::from(data[y * width + x]);

    let mut gx = vec![0.0f32; width * height];
    let mut gy = vec![0.0f32; width * height];
    let mut mag = vec![0.0f32; width * height];
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let sx = (px(x + 1, y - 1) + 2 * px(x + 1, y) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x - 1, y) + px(x - 1, y + 1));
            let sy = (px(x - 1, y + 1) + 2 * px(x, y + 1) + px(x + 1, y + 1))
                - (px(x - 1, y - 1) + 2 * px(x, y - 1) + px(x + 1, y - 1));
            let idx = y * width + x;
            gx[idx] = sx as f32;
            gy[idx] = sy as f32;
            mag[idx] = ((sx * sx + sy * sy) as f32).sqrt();
        }
    }

    let mut points = Vec::new();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y * width + x;
            let m = mag[idx];
            if m <= threshold {
                continue;
            }
            let (ox, oy) = quantized_direction(gx[idx], gy[idx]);
            let ahead = mag[(y as isize + oy) as usize * width + (x as isize + ox) as usize];
            let behind = mag[(y as isize - oy) as usize * width + (x as isize - ox) as usize];
            if m <= ahead || m < behind {
                continue;
            }
            points.push(EdgePoint {
                x: x as u32,
                y: y as u32,
                dx: gx[idx] / m,
                dy: gy[idx] / m,
            });
        }
    }
    points
}

/// Maps a gradient to the nearest of the four neighbour axes.
fn quantized_direction(gx: f32, gy: f32) -> (isize, isize) {
    let mut angle = gy.atan2(gx).to_degrees();
    if angle < 0.0 {
        angle += 180.0;
    }
    if !(22.5..157.5).contains(&angle) {
        (1, 0)
    } else if angle < 67.5 {
        (1, 1)
    } else if angle < 112.5 {
        (0, 1)
    } else {
        (-1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_has_no_edges() {
        let data = vec![200u8; 16 * 16];
        let view = PixelBuffer::from_slice(&data, 16, 16).unwrap();
        assert!(edge_points(view, 50.0).is_empty());
    }

    #[test]
    fn vertical_step_yields_single_column() {
        let width = 20;
        let height = 10;
        let mut data = vec![0u8; width * height];
        for y in 0..height {
            for x in 10..width {
                data[y * width + x] = 200;
            }
        }
        let view = PixelBuffer::from_slice(&data, width, height).unwrap();
        let points = edge_points(view, 50.0);
        assert!(!points.is_empty());
        assert!(points.iter().all(|p| p.x == 10));
        assert_eq!(points.len(), height - 2);
        let p = points[0];
        assert!((p.dx - 1.0).abs() < 1e-6);
        assert!(p.dy.abs() < 1e-6);
    }

    #[test]
    fn diagonal_gradients_pick_diagonal_neighbours() {
        assert_eq!(quantized_direction(1.0, 0.0), (1, 0));
        assert_eq!(quantized_direction(-1.0, 0.0), (1, 0));
        assert_eq!(quantized_direction(1.0, 1.0), (1, 1));
        assert_eq!(quantized_direction(0.0, -1.0), (0, 1));
        assert_eq!(quantized_direction(-1.0, 1.0), (-1, 1));
    }
}
