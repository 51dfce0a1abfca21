use image::GrayImage;

use crate::error::{ScoreError, ScoreResult};

/// Mean structural similarity of two equally sized grayscale images.
///
/// Uses a uniform square window, sample (N-1) covariance and averages the
/// per-window index over every position where the window lies fully inside
/// the image.
#[derive(Debug, Clone, Copy)]
pub struct Ssim {
    pub window: usize,
    pub k1: f64,
    pub k2: f64,
}

impl Default for Ssim {
    fn default() -> Self {
        Self {
            window: 7,
            k1: 0.01,
            k2: 0.03,
        }
    }
}

/// Summed-area table with a zero row and column in front.
struct Integral {
    stride: usize,
    sums: Vec<f64>,
}

impl Integral {
    fn build(width: usize, height: usize, value: impl Fn(usize, usize) -> f64) -> Self {
        let stride = width + 1;
        let mut sums = vec![0.0; stride * (height + 1)];
        for y in 0..height {
            let mut row = 0.0;
            for x in 0..width {
                row += value(x, y);
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        Self { stride, sums }
    }

    fn window_sum(&self, x: usize, y: usize, size: usize) -> f64 {
        let s = self.stride;
        let (x1, y1) = (x + size, y + size);
        self.sums[y1 * s + x1] - self.sums[y * s + x1] - self.sums[y1 * s + x] + self.sums[y * s + x]
    }
}

impl Ssim {
    /// `data_range` is clamped to at least 1.0 when it is zero, so a pair of
    /// identical flat images scores 1.0 instead of NaN.
    pub fn compare(&self, x: &GrayImage, y: &GrayImage, data_range: f64) -> ScoreResult<f64> {
        if x.dimensions() != y.dimensions() {
            return Err(ScoreError::DimensionMismatch {
                left: x.dimensions(),
                right: y.dimensions(),
            });
        }

        let (width, height) = x.dimensions();
        let (w, h) = (width as usize, height as usize);
        let win = self.window;
        if w < win || h < win {
            return Err(ScoreError::ImageTooSmall {
                width,
                height,
                window: win,
            });
        }

        let data_range = if data_range > 0.0 { data_range } else { 1.0 };
        let c1 = (self.k1 * data_range).powi(2);
        let c2 = (self.k2 * data_range).powi(2);

        let px = |img: &GrayImage, i: usize, j: usize| img.get_pixel(i as u32, j as u32).0[0] as f64;
        let sx = Integral::build(w, h, |i, j| px(x, i, j));
        let sy = Integral::build(w, h, |i, j| px(y, i, j));
        let sxx = Integral::build(w, h, |i, j| px(x, i, j).powi(2));
        let syy = Integral::build(w, h, |i, j| px(y, i, j).powi(2));
        let sxy = Integral::build(w, h, |i, j| px(x, i, j) * px(y, i, j));

        let n = (win * win) as f64;
        let cov_norm = n / (n - 1.0);

        let mut total = 0.0;
        let mut count = 0usize;
        for j in 0..=(h - win) {
            for i in 0..=(w - win) {
                let ux = sx.window_sum(i, j, win) / n;
                let uy = sy.window_sum(i, j, win) / n;
                let vx = cov_norm * (sxx.window_sum(i, j, win) / n - ux * ux);
                let vy = cov_norm * (syy.window_sum(i, j, win) / n - uy * uy);
                let vxy = cov_norm * (sxy.window_sum(i, j, win) / n - ux * uy);

                let numerator = (2.0 * ux * uy + c1) * (2.0 * vxy + c2);
                let denominator = (ux * ux + uy * uy + c1) * (vx + vy + c2);
                total += numerator / denominator;
                count += 1;
            }
        }

        let mean = total / count as f64;
        if !mean.is_finite() {
            return Err(ScoreError::NonFinite);
        }
        Ok(mean)
    }
}

/// `max - min` of the pixel values.
pub fn dynamic_range(image: &GrayImage) -> f64 {
    let (min, max) = image
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    if min > max {
        return 0.0;
    }
    (max - min) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn gradient(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]))
    }

    #[test]
    fn test_identical_images_score_one() {
        let img = gradient(16, 12);
        let score = Ssim::default().compare(&img, &img, dynamic_range(&img)).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_identical_images_score_one() {
        let img = GrayImage::from_pixel(10, 10, Luma([128]));
        let score = Ssim::default().compare(&img, &img, dynamic_range(&img)).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_image_scores_low() {
        let img = gradient(20, 20);
        let inverted = GrayImage::from_fn(20, 20, |x, y| Luma([255 - img.get_pixel(x, y).0[0]]));
        let score = Ssim::default().compare(&img, &inverted, dynamic_range(&img)).unwrap();
        assert!(score < 0.0);
    }

    #[test]
    fn test_too_small_rejected() {
        let img = gradient(6, 30);
        let err = Ssim::default().compare(&img, &img, 255.0).unwrap_err();
        assert!(matches!(err, ScoreError::ImageTooSmall { width: 6, .. }));
    }

    #[test]
    fn test_window_sum_matches_direct_sum() {
        let integral = Integral::build(4, 3, |x, y| (x + 10 * y) as f64);
        // rows 1..3, cols 1..3
        let expected = (11 + 12 + 21 + 22) as f64;
        assert_eq!(integral.window_sum(1, 1, 2), expected);
    }
}
