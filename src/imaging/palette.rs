//! Dominant-color extraction for the swatch bar.
//!
//! Layouts treat this as a black box behind [`PaletteExtractor`]. The
//! shipped [`KMeansPalette`] clusters a small downsample of the photo; it is
//! deterministic (quantile seeding, no random restarts) so the same photo
//! always yields the same swatch.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

pub trait PaletteExtractor: Sync {
    /// Return `count` representative colors, most common first.
    fn dominant_colors(&self, image: &RgbImage, count: usize) -> Vec<Rgb<u8>>;
}

/// K-means over a square downsample of the image.
#[derive(Debug, Clone, Copy)]
pub struct KMeansPalette {
    pub sample_edge: u32,
    pub max_iterations: usize,
}

impl Default for KMeansPalette {
    fn default() -> Self {
        Self {
            sample_edge: 64,
            max_iterations: 50,
        }
    }
}

fn luma(p: &[f32; 3]) -> f32 {
    0.299 * p[0] + 0.587 * p[1] + 0.114 * p[2]
}

fn distance_sq(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

fn nearest(centers: &[[f32; 3]], p: &[f32; 3]) -> usize {
    centers
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| distance_sq(a, p).total_cmp(&distance_sq(b, p)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

impl PaletteExtractor for KMeansPalette {
    fn dominant_colors(&self, image: &RgbImage, count: usize) -> Vec<Rgb<u8>> {
        if count == 0 || image.width() == 0 || image.height() == 0 {
            return Vec::new();
        }

        let edge = self.sample_edge.max(1);
        let sample = if image.width() > edge || image.height() > edge {
            imageops::resize(image, edge, edge, FilterType::Triangle)
        } else {
            image.clone()
        };
        let pixels: Vec<[f32; 3]> = sample
            .pixels()
            .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
            .collect();

        // Seed with luminance quantiles so clusters start spread over the tonal range.
        let mut by_luma = pixels.clone();
        by_luma.sort_by(|a, b| luma(a).total_cmp(&luma(b)));
        let mut centers: Vec<[f32; 3]> = (0..count)
            .map(|i| by_luma[((2 * i + 1) * by_luma.len() / (2 * count)).min(by_luma.len() - 1)])
            .collect();
        let mut population = vec![0usize; count];

        for _ in 0..self.max_iterations {
            let mut sums = vec![[0.0f64; 3]; count];
            population.iter_mut().for_each(|n| *n = 0);

            for p in &pixels {
                let k = nearest(&centers, p);
                population[k] += 1;
                for c in 0..3 {
                    sums[k][c] += p[c] as f64;
                }
            }

            let mut shift = 0.0f32;
            for k in 0..count {
                if population[k] == 0 {
                    continue;
                }
                let n = population[k] as f64;
                let updated = [
                    (sums[k][0] / n) as f32,
                    (sums[k][1] / n) as f32,
                    (sums[k][2] / n) as f32,
                ];
                shift = shift.max(distance_sq(&updated, &centers[k]));
                centers[k] = updated;
            }
            if shift < 0.25 {
                break;
            }
        }

        let mut ranked: Vec<(usize, [f32; 3])> = population.into_iter().zip(centers).collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked
            .into_iter()
            .map(|(_, c)| {
                Rgb([
                    c[0].round().clamp(0.0, 255.0) as u8,
                    c[1].round().clamp(0.0, 255.0) as u8,
                    c[2].round().clamp(0.0, 255.0) as u8,
                ])
            })
            .collect()
    }
}
