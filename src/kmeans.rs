//! Weighted k-means over RGB space.
//!
//! Centroids are seeded by sampling input colors uniformly with replacement
//! from the caller's random source, so a fixed seed gives a reproducible run.

use palette::Srgb;
use rand::Rng;
use tracing::{debug, trace};

use crate::convert::{channels, distance, rgb_to_hex, round_rgb};
use crate::error::{PaletteError, Result};
use crate::frequency::WeightedColor;

/// Hard ceiling on assignment/update rounds.
pub const MAX_ITERATIONS: usize = 10;

/// A run stops once no centroid channel moves by this much or more.
pub const CONVERGENCE_THRESHOLD: f64 = 0.1;

/// Outcome of a single k-means run.
#[derive(Clone, Debug)]
pub struct Clustering {
    /// Final centroids in cluster-index order.
    pub centroids: Vec<Srgb<u8>>,
    /// Summed input weight assigned to each cluster in the last round.
    pub memberships: Vec<f64>,
    /// Rounds actually performed, never more than [`MAX_ITERATIONS`].
    pub iterations: usize,
}

impl Clustering {
    pub fn hexes(&self) -> Vec<String> {
        self.centroids.iter().map(|&c| rgb_to_hex(c)).collect()
    }
}

/// Cluster `colors` into `k` groups and return the centroid colors as hex.
pub fn cluster<R: Rng + ?Sized>(
    colors: &[WeightedColor],
    k: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    Ok(cluster_weighted(colors, k, rng)?.hexes())
}

/// Cluster `colors` into `k` groups, keeping per-cluster membership weights.
pub fn cluster_weighted<R: Rng + ?Sized>(
    colors: &[WeightedColor],
    k: usize,
    rng: &mut R,
) -> Result<Clustering> {
    if k == 0 {
        return Err(PaletteError::parameter("color_count", "k-means needs k >= 1"));
    }
    if colors.is_empty() {
        return Err(PaletteError::InsufficientData {
            stage: "k-means clustering",
        });
    }

    let seeds: Vec<[f64; 3]> = (0..k)
        .map(|_| channels(colors[rng.random_range(0..colors.len())].rgb))
        .collect();
    Ok(refine(colors, seeds))
}

/// Lloyd rounds starting from `centroids` until movement drops below
/// [`CONVERGENCE_THRESHOLD`] or [`MAX_ITERATIONS`] is reached.
fn refine(colors: &[WeightedColor], mut centroids: Vec<[f64; 3]>) -> Clustering {
    let k = centroids.len();
    let points: Vec<[f64; 3]> = colors.iter().map(|c| channels(c.rgb)).collect();
    let mut assignments = vec![0usize; points.len()];
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        for (slot, point) in assignments.iter_mut().zip(&points) {
            *slot = nearest(&centroids, *point);
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut totals = vec![0.0f64; k];
        for ((&cluster, point), color) in assignments.iter().zip(&points).zip(colors) {
            for (sum, value) in sums[cluster].iter_mut().zip(point) {
                *sum += value * color.weight;
            }
            totals[cluster] += color.weight;
        }

        // empty clusters keep their previous centroid
        let next: Vec<[f64; 3]> = centroids
            .iter()
            .zip(sums.iter().zip(&totals))
            .map(|(previous, (sum, &total))| {
                if total > 0.0 {
                    sum.map(|s| s / total)
                } else {
                    *previous
                }
            })
            .collect();

        let converged = next.iter().zip(&centroids).all(|(new, old)| {
            new.iter()
                .zip(old)
                .all(|(a, b)| (a - b).abs() < CONVERGENCE_THRESHOLD)
        });
        centroids = next;
        trace!(iteration = iterations, converged, "k-means round");
        if converged {
            break;
        }
    }

    let mut memberships = vec![0.0f64; k];
    for (&cluster, color) in assignments.iter().zip(colors) {
        memberships[cluster] += color.weight;
    }

    debug!(k, colors = colors.len(), iterations, "k-means finished");
    Clustering {
        centroids: centroids.into_iter().map(round_rgb).collect(),
        memberships,
        iterations,
    }
}

/// Index of the closest centroid; the lowest index wins ties.
fn nearest(centroids: &[[f64; 3]], point: [f64; 3]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let d = distance(*centroid, point);
        if d < best_distance {
            best_distance = d;
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn weighted(r: u8, g: u8, b: u8, weight: f64) -> WeightedColor {
        WeightedColor::new(Srgb::new(r, g, b), weight)
    }

    fn spread() -> Vec<WeightedColor> {
        (0..200u32)
            .map(|i| {
                let v = (i * 37 % 256) as u8;
                weighted(v, 255 - v, (i * 13 % 256) as u8, (i % 5 + 1) as f64)
            })
            .collect()
    }

    #[test]
    fn test_single_color_collapses_all_centroids() {
        let colors = vec![weighted(12, 200, 99, 40.0)];
        for k in 1..=6 {
            let mut rng = StdRng::seed_from_u64(k as u64);
            let hexes = cluster(&colors, k, &mut rng).unwrap();
            assert_eq!(hexes.len(), k);
            assert!(hexes.iter().all(|h| h == "#0cc863"));
        }
    }

    #[test]
    fn test_single_cluster_is_weighted_mean() {
        let colors = vec![weighted(0, 0, 0, 3.0), weighted(100, 100, 100, 1.0)];
        let mut rng = StdRng::seed_from_u64(7);
        let result = cluster_weighted(&colors, 1, &mut rng).unwrap();
        assert_eq!(result.hexes(), vec!["#191919"]);
        assert_eq!(result.memberships, vec![4.0]);
    }

    #[test]
    fn test_iteration_ceiling() {
        let colors = spread();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = cluster_weighted(&colors, 8, &mut rng).unwrap();
            assert!(result.iterations >= 1);
            assert!(result.iterations <= MAX_ITERATIONS);
            assert_eq!(result.centroids.len(), 8);
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let colors = spread();
        let first = cluster(&colors, 5, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = cluster(&colors, 5, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_memberships_cover_all_weight() {
        let colors = spread();
        let total: f64 = colors.iter().map(|c| c.weight).sum();
        let result = cluster_weighted(&colors, 4, &mut StdRng::seed_from_u64(3)).unwrap();
        let assigned: f64 = result.memberships.iter().sum();
        assert!((assigned - total).abs() < 1e-9);
    }

    #[test]
    fn test_centroids_stay_inside_input_bounds() {
        let colors = vec![
            weighted(10, 20, 30, 1.0),
            weighted(200, 20, 30, 2.0),
            weighted(10, 220, 90, 1.0),
        ];
        let result = cluster_weighted(&colors, 2, &mut StdRng::seed_from_u64(11)).unwrap();
        for c in result.centroids {
            assert!((10..=200).contains(&c.red));
            assert!((20..=220).contains(&c.green));
            assert!((30..=90).contains(&c.blue));
        }
    }

    #[test]
    fn test_stops_once_centroids_settle() {
        let colors = vec![weighted(0, 0, 0, 1.0), weighted(200, 200, 200, 3.0)];
        // first round pulls each seed onto its color, second round moves nothing
        let result = refine(&colors, vec![[10.0, 10.0, 10.0], [190.0, 190.0, 190.0]]);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.hexes(), vec!["#000000", "#c8c8c8"]);
        assert_eq!(result.memberships, vec![1.0, 3.0]);
    }

    #[test]
    fn test_small_movement_counts_as_converged() {
        let colors = vec![weighted(0, 0, 0, 1.0), weighted(200, 200, 200, 1.0)];
        let result = refine(&colors, vec![[0.05, 0.05, 0.05], [199.95, 200.0, 200.0]]);
        assert_eq!(result.iterations, 1);

        // a move of exactly the threshold still needs another round
        let result = refine(&colors, vec![[0.1, 0.0, 0.0], [200.0, 200.0, 200.0]]);
        assert_eq!(result.iterations, 2);
    }

    #[test]
    fn test_empty_cluster_keeps_its_seed() {
        let colors = vec![weighted(0, 0, 0, 2.0), weighted(200, 200, 200, 1.0)];
        let result = refine(
            &colors,
            vec![[0.0, 0.0, 0.0], [200.0, 200.0, 200.0], [255.0, 0.0, 0.0]],
        );
        assert_eq!(result.hexes(), vec!["#000000", "#c8c8c8", "#ff0000"]);
        assert_eq!(result.memberships, vec![2.0, 1.0, 0.0]);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_empty_input_is_insufficient_data() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            cluster(&[], 3, &mut rng),
            Err(PaletteError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_zero_k_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            cluster(&[weighted(1, 1, 1, 1.0)], 0, &mut rng),
            Err(PaletteError::InvalidParameter { .. })
        ));
    }
}
