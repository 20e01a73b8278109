//! Feature standardization and a small fixed-seed k-means
//!
//! The feature space is tiny (4-dimensional role counts), so this is plain
//! Lloyd's algorithm with k-means++ seeding and a handful of restarts,
//! driven by a caller-supplied RNG seed for reproducible clustering.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-dimension z-score standardization fitted on the training matrix.
#[derive(Debug, Clone)]
pub struct Standardizer {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl Standardizer {
    /// Fit means and standard deviations. Zero-variance dimensions get a
    /// unit scale so they pass through unchanged.
    pub fn fit(data: &[Vec<f64>]) -> Standardizer {
        let dims = data.first().map(|row| row.len()).unwrap_or(0);
        let n = data.len().max(1) as f64;

        let mut means = vec![0.0; dims];
        for row in data {
            for (i, v) in row.iter().enumerate() {
                means[i] += v;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut scales = vec![0.0; dims];
        for row in data {
            for (i, v) in row.iter().enumerate() {
                scales[i] += (v - means[i]).powi(2);
            }
        }
        for scale in &mut scales {
            *scale = (*scale / n).sqrt();
            if *scale == 0.0 {
                *scale = 1.0;
            }
        }

        Standardizer { means, scales }
    }

    pub fn transform(&self, point: &[f64]) -> Vec<f64> {
        point
            .iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(v, (mean, scale))| (v - mean) / scale)
            .collect()
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(centroids: &[Vec<f64>], point: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(centroid, point);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// A fitted k-means model.
#[derive(Debug, Clone)]
pub struct KMeans {
    centroids: Vec<Vec<f64>>,
}

impl KMeans {
    const N_INIT: usize = 10;
    const MAX_ITER: usize = 100;

    /// Fit `k` centroids on `data` with k-means++ seeding, keeping the
    /// best of [`Self::N_INIT`] restarts by inertia. `k` must be between 1
    /// and the sample count; the caller guarantees both.
    pub fn fit(data: &[Vec<f64>], k: usize, seed: u64) -> KMeans {
        debug_assert!(k >= 1 && k <= data.len());
        let mut rng = StdRng::seed_from_u64(seed);

        let (mut best_centroids, mut best_inertia) = Self::run_once(data, k, &mut rng);
        for _ in 1..Self::N_INIT {
            let (centroids, inertia) = Self::run_once(data, k, &mut rng);
            if inertia < best_inertia {
                best_centroids = centroids;
                best_inertia = inertia;
            }
        }

        KMeans {
            centroids: best_centroids,
        }
    }

    fn run_once(data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> (Vec<Vec<f64>>, f64) {
        let mut centroids = Self::plus_plus_init(data, k, rng);
        let mut assignments = vec![0usize; data.len()];

        for _ in 0..Self::MAX_ITER {
            let mut changed = false;
            for (i, point) in data.iter().enumerate() {
                let (cluster, _) = nearest(&centroids, point);
                if assignments[i] != cluster {
                    assignments[i] = cluster;
                    changed = true;
                }
            }

            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Vec<f64>> = data
                    .iter()
                    .zip(assignments.iter())
                    .filter(|(_, a)| **a == cluster)
                    .map(|(point, _)| point)
                    .collect();
                if members.is_empty() {
                    continue; // keep the previous centroid
                }
                for (dim, slot) in centroid.iter_mut().enumerate() {
                    *slot = members.iter().map(|m| m[dim]).sum::<f64>() / members.len() as f64;
                }
            }

            if !changed {
                break;
            }
        }

        let inertia = data
            .iter()
            .map(|point| nearest(&centroids, point).1)
            .sum();
        (centroids, inertia)
    }

    /// k-means++ seeding: later centroids are sampled proportionally to
    /// squared distance from the ones already chosen.
    fn plus_plus_init(data: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
        let mut centroids = Vec::with_capacity(k);
        centroids.push(data[rng.gen_range(0..data.len())].clone());

        while centroids.len() < k {
            let distances: Vec<f64> = data
                .iter()
                .map(|point| nearest(&centroids, point).1)
                .collect();
            let total: f64 = distances.iter().sum();

            let next = if total == 0.0 {
                // All points coincide with a centroid; any choice works.
                rng.gen_range(0..data.len())
            } else {
                let mut target = rng.gen::<f64>() * total;
                let mut chosen = data.len() - 1;
                for (i, d) in distances.iter().enumerate() {
                    target -= d;
                    if target <= 0.0 {
                        chosen = i;
                        break;
                    }
                }
                chosen
            };
            centroids.push(data[next].clone());
        }

        centroids
    }

    /// Index of the nearest centroid.
    pub fn predict(&self, point: &[f64]) -> usize {
        nearest(&self.centroids, point).0
    }

    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }
}
