//! Seeded fractal noise.
//!
//! A 2D lattice noise: the permutation table for a seed hashes integer lattice
//! coordinates to one of four diagonal gradients, corner contributions are blended
//! with the quintic fade `t³(t(6t−15)+10)`. Octave sums normalize by total
//! amplitude, so every sample lies in `[-1, 1]`.
//!
//! Building a table costs a 256-entry shuffle, so tables are memoized per seed in
//! an LRU cache shared by all callers of one [`NoiseField`].

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use tracing::trace;

use crate::constants::{DEFAULT_NOISE_CACHE_CAPACITY, PERMUTATION_SIZE};
use crate::seed::rng_from_seed;

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

/// Shuffled permutation of `0..256`, doubled so lookups never wrap.
#[derive(Clone)]
pub struct PermutationTable {
    perm: [u8; PERMUTATION_SIZE * 2],
}

impl PermutationTable {
    pub fn new(seed: u64) -> Self {
        let mut rng = rng_from_seed(seed);
        let mut base: Vec<u8> = (0..=255u8).collect();
        base.shuffle(&mut rng);

        let mut perm = [0u8; PERMUTATION_SIZE * 2];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = base[i % PERMUTATION_SIZE];
        }
        Self { perm }
    }

    fn hash(&self, xi: usize, yi: usize) -> u8 {
        self.perm[self.perm[xi] as usize + yi]
    }

    /// Single-octave sample in `[-1, 1]`. Non-finite input samples as `0.0`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;
        let u = fade(xf);
        let v = fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let bottom = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let top = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(bottom, top, v).clamp(-1.0, 1.0)
    }
}

/// Lock-free multi-octave sampler holding one table per octave.
#[derive(Clone)]
pub struct Fractal {
    tables: Vec<Arc<PermutationTable>>,
}

impl Fractal {
    pub fn octaves(&self) -> usize {
        self.tables.len()
    }

    pub fn sample(&self, x: f64, y: f64, persistence: f64, lacunarity: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        for table in &self.tables {
            value += table.sample(x * frequency, y * frequency) * amplitude;
            total += f64::abs(amplitude);
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        if total <= f64::EPSILON {
            return 0.0;
        }
        (value / total).clamp(-1.0, 1.0)
    }
}

/// Seeded noise sampler with a per-seed permutation cache.
pub struct NoiseField {
    tables: Mutex<LruCache<u64, Arc<PermutationTable>>>,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_NOISE_CACHE_CAPACITY)
    }
}

impl NoiseField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` tables (zero is treated as one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            tables: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Shared permutation table for `seed`, built on first use
    pub fn table(&self, seed: u64) -> Arc<PermutationTable> {
        let mut cache = self.tables.lock();
        if let Some(table) = cache.get(&seed) {
            return Arc::clone(table);
        }
        let table = Arc::new(PermutationTable::new(seed));
        trace!(seed, cached = cache.len(), "Permutation table built");
        cache.put(seed, Arc::clone(&table));
        table
    }

    pub fn cached_tables(&self) -> usize {
        self.tables.lock().len()
    }

    /// Single-octave noise in `[-1, 1]`
    pub fn sample(&self, x: f64, y: f64, seed: u64) -> f64 {
        self.table(seed).sample(x, y)
    }

    /// Fractal sampler for `octaves` layers; octave `o` uses seed `seed + o`.
    /// Zero octaves behaves as one.
    pub fn fractal(&self, seed: u64, octaves: u32) -> Fractal {
        let tables = (0..octaves.max(1))
            .map(|o| self.table(seed.wrapping_add(u64::from(o))))
            .collect();
        Fractal { tables }
    }

    /// Octave-summed noise in `[-1, 1]`
    pub fn octave_sample(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
        seed: u64,
    ) -> f64 {
        self.fractal(seed, octaves)
            .sample(x, y, persistence, lacunarity)
    }
}
