//! # Simplex Noise Implementation
//!
//! Deterministic coherent noise driving height, surface, cave and ore fields.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation will produce
//! **exactly** the same values on any platform, any time. There is no
//! process-global random state: two worlds with the same seed can be
//! generated side by side.
//!
//! ## Contract
//!
//! Non-finite coordinates or parameters are a caller bug. The sampler
//! panics on them instead of returning garbage.

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkCoord;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., cave generation).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Derives the seed of a chunk's private random stream.
    #[must_use]
    pub const fn for_chunk(self, coord: ChunkCoord, purpose: u64) -> Self {
        // Pack both signed coordinates into one u64 before mixing.
        let packed = ((coord.x as u32 as u64) << 32) | (coord.z as u32 as u64);
        self.derive(purpose).derive(packed)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

/// Pre-computed permutation table for noise.
///
/// This is computed once from the seed and reused.
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
}

/// The 12 cube-edge gradients. 2-D sampling uses the first two components.
const GRADIENTS: [[i8; 3]; 12] = [
    [1, 1, 0], [-1, 1, 0], [1, -1, 0], [-1, -1, 0],
    [1, 0, 1], [-1, 0, 1], [1, 0, -1], [-1, 0, -1],
    [0, 1, 1], [0, -1, 1], [0, 1, -1], [0, -1, -1],
];

impl PermutationTable {
    /// Creates a new permutation table from a seed.
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];

        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates shuffle driven by xorshift64.
        // xorshift has a fixed point at zero.
        let mut rng_state = match seed.value() {
            0 => 0x9E37_79B9_7F4A_7C15,
            value => value,
        };
        for i in (1..256).rev() {
            rng_state ^= rng_state << 13;
            rng_state ^= rng_state >> 7;
            rng_state ^= rng_state << 17;

            let j = (rng_state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        Self { perm }
    }

    /// Gets a permutation value (with automatic wrapping).
    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index & 511])
    }
}

/// Simplex noise generator in two and three dimensions.
///
/// Produces smooth, continuous noise values in the range [-1, 1].
///
/// # Example
///
/// ```rust
/// use strata_world::noise::{SimplexNoise, WorldSeed};
///
/// let noise = SimplexNoise::new(WorldSeed::new(42));
/// let value = noise.sample(100.5, 200.3);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
pub struct SimplexNoise {
    /// The permutation table.
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6
    /// Skewing factor for 3D simplex grid.
    const F3: f64 = 1.0 / 3.0;
    /// Unskewing factor for 3D simplex grid.
    const G3: f64 = 1.0 / 6.0;

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = (i + j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        // Upper or lower triangle
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1 as u8) + Self::G2;
        let y1 = y0 - f64::from(j1 as u8) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let p = &self.perm_table;

        let gi0 = p.get(ii + p.get(jj)) % 12;
        let gi1 = p.get(ii + i1 + p.get(jj + j1)) % 12;
        let gi2 = p.get(ii + 1 + p.get(jj + 1)) % 12;

        let n0 = corner2(x0, y0, gi0);
        let n1 = corner2(x1, y1, gi1);
        let n2 = corner2(x2, y2, gi2);

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Samples 3D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        let skew = (x + y + z) * Self::F3;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);
        let k = fast_floor(z + skew);

        let unskew = (i + j + k) as f64 * Self::G3;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);
        let z0 = z - (k as f64 - unskew);

        // Which of the six tetrahedra we are in.
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - f64::from(i1 as u8) + Self::G3;
        let y1 = y0 - f64::from(j1 as u8) + Self::G3;
        let z1 = z0 - f64::from(k1 as u8) + Self::G3;
        let x2 = x0 - f64::from(i2 as u8) + 2.0 * Self::G3;
        let y2 = y0 - f64::from(j2 as u8) + 2.0 * Self::G3;
        let z2 = z0 - f64::from(k2 as u8) + 2.0 * Self::G3;
        let x3 = x0 - 1.0 + 3.0 * Self::G3;
        let y3 = y0 - 1.0 + 3.0 * Self::G3;
        let z3 = z0 - 1.0 + 3.0 * Self::G3;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let kk = (k & 255) as usize;
        let p = &self.perm_table;

        let gi0 = p.get(ii + p.get(jj + p.get(kk))) % 12;
        let gi1 = p.get(ii + i1 + p.get(jj + j1 + p.get(kk + k1))) % 12;
        let gi2 = p.get(ii + i2 + p.get(jj + j2 + p.get(kk + k2))) % 12;
        let gi3 = p.get(ii + 1 + p.get(jj + 1 + p.get(kk + 1))) % 12;

        let n0 = corner3(x0, y0, z0, gi0);
        let n1 = corner3(x1, y1, z1, gi1);
        let n2 = corner3(x2, y2, z2, gi2);
        let n3 = corner3(x3, y3, z3, gi3);

        (32.0 * (n0 + n1 + n2 + n3)).clamp(-1.0, 1.0)
    }

    /// Generates octaved (fractal) 2D noise.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Coordinates
    /// * `octaves` - Number of noise layers (typically 3-8)
    /// * `persistence` - Amplitude decay per octave (typically 0.5)
    /// * `lacunarity` - Frequency increase per octave (typically 2.0)
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn octaved(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        fractal(octaves, persistence, lacunarity, |f| self.sample(x * f, y * f))
    }

    /// Generates octaved (fractal) 3D noise. See [`Self::octaved`].
    #[must_use]
    pub fn octaved3(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        fractal(octaves, persistence, lacunarity, |f| {
            self.sample3(x * f, y * f, z * f)
        })
    }
}

/// Sums `octaves` layers of `layer(frequency)` and normalizes by total amplitude.
fn fractal(octaves: u32, persistence: f64, lacunarity: f64, layer: impl Fn(f64) -> f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_amplitude = 0.0;

    for _ in 0..octaves {
        total += layer(frequency) * amplitude;
        max_amplitude += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_amplitude
}

/// Contribution from one corner of a 2D simplex.
#[inline]
fn corner2(x: f64, y: f64, gradient: usize) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let g = GRADIENTS[gradient];
        let t2 = t * t;
        t2 * t2 * (x * f64::from(g[0]) + y * f64::from(g[1]))
    }
}

/// Contribution from one corner of a 3D simplex.
#[inline]
fn corner3(x: f64, y: f64, z: f64, gradient: usize) -> f64 {
    let t = 0.6 - x * x - y * y - z * z;
    if t < 0.0 {
        0.0
    } else {
        let g = GRADIENTS[gradient];
        let t2 = t * t;
        t2 * t2 * (x * f64::from(g[0]) + y * f64::from(g[1]) + z * f64::from(g[2]))
    }
}

/// Fast floor function. Lattice math runs in `i64` so block coordinates
/// near the edge of the `i32` range stay in bounds after scaling.
#[inline]
fn fast_floor(x: f64) -> i64 {
    let xi = x as i64;
    if x < xi as f64 { xi - 1 } else { xi }
}

/// The scalar fields the terrain generator consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseKind {
    /// 2-D column height field.
    Height,
    /// 2-D grass-versus-sand field.
    Surface,
    /// 3-D cave carving field.
    Cave,
    /// 3-D ore placement field.
    Ore,
}

impl NoiseKind {
    /// All kinds, in sub-seed order.
    pub const ALL: [Self; 4] = [Self::Height, Self::Surface, Self::Cave, Self::Ore];

    /// Whether the field varies with Y.
    #[must_use]
    pub const fn is_volumetric(self) -> bool {
        matches!(self, Self::Cave | Self::Ore)
    }

    const fn purpose(self) -> u64 {
        match self {
            Self::Height => 100,
            Self::Surface => 101,
            Self::Cave => 102,
            Self::Ore => 103,
        }
    }
}

/// Sampling parameters for one noise field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Divisors applied to world X, Y, Z before sampling (`x / scale[0]`).
    pub scale: [f64; 3],
    /// Number of octaves.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
}

impl NoiseParams {
    /// Creates parameters with the conventional 0.5 persistence / 2.0 lacunarity.
    #[must_use]
    pub const fn new(scale: [f64; 3], octaves: u32) -> Self {
        Self {
            scale,
            octaves,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Returns true if every parameter can drive a sample.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.octaves > 0
            && self.scale.iter().all(|s| s.is_finite() && *s != 0.0)
            && self.persistence.is_finite()
            && self.lacunarity.is_finite()
    }
}

/// Seeded sampler for every [`NoiseKind`].
///
/// A pure function of `(seed, kind, coords, params)`.
pub struct NoiseSampler {
    seed: WorldSeed,
    fields: [SimplexNoise; 4],
}

impl NoiseSampler {
    /// Creates a sampler whose fields are derived from `seed`.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            fields: NoiseKind::ALL.map(|kind| SimplexNoise::new(seed.derive(kind.purpose()))),
        }
    }

    /// Returns the seed the sampler was built from.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Samples `kind` at world `coords`.
    ///
    /// 2-D kinds ignore Y.
    ///
    /// # Panics
    ///
    /// Panics if `coords` contains a non-finite value or `params` is invalid.
    #[must_use]
    pub fn sample(&self, kind: NoiseKind, coords: [f64; 3], params: &NoiseParams) -> f64 {
        assert!(
            coords.iter().all(|c| c.is_finite()),
            "non-finite noise coordinates {coords:?} for {kind:?}"
        );
        assert!(params.is_valid(), "invalid noise parameters {params:?} for {kind:?}");

        let field = &self.fields[kind as usize];
        let x = coords[0] / params.scale[0];
        let z = coords[2] / params.scale[2];
        if kind.is_volumetric() {
            let y = coords[1] / params.scale[1];
            field.octaved3(x, y, z, params.octaves, params.persistence, params.lacunarity)
        } else {
            field.octaved(x, z, params.octaves, params.persistence, params.lacunarity)
        }
    }
}
