use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::{point::Point, tuple::Tuple};

/// Improved Perlin gradient noise over a seeded permutation table.
///
/// One instance is built per scene and shared by every perturbed pattern, so two renders
/// with the same seed produce identical images.
#[derive(Debug, Clone, PartialEq)]
pub struct PerlinNoise {
    seed: u64,
    // permutation repeated twice so lookups never wrap
    perm: Vec<u8>,
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }
}

impl PerlinNoise {
    pub const DEFAULT_SEED: u64 = 0x5eed;

    pub fn with_seed(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut perm = table.clone();
        perm.extend_from_slice(&table);
        Self { seed, perm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn hash(&self, x: usize, y: usize, z: usize) -> u8 {
        let a = self.perm[x] as usize + y;
        let b = self.perm[a] as usize + z;
        self.perm[b]
    }

    /// Noise value in roughly [-1, 1]; zero at every integer lattice point.
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let xi = (x.floor() as i64).rem_euclid(256) as usize;
        let yi = (y.floor() as i64).rem_euclid(256) as usize;
        let zi = (z.floor() as i64).rem_euclid(256) as usize;

        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let aaa = grad(self.hash(xi, yi, zi), xf, yf, zf);
        let aba = grad(self.hash(xi, yi + 1, zi), xf, yf - 1., zf);
        let aab = grad(self.hash(xi, yi, zi + 1), xf, yf, zf - 1.);
        let abb = grad(self.hash(xi, yi + 1, zi + 1), xf, yf - 1., zf - 1.);
        let baa = grad(self.hash(xi + 1, yi, zi), xf - 1., yf, zf);
        let bba = grad(self.hash(xi + 1, yi + 1, zi), xf - 1., yf - 1., zf);
        let bab = grad(self.hash(xi + 1, yi, zi + 1), xf - 1., yf, zf - 1.);
        let bbb = grad(self.hash(xi + 1, yi + 1, zi + 1), xf - 1., yf - 1., zf - 1.);

        lerp(
            lerp(lerp(aaa, baa, u), lerp(aba, bba, u), v),
            lerp(lerp(aab, bab, u), lerp(abb, bbb, u), v),
            w,
        )
    }

    /// Displaces every coordinate by an independent noise sample scaled by `scale`.
    pub fn perturb(&self, point: Point, scale: f64) -> Point {
        let (x, y, z) = (point.x(), point.y(), point.z());
        Point::new(
            x + self.noise(x, y, z) * scale,
            y + self.noise(x, y, z + 1.) * scale,
            z + self.noise(x, y, z + 2.) * scale,
        )
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6. - 15.) + 10.)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_same_noise() {
        let noise = PerlinNoise::default();
        assert_eq!(noise.noise(0.2, 0.3, 0.4), noise.noise(0.2, 0.3, 0.4));
    }

    #[test]
    fn noise_is_bounded_and_nonzero_off_lattice() {
        let noise = PerlinNoise::with_seed(7);
        let value = noise.noise(0.2, 0.3, 0.4);
        assert!(value.abs() < 1.5);
        assert!(value != 0.);
    }

    #[test]
    fn zero_on_lattice_points() {
        let noise = PerlinNoise::with_seed(3);
        assert_eq!(noise.noise(1., 2., -3.), 0.);
    }

    #[test]
    fn seed_is_reproducible() {
        let a = PerlinNoise::with_seed(42);
        let b = PerlinNoise::with_seed(42);
        assert_eq!(a, b);
        assert_eq!(a.noise(1.3, -7.1, 0.5), b.noise(1.3, -7.1, 0.5));
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn perturb_with_zero_scale_is_identity() {
        let noise = PerlinNoise::default();
        let p = Point::new(0.5, 1.5, -2.25);
        assert_eq!(noise.perturb(p, 0.), p);
    }
}
