use crate::rng::SimRng;

/// 2D gradient noise with a 256-entry permutation table.
///
/// The table is built by a Fisher-Yates shuffle driven by the caller's
/// [`SimRng`], so the noise field is part of the seeded stream like
/// everything else. Corner gradients come from the classic 8-direction
/// set, hashed through the doubled table; interpolation uses the quintic
/// fade curve. Output of [`noise2d`](Self::noise2d) is in roughly
/// `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct GradientNoise {
    perm: [u8; 512],
}

impl GradientNoise {
    pub fn new(rng: &mut SimRng) -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        for i in (1..256).rev() {
            let j = rng.int(0, i as i64) as usize;
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, entry) in perm.iter_mut().enumerate() {
            *entry = table[i % 256];
        }
        Self { perm }
    }

    fn hash(&self, x: i64, y: i64) -> u8 {
        let x = (x & 255) as usize;
        let y = (y & 255) as usize;
        self.perm[self.perm[x] as usize ^ y]
    }

    fn gradient(&self, ix: i64, iy: i64, dx: f64, dy: f64) -> f64 {
        const DIAG: f64 = std::f64::consts::FRAC_1_SQRT_2;
        let (gx, gy) = match self.hash(ix, iy) & 7 {
            0 => (1.0, 0.0),
            1 => (-1.0, 0.0),
            2 => (0.0, 1.0),
            3 => (0.0, -1.0),
            4 => (DIAG, DIAG),
            5 => (-DIAG, DIAG),
            6 => (DIAG, -DIAG),
            _ => (-DIAG, -DIAG),
        };
        gx * dx + gy * dy
    }

    /// Single-octave gradient noise, roughly `[-1, 1]`.
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let fx = x - x0 as f64;
        let fy = y - y0 as f64;

        // Quintic fade: 6t^5 - 15t^4 + 10t^3
        let sx = fx * fx * fx * (fx * (fx * 6.0 - 15.0) + 10.0);
        let sy = fy * fy * fy * (fy * (fy * 6.0 - 15.0) + 10.0);

        let n00 = self.gradient(x0, y0, fx, fy);
        let n10 = self.gradient(x0 + 1, y0, fx - 1.0, fy);
        let n01 = self.gradient(x0, y0 + 1, fx, fy - 1.0);
        let n11 = self.gradient(x0 + 1, y0 + 1, fx - 1.0, fy - 1.0);

        let nx0 = n00 + sx * (n10 - n00);
        let nx1 = n01 + sx * (n11 - n01);
        nx0 + sy * (nx1 - nx0)
    }

    /// Fractal Brownian motion: `octaves` layers of [`noise2d`](Self::noise2d)
    /// with amplitudes scaled by `persistence` and frequencies by
    /// `lacunarity`, normalized by the amplitude sum.
    ///
    /// When `warp > 0` the input point is first displaced by a
    /// half-frequency noise field scaled by `warp` (second axis sampled at
    /// fixed offsets so the two displacement components decorrelate).
    pub fn fbm(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
        warp: f64,
    ) -> f64 {
        let (mut x, mut y) = (x, y);
        if warp > 0.0 {
            let wx = self.noise2d(x * 0.5, y * 0.5);
            let wy = self.noise2d(x * 0.5 + 31.4, y * 0.5 + 47.2);
            x += wx * warp;
            y += wy * warp;
        }

        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;
        for _ in 0..octaves {
            value += self.noise2d(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        value / max_value
    }
}
