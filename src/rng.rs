// ── Session-owned RNG (xoshiro256**) ───────────────────────────────────

pub(crate) struct Xoshiro256StarStar {
    s: [u64; 4],
}

impl Xoshiro256StarStar {
    pub(crate) fn from_time() -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut s = [0u64; 4];
        for (i, slot) in s.iter_mut().enumerate() {
            let mut h = DefaultHasher::new();
            std::time::SystemTime::now().hash(&mut h);
            std::thread::current().id().hash(&mut h);
            (i as u64).hash(&mut h);
            *slot = h.finish();
            if *slot == 0 {
                *slot = 0xdeadbeef;
            }
        }
        Self { s }
    }

    pub(crate) fn from_seed(seed: u64) -> Self {
        // Use splitmix64 to initialize state from a single seed
        let mut state = seed;
        let mut s = [0u64; 4];
        for slot in &mut s {
            state = state.wrapping_add(0x9e3779b97f4a7c15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            *slot = z ^ (z >> 31);
            if *slot == 0 {
                *slot = 1;
            }
        }
        Self { s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.s[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.s[1] << 17;
        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];
        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);
        result
    }

    /// A uniform float in [0, 1)
    pub(crate) fn unif_rand(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// A uniform index in [0, n)
    pub(crate) fn unif_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        let i = (n as f64 * self.unif_rand()) as usize;
        // Guard the open upper bound against rounding.
        i.min(n - 1)
    }
}
