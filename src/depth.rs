use log::info;

// Tree height is at most 2*log2(n+1), depth 256 would need ~2^128 entries.
const MAX_DEPTH: usize = 256;

/// Depth tracks the distribution of leaf depths in [`Llrb`][crate::Llrb]
/// tree, gathered while validating the tree.
///
/// A leaf here is an empty child position, so the depth of a leaf is the
/// number of nodes on the path from root to that position. [`Depth::max`]
/// is the height of the tree.
#[derive(Clone, Debug)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
    depths: [u64; MAX_DEPTH],
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        debug_assert!(depth < MAX_DEPTH, "depth {} beyond {}", depth, MAX_DEPTH);
        self.samples += 1;
        self.total += depth;
        if self.samples == 1 || depth < self.min {
            self.min = depth
        }
        if depth > self.max {
            self.max = depth
        }
        self.depths[depth] += 1;
    }

    /// Return number of leaves sampled.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Return minimum leaf depth.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Return maximum leaf depth, which is the height of the tree.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average leaf depth, zero if nothing was sampled.
    pub fn mean(&self) -> usize {
        match self.samples {
            0 => 0,
            n => self.total / n,
        }
    }

    /// Return depth as tuple of percentiles, each tuple provides
    /// (percentile, depth). Returned percentiles are from 90, 91 .. 100.
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        let mut percentiles: Vec<(u8, usize)> = vec![];
        if self.samples == 0 {
            return percentiles;
        }

        let (mut acc, mut prev_perc) = (0_u64, 90_u8);
        let iter = self.depths.iter().enumerate().filter(|(_, &n)| n > 0);
        for (depth, samples) in iter {
            acc += *samples;
            let perc = ((acc as f64 / self.samples as f64) * 100_f64) as u8;
            if perc >= prev_perc {
                percentiles.push((perc, depth));
                prev_perc = perc;
            }
        }
        percentiles
    }

    /// Log depth statistics in human readable format.
    pub fn pretty_print(&self, prefix: &str) {
        info!(
            "{}depth (min, avg, max): {:?}",
            prefix,
            (self.min, self.mean(), self.max)
        );
        for (perc, depth) in self.percentiles().into_iter() {
            info!("{}  {} percentile = {}", prefix, perc, depth);
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth {
            samples: 0,
            min: 0,
            max: 0,
            total: 0,
            depths: [0; MAX_DEPTH],
        }
    }
}
