pub mod csprng;
pub mod mixer;
pub mod os;

use crate::config::{RngBackend, RngConfig};
use crate::error::{Error, Result};

pub use csprng::ChaChaSource;
pub use os::OsSource;

/// A source of unbiased random integers.
///
/// Generator failures surface as [`Error::NoEntropy`]. There is no fallback to
/// a weaker generator.
pub trait RandomSource {
    /// Next raw 64-bit output of the generator.
    fn next_u64(&mut self) -> Result<u64>;

    /// Fill `dst` with random bytes.
    fn fill_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64()?.to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
        Ok(())
    }

    /// Uniform integer in `[0, max)`.
    ///
    /// Uses rejection sampling: raw outputs below `2^64 mod max` are
    /// discarded so the remaining range is an exact multiple of `max`.
    fn below(&mut self, max: usize) -> Result<usize> {
        if max == 0 {
            return Err(Error::NoEntropy("cannot draw from an empty range".into()));
        }
        let n = max as u64;
        let threshold = rejection_threshold(n);
        loop {
            let v = self.next_u64()?;
            if v >= threshold {
                return Ok((v % n) as usize);
            }
        }
    }

    /// Derive an independent ChaCha20 stream seeded from this source.
    fn fork(&mut self) -> Result<ChaChaSource> {
        let mut material = [0u8; 32];
        self.fill_bytes(&mut material)?;
        let seed = mixer::SeedMixer::new("fork").absorb("parent", &material).finish();
        zeroize::Zeroize::zeroize(&mut material);
        Ok(ChaChaSource::from_seed(seed))
    }
}

/// `2^64 mod n`: the count of low raw values that would bias `v % n`.
#[inline]
fn rejection_threshold(n: u64) -> u64 {
    n.wrapping_neg() % n
}

/// Fisher–Yates shuffle: for `i` from the last index down to 1, swap with a
/// uniformly drawn `j` in `[0, i]`.
pub fn shuffle<R, T>(rng: &mut R, items: &mut [T]) -> Result<()>
where
    R: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1)?;
        items.swap(i, j);
    }
    Ok(())
}

/// Insert `item` at a uniformly drawn position in `[0, len]`.
pub fn insert_random<R, T>(rng: &mut R, items: &mut Vec<T>, item: T) -> Result<()>
where
    R: RandomSource + ?Sized,
{
    let at = rng.below(items.len() + 1)?;
    items.insert(at, item);
    Ok(())
}

/// Runtime-selected backend.
pub enum Source {
    Os(OsSource),
    ChaCha(ChaChaSource),
}

impl Source {
    pub fn from_config(config: &RngConfig) -> Result<Self> {
        match config.backend {
            RngBackend::Os => {
                log::debug!("random source: operating system CSPRNG");
                Ok(Source::Os(OsSource::new()))
            }
            RngBackend::Chacha => {
                log::debug!(
                    "random source: ChaCha20 seeded from OS entropy, reseed after {} draws",
                    config.reseed_after
                );
                Ok(Source::ChaCha(ChaChaSource::from_os(Some(config.reseed_after))?))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Source::Os(_) => "os",
            Source::ChaCha(_) => "chacha20",
        }
    }
}

impl RandomSource for Source {
    fn next_u64(&mut self) -> Result<u64> {
        match self {
            Source::Os(s) => s.next_u64(),
            Source::ChaCha(s) => s.next_u64(),
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u64(&mut self) -> Result<u64> {
        (**self).next_u64()
    }
}
