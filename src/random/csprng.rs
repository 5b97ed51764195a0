use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng, TryRngCore};
use zeroize::Zeroize;

use super::mixer::SeedMixer;
use super::RandomSource;
use crate::error::Result;

/// ChaCha20 stream seeded from OS entropy mixed through BLAKE2b-256.
///
/// When built with [`ChaChaSource::from_os`] the stream is reseeded after a
/// fixed number of draws; the new seed mixes fresh OS entropy with output of
/// the retiring stream. Fixed-seed sources never reseed.
pub struct ChaChaSource {
    rng: ChaCha20Rng,
    draws: u64,
    reseed_after: Option<u64>,
}

impl ChaChaSource {
    pub fn from_os(reseed_after: Option<u64>) -> Result<Self> {
        let seed = os_seed("initial", &[])?;
        Ok(Self {
            rng: ChaCha20Rng::from_seed(seed),
            draws: 0,
            reseed_after: reseed_after.filter(|&n| n > 0),
        })
    }

    /// Deterministic stream, mainly for reproducible tests.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: ChaCha20Rng::from_seed(seed),
            draws: 0,
            reseed_after: None,
        }
    }

    fn reseed(&mut self) -> Result<()> {
        let mut carry = [0u8; 32];
        self.rng.fill_bytes(&mut carry);
        let seed = os_seed("reseed", &carry)?;
        carry.zeroize();
        self.rng = ChaCha20Rng::from_seed(seed);
        self.draws = 0;
        log::trace!("chacha20 source reseeded");
        Ok(())
    }
}

impl RandomSource for ChaChaSource {
    fn next_u64(&mut self) -> Result<u64> {
        if let Some(limit) = self.reseed_after {
            if self.draws >= limit {
                self.reseed()?;
            }
        }
        self.draws += 1;
        Ok(self.rng.next_u64())
    }
}

/// 32 bytes from the OS CSPRNG plus process context, condensed into a seed.
fn os_seed(purpose: &str, carry: &[u8]) -> Result<[u8; 32]> {
    let mut os = [0u8; 32];
    OsRng.try_fill_bytes(&mut os)?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let seed = SeedMixer::new(purpose)
        .absorb("os", &os)
        .absorb("carry", carry)
        .absorb("pid", &std::process::id().to_le_bytes())
        .absorb("time", &nanos.to_le_bytes())
        .finish();

    os.zeroize();
    Ok(seed)
}
