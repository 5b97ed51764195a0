use rand_core::{OsRng, TryRngCore};

use super::RandomSource;
use crate::error::Result;

/// Draws directly from the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSource;

impl OsSource {
    pub fn new() -> Self {
        OsSource
    }
}

impl RandomSource for OsSource {
    fn next_u64(&mut self) -> Result<u64> {
        Ok(OsRng.try_next_u64()?)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dst)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_differ() {
        let mut rng = OsSource::new();
        let a = rng.next_u64().unwrap();
        let b = rng.next_u64().unwrap();
        let c = rng.next_u64().unwrap();
        assert!(a != b || b != c);
    }

    #[test]
    fn test_fill_bytes() {
        let mut rng = OsSource::new();
        let mut buf = [0u8; 64];
        rng.fill_bytes(&mut buf).unwrap();
        assert!(buf.iter().any(|&b| b != 0));
    }
}
