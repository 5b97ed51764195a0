use blake2::{
    digest::{consts::U32, Digest},
    Blake2b,
};

type Blake2b256 = Blake2b<U32>;

const DOMAIN: &[u8] = b"secretforge-seed-v1";

/// Condenses labelled seed material into a 32-byte ChaCha20 seed.
///
/// Every input is length-prefixed, and the purpose string is hashed right
/// after the domain tag, so seeds derived for different purposes never
/// collide even when fed identical material.
pub struct SeedMixer {
    hasher: Blake2b256,
}

impl SeedMixer {
    pub fn new(purpose: &str) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(DOMAIN);
        feed(&mut hasher, purpose.as_bytes());
        Self { hasher }
    }

    pub fn absorb(mut self, label: &str, data: &[u8]) -> Self {
        feed(&mut self.hasher, label.as_bytes());
        feed(&mut self.hasher, data);
        self
    }

    pub fn finish(self) -> [u8; 32] {
        let digest = self.hasher.finalize();
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&digest);
        seed
    }
}

fn feed(hasher: &mut Blake2b256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
