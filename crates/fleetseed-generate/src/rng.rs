use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic generator for a given run seed.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Fresh seed drawn from the OS-seeded thread generator.
pub fn random_seed() -> u64 {
    rand::random()
}
