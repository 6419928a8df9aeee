//! Injectable random source.
//!
//! Every nondeterministic decision in the core (hit rolls, critical rolls,
//! reaction triggers, chain detonations) draws through this oracle. Given
//! the same session seed, a whole combat session replays bit-identically,
//! which is what the regression tests rely on.

/// Deterministic random source for percentage rolls.
///
/// Implementations must be pure functions of the seed: the same seed
/// always yields the same value.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive), the pattern used by every
    /// chance-based mechanic.
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Roll-and-compare: true with probability `percent` (clamped to
    /// [0, 100]).
    fn chance(&self, seed: u64, percent: i32) -> bool {
        let percent = percent.clamp(0, 100) as u32;
        self.roll_d100(seed) <= percent
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: a 64-bit LCG step followed by an xorshift-and-rotate output
/// permutation. Small state, fast, and passes the usual statistical
/// batteries, which is plenty for combat rolls.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    /// One LCG step over the seed state.
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation: xorshift the high bits, then rotate by
    /// the top five bits of state.
    #[inline]
    fn permute(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::permute(Self::step(seed))
    }
}

/// Derives the seed for one random draw from session state.
///
/// # Arguments
///
/// * `session_seed` - Fixed at session setup; the replay key
/// * `nonce` - Monotone draw counter from `TurnState::next_nonce`
/// * `unit_id` - The unit the draw concerns
/// * `context` - Distinguishes multiple rolls inside one resolution
///   (0 = hit, 1 = crit, 2.. = status procs)
pub fn compute_seed(session_seed: u64, nonce: u64, unit_id: u32, context: u32) -> u64 {
    // SplitMix64/FxHash-style mixing; the avalanche step at the end keeps
    // neighboring nonces from producing correlated rolls.
    let mut hash = session_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (unit_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
