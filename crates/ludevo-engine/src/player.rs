use std::{fmt::Write as _, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::game::Game;

/// A move-selection strategy for game `G`.
///
/// `choose_move` must only be called on non-terminal states; strategies are
/// free to fail with [`MoveSelectionError`] when the position offers them no
/// candidate to play.
pub trait Player<G: Game> {
    fn choose_move(&mut self, state: &G::State) -> Result<G::Move, MoveSelectionError>;
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum MoveSelectionError {
    #[display("no legal candidate move could be generated")]
    NoLegalCandidate,
}

/// Seed for deterministic strategy randomness.
///
/// A 128-bit seed serialized as a 32-character hex string. Two players built
/// from the same seed make the same random choices, enabling reproducible
/// matches and deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngSeed([u8; 16]);

impl RngSeed {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds the PCG generator all ludevo strategies draw from.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        use rand::SeedableRng as _;
        Pcg32::from_seed(self.0)
    }
}

impl FromStr for RngSeed {
    type Err = String;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            ));
        }
        let num = u128::from_str_radix(hex_str, 16)
            .map_err(|e| format!("invalid hex: {hex_str} ({e})"))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for RngSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for RngSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<RngSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> RngSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        RngSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::Rng as _;

    #[test]
    fn test_seed_serde_roundtrip() {
        let seed: RngSeed = rand::rng().random();
        let serialized = serde_json::to_string(&seed).unwrap();
        let deserialized: RngSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(seed, deserialized);
    }

    #[test]
    fn test_seed_known_value_all_zeros() {
        let seed = RngSeed::from_bytes([0; 16]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"00000000000000000000000000000000\"");
    }

    #[test]
    fn test_seed_parse_rejects_wrong_length() {
        assert!("0123".parse::<RngSeed>().is_err());
        assert!(
            "0123456789abcdef0123456789abcdef0"
                .parse::<RngSeed>()
                .is_err()
        );
    }

    #[test]
    fn test_seed_parse_accepts_uppercase() {
        let seed: RngSeed = "0123456789ABCDEF0123456789ABCDEF".parse().unwrap();
        assert_eq!(
            seed,
            "0123456789abcdef0123456789abcdef".parse::<RngSeed>().unwrap()
        );
    }

    #[test]
    fn test_same_seed_same_stream() {
        let seed: RngSeed = rand::rng().random();
        let mut a = seed.rng();
        let mut b = seed.rng();
        for _ in 0..20 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }
}
