//! Base58 key, signature and hash types plus program address derivation

use crate::errors::{ChainError, ChainResult};
use curve25519_dalek::edwards::CompressedEdwardsY;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a single PDA seed
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

macro_rules! base58_newtype {
    ($name:ident, $len:expr, $err:path) => {
        impl $name {
            /// Length of the raw byte form
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub fn to_bytes(&self) -> [u8; $len] {
                self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&bs58::encode(self.0).into_string())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = ChainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let decoded = bs58::decode(s)
                    .into_vec()
                    .map_err(|e| $err(format!("{}: {}", s, e)))?;
                let bytes: [u8; $len] = decoded
                    .try_into()
                    .map_err(|v: Vec<u8>| $err(format!("{}: expected {} bytes, got {}", s, $len, v.len())))?;
                Ok(Self(bytes))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

/// 32-byte account address
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pubkey([u8; 32]);

base58_newtype!(Pubkey, 32, ChainError::InvalidPubkey);

/// 32-byte blockhash
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hash([u8; 32]);

base58_newtype!(Hash, 32, ChainError::InvalidEncoding);

/// 64-byte ed25519 transaction signature
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; 64]);

base58_newtype!(Signature, 64, ChainError::InvalidEncoding);

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; 64])
    }
}

impl Pubkey {
    /// Whether the address is a valid ed25519 point (i.e. could have a private key)
    pub fn is_on_curve(&self) -> bool {
        bytes_are_curve_point(&self.0)
    }

    /// Derive a program address from seeds without searching for a bump
    pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> ChainResult<Pubkey> {
        let mut hasher = Sha256::new();
        for seed in seeds {
            if seed.len() > MAX_SEED_LEN {
                return Err(ChainError::SeedTooLong { len: seed.len() });
            }
            hasher.update(seed);
        }
        hasher.update(program_id.as_ref());
        hasher.update(PDA_MARKER);
        let hash: [u8; 32] = hasher.finalize().into();

        if bytes_are_curve_point(&hash) {
            return Err(ChainError::InvalidSeeds);
        }
        Ok(Pubkey(hash))
    }

    /// Find the first off-curve program address, searching bump seeds from 255 down
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> ChainResult<(Pubkey, u8)> {
        for bump in (0..=u8::MAX).rev() {
            let bump_seed = [bump];
            let mut with_bump: Vec<&[u8]> = seeds.to_vec();
            with_bump.push(&bump_seed);
            match Self::create_program_address(&with_bump, program_id) {
                Ok(address) => return Ok((address, bump)),
                Err(ChainError::InvalidSeeds) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ChainError::NoViableBump)
    }
}

fn bytes_are_curve_point(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}
