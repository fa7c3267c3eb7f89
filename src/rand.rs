use std::fmt;
use std::str::FromStr;

use crate::error::{CaptchaError, CaptchaResult};

/// Purpose tag mixed into seeds for image renders.
pub const IMAGE_SEED_PURPOSE: u8 = 0x01;

pub const SEED_SIZE: usize = 16;
pub type Seed = [u8; SEED_SIZE];

// SipHash initialization constants ("somepseudorandomlygeneratedbytes").
const V0: u64 = 0x736f6d6570736575;
const V1: u64 = 0x646f72616e646f6d;
const V2: u64 = 0x6c7967656e657261;
const V3: u64 = 0x7465646279746573;

/// Secret key for [`derive_seed`]. Renders are reproducible only among callers sharing a key.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedKey([u8; 32]);

impl SeedKey {
    pub const fn new(bytes: [u8; 32]) -> Self {
        SeedKey(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for SeedKey {
    type Err = CaptchaError;
    fn from_str(mut s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("0x") {
            s = rest;
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| CaptchaError::invalid_input(format!("seed key: {}", e)))?;
        Ok(SeedKey(bytes))
    }
}

// Keys never show up in logs.
impl fmt::Debug for SeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeedKey(..)")
    }
}

/// Mixes `purpose`, `id` and `digits` under `key` into a stream seed.
///
/// The identifier is terminated by a zero byte so that identifier and digits cannot run into
/// each other.
pub fn derive_seed(key: &SeedKey, purpose: u8, id: &str, digits: &[u8]) -> Seed {
    let mut hasher = blake3::Hasher::new_keyed(key.as_bytes());
    hasher.update(&[purpose]);
    hasher.update(id.as_bytes());
    hasher.update(&[0]);
    hasher.update(digits);
    let mut seed = [0u8; SEED_SIZE];
    seed.copy_from_slice(&hasher.finalize().as_bytes()[..SEED_SIZE]);
    seed
}

/// A source of uniformly distributed 64-bit words, plus the bounded draws built on top of it.
///
/// Every drawing stage takes `&mut impl Entropy`, so a render can be driven by a fixed sequence
/// in tests. Only [`Entropy::next_u64`] needs implementing; the provided methods define how
/// words turn into integers and floats and must not be overridden if output parity matters.
pub trait Entropy {
    fn next_u64(&mut self) -> u64;

    /// Non-negative 31-bit integer from the low half of the next word.
    fn next_i31(&mut self) -> i32 {
        (self.next_u64() as u32 & 0x7fff_ffff) as i32
    }

    /// Non-negative 63-bit integer.
    fn next_i63(&mut self) -> i64 {
        (self.next_u64() & 0x7fff_ffff_ffff_ffff) as i64
    }

    /// Picks an integer uniformly from `0..n`.
    ///
    /// Powers of two are masked; other bounds use rejection sampling, so a single call may
    /// consume more than one word.
    fn int_below(&mut self, n: i32) -> CaptchaResult<i32> {
        if n <= 0 {
            return Err(CaptchaError::invalid_input(format!(
                "int_below: bound must be positive, got {}",
                n
            )));
        }
        if n & (n - 1) == 0 {
            return Ok(self.next_i31() & (n - 1));
        }
        let max = (i32::MAX as u32 - (1u32 << 31) % n as u32) as i32;
        let mut v = self.next_i31();
        while v > max {
            v = self.next_i31();
        }
        Ok(v % n)
    }

    /// Picks an integer uniformly from `lo..=hi`.
    fn int(&mut self, lo: i32, hi: i32) -> CaptchaResult<i32> {
        if lo > hi {
            return Err(CaptchaError::invalid_input(format!(
                "int: empty range {}..={}",
                lo, hi
            )));
        }
        let span = i32::try_from(i64::from(hi) - i64::from(lo) + 1).map_err(|_| {
            CaptchaError::invalid_input(format!("int: range {}..={} too wide", lo, hi))
        })?;
        Ok(self.int_below(span)? + lo)
    }

    /// Picks a value uniformly distributed between `0.0` (inclusive) and `1.0`.
    fn unit_float(&mut self) -> f64 {
        self.next_i63() as f64 / (1u64 << 63) as f64
    }

    /// Picks a value uniformly distributed between `lo` and `hi`.
    fn float(&mut self, lo: f64, hi: f64) -> CaptchaResult<f64> {
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(CaptchaError::invalid_input(format!(
                "float: invalid range {}..{}",
                lo, hi
            )));
        }
        Ok((hi - lo) * self.unit_float() + lo)
    }
}

/// Counter-mode stream: word `i` is SipHash-2-4 of the counter `i` under the seed.
#[derive(Clone, PartialEq)]
pub struct SipRng {
    k0: u64,
    k1: u64,
    ctr: u64,
}

impl SipRng {
    pub fn from_seed(seed: &Seed) -> SipRng {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&seed[..8]);
        hi.copy_from_slice(&seed[8..]);
        SipRng {
            k0: u64::from_le_bytes(lo),
            k1: u64::from_le_bytes(hi),
            ctr: 1,
        }
    }
}

impl Entropy for SipRng {
    fn next_u64(&mut self) -> u64 {
        let v = siphash(self.k0, self.k1, self.ctr);
        self.ctr = self.ctr.wrapping_add(1);
        v
    }
}

/// SipHash-2-4 of the single 8-byte little-endian message `m`.
fn siphash(k0: u64, k1: u64, m: u64) -> u64 {
    let mut v = [k0 ^ V0, k1 ^ V1, k0 ^ V2, k1 ^ V3];
    // Final block carries only the message length.
    let t = 8u64 << 56;

    v[3] ^= m;
    sip_round(&mut v);
    sip_round(&mut v);
    v[0] ^= m;

    v[3] ^= t;
    sip_round(&mut v);
    sip_round(&mut v);
    v[0] ^= t;

    v[2] ^= 0xff;
    for _ in 0..4 {
        sip_round(&mut v);
    }
    v[0] ^ v[1] ^ v[2] ^ v[3]
}

#[inline]
fn sip_round(v: &mut [u64; 4]) {
    v[0] = v[0].wrapping_add(v[1]);
    v[1] = v[1].rotate_left(13) ^ v[0];
    v[0] = v[0].rotate_left(32);
    v[2] = v[2].wrapping_add(v[3]);
    v[3] = v[3].rotate_left(16) ^ v[2];
    v[0] = v[0].wrapping_add(v[3]);
    v[3] = v[3].rotate_left(21) ^ v[0];
    v[2] = v[2].wrapping_add(v[1]);
    v[1] = v[1].rotate_left(17) ^ v[2];
    v[2] = v[2].rotate_left(32);
}
