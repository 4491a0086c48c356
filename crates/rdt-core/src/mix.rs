//! RDT mixing primitives shared by the generators in [`crate::sources`].
//!
//! [`core_mix`] is the compact RDT core mixer behind the v1 generator and
//! the DRBG. Its depth picks the key lane and the self-rotation.
//!
//! [`mix`] is the v2 stream mixer, which combines four stages:
//!
//! 1. **Depth**: a 6-bit digest of the input's bit length, popcount and
//!    upper half.
//! 2. **Scalar field**: depth of the integer norm of the two low 16-bit lanes.
//! 3. **Epsilon channel**: up to seven prime-weighted multiply/rotate rounds,
//!    the round count driven by depth.
//! 4. **ARX finaliser**: xorshift, odd multiply, key injection and a
//!    depth-dependent rotation.

/// Fractional part of the golden ratio, used as the primary odd multiplier.
pub const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

const DEPTH_MULTIPLIER: u64 = 0xBF58_476D_1CE4_E5B9;
const EPSILON_MULTIPLIER: u64 = 0xC2B2_AE3D_27D4_EB4F;
const FINAL_MULTIPLIER: u64 = 0xD6E8_FEB8_6659_FD93;

const PRIMES: [u64; 7] = [3, 5, 7, 11, 13, 17, 19];
const ROTATIONS: [u32; 3] = [13, 23, 43];
const MULTIPLIERS: [u64; 3] = [19, 29, 47];

/// Number of significant bits in `x` (0 for 0).
#[inline]
pub fn bit_length(x: u64) -> u32 {
    u64::BITS - x.leading_zeros()
}

/// 6-bit structural digest of `x`.
#[inline]
pub fn depth(x: u64) -> u32 {
    let bl = bit_length(x);
    let pc = x.count_ones();
    let mid = if bl == 0 { 0 } else { (x >> (bl >> 1)) as u32 };
    (bl ^ (pc << 1) ^ mid) & 63
}

/// Core mixer depth: bit length plus the popcount of the upper half.
///
/// Ranges over `0..=96`; only `d & 3` and `d & 63` are consumed directly.
#[inline]
pub fn core_depth(x: u64) -> u32 {
    let bl = bit_length(x);
    let mid = if bl == 0 { 0 } else { (x >> (bl >> 1)) as u32 };
    bl + mid.count_ones()
}

/// Mix a 64-bit word under a 256-bit key with the RDT core mixer.
///
/// Maps 0 to 0.
#[inline]
pub fn core_mix(mut x: u64, key: &[u64; 4]) -> u64 {
    let d = core_depth(x);
    x ^= key[(d & 3) as usize];
    x ^= x.rotate_left(d & 63);
    x.wrapping_mul(GOLDEN_GAMMA ^ u64::from(d))
}

/// Integer square root, bit-by-bit.
#[inline]
fn isqrt32(mut x: u32) -> u32 {
    let mut root = 0u32;
    let mut bit = 1u32 << 30;
    while bit > x {
        bit >>= 2;
    }
    while bit != 0 {
        if x >= root + bit {
            x -= root + bit;
            root += bit << 1;
        }
        root >>= 1;
        bit >>= 2;
    }
    root
}

#[inline]
fn scalar_field(x: u64) -> u32 {
    let a = (x & 0xFFFF) as u32;
    let b = ((x >> 16) & 0xFFFF) as u32;
    // The sum of squares is allowed to wrap.
    let norm = isqrt32(a.wrapping_mul(a).wrapping_add(b.wrapping_mul(b)));
    depth(u64::from(norm))
}

/// Mix a 64-bit word under a 256-bit key.
pub fn mix(x: u64, key: &[u64; 4]) -> u64 {
    let d = depth(x);
    let g = scalar_field(x);
    let m = x.wrapping_add(u64::from(g)).wrapping_mul(GOLDEN_GAMMA);
    let p = m ^ u64::from(d).wrapping_mul(DEPTH_MULTIPLIER);

    let rounds = d.min(6);
    let mut eps = 0u64;
    for i in 0..=rounds {
        let prime = PRIMES[i as usize];
        let mut c = p.wrapping_mul(prime.wrapping_mul(EPSILON_MULTIPLIER));
        c ^= (p >> (i + 1)).wrapping_mul(prime);
        c ^= key[(i & 3) as usize];
        eps ^= c.rotate_left(13 + 7 * i);
    }

    let mut z = p ^ eps;
    let rp = ROTATIONS[(d % 3) as usize];
    let mp = MULTIPLIERS[(d % 3) as usize].wrapping_mul(FINAL_MULTIPLIER);
    z ^= z << rp;
    z ^= z >> (rp >> 1);
    z = z.wrapping_mul(mp);
    z ^= key[((d ^ rp) & 3) as usize];
    z.rotate_left(d ^ rp)
}
