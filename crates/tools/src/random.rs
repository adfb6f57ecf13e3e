use std::fmt::Write;

pub const DEFAULT_POOL: usize = 9;

/// Numeric id of at most `len` digits drawn from OS randomness.
///
/// Not suitable for secrets: each random byte contributes its magnitude
/// (0..=128) as decimal digits, so the digit distribution is skewed.
pub fn randid(len: usize) -> Result<String, getrandom::Error> {
    randid_with_pool(len, DEFAULT_POOL)
}

/// [`randid`] with an explicit number of random bytes. A small pool may
/// produce fewer than `len` digits.
pub fn randid_with_pool(len: usize, pool: usize) -> Result<String, getrandom::Error> {
    let mut bytes = vec![0u8; pool];
    getrandom::fill(&mut bytes)?;
    Ok(digits(&bytes, len))
}

fn digits(bytes: &[u8], len: usize) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for &b in bytes {
        let _ = write!(out, "{}", (b as i8).unsigned_abs());
    }
    out.truncate(len);
    out
}
