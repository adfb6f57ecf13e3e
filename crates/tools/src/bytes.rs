const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// A byte count scaled to the largest binary unit (1024-based) that keeps
/// the number at or above one, up to terabytes.
#[derive(Clone, Debug, PartialEq)]
pub struct ByteSize {
    /// Number and unit, e.g. `1.5KB`.
    pub string: String,
    pub number: f64,
    pub unit: &'static str,
}

/// Scale `bytes` and round to `fixed` decimal places. Plain byte counts
/// (below 1024) are reported unrounded.
pub fn convert_bytes(bytes: u64, fixed: usize) -> ByteSize {
    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < UNITS.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    if exponent == 0 {
        return ByteSize {
            string: format!("{bytes}B"),
            number: bytes as f64,
            unit: UNITS[0],
        };
    }
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let num = format!("{value:.fixed$}");
    ByteSize {
        number: num.parse().unwrap_or(value),
        string: format!("{num}{}", UNITS[exponent]),
        unit: UNITS[exponent],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_counts_stay_in_bytes() {
        assert_eq!(convert_bytes(0, 1).string, "0B");
        let b = convert_bytes(1023, 3);
        assert_eq!(b.string, "1023B");
        assert_eq!(b.unit, "B");
    }

    #[test]
    fn scales_and_rounds() {
        let kb = convert_bytes(1536, 1);
        assert_eq!(kb.string, "1.5KB");
        assert_eq!(kb.number, 1.5);

        let mb = convert_bytes(5 * 1024 * 1024 + 300_000, 2);
        assert_eq!(mb.string, "5.29MB");
        assert_eq!(mb.unit, "MB");

        assert_eq!(convert_bytes(1024, 0).string, "1KB");
    }

    #[test]
    fn clamps_at_terabytes() {
        let pb = convert_bytes(3 * 1024u64.pow(5), 0);
        assert_eq!(pb.unit, "TB");
        assert_eq!(pb.string, "3072TB");
    }
}
