use crate::types::{Amount, Height};

/// Size in bytes of one emitted height/value record.
pub const RECORD_SIZE: usize = 12;

pub fn ratio(a: u64, ab: u64) -> f64 {
    // Plain unguarded division: a zero denominator yields NaN or infinity,
    // which callers report as-is rather than clamping.
    a as f64 / ab as f64
}

/// Encodes one height/value record: bytes 0..4 hold the height, bytes 4..12
/// the output value, both little-endian fixed-width.
pub fn encode_record(height: Height, value: Amount) -> [u8; RECORD_SIZE] {
    let mut record = [0u8; RECORD_SIZE];
    record[..4].copy_from_slice(&height.to_le_bytes());
    record[4..].copy_from_slice(&value.to_le_bytes());
    record
}

/// Decodes a record produced by [`encode_record`].
pub fn decode_record(record: &[u8; RECORD_SIZE]) -> (Height, Amount) {
    let mut height = [0u8; 4];
    height.copy_from_slice(&record[..4]);
    let mut value = [0u8; 8];
    value.copy_from_slice(&record[4..]);
    (Height::from_le_bytes(height), Amount::from_le_bytes(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_divides_as_f64() {
        assert_eq!(ratio(1, 2), 0.5);
        assert_eq!(ratio(3, 2), 1.5);
        assert_eq!(ratio(0, 4), 0.0);
    }

    #[test]
    fn ratio_with_zero_denominator_is_non_finite() {
        assert!(ratio(0, 0).is_nan());
        assert!(ratio(5, 0).is_infinite());
    }

    #[test]
    fn record_layout_places_height_then_value() {
        let record = encode_record(0x0102_0304, 0x1112_1314_1516_1718);
        assert_eq!(&record[..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(
            &record[4..],
            &[0x18, 0x17, 0x16, 0x15, 0x14, 0x13, 0x12, 0x11]
        );
    }

    #[test]
    fn record_round_trips() {
        for (height, value) in [(0, 0), (100, 5), (840_000, 625_000_000), (u32::MAX, u64::MAX)] {
            let record = encode_record(height, value);
            assert_eq!(decode_record(&record), (height, value));
        }
    }
}
