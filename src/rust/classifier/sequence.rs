/// Id written into positions that carry no token.
pub const PAD_ID: i64 = 0;

/// Normalizes a token sequence to exactly `maxlen` ids.
///
/// Short sequences are left-padded with [`PAD_ID`]; long sequences keep their
/// last `maxlen` ids, so the end of a message always reaches the model.
pub fn pad_sequence(ids: &[u32], maxlen: usize) -> Vec<i64> {
    let kept = &ids[ids.len().saturating_sub(maxlen)..];
    let mut padded = vec![PAD_ID; maxlen - kept.len()];
    padded.extend(kept.iter().map(|&id| i64::from(id)));
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_pads_short_sequences() {
        assert_eq!(pad_sequence(&[7, 8, 9], 5), vec![0, 0, 7, 8, 9]);
    }

    #[test]
    fn test_truncates_from_the_front() {
        assert_eq!(pad_sequence(&[1, 2, 3, 4, 5, 6], 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_exact_length_is_unchanged() {
        assert_eq!(pad_sequence(&[4, 5], 2), vec![4, 5]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pad_sequence(&[], 3), vec![0, 0, 0]);
        assert!(pad_sequence(&[1, 2], 0).is_empty());
    }
}
