use rand::Rng;

/// Longest code whose value range still fits in a `u64`.
pub const MAX_CODE_LENGTH: usize = 18;

/// 生成指定位数的数字验证码
///
/// The value is drawn uniformly from `[1, 10^length - 1]` and zero-padded, so the
/// all-zero code is never produced. `length` is clamped to `1..=MAX_CODE_LENGTH`.
pub fn generate_numeric_code(length: usize) -> String {
    let length = length.clamp(1, MAX_CODE_LENGTH);
    let upper = 10u64.pow(length as u32);
    let mut rng = rand::thread_rng();
    format!("{:0width$}", rng.gen_range(1..upper), width = length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_six_digit_code() {
        let code = generate_numeric_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        let code_num: u32 = code.parse().unwrap();
        assert!((1..=999_999).contains(&code_num));
    }

    #[test]
    fn test_codes_have_exact_length_and_are_never_all_zero() {
        for length in 1..=MAX_CODE_LENGTH {
            for _ in 0..50 {
                let code = generate_numeric_code(length);
                assert_eq!(code.len(), length, "bad length for {code}");
                assert!(code.chars().all(|c| c.is_ascii_digit()));
                assert!(code.chars().any(|c| c != '0'), "all-zero code {code}");
            }
        }
    }

    #[test]
    fn test_single_digit_codes_cover_one_to_nine() {
        let mut seen = [false; 10];
        for _ in 0..2000 {
            let digit: usize = generate_numeric_code(1).parse().unwrap();
            seen[digit] = true;
        }
        assert!(!seen[0]);
        assert!(seen[1..].iter().all(|s| *s));
    }

    #[test]
    fn test_out_of_range_lengths_are_clamped() {
        assert_eq!(generate_numeric_code(0).len(), 1);
        assert_eq!(generate_numeric_code(20).len(), MAX_CODE_LENGTH);
        assert_eq!(generate_numeric_code(usize::MAX).len(), MAX_CODE_LENGTH);
    }

    #[test]
    fn test_short_values_are_zero_padded() {
        // 10^4 draws of a 4-digit code almost surely include one below 1000
        let padded = (0..10_000)
            .map(|_| generate_numeric_code(4))
            .any(|c| c.starts_with('0'));
        assert!(padded);
    }
}
