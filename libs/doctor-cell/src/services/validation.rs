// libs/doctor-cell/src/services/validation.rs

/// Checks a 10-digit national identification code against its check digit.
///
/// Digits 1..=9 are weighted 10 down to 2. With `r = sum % 11`, the last digit
/// must equal `r` when `r < 2`, and `11 - r` otherwise. Codes made of a single
/// repeated digit are always rejected.
pub fn is_valid_nationality_code(code: &str) -> bool {
    let digits: Vec<u32> = match code.chars().map(|c| c.to_digit(10)).collect::<Option<Vec<_>>>() {
        Some(digits) => digits,
        None => return false,
    };

    if digits.len() != 10 {
        return false;
    }

    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let sum: u32 = digits[..9]
        .iter()
        .zip((2..=10).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();
    let remainder = sum % 11;
    let check_digit = digits[9];

    if remainder < 2 {
        check_digit == remainder
    } else {
        check_digit == 11 - remainder
    }
}
