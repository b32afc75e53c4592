//! Rupiah formatting and parsing.
//!
//! Monetary values cross the record boundary as display strings such as
//! `"Rp 1.500.000"`.  These two helpers convert between that form and a
//! whole number of rupiah.

/// Prefix placed in front of every formatted amount.
pub const RUPIAH_PREFIX: &str = "Rp ";

/// Formats `amount` with Indonesian thousands separators and the
/// `"Rp "` prefix.  Negative amounts keep their sign after the prefix.
pub fn format_to_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("{RUPIAH_PREFIX}-{grouped}")
    } else {
        format!("{RUPIAH_PREFIX}{grouped}")
    }
}

/// Recovers a number from a possibly formatted string.
///
/// Every character that is not an ASCII digit is dropped, including a
/// leading minus sign, so the result is always a magnitude.  Input with
/// no digits, or with more digits than fit in an `i64`, yields `0`.
pub fn extract_numeric_value(text: &str) -> i64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<i64>().unwrap_or(0)
}
