//! Phone number normalization for WhatsApp deep links.
//!
//! `wa.me` links address a chat by a bare digit string with the country
//! calling code included and no `+` or separators. Merchants and shoppers
//! enter numbers in every imaginable format, so normalization is best-effort
//! and total: a malformed number yields a cosmetically wrong link, never an
//! error.

/// Guatemala's country calling code, prepended to local numbers.
const COUNTRY_CALLING_CODE: &str = "502";

/// Length of a local Guatemalan subscriber number.
const LOCAL_NUMBER_LEN: usize = 8;

/// Normalize a free-form phone string into the digit sequence `wa.me` expects.
///
/// The function only ever removes or prepends characters; it never interprets
/// structure beyond digit counting:
///
/// 1. Absent or empty input yields an empty string.
/// 2. Everything that is not a digit or `+` is stripped.
/// 3. A leading `+` means a complete international number: the digits are
///    returned as-is.
/// 4. Exactly 8 digits is a local number: the country code is prepended.
/// 5. 11 digits already starting with the country code pass through.
/// 6. Fewer than 10 digits is treated as a local number missing its code.
/// 7. Anything else is assumed to be a complete international number.
///
/// # Examples
///
/// ```
/// use ventalink_core::types::phone::normalize;
///
/// assert_eq!(normalize(Some("1234 5678")), "50212345678");
/// assert_eq!(normalize(Some("+1234567890")), "1234567890");
/// assert_eq!(normalize(None), "");
/// ```
#[must_use]
pub fn normalize(phone: Option<&str>) -> String {
    let Some(phone) = phone else {
        return String::new();
    };
    if phone.is_empty() {
        return String::new();
    }

    let cleaned: String = phone.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    let has_plus = cleaned.starts_with('+');
    let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();

    if has_plus {
        return digits;
    }

    if digits.len() == LOCAL_NUMBER_LEN {
        return format!("{COUNTRY_CALLING_CODE}{digits}");
    }

    if digits.starts_with(COUNTRY_CALLING_CODE) && digits.len() == 11 {
        return digits;
    }

    if digits.len() < 10 {
        return format!("{COUNTRY_CALLING_CODE}{digits}");
    }

    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_eight_digit_number() {
        assert_eq!(normalize(Some("12345678")), "50212345678");
    }

    #[test]
    fn test_separators_are_stripped() {
        assert_eq!(normalize(Some("1234 5678")), "50212345678");
        assert_eq!(normalize(Some("1234-5678")), "50212345678");
        assert_eq!(normalize(Some("(1234) 5678")), "50212345678");
    }

    #[test]
    fn test_plus_prefixed_international() {
        assert_eq!(normalize(Some("+50212345678")), "50212345678");
        assert_eq!(normalize(Some("+502 1234 5678")), "50212345678");
        assert_eq!(normalize(Some("+1234567890")), "1234567890");
    }

    #[test]
    fn test_country_code_already_present() {
        assert_eq!(normalize(Some("50212345678")), "50212345678");
    }

    #[test]
    fn test_long_number_without_country_code_passes_through() {
        assert_eq!(normalize(Some("1234567890")), "1234567890");
    }

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(normalize(None), "");
        assert_eq!(normalize(Some("")), "");
    }

    #[test]
    fn test_extension_suffix_is_stripped_not_interpreted() {
        // The trailing extension digits merge into the number; the function
        // never parses semantic structure.
        assert_eq!(normalize(Some("(502) 1234-5678 ext. 123")), "50212345678123");
    }

    #[test]
    fn test_short_number_gets_country_code() {
        assert_eq!(normalize(Some("123")), "502123");
    }
}
