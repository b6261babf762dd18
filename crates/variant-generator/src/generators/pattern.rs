//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - number of values generated before this one
//! - `{uuid}` - random UUID drawn from the generator's RNG
//! - `{rand:N}` - random N-digit number

use super::uuid::generate_uuid_v4;
use rand::Rng;

/// Generate a string based on a pattern with placeholders.
pub fn generate_pattern<R: Rng>(pattern: &str, rng: &mut R, index: u64) -> String {
    let mut result = pattern.replace("{index}", &index.to_string());

    while result.contains("{uuid}") {
        result = result.replacen("{uuid}", &generate_uuid_v4(rng).to_string(), 1);
    }

    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("{rand:") {
        let start = search_from + offset;
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let end = start + len;
        match result[start + 6..end].parse::<usize>() {
            Ok(digits) => {
                let random_num = generate_random_digits(rng, digits);
                result = format!("{}{}{}", &result[..start], random_num, &result[end + 1..]);
                search_from = start + random_num.len();
            }
            // Leave malformed placeholders untouched.
            Err(_) => search_from = end + 1,
        }
    }

    result
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    if digits == 0 {
        return String::new();
    }

    let mut result = String::with_capacity(digits);

    // First digit is 1-9 to avoid leading zeros
    result.push(char::from(b'0' + rng.random_range(1..10u8)));
    for _ in 1..digits {
        result.push(char::from(b'0' + rng.random_range(0..10u8)));
    }

    result
}
