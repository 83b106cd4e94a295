use nanoid::nanoid;

/// Digits used for generated sequence values.
const SEQUENCE_ALPHABET: &[char] = &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
/// Default sequence value length.
const SEQUENCE_LENGTH: usize = 6;

/// Generates a numeric sequence value, standing in for a host autonumber column.
pub fn generate_sequence_value() -> String {
    nanoid!(SEQUENCE_LENGTH, SEQUENCE_ALPHABET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_has_expected_length_and_charset() {
        let value = generate_sequence_value();
        assert_eq!(value.len(), SEQUENCE_LENGTH);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }
}
