//! Positional rectification into the `AAAAA999AAAA` identifier shape.

use serde::Serialize;

use super::clean_code;

/// Filler used for missing letters.
pub const LETTER_FILLER: char = 'X';
/// Filler used for missing digits.
pub const DIGIT_FILLER: char = '0';

const FIRST_WIDTH: usize = 5;
const MIDDLE_WIDTH: usize = 3;
const LAST_WIDTH: usize = 4;

/// Length of every rectified code.
pub const RECTIFIED_LEN: usize = FIRST_WIDTH + MIDDLE_WIDTH + LAST_WIDTH;

/// The three fixed-width segments of a rectified code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segments {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl Segments {
    pub fn join(&self) -> String {
        let mut code = String::with_capacity(RECTIFIED_LEN);
        code.push_str(&self.first);
        code.push_str(&self.middle);
        code.push_str(&self.last);
        code
    }
}

/// Cleans `raw` and rebuilds it as 5 letters, 3 digits and 4 letters.
///
/// Total over any input: `rectify("")` is `XXXXX000XXXX`.
pub fn rectify(raw: &str) -> String {
    segments(&clean_code(raw)).join()
}

/// Splits an already cleaned, uppercased code into rectified segments.
///
/// The first and last letter windows are taken independently from the same
/// letter sequence, so with 5 to 8 letters they overlap.
pub fn segments(cleaned: &str) -> Segments {
    let letters: Vec<char> = cleaned.chars().filter(char::is_ascii_uppercase).collect();
    let digits: Vec<char> = cleaned.chars().filter(char::is_ascii_digit).collect();

    let first = padded(&letters, LETTER_FILLER, FIRST_WIDTH);
    let middle = padded(&digits, DIGIT_FILLER, MIDDLE_WIDTH);

    let count = letters.len();
    let last = if count >= 9 {
        letters[count - LAST_WIDTH..].iter().collect()
    } else if count >= FIRST_WIDTH {
        let take = LAST_WIDTH.min(count);
        padded(&letters[count - take..], LETTER_FILLER, LAST_WIDTH)
    } else {
        LETTER_FILLER.to_string().repeat(LAST_WIDTH)
    };

    Segments { first, middle, last }
}

fn padded(chars: &[char], filler: char, width: usize) -> String {
    chars
        .iter()
        .copied()
        .chain(std::iter::repeat(filler))
        .take(width)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_all_filler() {
        assert_eq!(rectify(""), "XXXXX000XXXX");
    }

    #[test]
    fn canonical_lowercase_input_is_uppercased() {
        assert_eq!(rectify("adibw002lfln"), "ADIBW002LFLN");
    }

    #[test]
    fn short_input_pads_every_segment() {
        assert_eq!(rectify("ab12"), "ABXXX120XXXX");
    }

    #[test]
    fn four_letters_never_fill_last_segment() {
        let parts = segments("ABCD123");
        assert_eq!(parts.first, "ABCDX");
        assert_eq!(parts.last, "XXXX");
    }

    #[test]
    fn five_to_eight_letters_overlap_windows() {
        // ABCDE: first window ABCDE, last window reuses BCDE
        assert_eq!(rectify("abcde-7"), "ABCDE700BCDE");
        assert_eq!(rectify("ABCDEFGH 12345"), "ABCDE123EFGH");
    }

    #[test]
    fn nine_or_more_letters_take_trailing_four() {
        assert_eq!(rectify("ADIBW 002 XX LFLN"), "ADIBW002LFLN");
        assert_eq!(rectify("abcdefghijk9"), "ABCDE900HIJK");
    }

    #[test]
    fn digits_keep_first_three_in_order() {
        assert_eq!(rectify("9a8b7c6d5e"), "ABCDE987BCDE");
    }

    #[test]
    fn punctuation_and_non_ascii_are_dropped() {
        assert_eq!(rectify("ád-ib/w 0_0_2 · lf-ln"), "DIBWL002LFLN");
    }

    #[test]
    fn rectified_codes_are_fixed_points() {
        for raw in ["", "ab12", "abcde-7", "ADIBW002LFLN", "x", "123456789", "abcdefghijklmnop", "Q9"] {
            let once = rectify(raw);
            assert_eq!(once.len(), RECTIFIED_LEN);
            assert_eq!(rectify(&once), once, "rectify is not idempotent for {raw:?}");
        }
    }
}
