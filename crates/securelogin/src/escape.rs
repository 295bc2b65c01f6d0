//! Comma-delimited lists with `%2C` escaping.
//!
//! Every `,` inside an element is written as `%2C`, so after joining each
//! remaining `,` is a field boundary. Splitting is the reverse: split on `,`
//! first, then unescape each piece.

use crate::error::FrameError;

pub const DELIMITER: char = ',';
pub const ESCAPED_DELIMITER: &str = "%2C";

/// Join elements with `,`, escaping commas inside each element.
pub fn escape_join<S: AsRef<str>>(elements: &[S]) -> String {
    elements
        .iter()
        .map(|e| e.as_ref().replace(DELIMITER, ESCAPED_DELIMITER))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split on `,` and unescape each piece, requiring exactly `expected` pieces.
pub fn unescape_split(s: &str, expected: usize) -> Result<Vec<String>, FrameError> {
    let pieces: Vec<&str> = s.split(DELIMITER).collect();

    if pieces.len() != expected {
        return Err(FrameError {
            expected,
            actual: pieces.len(),
        });
    }

    Ok(pieces
        .into_iter()
        .map(|p| p.replace(ESCAPED_DELIMITER, ","))
        .collect())
}

/// [`unescape_split`] into a fixed-size array.
pub fn unescape_split_n<const N: usize>(s: &str) -> Result<[String; N], FrameError> {
    unescape_split(s, N)?
        .try_into()
        .map_err(|pieces: Vec<String>| FrameError {
            expected: N,
            actual: pieces.len(),
        })
}
