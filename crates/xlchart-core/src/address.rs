//! A1-style cell and range addressing
//!
//! Columns are 1-based here (A = 1), matching how the output sheet is laid
//! out: column 1 holds the shared x-axis, columns 2.. hold one category each.
//! Rows are 1-based as displayed by spreadsheet applications.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::MAX_COLS;

/// Convert a 1-based column index to letters (1 = A, 26 = Z, 27 = AA, etc.)
///
/// # Examples
/// ```
/// use xlchart_core::address::column_letter;
///
/// assert_eq!(column_letter(1).unwrap(), "A");
/// assert_eq!(column_letter(28).unwrap(), "AB");
/// assert!(column_letter(0).is_err());
/// ```
pub fn column_letter(index: u32) -> Result<String> {
    if index == 0 || index > MAX_COLS {
        return Err(Error::ColumnOutOfRange(index));
    }

    let mut letters = Vec::with_capacity(3);
    let mut n = index;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();

    // Only ASCII uppercase bytes were pushed
    Ok(letters.into_iter().map(char::from).collect())
}

/// Convert column letters to a 1-based index (A = 1, Z = 26, AA = 27, etc.)
pub fn column_index(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        col = col
            .saturating_mul(26)
            .saturating_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }

    if col > MAX_COLS {
        return Err(Error::ColumnOutOfRange(col));
    }

    Ok(col)
}

/// Format a relative cell address, e.g. `(2, 3)` -> `"B3"`
pub fn cell_address(column: u32, row: u32) -> Result<String> {
    Ok(format!("{}{}", column_letter(column)?, row))
}

/// Format a sheet-qualified absolute cell address, e.g. `Sheet1!$B$1`
pub fn absolute_cell_address(sheet: &str, column: u32, row: u32) -> Result<String> {
    let letter = column_letter(column)?;
    Ok(format!("{}!${}${}", quote_sheet_name(sheet), letter, row))
}

/// Format a sheet-qualified absolute single-column range,
/// e.g. `("Test", 1, 2, 8)` -> `"Test!$A$2:$A$8"`
pub fn absolute_range(sheet: &str, column: u32, start_row: u32, end_row: u32) -> Result<String> {
    let letter = column_letter(column)?;
    Ok(format!(
        "{}!${}${}:${}${}",
        quote_sheet_name(sheet),
        letter,
        start_row,
        letter,
        end_row
    ))
}

/// Parse an A1-style cell (`"E1"`, `"$E$1"`) into 1-based `(column, row)`
pub fn parse_cell(s: &str) -> Result<(u32, u32)> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidAddress("empty address".into()));
    }

    let unanchored = s.strip_prefix('$').unwrap_or(s);
    let split = unanchored
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(unanchored.len());
    let (letters, rest) = unanchored.split_at(split);

    if letters.is_empty() {
        return Err(Error::InvalidAddress(format!(
            "no column letters in '{}'",
            s
        )));
    }
    let column = column_index(letters)?;

    let digits = rest.strip_prefix('$').unwrap_or(rest);
    if digits.is_empty() {
        return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
    }
    let row: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;
    if row == 0 {
        return Err(Error::InvalidAddress(format!(
            "row number must be >= 1 in '{}'",
            s
        )));
    }

    Ok((column, row))
}

/// Quote a sheet name for use in a formula reference when required.
///
/// Plain identifiers (`Sheet1`, `mias_chart`) pass through unchanged; names
/// with spaces or punctuation, names starting with a digit, and names that
/// read as a cell reference are wrapped in single quotes with embedded quotes
/// doubled.
pub fn quote_sheet_name(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_alphabetic() || first == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        }
        None => false,
    };

    if plain && parse_cell(name).is_err() {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("'{}'", name.replace('\'', "''")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1).unwrap(), "A");
        assert_eq!(column_letter(2).unwrap(), "B");
        assert_eq!(column_letter(9).unwrap(), "I");
        assert_eq!(column_letter(26).unwrap(), "Z");
        assert_eq!(column_letter(27).unwrap(), "AA");
        assert_eq!(column_letter(52).unwrap(), "AZ");
        assert_eq!(column_letter(702).unwrap(), "ZZ");
        assert_eq!(column_letter(703).unwrap(), "AAA");
        assert_eq!(column_letter(16384).unwrap(), "XFD"); // Max Excel column
    }

    #[test]
    fn test_column_letter_out_of_range() {
        assert_eq!(column_letter(0), Err(Error::ColumnOutOfRange(0)));
        assert_eq!(column_letter(16385), Err(Error::ColumnOutOfRange(16385)));
        assert!(cell_address(0, 1).is_err());
        assert!(absolute_cell_address("Test", 16385, 1).is_err());
        assert!(absolute_range("Test", 0, 2, 8).is_err());
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A").unwrap(), 1);
        assert_eq!(column_index("Z").unwrap(), 26);
        assert_eq!(column_index("AA").unwrap(), 27);
        assert_eq!(column_index("XFD").unwrap(), 16384);

        // Case insensitive
        assert_eq!(column_index("e").unwrap(), 5);

        assert!(column_index("").is_err());
        assert!(column_index("A1").is_err());
        assert!(column_index("XFE").is_err());
        assert!(column_index("ZZZZZZZZZZ").is_err());
    }

    #[test]
    fn test_cell_address() {
        assert_eq!(cell_address(2, 3).unwrap(), "B3");
        assert_eq!(cell_address(1, 1).unwrap(), "A1");
        assert_eq!(cell_address(28, 100).unwrap(), "AB100");
    }

    #[test]
    fn test_absolute_addresses() {
        assert_eq!(absolute_range("Test", 1, 2, 8).unwrap(), "Test!$A$2:$A$8");
        assert_eq!(
            absolute_cell_address("mias_chart", 2, 1).unwrap(),
            "mias_chart!$B$1"
        );
        assert_eq!(
            absolute_range("mias_chart", 30, 2, 4).unwrap(),
            "mias_chart!$AD$2:$AD$4"
        );
    }

    #[test]
    fn test_quoted_sheet_names() {
        assert_eq!(
            absolute_cell_address("dummy data", 2, 1).unwrap(),
            "'dummy data'!$B$1"
        );
        assert_eq!(
            absolute_range("Bob's", 1, 2, 3).unwrap(),
            "'Bob''s'!$A$2:$A$3"
        );
        assert_eq!(quote_sheet_name("2024"), "'2024'");
        assert_eq!(quote_sheet_name("A1"), "'A1'");
        assert_eq!(quote_sheet_name("Sheet1"), "Sheet1");
        assert_eq!(quote_sheet_name("data.v2"), "data.v2");
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("E1").unwrap(), (5, 1));
        assert_eq!(parse_cell("$E$1").unwrap(), (5, 1));
        assert_eq!(parse_cell("aa10").unwrap(), (27, 10));
        assert_eq!(parse_cell(" B2 ").unwrap(), (2, 2));

        assert!(parse_cell("").is_err());
        assert!(parse_cell("E").is_err());
        assert!(parse_cell("10").is_err());
        assert!(parse_cell("E0").is_err());
        assert!(parse_cell("E1x").is_err());
    }

    proptest! {
        #[test]
        fn column_letters_round_trip(index in 1u32..=16384) {
            let letters = column_letter(index).unwrap();
            prop_assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
            prop_assert_eq!(column_index(&letters).unwrap(), index);
        }

        #[test]
        fn column_letters_are_ordered(index in 1u32..16384) {
            let a = column_letter(index).unwrap();
            let b = column_letter(index + 1).unwrap();
            prop_assert!((a.len(), a.as_str()) < (b.len(), b.as_str()));
        }
    }
}
