use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TicketError;

/// Form slot ids are this prefix followed by the 1-based position.
pub const SLOT_PREFIX: &str = "no";

/// A sorted, duplicate-free sequence of drawn numbers.
///
/// A `Draw` can only be built from values that are strictly ascending, so
/// every instance upholds the draw invariant. Its text form is the values
/// separated by single spaces.
///
/// ```rust
/// use luckydip::draw::Draw;
///
/// let draw: Draw = "1 5 12 33 40 60".parse().unwrap();
/// assert_eq!(draw.numbers(), &[1, 5, 12, 33, 40, 60]);
/// assert_eq!(draw.to_string(), "1 5 12 33 40 60");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct Draw(Vec<i32>);

impl Draw {
    /// Wraps values the caller has already sorted and deduplicated.
    pub(crate) fn from_sorted(numbers: Vec<i32>) -> Self {
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        Self(numbers)
    }

    pub fn numbers(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs each value with the id of the form field it belongs in.
    ///
    /// The smallest value goes to `no1`, the next to `no2`, and so on.
    pub fn slots(&self) -> impl Iterator<Item = (String, i32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &value)| (format!("{SLOT_PREFIX}{}", i + 1), value))
    }
}

impl TryFrom<Vec<i32>> for Draw {
    type Error = TicketError;

    fn try_from(numbers: Vec<i32>) -> Result<Self, Self::Error> {
        for pair in numbers.windows(2) {
            if pair[0] == pair[1] {
                return Err(TicketError::Duplicate(pair[0]));
            }
            if pair[0] > pair[1] {
                return Err(TicketError::NotAscending);
            }
        }
        Ok(Self(numbers))
    }
}

impl From<Draw> for Vec<i32> {
    fn from(draw: Draw) -> Self {
        draw.0
    }
}

impl FromStr for Draw {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbers = parse_numbers(s)?;
        Draw::try_from(numbers)
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for value in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Splits whitespace-separated integers without checking any draw rule.
pub fn parse_numbers(s: &str) -> Result<Vec<i32>, TicketError> {
    s.split_whitespace()
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|_| TicketError::NotANumber(token.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_and_prints_text_form() {
        let draw: Draw = "  3\t17 22\n59 ".parse().unwrap();
        assert_eq!(draw.numbers(), &[3, 17, 22, 59]);
        assert_eq!(draw.to_string(), "3 17 22 59");
    }

    #[test]
    fn empty_text_is_an_empty_draw() {
        let draw: Draw = "".parse().unwrap();
        assert!(draw.is_empty());
        assert_eq!(draw.to_string(), "");
    }

    #[test]
    fn rejects_duplicates_unsorted_and_garbage() {
        assert_eq!("1 5 5 9".parse::<Draw>(), Err(TicketError::Duplicate(5)));
        assert_eq!("9 5".parse::<Draw>(), Err(TicketError::NotAscending));
        assert_eq!(
            "1 two 3".parse::<Draw>(),
            Err(TicketError::NotANumber("two".to_string()))
        );
    }

    #[test]
    fn slots_follow_ascending_order() {
        let draw: Draw = "1 5 12 33 40 60".parse().unwrap();
        let slots: Vec<_> = draw.slots().collect();
        assert_eq!(
            slots,
            vec![
                ("no1".to_string(), 1),
                ("no2".to_string(), 5),
                ("no3".to_string(), 12),
                ("no4".to_string(), 33),
                ("no5".to_string(), 40),
                ("no6".to_string(), 60),
            ]
        );
    }

    #[test]
    fn json_form_is_a_plain_array() {
        let draw: Draw = "4 8 15 16 23 42".parse().unwrap();
        let json = serde_json::to_string(&draw).unwrap();
        assert_eq!(json, "[4,8,15,16,23,42]");
        let back: Draw = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draw);
    }

    #[test]
    fn json_deserialization_checks_the_invariant() {
        assert!(serde_json::from_str::<Draw>("[3,2,1]").is_err());
        assert!(serde_json::from_str::<Draw>("[1,1]").is_err());
    }
}
