use crate::data::record::DataValue;
use std::cmp::Ordering;

/// Compare two cells for sorting.
///
/// Cells fall into two classes: numeric (a finite numeric interpretation)
/// and text (everything else, including null). Every numeric cell sorts
/// before every text cell. Numbers compare numerically; text compares by
/// lower-cased text, falling back to the original text.
pub fn compare_datavalues(a: &DataValue, b: &DataValue) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => {
            let left = a.to_string();
            let right = b.to_string();
            left.to_lowercase()
                .cmp(&right.to_lowercase())
                .then_with(|| left.cmp(&right))
        }
    }
}

/// Compare optional cells; a missing cell sorts like an empty one
pub fn compare_optional_datavalues(a: Option<&DataValue>, b: Option<&DataValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_datavalues(a, b),
        (Some(a), None) => compare_datavalues(a, &DataValue::Null),
        (None, Some(b)) => compare_datavalues(&DataValue::Null, b),
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_strings_compare_as_numbers() {
        assert_eq!(
            compare_datavalues(&DataValue::from("10"), &DataValue::from("9")),
            Ordering::Greater
        );
        assert_eq!(
            compare_datavalues(&DataValue::Integer(2), &DataValue::from("2.0")),
            Ordering::Equal
        );
        assert_eq!(
            compare_datavalues(&DataValue::Float(-1.5), &DataValue::Integer(0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_text_is_case_insensitive() {
        assert_eq!(
            compare_datavalues(&DataValue::from("apple"), &DataValue::from("Banana")),
            Ordering::Less
        );
        // Only case differs: still a deterministic order
        assert_ne!(
            compare_datavalues(&DataValue::from("ali"), &DataValue::from("Ali")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_numbers_sort_before_text() {
        assert_eq!(
            compare_datavalues(&DataValue::from("10"), &DataValue::from("1a")),
            Ordering::Less
        );
        assert_eq!(
            compare_datavalues(&DataValue::from("abc"), &DataValue::Integer(99)),
            Ordering::Greater
        );
        // Missing cells sort like empty text
        assert_eq!(
            compare_optional_datavalues(None, Some(&DataValue::from("a"))),
            Ordering::Less
        );
        assert_eq!(
            compare_optional_datavalues(None, Some(&DataValue::from("5"))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_mixed_values_are_transitive() {
        let values: Vec<DataValue> = ["2", "10", "1a", "3", "2b", "100", "0x", "", "Ab", "ab"]
            .into_iter()
            .map(DataValue::from)
            .chain([DataValue::Null, DataValue::Integer(7), DataValue::Boolean(true)])
            .collect();

        for a in &values {
            for b in &values {
                assert_eq!(compare_datavalues(a, b), compare_datavalues(b, a).reverse());
                for c in &values {
                    if compare_datavalues(a, b) != Ordering::Greater
                        && compare_datavalues(b, c) != Ordering::Greater
                    {
                        assert_ne!(
                            compare_datavalues(a, c),
                            Ordering::Greater,
                            "{:?} <= {:?} <= {:?}",
                            a,
                            b,
                            c
                        );
                    }
                }
            }
        }
    }
}
