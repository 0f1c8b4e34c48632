//! Weight tokens and style buckets for Google Fonts file keys
//!
//! Google Fonts keys each file of a family with a blunt indicator such as
//! `regular`, `700` or `300italic`. The first three characters carry the
//! numeric weight code; anything after them is a style suffix.

use crate::StyleProperty;

/// Numeric weight codes and their names, in ascending order
pub const WEIGHT_CODES: [(&str, &str); 9] = [
    ("100", "thin"),
    ("200", "extralight"),
    ("300", "light"),
    ("400", "regular"),
    ("500", "medium"),
    ("600", "semibold"),
    ("700", "bold"),
    ("800", "extrabold"),
    ("900", "black"),
];

/// Weights that are only downloaded when explicitly attended
pub const EXTRA_WEIGHTS: [&str; 7] = [
    "thin",
    "extralight",
    "light",
    "medium",
    "semibold",
    "extrabold",
    "black",
];

/// Weight name for a three-digit code, if the code is known
pub fn weight_name(code: &str) -> Option<&'static str> {
    WEIGHT_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Derive the descriptive weight token from a file key.
///
/// `"700"` → `"bold"`, `"700italic"` → `"bold-italic"`, `"italic"` →
/// `"italic"`. When the numeric prefix is unknown the whole key stands alone;
/// keys of three characters or fewer without a known code yield `""`.
pub fn weight_from_file_key(key: &str) -> String {
    let named = key.get(..3).and_then(weight_name).unwrap_or("");
    let mut weight = named.to_string();

    if key.len() > 3 {
        if weight.is_empty() {
            weight.push_str(key);
        } else if let Some(rest) = key.get(3..) {
            weight.push('-');
            weight.push_str(rest);
        }
    }

    weight
}

/// Style bucket of a weight token: the segment after the last hyphen, kept
/// only when it is exactly `regular`, `bold` or `italic`.
pub fn style_property_for_weight(weight: &str) -> StyleProperty {
    let segment = weight.rsplit('-').next().unwrap_or(weight);
    match segment {
        "regular" => StyleProperty::Regular,
        "bold" => StyleProperty::Bold,
        "italic" => StyleProperty::Italic,
        _ => StyleProperty::Unclassified,
    }
}

/// Canonical name of an attendable extra weight, accepting `heavy` for `black`
pub fn parse_extra_weight(token: &str) -> Option<&'static str> {
    let token = token.trim().to_lowercase();
    if token == "heavy" {
        return Some("black");
    }
    EXTRA_WEIGHTS.iter().copied().find(|w| *w == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_table_is_total_over_codes() {
        let names: Vec<&str> = ["100", "200", "300", "400", "500", "600", "700", "800", "900"]
            .iter()
            .map(|code| weight_name(code).expect("known code"))
            .collect();
        assert_eq!(
            names,
            vec![
                "thin",
                "extralight",
                "light",
                "regular",
                "medium",
                "semibold",
                "bold",
                "extrabold",
                "black"
            ]
        );
        assert_eq!(weight_name("000"), None);
        assert_eq!(weight_name("950"), None);
    }

    #[test]
    fn file_keys_map_to_weight_tokens() {
        assert_eq!(weight_from_file_key("700"), "bold");
        assert_eq!(weight_from_file_key("700italic"), "bold-italic");
        assert_eq!(weight_from_file_key("300italic"), "light-italic");
        assert_eq!(weight_from_file_key("regular"), "regular");
        assert_eq!(weight_from_file_key("italic"), "italic");
        assert_eq!(weight_from_file_key("400"), "regular");
    }

    #[test]
    fn unknown_prefixes_contribute_nothing() {
        assert_eq!(weight_from_file_key("12"), "");
        assert_eq!(weight_from_file_key("950"), "");
        assert_eq!(weight_from_file_key("950italic"), "950italic");
    }

    #[test]
    fn style_property_uses_last_hyphen_segment() {
        assert_eq!(style_property_for_weight("bold-italic"), StyleProperty::Italic);
        assert_eq!(style_property_for_weight("light-italic"), StyleProperty::Italic);
        assert_eq!(style_property_for_weight("bold"), StyleProperty::Bold);
        assert_eq!(style_property_for_weight("regular"), StyleProperty::Regular);
        assert_eq!(style_property_for_weight("italic"), StyleProperty::Italic);
        assert_eq!(style_property_for_weight("extrabold"), StyleProperty::Unclassified);
        assert_eq!(style_property_for_weight("light"), StyleProperty::Unclassified);
        assert_eq!(style_property_for_weight(""), StyleProperty::Unclassified);
    }

    #[test]
    fn extra_weights_parse_with_alias() {
        assert_eq!(parse_extra_weight("light"), Some("light"));
        assert_eq!(parse_extra_weight(" SemiBold "), Some("semibold"));
        assert_eq!(parse_extra_weight("heavy"), Some("black"));
        assert_eq!(parse_extra_weight("regular"), None);
        assert_eq!(parse_extra_weight("ultra"), None);
    }
}
