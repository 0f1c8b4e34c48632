//! Download filtering for resolved variants
//!
//! Only Google Fonts variants carry weights, so filtering applies to primary
//! results alone; Font Squirrel variants are always downloaded as-is.

use crate::catalog::CatalogKind;
use crate::{FontVariant, StyleProperty};
use std::collections::BTreeSet;

/// Inclusion/exclusion options from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub ignore_regular: bool,
    pub ignore_italic: bool,
    pub ignore_bold: bool,
    /// Extra weights to download beyond regular, bold and italics
    pub attend_weights: BTreeSet<String>,
}

impl FilterOptions {
    pub fn any_ignored(&self) -> bool {
        self.ignore_regular || self.ignore_italic || self.ignore_bold
    }

    /// Whether `variant` survives the rules; the first matching rule excludes.
    pub fn keeps(&self, variant: &FontVariant) -> bool {
        let weight = variant.weight.as_str();
        let prop = variant.style_property;

        if self.ignore_regular
            && prop == StyleProperty::Regular
            && !(weight == "bold" && prop != StyleProperty::Italic)
        {
            return false;
        }

        if self.ignore_bold && weight == "bold" {
            return false;
        }

        if self.ignore_italic && prop == StyleProperty::Italic {
            return false;
        }

        if weight != "regular"
            && weight != "bold"
            && prop != StyleProperty::Italic
            && !self.attend_weights.contains(weight)
        {
            return false;
        }

        true
    }
}

/// Select the variants to download, preserving order.
pub fn filter_variants(
    variants: &[FontVariant],
    source: CatalogKind,
    options: &FilterOptions,
) -> Vec<FontVariant> {
    if !source.has_weights() {
        return variants.to_vec();
    }

    variants
        .iter()
        .filter(|v| {
            let keep = options.keeps(v);
            if !keep {
                log::debug!("Filtered out {} ({})", v.family, v.weight);
            }
            keep
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::style_property_for_weight;

    fn variant(weight: &str) -> FontVariant {
        FontVariant {
            family: "roboto".to_string(),
            style_property: style_property_for_weight(weight),
            weight: weight.to_string(),
            file_format: ".ttf".to_string(),
            source_url: format!("https://fonts.test/roboto-{weight}.ttf"),
        }
    }

    fn weights(variants: &[FontVariant]) -> Vec<&str> {
        variants.iter().map(|v| v.weight.as_str()).collect()
    }

    #[test]
    fn ignore_bold_drops_bold_and_unattended_weights() {
        let input = vec![variant("regular"), variant("bold"), variant("light")];
        let options = FilterOptions {
            ignore_bold: true,
            ..Default::default()
        };

        let kept = filter_variants(&input, CatalogKind::Primary, &options);
        assert_eq!(weights(&kept), vec!["regular"]);
    }

    #[test]
    fn default_policy_keeps_standard_weights_and_italics() {
        let input = vec![
            variant("thin"),
            variant("regular"),
            variant("italic"),
            variant("bold"),
            variant("bold-italic"),
            variant("light-italic"),
            variant("black"),
        ];

        let kept = filter_variants(&input, CatalogKind::Primary, &FilterOptions::default());
        assert_eq!(
            weights(&kept),
            vec!["regular", "italic", "bold", "bold-italic", "light-italic"]
        );
    }

    #[test]
    fn attended_weights_are_included() {
        let input = vec![variant("light"), variant("medium"), variant("black")];
        let options = FilterOptions {
            attend_weights: ["light", "black"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };

        let kept = filter_variants(&input, CatalogKind::Primary, &options);
        assert_eq!(weights(&kept), vec!["light", "black"]);
    }

    #[test]
    fn ignore_regular_and_italic() {
        let input = vec![
            variant("regular"),
            variant("italic"),
            variant("bold"),
            variant("bold-italic"),
        ];
        let options = FilterOptions {
            ignore_regular: true,
            ignore_italic: true,
            ..Default::default()
        };

        let kept = filter_variants(&input, CatalogKind::Primary, &options);
        assert_eq!(weights(&kept), vec!["bold"]);
    }

    #[test]
    fn secondary_results_are_never_filtered() {
        let mut mono = variant("");
        mono.style_property = StyleProperty::Monospace;
        let input = vec![mono];
        let options = FilterOptions {
            ignore_regular: true,
            ignore_italic: true,
            ignore_bold: true,
            ..Default::default()
        };

        let kept = filter_variants(&input, CatalogKind::Secondary, &options);
        assert_eq!(kept, input);
    }

    #[test]
    fn filtering_is_idempotent() {
        let input: Vec<FontVariant> = [
            "thin", "regular", "italic", "medium", "bold", "bold-italic", "extrabold",
        ]
        .iter()
        .map(|w| variant(w))
        .collect();

        let option_sets = vec![
            FilterOptions::default(),
            FilterOptions {
                ignore_bold: true,
                attend_weights: ["medium".to_string()].into_iter().collect(),
                ..Default::default()
            },
            FilterOptions {
                ignore_regular: true,
                ignore_italic: true,
                ..Default::default()
            },
        ];

        for options in option_sets {
            let once = filter_variants(&input, CatalogKind::Primary, &options);
            let twice = filter_variants(&once, CatalogKind::Primary, &options);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn any_ignored_reflects_flags() {
        assert!(!FilterOptions::default().any_ignored());
        assert!(FilterOptions {
            ignore_italic: true,
            ..Default::default()
        }
        .any_ignored());
    }
}
