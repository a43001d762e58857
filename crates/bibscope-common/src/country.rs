//! Small static country-name/alpha-3 resolution table (spec §3).
//!
//! Not a full ISO-3166 registry — covers the common names seen in author
//! affiliation strings. An implementer wanting full coverage can swap in a
//! crate without changing the `Publication` contract.

const COUNTRIES: &[(&str, &str)] = &[
    ("united states", "USA"),
    ("united states of america", "USA"),
    ("usa", "USA"),
    ("united kingdom", "GBR"),
    ("uk", "GBR"),
    ("china", "CHN"),
    ("germany", "DEU"),
    ("france", "FRA"),
    ("canada", "CAN"),
    ("japan", "JPN"),
    ("south korea", "KOR"),
    ("korea", "KOR"),
    ("india", "IND"),
    ("australia", "AUS"),
    ("switzerland", "CHE"),
    ("netherlands", "NLD"),
    ("singapore", "SGP"),
    ("israel", "ISR"),
    ("brazil", "BRA"),
    ("italy", "ITA"),
    ("spain", "ESP"),
    ("sweden", "SWE"),
];

/// Resolve a free-form country name or an ISO-3166 alpha-3 code to its
/// canonical alpha-3 code. Returns `None` if unresolvable.
pub fn resolve_country(input: &str) -> Option<&'static str> {
    let needle = input.trim().to_lowercase();

    if needle.len() == 3 && needle.chars().all(|c| c.is_ascii_alphabetic()) {
        if let Some((_, code)) = COUNTRIES.iter().find(|(_, code)| code.eq_ignore_ascii_case(&needle)) {
            return Some(code);
        }
    }

    COUNTRIES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_name_and_code() {
        assert_eq!(resolve_country("United States"), Some("USA"));
        assert_eq!(resolve_country("usa"), Some("USA"));
        assert_eq!(resolve_country("DEU"), Some("DEU"));
    }

    #[test]
    fn rejects_unknown() {
        assert_eq!(resolve_country("Narnia"), None);
    }
}
