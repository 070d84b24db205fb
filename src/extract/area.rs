//! Area resolution from the page heading

use crate::extract::schema::{AREA_HEADING, HEADING_PREFIX, HEADING_SELECTOR};
use crate::extract::{cell_text, selector, ExtractError, ExtractResult};
use crate::model::AreaKind;
use scraper::Html;

const COUNTY_MARKER: &str = "county";
const COUNTY_SUFFIX: &str = " county";

/// Reads the area heading of a detail page and classifies it
///
/// # Returns
///
/// * `Ok((display_name, kind))` - e.g. `("Washtenaw", AreaKind::County)`
/// * `Err(ExtractError)` - The page has no heading or it names no area
pub fn resolve_area(html: &str, state_suffixes: &[String]) -> ExtractResult<(String, AreaKind)> {
    let document = Html::parse_document(html);
    let heading_selector = selector(HEADING_SELECTOR)?;

    let heading = document
        .select(&heading_selector)
        .next()
        .map(|h| cell_text(&h))
        .ok_or_else(|| ExtractError::mismatch(AREA_HEADING, "no heading in page container"))?;

    classify_heading(&heading, state_suffixes)
}

/// Turns a heading such as "Living Wage Calculation for Washtenaw County, Michigan"
/// into a display name and an area kind
///
/// The kind is decided on the full area text before any suffix is removed:
/// anything mentioning "county" is a county, everything else a metro area.
pub fn classify_heading(
    heading: &str,
    state_suffixes: &[String],
) -> ExtractResult<(String, AreaKind)> {
    let collapsed = heading.split_whitespace().collect::<Vec<_>>().join(" ");
    let area_text = collapsed
        .strip_prefix(HEADING_PREFIX.trim_end())
        .unwrap_or(&collapsed)
        .trim();

    let kind = if area_text.to_lowercase().contains(COUNTY_MARKER) {
        AreaKind::County
    } else {
        AreaKind::MetroArea
    };

    let mut name = strip_state_suffix(area_text, state_suffixes);
    if kind == AreaKind::County {
        name = strip_suffix_ignore_case(name, COUNTY_SUFFIX);
    }
    let name = name.trim();

    if name.is_empty() {
        return Err(ExtractError::mismatch(
            AREA_HEADING,
            format!("heading '{}' names no area", collapsed),
        ));
    }

    Ok((name.to_string(), kind))
}

/// Removes the first matching state suffix
fn strip_state_suffix<'a>(text: &'a str, suffixes: &[String]) -> &'a str {
    suffixes
        .iter()
        .find_map(|suffix| {
            let stripped = strip_suffix_ignore_case(text, suffix.trim_end());
            (stripped.len() != text.len()).then_some(stripped)
        })
        .unwrap_or(text)
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> &'a str {
    if text.len() < suffix.len() {
        return text;
    }
    let split = text.len() - suffix.len();
    match text.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(suffix) => &text[..split],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTY_PAGE: &str = include_str!("../../tests/fixtures/county.html");
    const METRO_PAGE: &str = include_str!("../../tests/fixtures/metro.html");

    fn suffixes() -> Vec<String> {
        vec![", Michigan".to_string(), ", MI".to_string()]
    }

    #[test]
    fn test_resolve_county_page() {
        let (name, kind) = resolve_area(COUNTY_PAGE, &suffixes()).unwrap();
        assert_eq!(name, "Washtenaw");
        assert_eq!(kind, AreaKind::County);
    }

    #[test]
    fn test_resolve_metro_page() {
        let (name, kind) = resolve_area(METRO_PAGE, &suffixes()).unwrap();
        assert_eq!(name, "Ann Arbor");
        assert_eq!(kind, AreaKind::MetroArea);
    }

    #[test]
    fn test_classify_headings() {
        let cases = [
            (
                "Living Wage Calculation for Wayne County, Michigan",
                "Wayne",
                AreaKind::County,
            ),
            (
                "Living Wage Calculation for Detroit-Warren-Dearborn, MI",
                "Detroit-Warren-Dearborn",
                AreaKind::MetroArea,
            ),
            (
                "Living Wage Calculation for  St. Joseph   County,\n  Michigan ",
                "St. Joseph",
                AreaKind::County,
            ),
            ("Kent County", "Kent", AreaKind::County),
        ];

        for (heading, expected_name, expected_kind) in cases {
            let (name, kind) = classify_heading(heading, &suffixes()).unwrap();
            assert_eq!(name, expected_name, "heading: {}", heading);
            assert_eq!(kind, expected_kind, "heading: {}", heading);
        }
    }

    #[test]
    fn test_county_marker_inside_metro_name() {
        // Any mention of "county" classifies the area as a county
        let (name, kind) = classify_heading(
            "Living Wage Calculation for Orange County-Anaheim, MI",
            &suffixes(),
        )
        .unwrap();
        assert_eq!(kind, AreaKind::County);
        assert_eq!(name, "Orange County-Anaheim");
    }

    #[test]
    fn test_only_first_matching_suffix_is_stripped() {
        let (name, _) =
            classify_heading("Living Wage Calculation for Lansing, MI, Michigan", &suffixes())
                .unwrap();
        assert_eq!(name, "Lansing, MI");
    }

    #[test]
    fn test_empty_heading_is_mismatch() {
        let err = classify_heading("Living Wage Calculation for , Michigan", &suffixes())
            .unwrap_err();
        assert!(matches!(err, ExtractError::StructuralMismatch { .. }));
    }

    #[test]
    fn test_page_without_heading() {
        let err = resolve_area("<html><body><h1>Elsewhere</h1></body></html>", &suffixes())
            .unwrap_err();
        assert!(err.to_string().contains("no heading"));
    }
}
