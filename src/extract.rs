use crate::analysis::LocationCandidate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // lat<sep>lon in decimal degrees, comma or slash separated. Brackets
    // around the pair are tolerated because they sit outside the match.
    // The \b keeps the latitude from starting mid-number ("1089.5" must
    // not be read as "089.5"); the separator already anchors the longitude.
    static ref COORD_PATTERN: Regex =
        Regex::new(r"([-+]?\b\d{1,3}\.\d+)\s*[,/]\s*([-+]?\d{1,3}\.\d+)").unwrap();
}

/// Scans free-form model output for coordinate-looking pairs. The text is
/// not guaranteed to follow any template, so this is best-effort: pairs
/// outside [-90, 90] x [-180, 180] are dropped silently, order of first
/// appearance is preserved, and finding nothing is a normal outcome.
///
/// `dedupe` collapses repeated identical pairs; the default configuration
/// keeps them, matching the observed upstream behavior.
pub fn extract_candidates(text: &str, dedupe: bool) -> Vec<LocationCandidate> {
    let mut candidates: Vec<LocationCandidate> = Vec::new();

    for captures in COORD_PATTERN.captures_iter(text) {
        let matched = captures.get(0).unwrap().as_str();
        let (lat, lon) = match (captures[1].parse::<f64>(), captures[2].parse::<f64>()) {
            (Ok(lat), Ok(lon)) => (lat, lon),
            _ => continue,
        };

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            log::trace!("Dropping out-of-range pair {}", matched);
            continue;
        }

        if dedupe
            && candidates.iter().any(|c| {
                c.latitude.to_bits() == lat.to_bits() && c.longitude.to_bits() == lon.to_bits()
            })
        {
            log::trace!("Dropping duplicate pair {}", matched);
            continue;
        }

        candidates.push(LocationCandidate {
            latitude: lat,
            longitude: lon,
            matched_text: matched.to_string(),
        });
    }

    log::debug!(
        "Extracted {} location candidates from {} characters of text",
        candidates.len(),
        text.len()
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bracketed_pair() {
        let candidates =
            extract_candidates("The most likely spot is [40.712776, -74.005974].", false);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].latitude, 40.712776);
        assert_eq!(candidates[0].longitude, -74.005974);
        assert_eq!(candidates[0].matched_text, "40.712776, -74.005974");
    }

    #[test]
    fn extracts_slash_separated_pair() {
        let candidates = extract_candidates("coordinates: 48.858370 / 2.294481", false);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].latitude, 48.858370);
        assert_eq!(candidates[0].longitude, 2.294481);
    }

    #[test]
    fn drops_out_of_range_latitude() {
        let candidates = extract_candidates("see [200.0, 10.0] above", false);
        assert!(candidates.is_empty());
    }

    #[test]
    fn drops_out_of_range_longitude() {
        let candidates = extract_candidates("maybe -12.5, 181.25?", false);
        assert!(candidates.is_empty());
    }

    #[test]
    fn does_not_split_digits_out_of_larger_numbers() {
        // "1089.5" must be read whole (and dropped), not as "089.5"
        assert!(extract_candidates("elevation 1089.5, 10.0 km", false).is_empty());
        assert!(extract_candidates("about 1090.5, 10.0 meters up", false).is_empty());
    }

    #[test]
    fn signed_pair_after_digits_still_matches() {
        let candidates = extract_candidates("photo 42: 40.712776, -74.005974", false);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].latitude, 40.712776);
    }

    #[test]
    fn no_matches_is_an_empty_result() {
        let candidates = extract_candidates("No distinctive landmarks are visible.", false);
        assert!(candidates.is_empty());
    }

    #[test]
    fn repeated_pair_appears_twice_by_default() {
        let text = "PRIMARY: 40.712776, -74.005974. Repeated: 40.712776, -74.005974.";
        let candidates = extract_candidates(text, false);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], candidates[1]);
    }

    #[test]
    fn dedupe_collapses_repeated_pair() {
        let text = "PRIMARY: 40.712776, -74.005974. Repeated: 40.712776, -74.005974.";
        let candidates = extract_candidates(text, true);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn preserves_order_of_appearance() {
        let text = "PRINCIPAL: 40.416775, -3.703790\nALTERNATIVA 1: 41.385063, 2.173404";
        let candidates = extract_candidates(text, false);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].latitude, 40.416775);
        assert_eq!(candidates[1].latitude, 41.385063);
    }
}
