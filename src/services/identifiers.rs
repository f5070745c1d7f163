// src/services/identifiers.rs
// DOCUMENTATION: Horoo ID and slug generation
// PURPOSE: Pure helpers; uniqueness is enforced by the database constraints

use crate::errors::HorooError;

/// Next Horoo ID for a family given the most recently created one
/// DOCUMENTATION: `<prefix>0001` for the first listing, otherwise the numeric
/// suffix (everything after the first three characters) plus one, zero-padded
/// to at least four digits
pub fn next_horoo_id(prefix: &str, last: Option<&str>) -> Result<String, HorooError> {
    let last = match last {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(format!("{}0001", prefix)),
    };

    let suffix = last.get(3..).unwrap_or("");
    let number: u64 = suffix.parse().map_err(|_| {
        log::error!("Cannot parse Horoo ID suffix from {}", last);
        HorooError::InternalError(format!("Error generating horooId from {}", last))
    })?;

    Ok(format!("{}{:04}", prefix, number + 1))
}

/// URL slug from a display name
/// DOCUMENTATION: Lowercase and trim, keep `[a-z0-9_]`, whitespace and `-`,
/// turn whitespace runs into `-` and collapse repeated `-`. Falls back to the
/// lower-cased Horoo ID when nothing usable remains.
pub fn slugify(name: &str, horoo_id: &str) -> String {
    let lowered = name.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    if slug.is_empty() {
        horoo_id.to_lowercase()
    } else {
        slug
    }
}

/// Candidate for the given attempt: `base`, `base-1`, `base-2`, ...
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_horoo_id() {
        assert_eq!(next_horoo_id("HRM", None).unwrap(), "HRM0001");
        assert_eq!(next_horoo_id("MES", Some("")).unwrap(), "MES0001");
    }

    #[test]
    fn test_next_horoo_id_increments_and_pads() {
        assert_eq!(next_horoo_id("HRM", Some("HRM0001")).unwrap(), "HRM0002");
        assert_eq!(next_horoo_id("HFT", Some("HFT0099")).unwrap(), "HFT0100");
        assert_eq!(next_horoo_id("HHL", Some("HHL9999")).unwrap(), "HHL10000");
    }

    #[test]
    fn test_unparseable_suffix_is_internal_error() {
        let err = next_horoo_id("HRM", Some("HRMabc")).unwrap_err();
        assert!(matches!(err, HorooError::InternalError(_)));
        assert!(next_horoo_id("HRM", Some("HR")).is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Sunrise Hotel Deluxe ", "HHR0001"), "sunrise-hotel-deluxe");
        assert_eq!(slugify("A & B -- Rooms!", "HRM0001"), "a-b-rooms");
        assert_eq!(slugify("room_no 5", "HRM0001"), "room_no-5");
        assert_eq!(slugify("Café Déjà", "HRM0001"), "caf-dj");
    }

    #[test]
    fn test_slugify_falls_back_to_horoo_id() {
        assert_eq!(slugify("!!!", "HSE0042"), "hse0042");
        assert_eq!(slugify("", "HCL0003"), "hcl0003");
    }

    #[test]
    fn test_slug_candidates() {
        assert_eq!(slug_candidate("green-villa", 0), "green-villa");
        assert_eq!(slug_candidate("green-villa", 1), "green-villa-1");
        assert_eq!(slug_candidate("green-villa", 12), "green-villa-12");
    }
}
