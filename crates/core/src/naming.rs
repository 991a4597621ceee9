//! Identifier naming helpers.
//!
//! Location names arrive as free text from the mobile client ("Home",
//! "Office 2.OG"). Wherever a location name becomes part of an identifier it
//! goes through [`sanitize_location`] first; the stored `location` value keeps
//! the name verbatim.

/// Replace whitespace and literal dots with underscores.
///
/// # Examples
///
/// ```
/// use geozone_core::naming::sanitize_location;
///
/// assert_eq!(sanitize_location("Home"), "Home");
/// assert_eq!(sanitize_location("Office 2.OG"), "Office_2_OG");
/// ```
pub fn sanitize_location(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() || c == '.' { '_' } else { c })
        .collect()
}

/// Build the state id of a per-user field, e.g. `alice.location`.
pub fn user_state_id(user_id: &str, field: &str) -> String {
    format!("{user_id}.{field}")
}

/// Compare a reported location against the configured home location,
/// ignoring case and surrounding whitespace.
pub fn is_home_location(location_name: &str, home_name: &str) -> bool {
    location_name.trim().to_lowercase() == home_name.trim().to_lowercase()
}
