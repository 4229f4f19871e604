//! URL-slug derivation for organization and school names.

/// Derive a slug from a display name: lowercase, every non-alphanumeric
/// character replaced with `-`.
///
/// Deterministic and pure; the derived slug participates in the same
/// uniqueness constraint as the name itself.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
