//! Resource URL parsing.

use url::Url;

/// Extracts the resource id from a catalog item URL.
///
/// The id is the last non-empty path segment, so both
/// `https://host/api/v2/pokemon-species/25/` and `.../25` yield `"25"`.
/// Returns `None` for unparsable URLs or URLs without a path.
///
/// # Examples
///
/// ```
/// use scrolldex::infrastructure::resource_id;
///
/// assert_eq!(
///     resource_id("https://pokeapi.co/api/v2/pokemon-species/25/").as_deref(),
///     Some("25")
/// );
/// assert_eq!(resource_id("not a url"), None);
/// ```
#[must_use]
pub fn resource_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    parsed
        .path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}
