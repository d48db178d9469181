//! Identity derivation and display helpers.

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";
const AVATAR_BACKGROUND: &str = "1f77b4";
const AVATAR_COLOR: &str = "fff";

/// Derive the partition key for an email address.
///
/// Trim, lower-case, then replace `@` and `.` with `_`. Existing data files are
/// keyed with exactly this mapping, so it must not change.
#[must_use]
pub fn identity_from_email(email: &str) -> String {
    email
        .trim()
        .to_lowercase()
        .replace('@', "_")
        .replace('.', "_")
}

/// Build the display-only avatar image URL for a user name.
///
/// Spaces become `+`; every other reserved character is percent-encoded.
#[must_use]
pub fn avatar_url(name: &str) -> String {
    let encoded = name
        .split(' ')
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("+");
    format!("{AVATAR_BASE_URL}?name={encoded}&background={AVATAR_BACKGROUND}&color={AVATAR_COLOR}")
}
