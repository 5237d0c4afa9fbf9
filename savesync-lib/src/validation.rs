pub const MAX_NAME_CHARS: usize = 128;
pub const MAX_PATH_CHARS: usize = 4096;

/// no control characters anywhere and at most `max_chars` characters
pub fn printable<G>(given: G, max_chars: Option<usize>) -> bool
where
    G: AsRef<str>
{
    let mut char_count = 0;

    for ch in given.as_ref().chars() {
        if ch.is_control() {
            return false;
        }

        char_count += 1;

        if max_chars.map(|max| char_count > max).unwrap_or(false) {
            return false;
        }
    }

    true
}

/// like [`printable`] but the value must also not start or end with
/// whitespace
pub fn printable_trimmed<G>(given: G, max_chars: Option<usize>) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    given_ref.trim() == given_ref && printable(given_ref, max_chars)
}

pub fn name_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    !given_ref.is_empty() && printable_trimmed(given_ref, Some(MAX_NAME_CHARS))
}

pub fn path_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    !given_ref.trim().is_empty() && printable(given_ref, Some(MAX_PATH_CHARS))
}

/// exclusion patterns are handed to the backend verbatim, only obviously
/// broken entries are rejected here
pub fn glob_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    !given_ref.trim().is_empty() && printable(given_ref, None)
}
