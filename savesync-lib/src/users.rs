use email_address::EmailAddress;

use crate::validation::printable;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 512;

pub fn email_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    EmailAddress::is_valid(given.as_ref())
}

pub fn password_valid<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    given_ref.chars().count() >= MIN_PASSWORD_CHARS &&
        printable(given_ref, Some(MAX_PASSWORD_CHARS))
}
