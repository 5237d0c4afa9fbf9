pub mod ids;
pub mod error;
pub mod validation;
pub mod users;
pub mod formatting;
