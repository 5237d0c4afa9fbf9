use crate::FieldErrors;

pub trait Validator {
    fn validate(&self) -> Result<(), FieldErrors> {
        Ok(())
    }
}
