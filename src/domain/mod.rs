use thiserror::Error;
use validator::ValidationErrors;

pub mod todo;

#[cfg(test)]
pub(crate) mod test_util;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input was invalid: {0}")]
    Invalid(ValidationErrors),
    #[error("requested data does not exist")]
    DoesNotExist,
    #[error("failed to {action} due to a communication failure: {cause}")]
    RetrieveFailure {
        action: String,
        #[source]
        cause: anyhow::Error,
    },
}

impl Error {
    /// Wraps a driven port failure with the [action] that was being attempted
    fn port_failure(action: &str) -> impl FnOnce(anyhow::Error) -> Error + '_ {
        move |cause| Error::RetrieveFailure {
            action: action.to_owned(),
            cause,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Self::Invalid(value)
    }
}
