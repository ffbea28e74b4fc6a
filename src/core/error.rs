use std::borrow::Cow;

use crate::core::parameters::Field;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid `{field}`: {reason}")]
    InvalidParameter { field: Field, reason: Cow<'static, str> },

    #[error("the breakdown service is unavailable: {0}")]
    RemoteUnavailable(String),
}

impl Error {
    pub fn invalid(field: Field, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidParameter { field, reason: reason.into() }
    }
}
