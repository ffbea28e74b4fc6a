use crate::core::{
    error::Error,
    parameters::{Field, Parameters},
    projection::Projection,
};

/// What an edit did to the projection.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Recompute {
    /// Parameters are the same as before, the projection is still current.
    Unchanged,

    /// Parameters changed and the projection has been rebuilt, redraw it.
    Redrawn,
}

/// Current parameters along with the projection built from them.
///
/// The projection is only rebuilt when the parameters actually change,
/// and an edit which fails validation leaves both untouched.
#[must_use]
pub struct Session {
    parameters: Parameters,
    projection: Projection,
}

impl Session {
    pub fn try_new(parameters: Parameters) -> Result<Self, Error> {
        let projection = Projection::try_new(&parameters)?;
        Ok(Self { parameters, projection })
    }

    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub const fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Apply a single field edit.
    pub fn set(&mut self, field: Field, value: &str) -> Result<Recompute, Error> {
        let mut parameters = self.parameters;
        field.apply(&mut parameters, value)?;
        self.update(parameters)
    }

    /// Replace all the parameters at once.
    pub fn update(&mut self, parameters: Parameters) -> Result<Recompute, Error> {
        if parameters == self.parameters {
            return Ok(Recompute::Unchanged);
        }
        self.projection = Projection::try_new(&parameters)?;
        self.parameters = parameters;
        Ok(Recompute::Redrawn)
    }
}
