use matrix_shared::{
  Quadrant,
  TaskCreate
};

use crate::error::ValidationError;

/// Raw field values read from the add
/// form, before any checking.
#[derive(Debug, Clone, Default)]
pub struct AddDraft {
  pub content:  String,
  pub quadrant: String
}

impl AddDraft {
  pub fn new(
    content: impl Into<String>,
    quadrant: impl Into<String>
  ) -> Self {
    Self {
      content:  content.into(),
      quadrant: quadrant.into()
    }
  }

  pub fn validate(
    &self
  ) -> Result<TaskCreate, ValidationError>
  {
    let content = self.content.trim();
    if content.is_empty() {
      return Err(
        ValidationError::EmptyContent
      );
    }

    let raw_quadrant = self.quadrant.trim();
    if raw_quadrant.is_empty() {
      return Err(
        ValidationError::MissingQuadrant
      );
    }
    let quadrant = Quadrant::parse(
      raw_quadrant
    )
    .ok_or_else(|| {
      ValidationError::QuadrantOutOfRange(
        raw_quadrant.to_string()
      )
    })?;

    Ok(TaskCreate {
      content: content.to_string(),
      quadrant
    })
  }
}
