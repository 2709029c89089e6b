use std::fmt;

use matrix_shared::TaskId;

/// The four remote operations the board
/// can ask the server for.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ApiOp {
  Add,
  Complete,
  Delete,
  Move
}

impl fmt::Display for ApiOp {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(match self {
      | ApiOp::Add => "add",
      | ApiOp::Complete => "complete",
      | ApiOp::Delete => "delete",
      | ApiOp::Move => "move"
    })
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
  thiserror::Error,
)]
#[error(
  "{op} request{} failed: {reason}",
  for_task(.task_id)
)]
pub struct RequestFailed {
  pub op:      ApiOp,
  pub task_id: Option<TaskId>,
  pub status:  Option<u16>,
  pub reason:  String
}

fn for_task(
  task_id: &Option<TaskId>
) -> String {
  task_id
    .as_ref()
    .map(|id| format!(" for task {id}"))
    .unwrap_or_default()
}

impl RequestFailed {
  pub fn transport(
    op: ApiOp,
    task_id: Option<TaskId>,
    reason: impl Into<String>
  ) -> Self {
    Self {
      op,
      task_id,
      status: None,
      reason: reason.into()
    }
  }

  pub fn status(
    op: ApiOp,
    task_id: Option<TaskId>,
    status: u16
  ) -> Self {
    Self {
      op,
      task_id,
      status: Some(status),
      reason: format!(
        "server answered HTTP {status}"
      )
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
  thiserror::Error,
)]
pub enum ValidationError {
  #[error(
    "Please enter a task description"
  )]
  EmptyContent,
  #[error("Please choose a quadrant")]
  MissingQuadrant,
  #[error(
    "Quadrant must be between 1 and 4 \
     (got {0})"
  )]
  QuadrantOutOfRange(String)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("invalid board config: {0}")]
  Parse(#[from] toml::de::Error)
}

/// Why a gesture settled without the
/// board reaching the state the user
/// asked for.
#[derive(
  Debug, Clone, PartialEq, Eq,
  thiserror::Error,
)]
pub enum BoardError {
  #[error(transparent)]
  Validation(#[from] ValidationError),
  #[error(transparent)]
  RequestFailed(#[from] RequestFailed),
  #[error("no card for task {0}")]
  StaleReference(TaskId),
  #[error(
    "task {0} already has a mutation \
     in flight"
  )]
  Busy(TaskId),
  #[error("drop without a drag in progress")]
  NoDragInProgress
}
