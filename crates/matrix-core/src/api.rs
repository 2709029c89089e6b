use async_trait::async_trait;
use matrix_shared::{
  ApiEnvelope,
  Quadrant,
  TaskCreate,
  TaskDto,
  TaskId
};

use crate::error::{
  ApiOp,
  RequestFailed
};

/// Body of complete/delete/move replies;
/// its `data` is whatever the server
/// chose to send back.
pub type ApiReply =
  ApiEnvelope<serde_json::Value>;

/// Remote source of truth. One call per
/// mutation kind, no retries, no DOM and
/// no task state.
#[async_trait(?Send)]
pub trait TaskApi {
  async fn add_task(
    &self,
    args: &TaskCreate
  ) -> Result<ApiEnvelope<TaskDto>, RequestFailed>;

  async fn complete_task(
    &self,
    id: &TaskId
  ) -> Result<ApiReply, RequestFailed>;

  async fn delete_task(
    &self,
    id: &TaskId
  ) -> Result<ApiReply, RequestFailed>;

  async fn move_task(
    &self,
    id: &TaskId,
    quadrant: Quadrant
  ) -> Result<ApiReply, RequestFailed>;
}

/// Turns an HTTP-success body that still
/// reports `success: false` into a
/// failure.
pub fn check_envelope<T>(
  op: ApiOp,
  task_id: Option<&TaskId>,
  envelope: ApiEnvelope<T>
) -> Result<ApiEnvelope<T>, RequestFailed>
{
  if envelope.success {
    return Ok(envelope);
  }
  Err(RequestFailed::transport(
    op,
    task_id.cloned(),
    envelope.error.unwrap_or_else(|| {
      "server reported failure"
        .to_string()
    })
  ))
}
