use async_trait::async_trait;
use gloo::net::http::{Request, Response};
use matrix_core::api::{ApiReply, TaskApi, check_envelope};
use matrix_core::config::{ApiConfig, MoveMethod};
use matrix_core::error::{ApiOp, RequestFailed};
use matrix_core::{ApiEnvelope, Quadrant, TaskCreate, TaskDto, TaskId};
use matrix_shared::{TaskIdArg, TaskMoveArgs};
use serde::Serialize;

/// `TaskApi` over `fetch`, JSON in and out.
pub struct HttpTaskApi {
    config: ApiConfig,
}

impl HttpTaskApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    fn json_request<B>(
        &self,
        op: ApiOp,
        task_id: Option<&TaskId>,
        url: &str,
        method: MoveMethod,
        body: &B,
    ) -> Result<Request, RequestFailed>
    where
        B: Serialize + ?Sized,
    {
        let builder = match method {
            MoveMethod::Put => Request::put(url),
            MoveMethod::Post => Request::post(url),
            MoveMethod::Patch => Request::patch(url),
        };
        builder
            .json(body)
            .map_err(|e| failed(op, task_id, format!("failed to encode body: {e}")))
    }

    async fn reply(
        &self,
        op: ApiOp,
        task_id: &TaskId,
        request: Request,
    ) -> Result<ApiReply, RequestFailed> {
        let response = send(op, Some(task_id), request).await?;
        let text = response.text().await.unwrap_or_default();
        let envelope = if text.trim().is_empty() {
            ApiReply::empty()
        } else {
            serde_json::from_str::<ApiReply>(&text).unwrap_or_else(|error| {
                tracing::warn!(%op, %task_id, %error, "reply body was not an envelope; treating as success");
                ApiReply::empty()
            })
        };
        check_envelope(op, Some(task_id), envelope)
    }
}

fn failed(op: ApiOp, task_id: Option<&TaskId>, reason: String) -> RequestFailed {
    RequestFailed::transport(op, task_id.cloned(), reason)
}

async fn send(
    op: ApiOp,
    task_id: Option<&TaskId>,
    request: Request,
) -> Result<Response, RequestFailed> {
    tracing::debug!(%op, url = %request.url(), "sending request");
    let response = request
        .send()
        .await
        .map_err(|e| failed(op, task_id, format!("fetch error: {e}")))?;

    if !response.ok() {
        let status = response.status();
        tracing::warn!(%op, status, "request answered with error status");
        return Err(RequestFailed::status(op, task_id.cloned(), status));
    }
    Ok(response)
}

#[async_trait(?Send)]
impl TaskApi for HttpTaskApi {
    async fn add_task(&self, args: &TaskCreate) -> Result<ApiEnvelope<TaskDto>, RequestFailed> {
        let request = self.json_request(
            ApiOp::Add,
            None,
            &self.config.add_url(),
            MoveMethod::Post,
            args,
        )?;
        let response = send(ApiOp::Add, None, request).await?;
        let envelope = response
            .json::<ApiEnvelope<TaskDto>>()
            .await
            .map_err(|e| failed(ApiOp::Add, None, format!("decode error: {e}")))?;
        check_envelope(ApiOp::Add, None, envelope)
    }

    async fn complete_task(&self, id: &TaskId) -> Result<ApiReply, RequestFailed> {
        let request = self.json_request(
            ApiOp::Complete,
            Some(id),
            &self.config.complete_url(),
            MoveMethod::Post,
            &TaskIdArg { id: id.clone() },
        )?;
        self.reply(ApiOp::Complete, id, request).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<ApiReply, RequestFailed> {
        let encoded: String = js_sys::encode_uri_component(id.as_str()).into();
        let url = format!("{}?id={encoded}", self.config.delete_url());
        let request = Request::delete(&url)
            .build()
            .map_err(|e| failed(ApiOp::Delete, Some(id), format!("failed to build request: {e}")))?;
        self.reply(ApiOp::Delete, id, request).await
    }

    async fn move_task(&self, id: &TaskId, quadrant: Quadrant) -> Result<ApiReply, RequestFailed> {
        let request = self.json_request(
            ApiOp::Move,
            Some(id),
            &self.config.move_url(),
            self.config.move_method,
            &TaskMoveArgs {
                id: id.clone(),
                quadrant,
            },
        )?;
        self.reply(ApiOp::Move, id, request).await
    }
}
