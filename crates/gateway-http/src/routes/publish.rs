//! Stream-scoped actions: publish, check an ack's status, delete a stream.
//! "Publish" (topic lineage) and "SendMessage" (queue lineage) differ only
//! in field naming on the wire; both funnel into the same fast-path.

use crate::error::{self, Error};
use crate::middleware::RequestId;
use crate::routes::action::Action;
use crate::routes::envelope::ResponseMetadata;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use gateway_broker::{admin, publish as broker_publish, srn};
use gateway_dispatch::{AckTask, DEFAULT_ACK_TIMEOUT};
use gateway_store::{AckResult, AckStatus, ACK_RESULT_TTL};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct StreamActionQuery {
    #[serde(rename = "Action")]
    action: String,
    #[serde(rename = "messageId", default)]
    message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(rename = "topicName", alias = "queueName", default)]
    topic_name: String,
    message: String,
    #[serde(default)]
    subject: String,
}

#[derive(Debug, Serialize)]
struct PublishResponse {
    #[serde(rename = "messageId")]
    message_id: String,
}

#[derive(Debug, Serialize)]
struct CheckAckStatusResponse {
    status: String,
}

#[derive(Debug, Deserialize, Default)]
struct DeleteStreamRequest {
    #[serde(rename = "TopicSrn", alias = "QueueSrn", default)]
    srn: String,
}

#[derive(Debug, Serialize)]
struct DeleteStreamResponse {
    #[serde(rename = "ResponseMetadata")]
    response_metadata: ResponseMetadata,
}

pub async fn stream_handler(
    State(state): State<AppState>,
    // Neither the original topic/queue handlers nor this port use the path
    // segment: the stream is always named by the request body (`TopicSrn`/
    // `QueueSrn` on delete, `topicName`/`queueName` on publish).
    Path((_account_id, _stream_id)): Path<(String, String)>,
    Query(query): Query<StreamActionQuery>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    body: Bytes,
) -> Response {
    let action_label = query.action.clone();
    let result = dispatch(state.clone(), query, body, request_id.clone()).await;
    let status_label = if result.is_ok() { "ok" } else { "error" };
    state
        .metrics
        .action_handler_calls_total
        .with_label_values(&[&action_label, status_label])
        .inc();

    match result {
        Ok(response) => response,
        Err(err) => error::into_response(err, request_id),
    }
}

async fn dispatch(
    state: AppState,
    query: StreamActionQuery,
    body: Bytes,
    request_id: String,
) -> Result<Response, Error> {
    let action = Action::from_str(&query.action)?;

    match action {
        Action::Publish | Action::SendMessage => publish(state, body).await,
        Action::CheckAckStatus => {
            let message_id = query.message_id.ok_or(Error::MissingField("messageId"))?;
            check_ack_status(state, &message_id).await
        }
        Action::DeleteTopic | Action::DeleteQueue => {
            delete_stream(state, body, request_id).await
        }
        other => Err(Error::InvalidAction(format!("{other:?} at stream scope"))),
    }
}

async fn publish(state: AppState, body: Bytes) -> Result<Response, Error> {
    let request: PublishRequest =
        serde_json::from_slice(&body).map_err(|_| Error::MissingField("message"))?;
    if request.topic_name.is_empty() {
        return Err(Error::MissingField("topicName"));
    }
    if request.message.is_empty() {
        return Err(Error::MissingField("message"));
    }

    let handle = broker_publish::publish(
        &state.broker,
        &request.topic_name,
        &request.subject,
        Bytes::from(request.message.into_bytes()),
    )
    .await?;

    let message_id = handle.message_id.clone();
    if let Err(err) = state
        .store
        .store_ack_result(&message_id, &AckResult::pending(), ACK_RESULT_TTL)
        .await
    {
        tracing::warn!(%message_id, error = %err, "failed to record pending ack status");
    }

    state
        .dispatcher
        .enqueue(AckTask::new(handle, DEFAULT_ACK_TIMEOUT))
        .await?;

    Ok((StatusCode::OK, Json(PublishResponse { message_id })).into_response())
}

async fn check_ack_status(state: AppState, message_id: &str) -> Result<Response, Error> {
    let result = state
        .store
        .get_ack_result(message_id)
        .await?
        .ok_or_else(|| Error::AckResultNotFound(message_id.to_string()))?;

    // The read path has no case for `Timeout` — mirroring the original
    // switch statement, which falls through to "unknown status" here too.
    let status = match result.status {
        AckStatus::Pending => "PENDING".to_string(),
        AckStatus::Ack => format!("ACK {}", result.sequence),
        AckStatus::Failed => "FAILED".to_string(),
        AckStatus::Timeout => {
            return Err(Error::InvalidAction("unknown status".to_string()));
        }
    };

    Ok((StatusCode::OK, Json(CheckAckStatusResponse { status })).into_response())
}

async fn delete_stream(state: AppState, body: Bytes, request_id: String) -> Result<Response, Error> {
    let request: DeleteStreamRequest = serde_json::from_slice(&body).unwrap_or_default();
    if request.srn.is_empty() {
        return Err(Error::MissingField("TopicSrn"));
    }

    let name = srn::validate_stream_name(&request.srn)?;
    admin::delete_stream(&state.broker, name).await?;
    Ok((
        StatusCode::OK,
        Json(DeleteStreamResponse {
            response_metadata: ResponseMetadata { request_id },
        }),
    )
        .into_response())
}
