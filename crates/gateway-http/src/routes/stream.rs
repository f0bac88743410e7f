//! Account-level stream administration: create and list. The "topic" and
//! "queue" actions are functionally identical — both just create and list
//! JetStream streams — the distinction is purely which lineage a client
//! calls.

use crate::error::{self, Error};
use crate::middleware::RequestId;
use crate::routes::action::{Action, ActionQuery};
use crate::routes::envelope::ResponseMetadata;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gateway_broker::{admin, srn};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct CreateStreamRequest {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Serialize)]
struct CreateTopicResult {
    #[serde(rename = "TopicSrn")]
    topic_srn: String,
}

#[derive(Debug, Serialize)]
struct CreateTopicResponse {
    #[serde(rename = "CreateTopicResult")]
    create_topic_result: CreateTopicResult,
    #[serde(rename = "ResponseMetadata")]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
struct CreateQueueResult {
    #[serde(rename = "QueueSrn")]
    queue_srn: String,
}

#[derive(Debug, Serialize)]
struct CreateQueueResponse {
    #[serde(rename = "CreateQueueResult")]
    create_queue_result: CreateQueueResult,
    #[serde(rename = "ResponseMetadata")]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Serialize)]
struct TopicItem {
    #[serde(rename = "TopicSrn")]
    topic_srn: String,
}

#[derive(Debug, Serialize)]
struct ListTopicsResponse {
    topics: Vec<TopicItem>,
}

#[derive(Debug, Serialize)]
struct QueueItem {
    #[serde(rename = "QueueSrn")]
    queue_srn: String,
}

#[derive(Debug, Serialize)]
struct ListQueuesResponse {
    queues: Vec<QueueItem>,
}

pub async fn account_handler(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): Query<ActionQuery>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    body: axum::body::Bytes,
) -> Response {
    let action_label = query.action.clone();
    let result = dispatch(state.clone(), account_id, query, body, request_id.clone()).await;
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
    account_id: String,
    query: ActionQuery,
    body: axum::body::Bytes,
    request_id: String,
) -> Result<Response, Error> {
    let action = Action::from_str(&query.action)?;

    let response = match action {
        Action::CreateTopic => {
            let name = create_stream(&state, &account_id, &body).await?;
            (
                StatusCode::OK,
                Json(CreateTopicResponse {
                    create_topic_result: CreateTopicResult { topic_srn: name },
                    response_metadata: ResponseMetadata { request_id },
                }),
            )
                .into_response()
        }
        Action::CreateQueue => {
            let name = create_stream(&state, &account_id, &body).await?;
            (
                StatusCode::OK,
                Json(CreateQueueResponse {
                    create_queue_result: CreateQueueResult { queue_srn: name },
                    response_metadata: ResponseMetadata { request_id },
                }),
            )
                .into_response()
        }
        Action::ListTopics => {
            let topics = list_stream_srns(&state, &account_id)
                .await?
                .into_iter()
                .map(|topic_srn| TopicItem { topic_srn })
                .collect();
            (StatusCode::OK, Json(ListTopicsResponse { topics })).into_response()
        }
        Action::ListQueues => {
            let queues = list_stream_srns(&state, &account_id)
                .await?
                .into_iter()
                .map(|queue_srn| QueueItem { queue_srn })
                .collect();
            (StatusCode::OK, Json(ListQueuesResponse { queues })).into_response()
        }
        other => return Err(Error::InvalidAction(format!("{other:?} at account scope"))),
    };

    Ok(response)
}

async fn create_stream(state: &AppState, account_id: &str, body: &[u8]) -> Result<String, Error> {
    let request: CreateStreamRequest =
        serde_json::from_slice(body).map_err(|_| Error::MissingField("Name"))?;
    if request.name.is_empty() {
        return Err(Error::MissingField("Name"));
    }
    admin::create_stream(&state.broker, &request.name).await?;
    Ok(srn::build(&state.config.region, account_id, &request.name))
}

async fn list_stream_srns(state: &AppState, account_id: &str) -> Result<Vec<String>, Error> {
    let names = admin::list_stream_names(&state.broker).await?;
    Ok(names
        .into_iter()
        .map(|name| srn::build(&state.config.region, account_id, &name))
        .collect())
}
