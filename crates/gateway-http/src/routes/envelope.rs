//! The `ResponseMetadata{RequestId}` envelope fragment that every mutating
//! account/stream action embeds in its 200 body, matching
//! `entity.ResponseMetadata` in the original topic/queue handlers.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ResponseMetadata {
    #[serde(rename = "RequestId")]
    pub request_id: String,
}
