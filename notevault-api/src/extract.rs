/// Request extractors
///
/// `AppJson` behaves like `axum::Json` but rejects through [`ApiError`], so a
/// body that is missing, malformed, or sent without a JSON content type gets
/// the same `400 {"error": "bad_request"}` shape as every other client error.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor with API-formatted rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
