use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structural problem with an uploaded manifest or a request payload.
    /// Fatal to the call, no partial result.
    #[error("{0}")]
    MalformedInput(String),

    /// The same item_number appears twice in one manifest upload.
    #[error("duplicate item_number `{0}` in manifest")]
    DuplicateItem(String),

    /// A destructive operation was attempted without a signed-in operator.
    /// Rejected before any call to the backing store.
    #[error("sign-in required for this operation")]
    AuthorizationRequired,

    /// Any failure from the backing store. Propagated to the caller, never
    /// retried here.
    #[error("backend query failed: {0}")]
    Query(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MalformedInput(_) | Error::DuplicateItem(_) => StatusCode::BAD_REQUEST,
            Error::AuthorizationRequired => StatusCode::UNAUTHORIZED,
            Error::Query(err) => {
                tracing::error!("backend query failed: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
