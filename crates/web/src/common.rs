use axum::{
    extract::{OriginalUri, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use tracking::RequestError;

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

// - Services returning commonly used responses -

pub(crate) async fn schema<T: JsonSchema>() -> impl IntoResponse {
    Json(schema_for!(T))
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responeses -

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_information: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
            detailed_information: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }

    pub fn with_detailed_information(mut self, message: impl Into<String>) -> Self {
        self.detailed_information = Some(message.into());
        self
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::NotFound => Self::new(StatusCode::NOT_FOUND)
                .with_message("The requested item does not exist."),
            RequestError::Database(why) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_message("Error fetching data")
                    .with_detailed_information(why.to_string())
            }
            RequestError::Reset(why) => Self::new(StatusCode::INTERNAL_SERVER_ERROR)
                .with_message("Error saving distance data")
                .with_detailed_information(why.to_string()),
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use tracking::database::DatabaseError;

    use super::*;

    #[test]
    fn request_errors_map_to_status_codes() {
        let not_found = RouteErrorResponse::from(RequestError::NotFound);
        assert_eq!(not_found.status_code, StatusCode::NOT_FOUND);

        let database = RouteErrorResponse::from(RequestError::Database(
            DatabaseError::other(std::io::Error::other("connection refused")),
        ));
        assert_eq!(database.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            database.detailed_information.as_deref(),
            Some("connection refused")
        );
    }

    #[test]
    fn serializes_only_present_fields() {
        let response = RouteErrorResponse::not_found(&Method::POST, "/nowhere");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "httpMethod": "POST",
                "requestedUri": "/nowhere",
                "message": "Not Found",
            })
        );
    }
}
