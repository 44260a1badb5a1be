//! Shared HTTP response checks.

use crate::error::ApiError;

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. 401 maps to
/// [`ApiError::Unauthorized`], any other non-success status to
/// [`ApiError::Api`] carrying the response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_unauthorized() {
        let err = check_response(mock_response(401, "")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn check_response_api_error_keeps_body() {
        let err = check_response(mock_response(404, "Unknown resource"))
            .await
            .unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Unknown resource");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
    }
}
