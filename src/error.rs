use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use http::header::{HeaderValue, CACHE_CONTROL};
use std::io;

use crate::config::{ConfigError, CACHE_CONTROL_NO_STORE};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Internal error: {:?}", self);
        let status = StatusCode::INTERNAL_SERVER_ERROR;

        let body = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <title>Error {}</title>
    <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
    <main class="container">
        <div class="error-page">
            <h1>Error {}</h1>
            <p>Internal server error</p>
            <a href="/">Return to status page</a>
        </div>
    </main>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
        );

        let mut response = (status, Html(body)).into_response();
        let no_store = HeaderValue::from_static(CACHE_CONTROL_NO_STORE);
        response.headers_mut().insert(CACHE_CONTROL, no_store);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_hides_cause() {
        let response = AppError::Internal("template cache poisoned".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            CACHE_CONTROL_NO_STORE
        );
    }
}
