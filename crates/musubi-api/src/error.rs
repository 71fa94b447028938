use musubi_core::catalogue::CatalogueError;
use thiserror::Error;

/// Errors from the remote document clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no path or url configured for {0}")]
    NotConfigured(&'static str),
}

impl From<ApiError> for CatalogueError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Parse(message) => CatalogueError::Parse(message),
            other => CatalogueError::Unavailable(other.to_string()),
        }
    }
}

/// Turn a non-success response into [`ApiError::Api`].
pub(crate) async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Api {
            status,
            message: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_stays_a_parse_error() {
        let err: CatalogueError = ApiError::Parse("unexpected eof".into()).into();
        assert_eq!(err, CatalogueError::Parse("unexpected eof".into()));
    }

    #[test]
    fn api_error_becomes_unavailable() {
        let err: CatalogueError = ApiError::Api {
            status: 503,
            message: "banned".into(),
        }
        .into();
        assert_eq!(
            err,
            CatalogueError::Unavailable("API error (status 503): banned".into())
        );
    }
}
