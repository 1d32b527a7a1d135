use std::time::Duration;

use crate::error::FetchError;

/// Site hosting the Reina-Valera Gómez pages.
pub const DEFAULT_ORIGIN: &str = "https://ebible.org";

const DEFAULT_USER_AGENT: &str = concat!("rvg/", env!("CARGO_PKG_VERSION"), " (scripture text harvester)");

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Scheme and host, without a trailing path (e.g., "https://ebible.org").
    pub origin: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Fetches chapter pages from one origin over a single shared connection pool.
///
/// Built once per harvest and dropped with it.
#[derive(Debug)]
pub struct PageFetcher {
    client: reqwest::Client,
    origin: String,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            origin: config.origin.trim_end_matches('/').to_string(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// GET `origin + path` and return the body decoded as UTF-8.
    ///
    /// The body is decoded as UTF-8 whatever charset the server declares;
    /// invalid sequences become U+FFFD.
    pub async fn fetch_page(&self, path: &str) -> Result<String, FetchError> {
        let url = format!("{}{path}", self.origin);
        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source,
            })?;
        tracing::debug!(bytes = body.len(), "Received HTML");

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(origin: &str) -> PageFetcher {
        PageFetcher::new(&FetchConfig {
            origin: origin.to_string(),
            timeout: Duration::from_secs(5),
            ..FetchConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_decodes_utf8() {
        let server = MockServer::start().await;
        // Declared charset is wrong; the body is UTF-8.
        let body = "<div class='m'>En el principio creó Dios</div>".as_bytes().to_vec();
        Mock::given(method("GET"))
            .and(path("/sparvg/GEN01.htm"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body, "text/html; charset=iso-8859-1"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let html = fetcher_for(&server.uri())
            .fetch_page("/sparvg/GEN01.htm")
            .await
            .unwrap();
        assert!(html.contains("creó"));
    }

    #[tokio::test]
    async fn test_fetch_page_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher_for(&server.uri())
            .fetch_page("/sparvg/XYZ01.htm")
            .await
            .unwrap_err();
        match &err {
            FetchError::Status { path, status } => {
                assert_eq!(path, "/sparvg/XYZ01.htm");
                assert_eq!(*status, StatusCode::NOT_FOUND);
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_fetch_page_transport_failure() {
        // Nothing listens on port 1.
        let err = fetcher_for("http://127.0.0.1:1")
            .fetch_page("/sparvg/GEN01.htm")
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_origin_trailing_slash() {
        assert_eq!(fetcher_for("https://ebible.org/").origin(), "https://ebible.org");
    }
}
