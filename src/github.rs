use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;
use crate::gateway::{PutFileRequest, RepositoryGateway};
use crate::target::RepositoryTarget;
use crate::validator::{ConnectionValidator, ValidationOutcome};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// GitHub REST client bound to one repository target
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    target: RepositoryTarget,
}

#[derive(Debug, Deserialize)]
struct ContentMetadata {
    sha: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl GitHubClient {
    /// Create a client for `target` against the API at `api_url`
    pub fn new(target: RepositoryTarget, api_url: &str) -> Result<Self, ClientError> {
        let api_url = Url::parse(api_url).map_err(|source| ClientError::InvalidApiUrl {
            url: api_url.to_string(),
            source,
        })?;
        if api_url.cannot_be_a_base() {
            return Err(ClientError::NotABaseUrl(api_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let http = Client::builder()
            .user_agent(concat!("assetpush/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url,
            target,
        })
    }

    pub fn target(&self) -> &RepositoryTarget {
        &self.target
    }

    /// API URL with `segments` appended, each percent-encoded on its own
    fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(segments.into_iter().filter(|s| !s.is_empty()));
        }
        url
    }

    fn repo_endpoint<'s>(&'s self, rest: impl IntoIterator<Item = &'s str>) -> Url {
        self.endpoint(
            ["repos", self.target.owner.as_str(), self.target.repo.as_str()]
                .into_iter()
                .chain(rest),
        )
    }

    fn contents_endpoint(&self, path: &str) -> Url {
        self.repo_endpoint(std::iter::once("contents").chain(path.split('/')))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.target.token()))
    }

    /// `GET /user`
    pub async fn current_user(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, self.endpoint(["user"])).send().await
    }

    /// `GET /repos/{owner}/{repo}`
    pub async fn repository(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, self.repo_endpoint([])).send().await
    }

    /// `GET /repos/{owner}/{repo}/branches/{branch}`
    pub async fn branch(&self) -> reqwest::Result<Response> {
        let url = self.repo_endpoint(
            std::iter::once("branches").chain(self.target.branch.split('/')),
        );
        self.request(Method::GET, url).send().await
    }

    /// Look up the blob SHA of an existing file on the target branch.
    ///
    /// Any failure, including 404 and transport errors, means "no existing content";
    /// the following PUT reports the authoritative error if that was wrong.
    pub async fn existing_sha(&self, path: &str) -> Option<String> {
        let response = match self
            .request(Method::GET, self.contents_endpoint(path))
            .query(&[("ref", self.target.branch.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Existing content lookup failed for {}: {}", path, e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!("No existing content at {} ({})", path, response.status());
            return None;
        }

        match response.json::<ContentMetadata>().await {
            Ok(meta) => meta.sha,
            Err(e) => {
                warn!("Unreadable content metadata for {}: {}", path, e);
                None
            }
        }
    }

    /// `PUT /repos/{owner}/{repo}/contents/{path}`; the error is GitHub's message or `HTTP <status>`
    pub async fn put_file(&self, request: &PutFileRequest) -> Result<(), String> {
        let body = PutContentBody {
            message: &request.message,
            content: &request.content,
            branch: &self.target.branch,
            sha: request.sha.as_deref(),
        };

        let response = self
            .request(Method::PUT, self.contents_endpoint(&request.path))
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty());

        Err(message.unwrap_or_else(|| format!("HTTP {}", status.as_u16())))
    }
}

#[async_trait]
impl RepositoryGateway for GitHubClient {
    async fn preflight(&self) -> ValidationOutcome {
        ConnectionValidator::new(self).validate().await
    }

    async fn existing_sha(&self, path: &str) -> Option<String> {
        GitHubClient::existing_sha(self, path).await
    }

    async fn put_file(&self, request: &PutFileRequest) -> Result<(), String> {
        GitHubClient::put_file(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_join_api_url() {
        let target = RepositoryTarget::new("o", "r", "assets", "main", "msg", "t");
        let client = GitHubClient::new(target, "https://api.github.com/").unwrap();
        assert_eq!(
            client.repo_endpoint([]).as_str(),
            "https://api.github.com/repos/o/r"
        );
        assert_eq!(
            client.contents_endpoint("assets/logo@2x.png").as_str(),
            "https://api.github.com/repos/o/r/contents/assets/logo@2x.png"
        );

        let target = RepositoryTarget::new("o", "r", "assets", "main", "msg", "t");
        let enterprise = GitHubClient::new(target, "https://git.example.com/api/v3").unwrap();
        assert_eq!(
            enterprise.endpoint(["user"]).as_str(),
            "https://git.example.com/api/v3/user"
        );
    }

    #[test]
    fn test_path_segments_are_percent_encoded() {
        let target = RepositoryTarget::new("o", "r", "icons #2?", "release#1", "msg", "t");
        let client = GitHubClient::new(target, "https://api.github.com").unwrap();

        let url = client.contents_endpoint(&client.target().file_path("logo.png"));
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/o/r/contents/icons%20%232%3F/logo.png"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());

        let branch = client.repo_endpoint(
            std::iter::once("branches").chain(client.target().branch.split('/')),
        );
        assert_eq!(
            branch.as_str(),
            "https://api.github.com/repos/o/r/branches/release%231"
        );
    }

    #[test]
    fn test_rejects_unusable_api_url() {
        let target = RepositoryTarget::new("o", "r", "assets", "main", "msg", "t");
        assert!(matches!(
            GitHubClient::new(target.clone(), "not a url"),
            Err(ClientError::InvalidApiUrl { .. })
        ));
        assert!(matches!(
            GitHubClient::new(target, "mailto:octo@example.com"),
            Err(ClientError::NotABaseUrl(_))
        ));
    }

    #[test]
    fn test_put_body_omits_missing_sha() {
        let body = PutContentBody {
            message: "m",
            content: "AA==",
            branch: "main",
            sha: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("sha").is_none());
        assert_eq!(json["content"], "AA==");
    }
}
