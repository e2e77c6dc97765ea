// HTTP client for the gallery REST API
//
// Implements the catalog contract over the wire so the same session logic
// drives the remote service and the local catalog.

use std::time::Duration;

use gallery_catalog::{ArtCategory, Artwork, ArtworkPatch, Catalog, NewArtwork};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default base URL of the gallery server.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Could not reach {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Invalid response from server: {0}")]
    Decode(#[from] std::io::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    image: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct InquiryResponse {
    url: String,
}

/// Blocking client for one gallery server.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the absolute URL for an API path such as `/artworks`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Validates an image data URI with the server and returns the stored URL.
    pub fn upload_image(&self, data_uri: &str) -> Result<String, ApiError> {
        let request = self.authorized(self.agent.post(&self.endpoint("/upload")));
        let response = self.finish(request.send_json(UploadRequest { image: data_uri }))?;
        Ok(response.into_json::<UploadResponse>()?.image_url)
    }

    /// Messaging link for asking about an artwork. `None` when the id is unknown.
    pub fn inquiry_link(&self, id: &str) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&format!("{}/inquiry", artwork_path(id)));
        match self.get_json::<InquiryResponse>(&url, None) {
            Ok(body) => Ok(Some(body.url)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn health(&self) -> Result<serde_json::Value, ApiError> {
        self.get_json(&self.endpoint("/health"), None)
    }

    fn authorized(&self, request: ureq::Request) -> ureq::Request {
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        category: Option<ArtCategory>,
    ) -> Result<T, ApiError> {
        let mut request = self.agent.get(url);
        if let Some(category) = category {
            request = request.query("category", category.as_str());
        }
        Ok(self.finish(request.call())?.into_json()?)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        request: ureq::Request,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.authorized(request);
        Ok(self.finish(request.send_json(body))?.into_json()?)
    }

    fn finish(
        &self,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<ureq::Response, ApiError> {
        match result {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, response)) => {
                let fallback = response.status_text().to_string();
                let message = response
                    .into_json::<ErrorBody>()
                    .map(|body| body.error)
                    .unwrap_or(fallback);
                Err(ApiError::Status { status, message })
            }
            Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport {
                url: self.base_url.clone(),
                message: transport.to_string(),
            }),
        }
    }
}

/// Path of one artwork, with the id percent-encoded as a single segment.
fn artwork_path(id: &str) -> String {
    format!("/artworks/{}", urlencoding::encode(id))
}

impl Catalog for ApiClient {
    type Error = ApiError;

    fn list(&mut self, category: Option<ArtCategory>) -> Result<Vec<Artwork>, ApiError> {
        self.get_json(&self.endpoint("/artworks"), category)
    }

    fn get(&mut self, id: &str) -> Result<Option<Artwork>, ApiError> {
        match self.get_json(&self.endpoint(&artwork_path(id)), None) {
            Ok(artwork) => Ok(Some(artwork)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create(&mut self, new: NewArtwork) -> Result<Artwork, ApiError> {
        let request = self.agent.post(&self.endpoint("/artworks"));
        self.send_json(request, &new)
    }

    fn update(&mut self, id: &str, patch: ArtworkPatch) -> Result<Option<Artwork>, ApiError> {
        let request = self.agent.put(&self.endpoint(&artwork_path(id)));
        match self.send_json(request, &patch) {
            Ok(artwork) => Ok(Some(artwork)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn delete(&mut self, id: &str) -> Result<bool, ApiError> {
        let request = self.authorized(self.agent.delete(&self.endpoint(&artwork_path(id))));
        match self.finish(request.call()) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
