//! [`Client`] for the SafeComms moderation API and related types.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use zeroize::Zeroizing;

use crate::{key, moderation, response, Key};

/// Scheme prefix for the `Authorization` header.
const BEARER: &str = "Bearer ";

/// Result type for the client. See also [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Client for the SafeComms moderation API.
///
/// See [`Self::new`] for creating a new client and [`Self::moderate_text`],
/// [`Self::moderate_image`], [`Self::moderate_image_file`], and
/// [`Self::usage`] for the available calls.
#[derive(Clone)]
pub struct Client {
    /// Inner [`reqwest::Client`]. Be aware that setting this to a custom
    /// client without a JSON `Content-Type` default header will result in
    /// rejected requests. It is **not necessary** to set the API key on a
    /// custom client.
    ///
    /// ## Note:
    /// - The API [`Key`] is **set automatically on requests**. Set
    ///   [`Self::key`] to change the [`Key`].
    /// - **Do not use** `client.inner.get` directly. Use [`Self::get`]
    ///   instead to safely set the API [`Key`] as sensitive.
    pub inner: reqwest::Client,
    /// API [`Key`] for convenience. It can be set to a new [`Key`] to change
    /// the key used for requests.
    pub key: Arc<Key>,
    /// Base URL including scheme and host, without a trailing slash. Kept
    /// private so an empty override can be rejected in [`Self::with_base_url`].
    base_url: String,
}

impl Client {
    /// Default base URL for the SafeComms API.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.safecomms.dev";
    /// Path for text moderation.
    pub const MODERATE_TEXT_PATH: &'static str = "/moderation/text";
    /// Path for inline image moderation.
    pub const MODERATE_IMAGE_PATH: &'static str = "/moderation/image";
    /// Path for image moderation by file upload.
    pub const MODERATE_IMAGE_FILE_PATH: &'static str =
        "/moderation/image/upload";
    /// Path for account usage.
    pub const USAGE_PATH: &'static str = "/usage";
    /// Our user agent.
    pub const USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));

    /// Create a new client from any type that can be converted into a
    /// [`Key`].
    ///
    /// ## Note:
    /// - It's safest to use a [`String`]. If you use a [`&str`] you must
    ///   zeroize it after creating the client.
    pub fn new<K>(key: K) -> std::result::Result<Self, key::InvalidKey>
    where
        K: TryInto<Key, Error = key::InvalidKey>,
    {
        Ok(Self::from_key(key.try_into()?))
    }

    /// Create a new client with the given key.
    pub fn from_key(key: Key) -> Self {
        #[cfg(feature = "log")]
        {
            log::info!(concat!(
                "Creating ",
                env!("CARGO_PKG_NAME"),
                " client..."
            ));
            log::debug!(concat!("Crate version: ", env!("CARGO_PKG_VERSION")));
        }

        // Headers for all requests.
        let mut headers = reqwest::header::HeaderMap::new();

        // Content type needs to be set to JSON. Multipart uploads replace
        // this on a per-request basis with their boundary content type.
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        Self {
            inner: reqwest::Client::builder()
                .user_agent(Self::USER_AGENT)
                .default_headers(headers)
                .build()
                .unwrap(),
            key: Arc::new(key),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Use a custom base URL for all subsequent requests. This is useful for
    /// testing or for a proxy deployment. An empty string restores
    /// [`Self::DEFAULT_BASE_URL`].
    pub fn with_base_url<S>(mut self, base_url: S) -> Self
    where
        S: Into<String>,
    {
        let base_url = base_url.into();

        self.base_url = if base_url.is_empty() {
            Self::DEFAULT_BASE_URL.to_string()
        } else {
            base_url
        };

        self
    }

    /// The base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint `path`.
    fn url(&self, path: &str) -> String {
        // Paths begin with a slash so plain concatenation is enough. Note
        // that `Url::join` would drop any path segments of the base here.
        format!("{}{}", self.base_url, path)
    }

    /// Create a [`reqwest::RequestBuilder`] with the API key set as a
    /// sensitive bearer `Authorization` value.
    pub fn request_raw<U>(
        &self,
        method: reqwest::Method,
        url: U,
    ) -> reqwest::RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        #[cfg(feature = "log")]
        {
            log::debug!("{} request to {}", method, url.as_str());
        }

        let key = self.key.read();
        let key_bytes: &[u8] = key.as_ref();

        let mut bearer = Zeroizing::new(Vec::with_capacity(
            BEARER.len() + key_bytes.len(),
        ));
        bearer.extend_from_slice(BEARER.as_bytes());
        bearer.extend_from_slice(key_bytes);

        // Unwrap can never panic because a `Key` is validated at construction
        // to be printable ASCII, and `BEARER` is as well.
        let mut val =
            reqwest::header::HeaderValue::from_bytes(&bearer).unwrap();
        val.set_sensitive(true);

        self.inner
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, val)
    }

    /// Send a GET request with the API key set as a sensitive header value.
    pub async fn get<U>(&self, url: U) -> reqwest::Result<reqwest::Response>
    where
        U: reqwest::IntoUrl,
    {
        self.request_raw(reqwest::Method::GET, url).send().await
    }

    /// Send a POST request with the API key set as a sensitive header value.
    pub async fn post<U, B>(
        &self,
        url: U,
        body: B,
    ) -> reqwest::Result<reqwest::Response>
    where
        U: reqwest::IntoUrl,
        B: Serialize,
    {
        let req = self.request_raw(reqwest::Method::POST, url);

        #[cfg(feature = "log")]
        {
            if let Ok(json) = serde_json::to_string_pretty(&body) {
                log::debug!("Sending body:\n{}", json);
            } else {
                log::warn!("Could not serialize body. Request will fail.");
            }
        }

        req.json(&body).send().await
    }

    /// Moderate a snippet of text. [`moderation::DEFAULT_LANGUAGE`] is
    /// substituted when the request doesn't set a language.
    ///
    /// The verdict is an open JSON object. See [`response::Moderation`].
    pub async fn moderate_text(
        &self,
        mut request: moderation::Text<'_>,
    ) -> Result<response::Moderation> {
        request.language =
            Some(moderation::language_or_default(request.language.take()));

        let json = serde_json::to_value(request)?;
        let response =
            self.post(self.url(Self::MODERATE_TEXT_PATH), json).await?;

        Self::decode(response).await
    }

    /// Moderate an image from an encoded [`moderation::Image`] payload.
    /// [`moderation::DEFAULT_LANGUAGE`] is substituted when the request
    /// doesn't set a language.
    ///
    /// See [`Self::moderate_image_file`] to upload straight from disk
    /// instead.
    pub async fn moderate_image(
        &self,
        mut request: moderation::Image<'_>,
    ) -> Result<response::Moderation> {
        request.language =
            Some(moderation::language_or_default(request.language.take()));

        let json = serde_json::to_value(request)?;
        let response =
            self.post(self.url(Self::MODERATE_IMAGE_PATH), json).await?;

        Self::decode(response).await
    }

    /// Moderate an image by uploading a [`moderation::File`] from disk as a
    /// multipart form. [`moderation::DEFAULT_LANGUAGE`] is substituted when
    /// the request doesn't set a language.
    pub async fn moderate_image_file(
        &self,
        request: moderation::File<'_>,
    ) -> Result<response::Moderation> {
        let moderation::File {
            path,
            language,
            moderation_profile_id,
        } = request;

        // The file is read fully before any request is built, so an
        // unreadable path fails without touching the network.
        let data = tokio::fs::read(path.as_ref()).await?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;

        // The form replaces the default JSON content type on this request
        // with its own boundary content type.
        let mut form = reqwest::multipart::Form::new()
            .part("image", part)
            .text(
                "language",
                moderation::language_or_default(language).into_owned(),
            );
        // An empty profile id is treated as unset, like the language.
        if let Some(id) = moderation_profile_id.filter(|id| !id.is_empty()) {
            form = form.text("moderationProfileId", id.into_owned());
        }

        let response = self
            .request_raw(
                reqwest::Method::POST,
                self.url(Self::MODERATE_IMAGE_FILE_PATH),
            )
            .multipart(form)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Fetch account usage figures. The shape is an open JSON object. See
    /// [`response::Usage`].
    pub async fn usage(&self) -> Result<response::Usage> {
        let response = self.get(self.url(Self::USAGE_PATH)).await?;

        Self::decode(response).await
    }

    /// Decode a JSON object response, mapping any status of 400 or above to
    /// an [`ApiError`].
    async fn decode<T>(response: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status.as_u16() >= 400 {
            // The service does not document a stable error shape, so the
            // body is kept as text rather than parsed.
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError { status, body }.into());
        }

        let bytes = response.bytes().await?;

        Ok(serde_json::from_slice(&bytes)?)
    }
}

static_assertions::assert_impl_all!(Client: Send, Sync, Clone);

/// [`Client`] error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP error.
    #[error("HTTP error: {0}")]
    HTTP(#[from] reqwest::Error),
    /// Data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// An upload file could not be read.
    #[error("File error: {0}")]
    File(#[from] std::io::Error),
    /// SafeComms API error.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Error response from the SafeComms API for any status of 400 or above.
#[derive(Debug, thiserror::Error)]
#[error("API error: {status}")]
pub struct ApiError {
    /// Status code of the response, including the canonical reason when
    /// displayed ("429 Too Many Requests").
    pub status: reqwest::StatusCode,
    /// Raw response body, which may be empty. Kept as text because the
    /// service does not document a stable error shape.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRATE_ROOT: &str = env!("CARGO_MANIFEST_DIR");

    // Note: Not a real key. As is warned in the docs above, do not use a
    // string literal for a real key. There is no TryFrom<&'static str> for
    // Key for this reason.
    const FAKE_API_KEY: &str = "sc-live-9hc2vvrtLx0aB0LqnyEaUVigQg5s";

    // Error message for when the API key is not found.
    const NO_API_KEY: &str = "API key not found. Create a file named `api.key` in the crate root with your API key.";

    // Load the API key from the `api.key` file in the crate root.
    fn load_api_key() -> Option<String> {
        use std::fs::File;
        use std::io::Read;
        use std::path::Path;

        let mut file =
            File::open(Path::new(CRATE_ROOT).join("api.key")).ok()?;
        let mut key = String::new();
        file.read_to_string(&mut key).unwrap();
        Some(key.trim().to_string())
    }

    #[test]
    fn test_client_new() {
        let client = Client::new(FAKE_API_KEY.to_string()).unwrap();
        assert_eq!(client.key.to_string(), FAKE_API_KEY);
        assert_eq!(client.base_url(), Client::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_new_invalid_key() {
        assert!(Client::new(String::new()).is_err());
    }

    #[test]
    fn test_with_base_url() {
        let client = Client::new(FAKE_API_KEY.to_string())
            .unwrap()
            .with_base_url("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url(Client::MODERATE_TEXT_PATH),
            "http://localhost:8080/moderation/text"
        );

        // An empty base URL restores the default.
        let client = client.with_base_url("");
        assert_eq!(client.base_url(), Client::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_api_error_display() {
        let error = ApiError {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: r#"{"error": "rate limited"}"#.to_string(),
        };

        assert_eq!(error.to_string(), "API error: 429 Too Many Requests");

        // The conversion into the client error keeps the message as-is.
        let error: Error = error.into();
        assert_eq!(error.to_string(), "API error: 429 Too Many Requests");
    }

    #[tokio::test]
    #[ignore = "This test requires a real API key."]
    async fn test_client_moderate_text() {
        let key = load_api_key().expect(NO_API_KEY);
        let client = Client::new(key).unwrap();

        let verdict = client
            .moderate_text(moderation::Text::new("you are a silly goose"))
            .await
            .unwrap();

        assert!(verdict.flagged().is_some());
    }

    #[tokio::test]
    #[ignore = "This test requires a real API key."]
    async fn test_client_usage() {
        let key = load_api_key().expect(NO_API_KEY);
        let client = Client::new(key).unwrap();

        let usage = client.usage().await.unwrap();

        assert!(!usage.is_empty());
    }
}
