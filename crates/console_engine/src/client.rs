use std::sync::Arc;
use std::time::Duration;

use console_core::routes::session_path;
use console_core::{ActionRequest, HttpMethod, SessionUpdate, StatusPayload};
use console_logging::console_debug;
use futures_util::StreamExt;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue};
use url::Url;

use crate::decode::{decode_action_messages, decode_status_payload, pretty_document};
use crate::{FailureKind, FetchError};

const CSRF_HEADER: &str = "X-CSRFToken";
const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Control center root, e.g. `https://hcc.example.org/`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    /// Cookie holding the anti-forgery token.
    pub csrf_cookie: String,
    /// `name=value` cookies to preload, e.g. an existing session id.
    pub cookies: Vec<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            csrf_cookie: "csrftoken".to_string(),
            cookies: Vec::new(),
        }
    }
}

/// Everything the console asks of the control center.
#[async_trait::async_trait]
pub trait ConsoleClient: Send + Sync {
    async fn fetch_status(&self, path: &str) -> Result<StatusPayload, FetchError>;

    /// Opaque JSON document, pretty-printed.
    async fn fetch_document(&self, path: &str) -> Result<String, FetchError>;

    async fn run_action(
        &self,
        request: &ActionRequest,
    ) -> Result<Vec<(String, String)>, FetchError>;

    async fn push_session(&self, update: &SessionUpdate) -> Result<(), FetchError>;
}

pub struct ReqwestClient {
    settings: ClientSettings,
    base: Url,
    jar: Arc<Jar>,
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let base = parse_base(&settings.base_url)?;
        let jar = Arc::new(Jar::default());
        for cookie in &settings.cookies {
            jar.add_cookie_str(cookie, &base);
        }

        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .cookie_provider(jar.clone())
            .default_headers(headers)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            jar,
            client,
        })
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// Anti-forgery token from the cookie jar, if the server has set one.
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        let cookies = header.to_str().ok()?;
        cookies.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == self.settings.csrf_cookie).then(|| value.to_string())
        })
    }

    fn request(&self, method: HttpMethod, url: Url) -> reqwest::RequestBuilder {
        let builder = match method {
            HttpMethod::Get => return self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        match self.csrf_token() {
            Some(token) => builder.header(CSRF_HEADER, token),
            None => builder,
        }
    }

    /// Sends the request and reads a bounded body. Non-success statuses
    /// become errors carrying the response text.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Vec<u8>, FetchError> {
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl ConsoleClient for ReqwestClient {
    async fn fetch_status(&self, path: &str) -> Result<StatusPayload, FetchError> {
        let url = self.url(path)?;
        let body = self.send(self.client.get(url)).await?;
        decode_status_payload(&body)
    }

    async fn fetch_document(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url(path)?;
        let body = self.send(self.client.get(url)).await?;
        Ok(pretty_document(&body))
    }

    async fn run_action(
        &self,
        request: &ActionRequest,
    ) -> Result<Vec<(String, String)>, FetchError> {
        let url = self.url(&request.path)?;
        let mut builder = self.request(request.method, url);
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }
        let body = self.send(builder).await?;
        Ok(decode_action_messages(&body))
    }

    async fn push_session(&self, update: &SessionUpdate) -> Result<(), FetchError> {
        let url = self.url(session_path())?;
        let mut form = vec![(update.key.as_str().to_string(), update.value.clone())];
        if let Some(token) = self.csrf_token() {
            form.push((CSRF_FORM_FIELD.to_string(), token));
        } else {
            console_debug!("no {} cookie; session push sent without token", self.settings.csrf_cookie);
        }
        self.send(self.request(HttpMethod::Post, url).form(&form))
            .await
            .map(|_| ())
    }
}

fn parse_base(raw: &str) -> Result<Url, FetchError> {
    // `Url::join` replaces the last segment unless the base ends in '/'.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
