use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::PineconeStoreError;

const API_VERSION: &str = "2024-07";

/// Authenticated JSON calls against one Pinecone host.
#[derive(Clone, Debug)]
pub(crate) struct Transport {
    http: Client,
    base: String,
    api_key: SecretString,
}

impl Transport {
    pub(crate) fn connect(
        base: impl Into<String>,
        api_key: SecretString,
    ) -> Result<Self, PineconeStoreError> {
        let base = base.into();
        if api_key.expose_secret().trim().is_empty() {
            return Err(PineconeStoreError::Config("empty api key".to_string()));
        }
        Url::parse(&base)
            .map_err(|err| PineconeStoreError::Config(format!("bad host '{base}': {err}")))?;
        Ok(Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub(crate) async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, PineconeStoreError> {
        let request = self.http.get(self.url(path));
        self.send(request, None).await
    }

    /// POSTs `body`. `namespace` only labels errors.
    pub(crate) async fn post<B, R>(
        &self,
        path: &str,
        body: &B,
        namespace: Option<&str>,
    ) -> Result<R, PineconeStoreError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        self.send(request, namespace).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn send<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        namespace: Option<&str>,
    ) -> Result<R, PineconeStoreError> {
        let response = request
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|err| PineconeStoreError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response, namespace).await);
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| PineconeStoreError::Transport(err.to_string()))?;
        // Deletes answer with an empty body.
        let body: &[u8] = if body.is_empty() { b"{}" } else { &body };
        serde_json::from_slice(body).map_err(|err| PineconeStoreError::Malformed(err.to_string()))
    }
}

async fn api_error(response: Response, namespace: Option<&str>) -> PineconeStoreError {
    let status = response.status().as_u16();
    let retry_after_secs = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok());
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    PineconeStoreError::Api {
        status,
        message: error_message(&body).unwrap_or_else(|| format!("status {status}")),
        retry_after_secs,
        namespace: namespace.map(str::to_string),
    }
}

/// Pinecone puts the message at `message`, `error` or `error.message`
/// depending on the endpoint.
fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error");
    body.get("message")
        .or_else(|| error.filter(|e| e.is_string()))
        .or_else(|| error.and_then(|e| e.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
}
