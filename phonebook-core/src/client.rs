use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::record::{ContactFields, Record, RecordId};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001/api/persons";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("base url cannot carry record ids: {0}")]
    CannotBeABase(Url),
    #[error("api returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorClass {
    NotFound,
    Transient,
    Permanent,
}

/// Stateless adapter over one REST collection (`GET/POST <base>`,
/// `PUT/DELETE <base>/<id>`). Retries and recovery are left to callers.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: Client,
    base_url: Url,
}

impl DirectoryClient {
    pub fn with_base_url(base_url: &str) -> Result<Self, DirectoryError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(DirectoryError::CannotBeABase(base_url));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub async fn list_all(&self) -> Result<Vec<Record>, DirectoryError> {
        let response = self.http.get(self.base_url.clone()).send().await?;
        Self::handle_response(response).await
    }

    pub async fn create(&self, name: &str, number: &str) -> Result<Record, DirectoryError> {
        let body = ContactFields::new(name, number);
        let response = self
            .http
            .post(self.base_url.clone())
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Deletes a record. A 404 comes back as an error like any other failure;
    /// callers cannot rely on telling "already gone" apart from a broken call.
    pub async fn remove(&self, id: &RecordId) -> Result<(), DirectoryError> {
        let url = self.record_endpoint(id)?;
        let response = self.http.delete(url).send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::api_error(response).await)
    }

    pub async fn update(
        &self,
        id: &RecordId,
        fields: &ContactFields,
    ) -> Result<Record, DirectoryError> {
        let url = self.record_endpoint(id)?;
        let response = self.http.put(url).json(fields).send().await?;
        Self::handle_response(response).await
    }

    fn record_endpoint(&self, id: &RecordId) -> Result<Url, DirectoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DirectoryError::CannotBeABase(self.base_url.clone()))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DirectoryError> {
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn api_error(response: reqwest::Response) -> DirectoryError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        DirectoryError::Api { status, body }
    }
}

impl DirectoryError {
    pub fn classification(&self) -> Option<ApiErrorClass> {
        match self {
            DirectoryError::Api { status, .. } => Some(classify_api_status(*status)),
            _ => None,
        }
    }

    /// True when the server reported that the target record does not exist.
    pub fn is_not_found(&self) -> bool {
        self.classification() == Some(ApiErrorClass::NotFound)
    }
}

fn classify_api_status(status: StatusCode) -> ApiErrorClass {
    if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
        ApiErrorClass::NotFound
    } else if status.is_server_error()
        || matches!(
            status,
            StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS
        )
    {
        ApiErrorClass::Transient
    } else {
        ApiErrorClass::Permanent
    }
}
