//! HTTP client for the refactoring backend
//!
//! Blocking reqwest calls; the request runner moves them off the UI thread.

use crate::error::{RefactorError, Result};
use crate::model::refactor::{
    DataEnvelope, FilesEnvelope, RefactorRequest, RefactorResult, ZipFileResult,
    ZipRefactorRequest,
};
use crate::model::source::{ExtractedFile, SourceUnit};
use reqwest::blocking::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Refactor API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /refactor`
    pub fn refactor(&self, request: &RefactorRequest) -> Result<RefactorResult> {
        info!(language = request.language.as_str(), chars = request.code.len(), "POST /refactor");
        let response = self.http.post(self.url("/refactor")).json(request).send()?;
        let body = read_body(response)?;
        parse_data(&body, "Refactoring failed")
    }

    /// `POST /refactor/upload-zip` with the archive as multipart field `file`
    pub fn upload_zip(&self, path: &Path) -> Result<Vec<ExtractedFile>> {
        info!(path = %path.display(), "POST /refactor/upload-zip");
        let form = multipart::Form::new().file("file", path)?;
        let response = self
            .http
            .post(self.url("/refactor/upload-zip"))
            .multipart(form)
            .send()?;
        let body = read_body(response)?;
        parse_files(&body, "Zip upload failed")
    }

    /// `POST /refactor/refactor-zip-animated`; results come back in input order
    pub fn refactor_zip_animated(&self, files: &[SourceUnit]) -> Result<Vec<ZipFileResult>> {
        info!(files = files.len(), "POST /refactor/refactor-zip-animated");
        let response = self
            .http
            .post(self.url("/refactor/refactor-zip-animated"))
            .json(&ZipRefactorRequest { files })
            .send()?;
        let body = read_body(response)?;
        parse_files(&body, "Refactoring failed")
    }

    /// `POST /refactor/refactor-zip`, returning the archive bytes
    pub fn refactor_zip_archive(&self, files: &[SourceUnit]) -> Result<Vec<u8>> {
        info!(files = files.len(), "POST /refactor/refactor-zip");
        let response = self
            .http
            .post(self.url("/refactor/refactor-zip"))
            .json(&ZipRefactorRequest { files })
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text()?;
            return Err(status_error(status.as_u16(), &body));
        }
        let bytes = response.bytes()?;
        debug!(size = bytes.len(), "archive received");
        Ok(bytes.to_vec())
    }

    /// `GET /refactor/stats`
    pub fn stats(&self) -> Result<serde_json::Value> {
        let response = self.http.get(self.url("/refactor/stats")).send()?;
        let body = read_body(response)?;
        parse_data(&body, "Could not load stats")
    }

    /// `GET /health`
    pub fn health(&self) -> Result<serde_json::Value> {
        let response = self.http.get(self.url("/health")).send()?;
        let body = read_body(response)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Return the body text of a 2xx response, or a `Status` error
fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text()?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(status_error(status.as_u16(), &body))
    }
}

/// Prefer the envelope's `error.message`, then the raw body, then a generic text
fn status_error(status: u16, body: &str) -> RefactorError {
    let from_envelope = serde_json::from_str::<FilesEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message);

    let message = match from_envelope {
        Some(m) => m,
        None if !body.trim().is_empty() && body.len() <= 200 => body.trim().to_string(),
        None => "Request failed".to_string(),
    };

    RefactorError::Status { status, message }
}

fn parse_data<T: DeserializeOwned>(body: &str, fallback: &str) -> Result<T> {
    let envelope: DataEnvelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(RefactorError::application(
            envelope.error.and_then(|e| e.message),
            fallback,
        ));
    }
    envelope
        .data
        .ok_or_else(|| RefactorError::Application(fallback.to_string()))
}

fn parse_files<T: DeserializeOwned>(body: &str, fallback: &str) -> Result<Vec<T>> {
    let envelope: FilesEnvelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(RefactorError::application(
            envelope.error.and_then(|e| e.message),
            fallback,
        ));
    }
    Ok(envelope.files)
}
