//! Remote key-value store backend (REST proxy client)
//!
//! Talks to the proxy's four endpoints: `GET /list`, `GET /{key}`,
//! `PUT /{key}` and `DELETE /{key}`. Authentication against the upstream
//! provider lives inside the proxy; failures surface the upstream HTTP
//! status verbatim.

use std::time::Duration;

use serde::Deserialize;

use super::library::urlencode_segment;
use super::{BackendError, BackendResult, DocEntry, DocumentBackend, SourceKind, sort_descending};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    result: Vec<ListItem>,
}

#[derive(Debug, Deserialize)]
struct ListItem {
    name: String,
}

pub struct CloudBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl CloudBackend {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, urlencode_segment(key))
    }

    fn check_status(status: reqwest::StatusCode, key: &str) -> BackendResult<()> {
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl DocumentBackend for CloudBackend {
    fn list(&mut self) -> BackendResult<Vec<DocEntry>> {
        let url = format!("{}/list", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(BackendError::Http {
                status: response.status().as_u16(),
            });
        }
        let body = response
            .text()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let names = parse_list_response(&body)?;
        Ok(names
            .into_iter()
            .map(|n| DocEntry::new(n, SourceKind::Cloud))
            .collect())
    }

    fn load(&mut self, key: &str) -> BackendResult<serde_json::Value> {
        let response = self
            .client
            .get(self.key_url(key))
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check_status(response.status(), key)?;
        let body = response
            .text()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))
    }

    fn save(&mut self, key: &str, doc: &serde_json::Value) -> BackendResult<()> {
        let response = self
            .client
            .put(self.key_url(key))
            .json(doc)
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::check_status(response.status(), key)
    }

    fn delete(&mut self, key: &str) -> BackendResult<()> {
        let response = self
            .client
            .delete(self.key_url(key))
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status();
        // Deleting a key that is already gone is not an error
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    fn can_delete(&self) -> bool {
        true
    }

    fn can_save(&self) -> bool {
        true
    }
}

/// Parse `GET /list`'s `{ result: [{ name }] }` body and apply the cloud
/// ordering contract: descending by key, newest-first for chronological keys.
fn parse_list_response(body: &str) -> BackendResult<Vec<String>> {
    let parsed: ListResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;
    let mut names: Vec<String> = parsed.result.into_iter().map(|i| i.name).collect();
    sort_descending(&mut names);
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_sorted_descending() {
        let body = r#"{"result":[{"name":"2024-01"},{"name":"2024-03"},{"name":"2024-02"}]}"#;
        let names = parse_list_response(body).unwrap();
        assert_eq!(names, vec!["2024-03", "2024-02", "2024-01"]);
    }

    #[test]
    fn test_list_ignores_extra_fields() {
        let body = r#"{"result":[{"name":"a","size":12,"mtime":"x"}],"cursor":null}"#;
        assert_eq!(parse_list_response(body).unwrap(), vec!["a"]);
    }

    #[test]
    fn test_list_empty_result() {
        assert!(parse_list_response(r#"{"result":[]}"#).unwrap().is_empty());
        assert!(parse_list_response(r#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn test_list_malformed_is_parse_error() {
        assert!(matches!(
            parse_list_response("<html>"),
            Err(BackendError::Parse(_))
        ));
    }
}
