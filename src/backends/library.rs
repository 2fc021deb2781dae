//! Read-only bundled content library backend
//!
//! Listing is two-tier: a pre-generated JSON manifest is preferred, and a
//! bare static file server's HTML directory listing is scraped as fallback.
//! The manifest is never cached across invocations; every fetch is
//! cache-busted.

use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use regex::Regex;

use super::{
    BackendError, BackendResult, DocEntry, DocumentBackend, SourceKind, is_json_name,
    sort_ascending,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct LibraryBackend {
    client: reqwest::blocking::Client,
    base_url: String,
    manifest_name: String,
}

impl LibraryBackend {
    pub fn new(base_url: String, manifest_name: String) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            manifest_name,
        }
    }

    /// Fetch the manifest, bypassing every HTTP cache along the way.
    /// Returns None when the fallback should be taken instead.
    fn fetch_manifest(&self) -> Option<Vec<String>> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let url = format!("{}/{}?ts={}", self.base_url, self.manifest_name, ts);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body = response.text().ok()?;
        parse_manifest(&body, &self.manifest_name)
    }

    /// Scrape filenames out of the content directory's default HTML listing
    fn fetch_listing_fallback(&self) -> BackendResult<Vec<String>> {
        let url = format!("{}/", self.base_url);
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
        Ok(scrape_listing(&body, &self.manifest_name))
    }
}

impl DocumentBackend for LibraryBackend {
    fn list(&mut self) -> BackendResult<Vec<DocEntry>> {
        let names = match self.fetch_manifest() {
            Some(names) => names,
            None => self.fetch_listing_fallback()?,
        };
        Ok(names
            .into_iter()
            .map(|n| DocEntry::new(n, SourceKind::Library))
            .collect())
    }

    fn load(&mut self, file_name: &str) -> BackendResult<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, urlencode_segment(file_name));
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(file_name.to_string()));
        }
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
            });
        }
        let body = response
            .text()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))
    }

    fn save(&mut self, _file_name: &str, _doc: &serde_json::Value) -> BackendResult<()> {
        Err(BackendError::NotSupported("the library is read-only"))
    }

    fn delete(&mut self, _file_name: &str) -> BackendResult<()> {
        Err(BackendError::NotSupported("the library is read-only"))
    }

    fn can_delete(&self) -> bool {
        false
    }

    fn can_save(&self) -> bool {
        false
    }
}

/// Parse a manifest body. Accepted only when it is a non-empty JSON array;
/// anything else triggers the listing fallback. Manifest order is preserved
/// (the generator decides presentation order), the manifest's own filename
/// is excluded.
fn parse_manifest(body: &str, manifest_name: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    let names: Vec<String> = items
        .iter()
        .filter_map(|v| v.as_str())
        .filter(|n| is_json_name(n) && *n != manifest_name)
        .map(|n| n.to_string())
        .collect();
    if names.is_empty() { None } else { Some(names) }
}

/// Pull JSON filenames out of an HTML directory listing: href attributes with
/// a `.json` suffix, percent-decoded, path prefix stripped, deduplicated,
/// manifest excluded, sorted ascending.
fn scrape_listing(html: &str, manifest_name: &str) -> Vec<String> {
    // Hrefs may be bare filenames or full paths; quotes may be single or double.
    let href_re = Regex::new(r#"href\s*=\s*["']([^"']+\.json)["']"#)
        .expect("href pattern is valid");

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for cap in href_re.captures_iter(html) {
        let decoded = percent_decode(&cap[1]);
        let name = decoded.rsplit('/').next().unwrap_or(&decoded).to_string();
        if name.is_empty() || name == manifest_name {
            continue;
        }
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    sort_ascending(&mut names);
    names
}

/// Decode percent-escapes in an href. Escaped bytes are collected raw and
/// decoded as UTF-8 at the end, so multi-byte sequences survive intact.
fn percent_decode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                bytes.push(byte);
            } else {
                bytes.push(b'%');
                bytes.extend_from_slice(hex.as_bytes());
            }
        } else {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

/// Percent-encode a single path segment for a request URL
pub(super) fn urlencode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_order_preserved() {
        let names = parse_manifest(r#"["b.json","a.json"]"#, "manifest.json").unwrap();
        assert_eq!(names, vec!["b.json", "a.json"]);
    }

    #[test]
    fn test_manifest_excludes_itself_and_non_json() {
        let names = parse_manifest(
            r#"["manifest.json","b.json","notes.txt","a.json"]"#,
            "manifest.json",
        )
        .unwrap();
        assert_eq!(names, vec!["b.json", "a.json"]);
    }

    #[test]
    fn test_manifest_rejects_non_array() {
        assert!(parse_manifest(r#"{"files": []}"#, "manifest.json").is_none());
        assert!(parse_manifest("not json at all", "manifest.json").is_none());
    }

    #[test]
    fn test_manifest_rejects_empty_array() {
        assert!(parse_manifest("[]", "manifest.json").is_none());
    }

    #[test]
    fn test_scrape_listing_sorted_and_deduped() {
        let html = r#"
            <html><body>
            <a href="zeta.json">zeta.json</a>
            <a href="/content/alpha.json">alpha.json</a>
            <a href="alpha.json">alpha.json</a>
            <a href='Beta.json'>Beta.json</a>
            <a href="manifest.json">manifest.json</a>
            <a href="readme.txt">readme.txt</a>
            </body></html>
        "#;
        let names = scrape_listing(html, "manifest.json");
        assert_eq!(names, vec!["alpha.json", "Beta.json", "zeta.json"]);
    }

    #[test]
    fn test_scrape_listing_percent_decodes() {
        let html = r#"<a href="my%20notes.json">my notes</a>"#;
        assert_eq!(scrape_listing(html, "manifest.json"), vec!["my notes.json"]);
    }

    #[test]
    fn test_percent_decode_passes_bad_escapes_through() {
        assert_eq!(percent_decode("a%2zb"), "a%2zb");
        assert_eq!(percent_decode("plain"), "plain");
    }

    #[test]
    fn test_percent_decode_multibyte_utf8() {
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        let html = r#"<a href="caf%C3%A9.json">café</a>"#;
        assert_eq!(scrape_listing(html, "manifest.json"), vec!["café.json"]);
    }

    #[test]
    fn test_urlencode_segment() {
        assert_eq!(urlencode_segment("my notes.json"), "my%20notes.json");
        assert_eq!(urlencode_segment("plain.json"), "plain.json");
    }
}
