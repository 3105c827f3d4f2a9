use serde::Deserialize;
use serde_json::Number;
use std::time::Duration;
use thiserror::Error;

use crate::config::OverpassConfig;
use crate::domain::Tags;

const USER_AGENT: &str = concat!("poiscrape/", env!("CARGO_PKG_VERSION"));

/// Raw Overpass API response
#[derive(Debug, Default, Deserialize)]
pub struct OverpassResponse {
    /// Absent when the server has nothing to report
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// A single element from Overpass (node, way or relation)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub tags: Option<Tags>,
    #[serde(default)]
    pub lat: Option<Number>,
    #[serde(default)]
    pub lon: Option<Number>,
    /// Emitted for ways and relations by `out center`
    #[serde(default)]
    pub center: Option<Center>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Center {
    #[serde(default)]
    pub lat: Option<Number>,
    #[serde(default)]
    pub lon: Option<Number>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to send request to Overpass API")]
    Transport(#[source] reqwest::Error),
    #[error("Overpass API returned error status: {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to parse Overpass JSON response")]
    Parse(#[source] serde_json::Error),
}

/// Blocking Overpass client bound to one endpoint
pub struct OverpassClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl OverpassClient {
    pub fn new(config: &OverpassConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(USER_AGENT);
        // reqwest's blocking client defaults to 30s; 0 means wait forever
        builder = if config.timeout_secs == 0 {
            builder.timeout(None::<Duration>)
        } else {
            builder.timeout(Duration::from_secs(config.timeout_secs))
        };
        let client = builder.build().map_err(FetchError::Transport)?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one query and parse the response
    ///
    /// A response without an `elements` key is an empty result. Anything
    /// that is not a JSON object of the expected shape is a parse error.
    pub fn fetch(&self, query: &str) -> Result<OverpassResponse, FetchError> {
        // Overpass expects form-encoded POST data: data=<query>
        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query)])
            .send()
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().map_err(FetchError::Transport)?;
        parse_response(&body)
    }
}

pub fn parse_response(body: &str) -> Result<OverpassResponse, FetchError> {
    serde_json::from_str(body).map_err(FetchError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> OverpassClient {
        let config = OverpassConfig {
            url: format!("{}/api/interpreter", server.url()),
            ..OverpassConfig::default()
        };
        OverpassClient::new(&config).unwrap()
    }

    #[test]
    fn test_parse_overpass_response() {
        let json = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": -6.9, "lon": 107.6, "tags": {"shop": "bakery"}},
                {"type": "way", "id": 2, "center": {"lat": -6.91, "lon": 107.61}}
            ]
        }"#;

        let response = parse_response(json).unwrap();
        assert_eq!(response.elements.len(), 2);
        assert_eq!(response.elements[0].type_.as_deref(), Some("node"));
        assert_eq!(response.elements[0].lat, Number::from_f64(-6.9));
        assert!(response.elements[1].tags.is_none());
        let center = response.elements[1].center.as_ref().unwrap();
        assert_eq!(center.lat, Number::from_f64(-6.91));
    }

    #[test]
    fn test_missing_elements_is_empty() {
        let response = parse_response(r#"{"remark": "nothing here"}"#).unwrap();
        assert!(response.elements.is_empty());
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        assert!(matches!(
            parse_response("<html>busy</html>"),
            Err(FetchError::Parse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"elements": "nope"}"#),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_fetch_posts_form_encoded_query() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/interpreter")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::UrlEncoded(
                "data".to_string(),
                "[out:json];".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"elements": [{"type": "node", "id": 7, "lat": 1.0, "lon": 2.0}]}"#)
            .create();

        let response = client_for(&server).fetch("[out:json];").unwrap();

        mock.assert();
        assert_eq!(response.elements.len(), 1);
        assert_eq!(response.elements[0].id, Some(7));
    }

    #[test]
    fn test_fetch_error_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/api/interpreter")
            .with_status(504)
            .create();

        let err = client_for(&server).fetch("[out:json];").unwrap_err();
        match err {
            FetchError::Status(status) => assert_eq!(status.as_u16(), 504),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fetch_unparseable_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/api/interpreter")
            .with_status(200)
            .with_body("rate limited, try again later")
            .create();

        let err = client_for(&server).fetch("[out:json];").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
