use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::data_types::{Dataset, Level, Metadata, Row, TableKind};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// What went wrong during a fetch. Kept `Clone` so results can travel
/// inside UI messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("server returned status \"{status}\": {message}")]
    Application { status: String, message: String },
}

/// Response envelope of `/api/{table}/{level}`. The payload is a
/// JSON-encoded string, not a nested array.
#[derive(Debug, Deserialize)]
struct DataEnvelope {
    status: String,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Same envelope shape for `/api/{table}/metadata`.
#[derive(Debug, Deserialize)]
struct MetadataEnvelope {
    status: String,
    #[serde(default)]
    metadata: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct ApiHandler {
    client: reqwest::Client,
    base_url: String,
}

impl ApiHandler {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiHandler {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn fetch_dataset(
        &self,
        table: TableKind,
        level: Level,
    ) -> Result<Dataset, FetchError> {
        let url = format!(
            "{}/api/{}/{}",
            self.base_url,
            table.slug(),
            level.path_segment()
        );
        let body = self.get_text(&url).await?;
        decode_dataset(&body)
    }

    pub async fn fetch_metadata(&self, table: TableKind) -> Result<Metadata, FetchError> {
        let url = format!("{}/api/{}/metadata", self.base_url, table.slug());
        let body = self.get_text(&url).await?;
        decode_metadata(&body)
    }

    // Error envelopes arrive with 4xx/5xx codes, so the body is read for any
    // HTTP status and judged by the envelope's own flag.
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

pub fn decode_dataset(body: &str) -> Result<Dataset, FetchError> {
    let envelope: DataEnvelope = serde_json::from_str(body).map_err(parse_error)?;
    expect_success(envelope.status, envelope.message)?;
    let payload = envelope
        .data
        .ok_or_else(|| FetchError::Parse("envelope has no \"data\" field".to_string()))?;
    let rows: Vec<Row> = serde_json::from_str(&payload).map_err(parse_error)?;
    Ok(Dataset { rows })
}

pub fn decode_metadata(body: &str) -> Result<Metadata, FetchError> {
    let envelope: MetadataEnvelope = serde_json::from_str(body).map_err(parse_error)?;
    expect_success(envelope.status, envelope.message)?;
    let payload = envelope
        .metadata
        .ok_or_else(|| FetchError::Parse("envelope has no \"metadata\" field".to_string()))?;
    let lines: Vec<String> = serde_json::from_str(&payload).map_err(parse_error)?;
    Ok(Metadata::new(lines))
}

fn expect_success(status: String, message: Option<String>) -> Result<(), FetchError> {
    if status == "success" {
        Ok(())
    } else {
        Err(FetchError::Application {
            status,
            message: message.unwrap_or_else(|| "no further details".to_string()),
        })
    }
}

fn parse_error(err: serde_json::Error) -> FetchError {
    FetchError::Parse(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_nested_dataset_payload() {
        let body = r#"{"status":"success","data":"[{\"Land\":\"Bayern\",\"1992\":100.5}]"}"#;
        let dataset = decode_dataset(body).unwrap();
        assert_eq!(dataset.rows.len(), 1);
        assert_eq!(dataset.rows[0]["Land"], "Bayern");
        assert_eq!(dataset.rows[0]["1992"], 100.5);
    }

    #[test]
    fn dataset_rows_keep_the_server_column_order() {
        let body = r#"{"status":"success","data":"[{\"Jahr\":2020,\"Region\":\"DE\"}]"}"#;
        let dataset = decode_dataset(body).unwrap();
        let keys: Vec<&String> = dataset.rows[0].keys().collect();
        assert_eq!(keys, ["Jahr", "Region"]);
    }

    #[test]
    fn empty_row_array_is_a_valid_dataset() {
        let body = r#"{"status":"success","data":"[]"}"#;
        assert_eq!(decode_dataset(body).unwrap(), Dataset::empty());
    }

    #[test]
    fn error_status_becomes_an_application_error() {
        let body = r#"{"status":"error","message":"Invalid data level"}"#;
        let err = decode_dataset(body).unwrap_err();
        assert_eq!(
            err,
            FetchError::Application {
                status: "error".to_string(),
                message: "Invalid data level".to_string(),
            }
        );
    }

    #[test]
    fn error_status_without_message_still_reports_the_status() {
        let body = r#"{"status":"error"}"#;
        match decode_metadata(body).unwrap_err() {
            FetchError::Application { status, .. } => assert_eq!(status, "error"),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_outer_envelope_is_a_parse_error() {
        assert!(matches!(
            decode_dataset("not json at all"),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn malformed_nested_payload_is_a_parse_error() {
        let body = r#"{"status":"success","data":"[{\"Land\":"}"#;
        assert!(matches!(decode_dataset(body), Err(FetchError::Parse(_))));
    }

    #[test]
    fn success_without_payload_field_is_a_parse_error() {
        let body = r#"{"status":"success"}"#;
        assert!(matches!(decode_dataset(body), Err(FetchError::Parse(_))));
    }

    #[test]
    fn decodes_metadata_lines() {
        let body = r#"{"status":"success","metadata":"[\"Bruttoinlandsprodukt\",\"in jeweiligen Preisen\"]"}"#;
        let metadata = decode_metadata(body).unwrap();
        assert_eq!(metadata.line(0), "Bruttoinlandsprodukt");
        assert_eq!(metadata.line(1), "in jeweiligen Preisen");
        assert_eq!(metadata.line(2), "");
    }
}
