//! Reading question files for the upload endpoint.

use std::path::Path;

use shared::domain::QuestionUpload;

use crate::{ClientError, ClientResult};

/// Parses upload file contents. Any well-formed JSON is accepted; the service
/// validates the records.
pub fn parse_upload_payload(text: &str) -> ClientResult<serde_json::Value> {
    serde_json::from_str(text)
        .map_err(|err| ClientError::invalid_input(format!("file is not valid JSON: {err}")))
}

pub async fn read_upload_file(path: &Path) -> ClientResult<serde_json::Value> {
    let text = tokio::fs::read_to_string(path).await.map_err(|err| {
        ClientError::invalid_input(format!("could not read '{}': {err}", path.display()))
    })?;
    parse_upload_payload(&text)
}

/// Strict check of a payload against the question record shape. Returns one
/// line per problem, prefixed with the record index.
pub fn check_question_records(payload: &serde_json::Value) -> ClientResult<Vec<String>> {
    let records: Vec<QuestionUpload> = serde_json::from_value(payload.clone()).map_err(|err| {
        ClientError::invalid_input(format!("payload is not a list of questions: {err}"))
    })?;
    Ok(records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| {
            record
                .problems()
                .into_iter()
                .map(move |problem| format!("question {}: {problem}", index + 1))
        })
        .collect())
}
