use std::io::Cursor;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::constants::FETCH_FAILED_MSG;
use crate::constants::remote::MAX_BODY_BYTES;
use crate::data::TaskRecord;
use crate::dataset::{load_jsonl, take_subset};
use crate::errors::ExtractError;
use crate::transport::fs::ErrorLog;
use crate::types::{SourceText, Url};

/// GET `url` and return the body as text.
///
/// Non-success statuses are errors. No retries.
pub fn fetch_text(url: &str) -> Result<SourceText, ExtractError> {
    let response = ureq::get(url)
        .call()
        .map_err(|err| ExtractError::SourceUnavailable {
            url: url.to_string(),
            reason: format!("request failed: {err}"),
        })?;
    let mut body = response.into_body();
    let text = body
        .with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_string()
        .map_err(|err| ExtractError::SourceUnavailable {
            url: url.to_string(),
            reason: format!("failed reading response body: {err}"),
        })?;
    debug!(url, bytes = text.len(), "[kotlin_tasks:http] fetched");
    Ok(text)
}

/// GET `url` and parse the body as JSONL task records.
pub fn fetch_jsonl(url: &str) -> Result<Vec<TaskRecord>, ExtractError> {
    let text = fetch_text(url)?;
    load_jsonl(Cursor::new(text), Path::new(url))
}

/// Fetch a JSONL dataset and optionally keep a leading subset.
pub fn load_jsonl_from_url(
    url: &str,
    subset_ratio: Option<f64>,
) -> Result<Vec<TaskRecord>, ExtractError> {
    let records = fetch_jsonl(url)?;
    info!(
        "[kotlin_tasks:http] loaded {} records from {}",
        records.len(),
        url
    );
    match subset_ratio {
        Some(ratio) => take_subset(records, ratio),
        None => Ok(records),
    }
}

/// Fetch every URL in order, logging failures and moving on.
///
/// Each failure appends `<error>: <url>` to `error_log`. Only a failure to
/// write the log itself aborts the run.
pub fn fetch_sources<I, S>(
    urls: I,
    error_log: &ErrorLog,
) -> Result<Vec<(Url, SourceText)>, ExtractError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fetched = Vec::new();
    let mut failed = 0usize;
    for url in urls {
        let url = url.as_ref();
        match fetch_text(url) {
            Ok(text) => fetched.push((url.to_string(), text)),
            Err(err) => {
                warn!(url, error = %err, "[kotlin_tasks:http] {}", FETCH_FAILED_MSG);
                error_log.record(&failure_reason(err), url)?;
                failed += 1;
            }
        }
    }
    info!(
        fetched = fetched.len(),
        failed, "[kotlin_tasks:http] fetch pass complete"
    );
    Ok(fetched)
}

/// Error text without the URL, which the error log appends itself.
fn failure_reason(err: ExtractError) -> String {
    match err {
        ExtractError::SourceUnavailable { reason, .. } => reason,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::tempdir;

    fn spawn_one_shot_http(payload: Vec<u8>) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request_buf = [0u8; 1024];
            let _ = stream.read(&mut request_buf);
            let headers = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                payload.len()
            );
            stream.write_all(headers.as_bytes()).unwrap();
            stream.write_all(&payload).unwrap();
            let _ = stream.flush();
        });
        (format!("http://{addr}"), handle)
    }

    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/Missing.kt")
    }

    #[test]
    fn fetch_text_returns_body() {
        let (base_url, server) = spawn_one_shot_http(b"val answer = 42\n".to_vec());
        let text = fetch_text(&format!("{base_url}/Answer.kt")).unwrap();
        server.join().unwrap();
        assert_eq!(text, "val answer = 42\n");
    }

    #[test]
    fn jsonl_from_url_applies_subset() {
        let payload: String = (0..10)
            .map(|idx| format!("{{\"signature\":\"val v{idx} =\",\"body\":\"x\"}}\n"))
            .collect();
        let (base_url, server) = spawn_one_shot_http(payload.into_bytes());
        let records = load_jsonl_from_url(&format!("{base_url}/train.jsonl"), Some(0.3)).unwrap();
        server.join().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], TaskRecord::new("val v0 =", "x"));
    }

    #[test]
    fn failed_fetch_is_logged_and_skipped() {
        let temp = tempdir().unwrap();
        let log = ErrorLog::new(temp.path().join("error_log.txt"));
        let (base_url, server) = spawn_one_shot_http(b"fun ok() { }\n".to_vec());
        let good = format!("{base_url}/Ok.kt");
        let bad = closed_port_url();

        let fetched = fetch_sources([bad.clone(), good.clone()], &log).unwrap();
        server.join().unwrap();

        assert_eq!(fetched, vec![(good, "fun ok() { }\n".to_string())]);
        let logged = fs::read_to_string(log.path()).unwrap();
        assert_eq!(logged.lines().count(), 1);
        assert!(logged.starts_with("request failed"));
        assert!(logged.trim_end().ends_with(&format!(": {bad}")));
        assert_eq!(logged.matches(bad.as_str()).count(), 1);
    }
}
