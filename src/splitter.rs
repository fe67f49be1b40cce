use crate::data::TaskRecord;

/// Split a normalized match at the first `delimiter`.
///
/// The signature keeps the delimiter; the body keeps any later occurrences
/// of it verbatim. Both halves are whitespace-trimmed. When the delimiter
/// does not occur, the whole match becomes the signature with the delimiter
/// appended and the body is empty.
pub fn split_signature_body(normalized: &str, delimiter: char) -> TaskRecord {
    match normalized.split_once(delimiter) {
        Some((head, tail)) => {
            TaskRecord::new(format!("{}{delimiter}", head.trim_start()), tail.trim())
        }
        None => TaskRecord::new(format!("{}{delimiter}", normalized.trim_start()), ""),
    }
}
