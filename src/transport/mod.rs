/// Source discovery, JSONL listing, and the fetch error log on local disk.
pub mod fs;
/// Plain-text and JSONL fetch over HTTP.
#[cfg(feature = "remote")]
pub mod http;
