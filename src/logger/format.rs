//! Access log line formats.
//!
//! Off by default; when enabled, each request produces one line in the
//! configured format: `combined` (Apache/nginx), `common` (CLF), or `json`.

use chrono::{DateTime, Local};

/// Everything one request contributes to its access log line.
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub http_version: &'static str,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1",
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Render the entry in the named format; unknown names fall back to
    /// `combined`.
    pub fn format(&self, format: &str) -> String {
        match format {
            "common" => self.format_common(),
            "json" => self.format_json(),
            _ => self.format_combined(),
        }
    }

    fn request_line(&self) -> String {
        let query = self
            .query
            .as_ref()
            .map(|q| format!("?{q}"))
            .unwrap_or_default();
        format!(
            "{} {}{} HTTP/{}",
            self.method, self.path, query, self.http_version
        )
    }

    /// `$remote - - [$time] "$request" $status $bytes "$referer" "$user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {} \"{}\" \"{}\"",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// `$remote - - [$time] "$request" $status $bytes`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// One JSON object per line. Built by hand; pulling a serializer in for
    /// six fields is not worth it.
    fn format_json(&self) -> String {
        let opt = |v: &Option<String>| {
            v.as_ref()
                .map_or_else(|| "null".to_string(), |s| format!("\"{}\"", escape_json(s)))
        };
        format!(
            r#"{{"remote_addr":"{}","time":"{}","method":"{}","path":"{}","query":{},"status":{},"body_bytes":{},"referer":{},"user_agent":{},"request_time_us":{}}}"#,
            escape_json(&self.remote_addr),
            self.time.to_rfc3339(),
            escape_json(&self.method),
            escape_json(&self.path),
            opt(&self.query),
            self.status,
            self.body_bytes,
            opt(&self.referer),
            opt(&self.user_agent),
            self.request_time_us,
        )
    }
}

fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "127.0.0.1".to_string(),
            "GET".to_string(),
            "/cards/back.png".to_string(),
        );
        entry.query = Some("v=2".to_string());
        entry.status = 200;
        entry.body_bytes = 512;
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 340;
        entry
    }

    #[test]
    fn test_combined() {
        let line = sample_entry().format("combined");
        assert!(line.starts_with("127.0.0.1 - - ["));
        assert!(line.contains("\"GET /cards/back.png?v=2 HTTP/1.1\""));
        assert!(line.contains(" 200 512 "));
        assert!(line.ends_with("\"Mozilla/5.0\""));
    }

    #[test]
    fn test_common_omits_agent() {
        let line = sample_entry().format("common");
        assert!(line.contains("\"GET /cards/back.png?v=2 HTTP/1.1\" 200 512"));
        assert!(!line.contains("Mozilla"));
    }

    #[test]
    fn test_json_fields() {
        let line = sample_entry().format("json");
        assert!(line.starts_with('{') && line.ends_with('}'));
        assert!(line.contains(r#""remote_addr":"127.0.0.1""#));
        assert!(line.contains(r#""status":200"#));
        assert!(line.contains(r#""referer":null"#));
        assert!(line.contains(r#""request_time_us":340"#));
    }

    #[test]
    fn test_json_escaping() {
        let mut entry = sample_entry();
        entry.path = "/with \"quotes\"".to_string();
        let line = entry.format("json");
        assert!(line.contains(r#""path":"/with \"quotes\"""#));
    }

    #[test]
    fn test_unknown_format_is_combined() {
        let entry = sample_entry();
        assert_eq!(entry.format("bogus"), entry.format("combined"));
    }
}
