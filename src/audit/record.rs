//! The audit record emitted once per exchange.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

use crate::audit::AuditError;

/// Everything logged about one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub method: String,
    /// Percent-decoded request path.
    pub path: String,
    /// Allow-listed request headers.
    pub headers: BTreeMap<String, String>,
    pub client_ip: Option<String>,
    /// Raw query string.
    pub query: Option<String>,
    /// Redacted request body.
    pub request_body: Option<String>,
    /// Redacted response body, or the file name for image responses.
    pub response_body: Option<String>,
    pub status: u16,
    pub elapsed_secs: f64,
}

impl AuditRecord {
    /// Render the multi-line human readable layout.
    pub fn render_pretty(&self) -> Result<String, AuditError> {
        let mut out = String::new();
        out.push_str("##### HTTP Logging #####\n");
        out.push_str("[REQUEST]\n");
        writeln!(out, "  • API: ({}) {}", self.method, self.path)?;
        if !self.headers.is_empty() {
            writeln!(out, "  • Headers:\n{}", serde_json::to_string_pretty(&self.headers)?)?;
        }
        writeln!(out, "  • Request IP: {}", self.client_ip.as_deref().unwrap_or("null"))?;
        writeln!(out, "  • Request Params: {}", self.query.as_deref().unwrap_or("null"))?;
        write_body(&mut out, "Request Body", self.request_body.as_deref())?;
        out.push_str("[RESPONSE]\n");
        write_body(&mut out, "Response Body", self.response_body.as_deref())?;
        out.push_str("[RESULT]\n");
        writeln!(out, "  • status: {}", self.status)?;
        write!(out, "  • process time: {:.3}s", self.elapsed_secs)?;
        Ok(out)
    }
}

fn write_body(out: &mut String, label: &str, body: Option<&str>) -> Result<(), AuditError> {
    match body.filter(|b| !b.trim().is_empty()) {
        Some(body) => writeln!(out, "  • {}:\n{}", label, pretty_json(body))?,
        None => writeln!(out, "  • {}: null", label)?,
    }
    Ok(())
}

/// Pretty-print JSON text; anything else is returned as is.
pub fn pretty_json(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AuditRecord {
        AuditRecord {
            method: "POST".into(),
            path: "/todos".into(),
            headers: BTreeMap::from([("accept".to_string(), "application/json".to_string())]),
            client_ip: Some("10.0.0.1".into()),
            query: Some("page=1".into()),
            request_body: Some(r#"{"title":"x","token":"*****"}"#.into()),
            response_body: Some("plain text".into()),
            status: 201,
            elapsed_secs: 0.0421,
        }
    }

    #[test]
    fn test_render_pretty_layout() {
        let text = record().render_pretty().unwrap();
        assert!(text.starts_with("##### HTTP Logging #####\n[REQUEST]\n"));
        assert!(text.contains("  • API: (POST) /todos\n"));
        assert!(text.contains("  • Headers:\n{\n  \"accept\": \"application/json\"\n}\n"));
        assert!(text.contains("  • Request IP: 10.0.0.1\n"));
        assert!(text.contains("  • Request Params: page=1\n"));
        assert!(text.contains("  • Request Body:\n{\n  \"title\": \"x\",\n  \"token\": \"*****\"\n}\n"));
        assert!(text.contains("  • Response Body:\nplain text\n"));
        assert!(text.contains("  • status: 201\n"));
        assert!(text.ends_with("  • process time: 0.042s"));
    }

    #[test]
    fn test_render_null_markers() {
        let mut r = record();
        r.headers.clear();
        r.client_ip = None;
        r.query = None;
        r.request_body = None;
        r.response_body = Some("   ".into());

        let text = r.render_pretty().unwrap();
        assert!(!text.contains("Headers"));
        assert!(text.contains("  • Request IP: null\n"));
        assert!(text.contains("  • Request Params: null\n"));
        assert!(text.contains("  • Request Body: null\n"));
        assert!(text.contains("  • Response Body: null\n"));
    }

    #[test]
    fn test_pretty_json_falls_back_to_raw() {
        assert_eq!(pretty_json("[1,2]"), "[\n  1,\n  2\n]");
        assert_eq!(pretty_json("not json"), "not json");
    }

    #[test]
    fn test_serializes_for_structured_logs() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["status"], 201);
        assert_eq!(value["query"], "page=1");
        assert_eq!(value["headers"]["accept"], "application/json");
    }
}
