use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A script kept in the local library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedScript {
    pub id: String,
    pub title: String,
    pub content: String,
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Earlier contents, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<ScriptVersion>,
}

impl SavedScript {
    pub fn new(title: &str, content: &str, prompt: &str, model: &str, temperature: f32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            prompt: prompt.to_string(),
            model: model.to_string(),
            temperature,
            timestamp: now_ms(),
            user_id: None,
            versions: Vec::new(),
        }
    }

    pub fn version(&self, id: u32) -> Option<&ScriptVersion> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Short model label, e.g. `1.5-flash`
    pub fn model_label(&self) -> &str {
        self.model.strip_prefix("gemini-").unwrap_or(&self.model)
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// A previous state of a script's content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptVersion {
    /// 1-based, in creation order
    pub id: u32,
    pub timestamp: i64,
    pub description: String,
    pub author_name: String,
    pub code: String,
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Absolute local time, e.g. `Oct 19, 2026, 03:43 AM`
pub fn format_timestamp(ms: i64) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(time) => time.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => "Unknown time".to_string(),
    }
}

/// Relative time such as `5 minutes ago`
pub fn format_time_ago(ms: i64, now: DateTime<Utc>) -> String {
    let Some(then) = DateTime::<Utc>::from_timestamp_millis(ms) else {
        return "Unknown time".to_string();
    };

    let seconds = (now - then).num_seconds();
    if seconds < 0 {
        return "in the future".to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let (count, unit) = if seconds < 60 {
        return "less than a minute ago".to_string();
    } else if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days < 30 {
        (days, "day")
    } else if days < 365 {
        (days / 30, "month")
    } else {
        (days / 365, "year")
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_script_has_uuid() {
        let script = SavedScript::new("t", "c", "p", "gemini-1.5-pro", 0.7);
        assert_eq!(script.id.len(), 36);
        assert_eq!(script.short_id().len(), 8);
        assert_eq!(script.model_label(), "1.5-pro");
        assert!(script.versions.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let script = SavedScript {
            id: "abc".into(),
            title: "Gold".into(),
            content: "x".into(),
            prompt: "make gold".into(),
            model: "gemini-1.5-flash".into(),
            temperature: 0.5,
            timestamp: 1_700_000_000_000,
            user_id: None,
            versions: Vec::new(),
        };
        let value = serde_json::to_value(&script).unwrap();
        assert_eq!(value["timestamp"], 1_700_000_000_000i64);
        assert!(value.get("versions").is_none());
        assert!(value.get("userId").is_none());

        // Records written without history still load
        let parsed: SavedScript = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, script);
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        let ago = |d: Duration| format_time_ago((now - d).timestamp_millis(), now);
        assert_eq!(ago(Duration::seconds(10)), "less than a minute ago");
        assert_eq!(ago(Duration::minutes(1)), "1 minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(Duration::days(1)), "1 day ago");
        assert_eq!(ago(Duration::days(65)), "2 months ago");
        assert_eq!(ago(Duration::days(800)), "2 years ago");
        assert_eq!(ago(Duration::minutes(-5)), "in the future");
    }

    #[test]
    fn test_format_timestamp() {
        let formatted = format_timestamp(now_ms());
        assert!(formatted.contains(", "));
        assert!(formatted.ends_with("AM") || formatted.ends_with("PM"));
    }
}
