use serde::{Deserialize, Serialize};

/// A remote activity record. `display_type` and `display_time` are derived
/// locally at refresh time and never sent back to the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub raw_data: serde_json::Value,
    #[serde(default)]
    pub created_at: String,
    #[serde(skip)]
    pub display_type: String,
    #[serde(skip)]
    pub display_time: String,
}

impl Activity {
    /// Fill the derived display fields from the raw record.
    /// `display_type` comes from `raw_data["type"]`; `display_time` is the
    /// date and time portion of the RFC 3339 creation timestamp.
    pub fn with_display_fields(mut self) -> Self {
        self.display_type = self
            .raw_data
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or("n/a")
            .to_string();
        self.display_time = self
            .created_at
            .chars()
            .take(19)
            .map(|c| if c == 'T' { ' ' } else { c })
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_fields_derive_from_raw_data() {
        let activity = Activity {
            id: "a1".into(),
            status: "pending".into(),
            raw_data: serde_json::json!({"type": "task", "message": "hello"}),
            created_at: "2026-08-06T14:30:00.123Z".into(),
            display_type: String::new(),
            display_time: String::new(),
        }
        .with_display_fields();

        assert_eq!(activity.display_type, "task");
        assert_eq!(activity.display_time, "2026-08-06 14:30:00");
    }

    #[test]
    fn display_type_falls_back_when_untyped() {
        let activity = Activity {
            id: "a2".into(),
            status: "pending".into(),
            raw_data: serde_json::json!({"message": "no type"}),
            created_at: String::new(),
            display_type: String::new(),
            display_time: String::new(),
        }
        .with_display_fields();

        assert_eq!(activity.display_type, "n/a");
        assert!(activity.display_time.is_empty());
    }
}
