//! Generated video history.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HistoryId(pub String);

impl HistoryId {
    /// Generate a new random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HistoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A previously generated video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoHistoryEntry {
    pub id: HistoryId,
    pub title: String,
    /// Creation date (`YYYY-MM-DD`)
    pub created_at: NaiveDate,
    /// Thumbnail URL
    pub thumbnail: String,
    /// Duration label such as `30秒`
    pub duration: String,
}

impl VideoHistoryEntry {
    pub fn new(
        title: impl Into<String>,
        created_at: NaiveDate,
        thumbnail: impl Into<String>,
        length_secs: u32,
    ) -> Self {
        Self {
            id: HistoryId::new(),
            title: title.into(),
            created_at,
            thumbnail: thumbnail.into(),
            duration: duration_label(length_secs),
        }
    }
}

/// Duration label shown in the sidebar.
pub fn duration_label(length_secs: u32) -> String {
    format!("{}秒", length_secs)
}

/// Newest-first list of generated videos.
///
/// Entries are only ever added; the title is the only mutable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoHistory(Vec<VideoHistoryEntry>);

impl VideoHistory {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// History pre-populated with the sidebar's sample videos.
    pub fn with_samples() -> Self {
        let sample = |id: &str, title: &str, (y, m, d): (i32, u32, u32), photo: u32, secs: u32| {
            VideoHistoryEntry {
                id: HistoryId::from_string(id),
                title: title.to_string(),
                created_at: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
                thumbnail: format!(
                    "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=400"
                ),
                duration: duration_label(secs),
            }
        };

        Self(vec![
            sample("1", "商品紹介動画 - 新製品ローンチ", (2024, 1, 15), 3184291, 30),
            sample("2", "ブランドストーリー - 企業理念", (2024, 1, 12), 3184338, 60),
            sample("3", "キャンペーン動画 - 春の新作", (2024, 1, 10), 3184465, 15),
        ])
    }

    pub fn entries(&self) -> &[VideoHistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &HistoryId) -> Option<&VideoHistoryEntry> {
        self.0.iter().find(|e| &e.id == id)
    }

    /// Add an entry at the front.
    pub fn prepend(&mut self, entry: VideoHistoryEntry) {
        self.0.insert(0, entry);
    }

    /// Rename one entry. Returns false if no entry has that id.
    pub fn rename(&mut self, id: &HistoryId, title: impl Into<String>) -> bool {
        match self.0.iter_mut().find(|e| &e.id == id) {
            Some(entry) => {
                entry.title = title.into();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples() {
        let history = VideoHistory::with_samples();
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[1].duration, "60秒");
        assert_eq!(
            history.entries()[0].created_at,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_prepend_is_newest_first() {
        let mut history = VideoHistory::with_samples();
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let entry = VideoHistoryEntry::new("New", date, "thumb", 30);
        let id = entry.id.clone();
        history.prepend(entry);
        assert_eq!(history.entries()[0].id, id);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_rename_unknown_id() {
        let mut history = VideoHistory::with_samples();
        let before = history.clone();
        assert!(!history.rename(&HistoryId::from_string("missing"), "x"));
        assert_eq!(history, before);
    }

    #[test]
    fn test_created_at_serializes_as_date() {
        let history = VideoHistory::with_samples();
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json[0]["createdAt"], "2024-01-15");
        assert_eq!(json[0]["id"], "1");
    }
}
