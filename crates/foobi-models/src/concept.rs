//! Concept and scene models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a scene appended from the concept editor.
pub const NEW_SCENE_DURATION_SECS: u32 = 5;

/// Broad category of an uploaded media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[default]
    Other,
}

impl MediaKind {
    /// Classify a MIME type (`image/png`, `video/mp4`, ...).
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else if mime.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

/// Reference to a user-uploaded file.
///
/// Only metadata is kept; file contents never enter the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime_type)
    }
}

/// A time-bounded segment of a concept's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene ID within the concept (1-indexed)
    pub id: u32,

    pub title: String,

    pub description: String,

    /// Start offset in seconds
    pub start_time: u32,

    /// End offset in seconds, exclusive
    pub end_time: u32,

    /// Free-text direction for the scene
    pub content: String,

    /// Media attached to this scene
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_files: Vec<MediaFile>,
}

impl Scene {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        start_time: u32,
        end_time: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            start_time,
            end_time,
            content: content.into(),
            media_files: Vec::new(),
        }
    }

    /// Duration in seconds (0 for an inverted range).
    pub fn duration(&self) -> u32 {
        self.end_time.saturating_sub(self.start_time)
    }
}

/// Partial update for a scene; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<u32>,
    pub end_time: Option<u32>,
    pub content: Option<String>,
}

impl ScenePatch {
    fn apply(self, scene: &mut Scene) {
        if let Some(title) = self.title {
            scene.title = title;
        }
        if let Some(description) = self.description {
            scene.description = description;
        }
        if let Some(start) = self.start_time {
            scene.start_time = start;
        }
        if let Some(end) = self.end_time {
            scene.end_time = end;
        }
        if let Some(content) = self.content {
            scene.content = content;
        }
    }
}

/// Partial update for a concept's overview fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub script: Option<String>,
    pub bgm: Option<String>,
}

/// One proposed creative treatment of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: u32,

    pub title: String,

    pub description: String,

    /// Narration script
    pub script: String,

    /// Background music label
    pub bgm: String,

    /// Ordered scenes
    pub scenes: Vec<Scene>,

    /// Concept-level media
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_files: Vec<MediaFile>,
}

/// Timeline invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("Concept has no scenes")]
    Empty,

    #[error("Timeline must start at 0, first scene starts at {start}s")]
    DoesNotStartAtZero { start: u32 },

    #[error("Scene {id} ends at {end}s which is not after its start {start}s")]
    NonPositiveDuration { id: u32, start: u32, end: u32 },

    #[error("Scene {next_id} starts at {next_start}s but scene {prev_id} ends at {prev_end}s")]
    NotContiguous {
        prev_id: u32,
        prev_end: u32,
        next_id: u32,
        next_start: u32,
    },
}

impl Concept {
    /// Total length of the timeline in seconds.
    pub fn total_duration(&self) -> u32 {
        self.scenes.last().map(|s| s.end_time).unwrap_or(0)
    }

    pub fn scene(&self, scene_id: u32) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    /// Check that scenes are non-empty, start at 0, and are contiguous.
    pub fn validate_timeline(&self) -> Result<(), TimelineError> {
        let first = self.scenes.first().ok_or(TimelineError::Empty)?;
        if first.start_time != 0 {
            return Err(TimelineError::DoesNotStartAtZero {
                start: first.start_time,
            });
        }

        for scene in &self.scenes {
            if scene.end_time <= scene.start_time {
                return Err(TimelineError::NonPositiveDuration {
                    id: scene.id,
                    start: scene.start_time,
                    end: scene.end_time,
                });
            }
        }

        for pair in self.scenes.windows(2) {
            if pair[0].end_time != pair[1].start_time {
                return Err(TimelineError::NotContiguous {
                    prev_id: pair[0].id,
                    prev_end: pair[0].end_time,
                    next_id: pair[1].id,
                    next_start: pair[1].start_time,
                });
            }
        }

        Ok(())
    }

    pub fn apply_patch(&mut self, patch: ConceptPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(script) = patch.script {
            self.script = script;
        }
        if let Some(bgm) = patch.bgm {
            self.bgm = bgm;
        }
    }

    /// Append a placeholder scene right after the current end of the timeline.
    pub fn add_scene(&mut self) -> &Scene {
        let id = self.scenes.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let start = self.total_duration();
        self.scenes.push(Scene::new(
            id,
            "新しいシーン",
            "シーンの説明を入力してください",
            start,
            start + NEW_SCENE_DURATION_SECS,
            "シーンの内容を入力してください",
        ));
        &self.scenes[self.scenes.len() - 1]
    }

    /// Remove a scene. Returns false if no scene has that id.
    pub fn remove_scene(&mut self, scene_id: u32) -> bool {
        let before = self.scenes.len();
        self.scenes.retain(|s| s.id != scene_id);
        self.scenes.len() != before
    }

    /// Apply a patch to one scene. Returns false if no scene has that id.
    pub fn update_scene(&mut self, scene_id: u32, patch: ScenePatch) -> bool {
        match self.scenes.iter_mut().find(|s| s.id == scene_id) {
            Some(scene) => {
                patch.apply(scene);
                true
            }
            None => false,
        }
    }

    pub fn attach_scene_media(&mut self, scene_id: u32, files: Vec<MediaFile>) -> bool {
        match self.scenes.iter_mut().find(|s| s.id == scene_id) {
            Some(scene) => {
                scene.media_files.extend(files);
                true
            }
            None => false,
        }
    }

    pub fn remove_scene_media(&mut self, scene_id: u32, index: usize) -> bool {
        match self.scenes.iter_mut().find(|s| s.id == scene_id) {
            Some(scene) if index < scene.media_files.len() => {
                scene.media_files.remove(index);
                true
            }
            _ => false,
        }
    }

    pub fn attach_media(&mut self, files: Vec<MediaFile>) {
        self.media_files.extend(files);
    }

    pub fn remove_media(&mut self, index: usize) -> bool {
        if index < self.media_files.len() {
            self.media_files.remove(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(bounds: &[(u32, u32)]) -> Concept {
        Concept {
            id: 1,
            title: "Test".to_string(),
            description: String::new(),
            script: String::new(),
            bgm: String::new(),
            scenes: bounds
                .iter()
                .enumerate()
                .map(|(i, (s, e))| Scene::new(i as u32 + 1, "s", "", *s, *e, ""))
                .collect(),
            media_files: Vec::new(),
        }
    }

    #[test]
    fn test_valid_timeline() {
        let c = concept(&[(0, 8), (8, 18), (18, 25), (25, 30)]);
        assert!(c.validate_timeline().is_ok());
        assert_eq!(c.total_duration(), 30);
    }

    #[test]
    fn test_timeline_errors() {
        assert_eq!(concept(&[]).validate_timeline(), Err(TimelineError::Empty));
        assert_eq!(
            concept(&[(2, 8)]).validate_timeline(),
            Err(TimelineError::DoesNotStartAtZero { start: 2 })
        );
        assert_eq!(
            concept(&[(0, 8), (8, 8)]).validate_timeline(),
            Err(TimelineError::NonPositiveDuration { id: 2, start: 8, end: 8 })
        );
        assert!(matches!(
            concept(&[(0, 8), (9, 12)]).validate_timeline(),
            Err(TimelineError::NotContiguous { prev_id: 1, next_id: 2, .. })
        ));
    }

    #[test]
    fn test_add_scene_appends_after_end() {
        let mut c = concept(&[(0, 8), (8, 18)]);
        c.remove_scene(1);
        let added = c.add_scene().clone();
        assert_eq!(added.id, 3);
        assert_eq!(added.start_time, 18);
        assert_eq!(added.end_time, 23);
    }

    #[test]
    fn test_update_scene() {
        let mut c = concept(&[(0, 8), (8, 18)]);
        let patch = ScenePatch {
            end_time: Some(10),
            title: Some("Opening".to_string()),
            ..Default::default()
        };
        assert!(c.update_scene(1, patch));
        assert_eq!(c.scenes[0].end_time, 10);
        assert_eq!(c.scenes[0].title, "Opening");
        assert!(!c.update_scene(99, ScenePatch::default()));
        assert!(c.validate_timeline().is_err());
    }

    #[test]
    fn test_scene_media() {
        let mut c = concept(&[(0, 8)]);
        assert!(c.attach_scene_media(1, vec![MediaFile::new("a.png", "image/png", 10)]));
        assert_eq!(c.scenes[0].media_files[0].kind(), MediaKind::Image);
        assert!(!c.remove_scene_media(1, 3));
        assert!(c.remove_scene_media(1, 0));
        assert!(c.scenes[0].media_files.is_empty());

        c.attach_media(vec![MediaFile::new("bgm.mp3", "audio/mpeg", 2048)]);
        assert_eq!(c.media_files[0].kind(), MediaKind::Other);
        assert!(c.remove_media(0));
        assert!(!c.remove_media(0));
    }

    #[test]
    fn test_camel_case_fields() {
        let json = serde_json::to_value(concept(&[(0, 8)])).unwrap();
        assert_eq!(json["scenes"][0]["startTime"], 0);
        assert_eq!(json["scenes"][0]["endTime"], 8);
        assert!(json["scenes"][0].get("mediaFiles").is_none());
    }
}
