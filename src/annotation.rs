use serde::{Deserialize, Serialize};

/// Implementation marker the host appends to its annotation class names.
const KIND_IMPLEMENTATION_MARKER: &str = "Editor";

/// Annotation record as the host application reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnnotation {
    pub id: String,
    #[serde(alias = "kindName")]
    pub name: String,
    pub page_index: usize,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// Snapshot of a live annotation taken when it was added or last updated.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSummary {
    pub id: String,
    pub kind_name: String,
    pub page_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl AnnotationSummary {
    /// One-based page number, as shown to users and passed to the host's scroll service.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }
}

impl From<&RawAnnotation> for AnnotationSummary {
    fn from(raw: &RawAnnotation) -> Self {
        Self {
            id: raw.id.clone(),
            kind_name: display_kind_name(&raw.name),
            page_index: raw.page_index,
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
        }
    }
}

impl From<RawAnnotation> for AnnotationSummary {
    fn from(raw: RawAnnotation) -> Self {
        Self {
            kind_name: display_kind_name(&raw.name),
            id: raw.id,
            page_index: raw.page_index,
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
        }
    }
}

/// Strips the first occurrence of the implementation marker from a host class name,
/// e.g. `FreeTextEditor` becomes `FreeText`.
pub fn display_kind_name(name: &str) -> String {
    name.replacen(KIND_IMPLEMENTATION_MARKER, "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name_strips_editor_marker() {
        assert_eq!(display_kind_name("FreeTextEditor"), "FreeText");
        assert_eq!(display_kind_name("InkEditor"), "Ink");
        assert_eq!(display_kind_name("Highlight"), "Highlight");
    }

    #[test]
    fn test_kind_name_strips_only_first_marker() {
        assert_eq!(display_kind_name("EditorEditor"), "Editor");
    }

    #[test]
    fn test_raw_annotation_from_host_json() {
        let json = r#"{
            "id": "pdfjs_internal_editor_3",
            "name": "StampEditor",
            "pageIndex": 4,
            "x": 0.25,
            "y": 0.75,
            "width": 0.1,
            "height": 0.05
        }"#;
        let raw: RawAnnotation = serde_json::from_str(json).unwrap();
        let summary = AnnotationSummary::from(raw);

        assert_eq!(summary.id, "pdfjs_internal_editor_3");
        assert_eq!(summary.kind_name, "Stamp");
        assert_eq!(summary.page_index, 4);
        assert_eq!(summary.page_number(), 5);
        assert_eq!(summary.width, 0.1);
    }

    #[test]
    fn test_raw_annotation_accepts_kind_name_alias_and_missing_extents() {
        let json = r#"{"id": "a", "kindName": "Ink", "pageIndex": 0, "x": 0.0, "y": 0.0}"#;
        let raw: RawAnnotation = serde_json::from_str(json).unwrap();

        assert_eq!(raw.name, "Ink");
        assert_eq!(raw.width, 0.0);
        assert_eq!(raw.height, 0.0);
    }
}
