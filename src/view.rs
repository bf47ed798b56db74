//! Summary list shown next to the document.
//!
//! Rendering is a pure mapping from the ordered annotations to a view-model; the
//! whole list is rebuilt on every change. [`AnnotationListView::to_html`] turns the
//! view-model into list markup with every interpolated value escaped.

use crate::annotation::AnnotationSummary;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub coordinate_precision: usize,
    pub page_label: String,
    pub focus_label: String,
    pub all_kinds_label: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            coordinate_precision: 4,
            page_label: "Page".to_string(),
            focus_label: "Focus".to_string(),
            all_kinds_label: "All".to_string(),
        }
    }
}

/// Payload carried by an entry's activation control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAction {
    pub id: String,
    pub page_index: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEntryView {
    /// Element id of the list item, `{id}_li`
    pub item_id: String,
    pub kind_name: String,
    pub page_text: String,
    pub position_text: String,
    pub focus_label: String,
    pub selected: bool,
    pub action: ListAction,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct KindFilterView {
    pub all_label: String,
    pub options: Vec<String>,
    pub active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationListView {
    pub entries: Vec<ListEntryView>,
    pub kind_filter: KindFilterView,
}

/// Navigator state the list reflects besides the entries themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub selected_id: Option<&'a str>,
    pub kinds: &'a [String],
    pub active_kind: Option<&'a str>,
}

pub fn render(
    entries: &[AnnotationSummary],
    context: &RenderContext<'_>,
    options: &ViewOptions,
) -> AnnotationListView {
    let entries = entries
        .iter()
        .map(|entry| render_entry(entry, context.selected_id, options))
        .collect();

    AnnotationListView {
        entries,
        kind_filter: KindFilterView {
            all_label: options.all_kinds_label.clone(),
            options: context.kinds.to_vec(),
            active: context.active_kind.map(str::to_string),
        },
    }
}

fn render_entry(
    entry: &AnnotationSummary,
    selected_id: Option<&str>,
    options: &ViewOptions,
) -> ListEntryView {
    let precision = options.coordinate_precision;
    ListEntryView {
        item_id: format!("{}_li", entry.id),
        kind_name: entry.kind_name.clone(),
        page_text: format!("{} {}", options.page_label, entry.page_number()),
        position_text: format!(
            "X: {:.*} / Y: {:.*}",
            precision, entry.x, precision, entry.y
        ),
        focus_label: options.focus_label.clone(),
        selected: selected_id == Some(entry.id.as_str()),
        action: ListAction {
            id: entry.id.clone(),
            page_index: entry.page_index,
            x: entry.x,
            y: entry.y,
        },
    }
}

impl AnnotationListView {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<&ListEntryView> {
        self.entries.iter().find(|e| e.selected)
    }

    /// Finds the activation payload for a clicked control by annotation id.
    pub fn action_for(&self, id: &str) -> Option<&ListAction> {
        self.entries
            .iter()
            .map(|e| &e.action)
            .find(|action| action.id == id)
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for entry in &self.entries {
            write_entry_html(&mut html, entry);
        }
        html
    }

    pub fn kind_filter_html(&self) -> String {
        let filter = &self.kind_filter;
        let mut html = String::new();
        let _ = write!(
            html,
            "<option value=\"\"{}>{}</option>",
            selected_attr(filter.active.is_none()),
            encode_text(&filter.all_label)
        );
        for kind in &filter.options {
            let _ = write!(
                html,
                "<option value=\"{}\"{}>{}</option>",
                encode_double_quoted_attribute(kind),
                selected_attr(filter.active.as_deref() == Some(kind.as_str())),
                encode_text(kind)
            );
        }
        html
    }
}

fn selected_attr(selected: bool) -> &'static str {
    if selected { " selected" } else { "" }
}

fn write_entry_html(html: &mut String, entry: &ListEntryView) {
    let class = if entry.selected {
        "annotationNavigatorItem selected"
    } else {
        "annotationNavigatorItem"
    };
    let action = &entry.action;
    let id_attr = encode_double_quoted_attribute(&action.id);

    let _ = write!(
        html,
        "<li id=\"{item_id}\" class=\"{class}\">\
         <h4>{kind}</h4>\
         <p>{page}</p>\
         <p>{position}</p>\
         <button type=\"button\" data-editor=\"{id_attr}\" data-page=\"{page_index}\" \
         data-x=\"{x}\" data-y=\"{y}\">{label}</button>\
         </li>",
        item_id = encode_double_quoted_attribute(&entry.item_id),
        kind = encode_text(&entry.kind_name),
        page = encode_text(&entry.page_text),
        position = encode_text(&entry.position_text),
        page_index = action.page_index,
        x = action.x,
        y = action.y,
        label = encode_text(&entry.focus_label),
    );
}
