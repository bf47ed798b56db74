use crate::annotation::AnnotationSummary;
use crate::focus_scheduler::{FocusScheduler, PendingFocus};
use crate::host::{ElementHost, EventSource, HostEvent, ScrollService};
use crate::registry::AnnotationRegistry;
use crate::settings::NavigatorSettings;
use crate::view::{self, AnnotationListView, ListAction, RenderContext, ViewOptions};
use log::{debug, trace, warn};
use std::time::{Duration, Instant};

/// Position within the navigable sequence, clamped to `[0, len - 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
}

impl Cursor {
    pub fn get(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.index.min(len - 1))
    }

    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }

    fn set(&mut self, index: usize) {
        self.index = index;
    }

    fn step_back(&mut self, len: usize) -> Option<usize> {
        self.clamp(len);
        self.index = self.index.saturating_sub(1);
        self.get(len)
    }

    fn step_forward(&mut self, len: usize) -> Option<usize> {
        self.clamp(len);
        if len > 0 {
            self.index = (self.index + 1).min(len - 1);
        }
        self.get(len)
    }
}

/// Keeps the annotation list in sync with the viewer and moves focus between entries.
///
/// Every failure mode (unknown id, empty list, element gone by the time focus fires)
/// degrades to a logged no-op.
pub struct Navigator<S, E> {
    registry: AnnotationRegistry,
    cursor: Cursor,
    kind_filter: Option<String>,
    focus: FocusScheduler,
    scroll: S,
    elements: E,
    view_options: ViewOptions,
    view: AnnotationListView,
}

impl<S: ScrollService, E: ElementHost> Navigator<S, E> {
    pub fn new(scroll: S, elements: E) -> Self {
        Self::with_settings(scroll, elements, &NavigatorSettings::default())
    }

    pub fn with_settings(scroll: S, elements: E, settings: &NavigatorSettings) -> Self {
        let mut navigator = Self {
            registry: AnnotationRegistry::with_order(settings.reading_order()),
            cursor: Cursor::default(),
            kind_filter: None,
            focus: FocusScheduler::new(settings.focus_delay(), settings.cancel_superseded_focus),
            scroll,
            elements,
            view_options: settings.view_options(),
            view: AnnotationListView::default(),
        };
        navigator.refresh();
        navigator
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::AnnotationAdded { annotation } => {
                self.registry.upsert(&annotation);
                self.refresh();
            }
            HostEvent::AnnotationRemoved { id } => {
                if self.registry.remove(&id) {
                    self.refresh();
                }
            }
        }
    }

    /// Applies every event the source has ready. Returns how many were handled.
    pub fn drain_events<Src: EventSource>(&mut self, source: &mut Src) -> usize {
        let mut handled = 0;
        loop {
            match source.poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("Failed to poll annotation events: {e}");
                    break;
                }
            }
            match source.read() {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(e) => {
                    warn!("Failed to read annotation event: {e}");
                    break;
                }
            }
        }
        handled
    }

    pub fn select_by_id(&mut self, id: &str) {
        let Some(index) = self.visible_entries().position(|e| e.id == id) else {
            debug!("Annotation {id} is no longer listed, ignoring selection");
            return;
        };
        self.cursor.set(index);
        self.focus_current();
    }

    /// Handles a click on an entry's activation control.
    pub fn activate(&mut self, action: &ListAction) {
        self.select_by_id(&action.id);
    }

    pub fn previous(&mut self) {
        let len = self.visible_len();
        if self.cursor.step_back(len).is_some() {
            self.focus_current();
        }
    }

    pub fn next(&mut self) {
        let len = self.visible_len();
        if self.cursor.step_forward(len).is_some() {
            self.focus_current();
        }
    }

    /// Restricts listing and navigation to one annotation kind; `None` shows all.
    pub fn set_kind_filter(&mut self, kind: Option<String>) {
        if self.kind_filter == kind {
            return;
        }
        debug!("Annotation kind filter set to {kind:?}");
        self.kind_filter = kind;
        self.refresh();
    }

    pub fn kind_filter(&self) -> Option<&str> {
        self.kind_filter.as_deref()
    }

    /// Fires deferred focus requests that are due at `now`.
    pub fn run_due_focus(&mut self, now: Instant) -> usize {
        let due = self.focus.take_due(now);
        self.fire_focus(due)
    }

    /// Fires every pending focus request immediately.
    pub fn flush_focus(&mut self) -> usize {
        let due = self.focus.take_all();
        self.fire_focus(due)
    }

    pub fn next_focus_due(&self) -> Option<Instant> {
        self.focus.next_due()
    }

    pub fn view(&self) -> &AnnotationListView {
        &self.view
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor.get(self.visible_len())
    }

    pub fn current(&self) -> Option<&AnnotationSummary> {
        let index = self.cursor()?;
        self.visible_entries().nth(index)
    }

    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    pub fn focus_scheduler(&self) -> &FocusScheduler {
        &self.focus
    }

    pub fn scroll_service(&self) -> &S {
        &self.scroll
    }

    pub fn element_host(&self) -> &E {
        &self.elements
    }

    fn visible_entries(&self) -> impl Iterator<Item = &AnnotationSummary> + '_ {
        let filter = self.kind_filter.as_deref();
        self.registry
            .snapshot()
            .iter()
            .filter(move |e| filter.is_none_or(|kind| e.kind_name == kind))
    }

    fn visible_len(&self) -> usize {
        self.visible_entries().count()
    }

    /// Re-validates the cursor and rebuilds the list after any state change.
    fn refresh(&mut self) {
        self.cursor.clamp(self.visible_len());

        let entries: Vec<AnnotationSummary> = self.visible_entries().cloned().collect();
        let selected_id = self.current().map(|e| e.id.clone());
        let kinds = self.registry.kinds();
        let context = RenderContext {
            selected_id: selected_id.as_deref(),
            kinds: &kinds,
            active_kind: self.kind_filter.as_deref(),
        };
        self.view = view::render(&entries, &context, &self.view_options);
        trace!("Rendered {} annotation entries", self.view.len());
    }

    fn focus_current(&mut self) {
        let Some((id, page_number)) = self.current().map(|e| (e.id.clone(), e.page_number()))
        else {
            return;
        };

        if !self.elements.is_element_visible(&id) {
            debug!("Annotation {id} is off screen, scrolling to page {page_number}");
            self.scroll.scroll_page_into_view(page_number);
        }
        let ticket = self.focus.schedule(id.as_str(), Instant::now());
        trace!("Scheduled focus {ticket:?} for annotation {id}");

        self.refresh();
    }

    fn fire_focus(&mut self, due: Vec<PendingFocus>) -> usize {
        let mut focused = 0;
        for task in due {
            if self.elements.focus_element(&task.element_id) {
                focused += 1;
            } else {
                debug!(
                    "Element for annotation {} is gone, skipping focus",
                    task.element_id
                );
            }
        }
        focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_empty_is_inert() {
        let mut cursor = Cursor::default();
        assert_eq!(cursor.get(0), None);
        assert_eq!(cursor.step_forward(0), None);
        assert_eq!(cursor.step_back(0), None);
        assert_eq!(cursor, Cursor::default());
    }

    #[test]
    fn test_cursor_clamps_at_both_ends() {
        let mut cursor = Cursor::default();
        assert_eq!(cursor.step_back(3), Some(0));
        assert_eq!(cursor.step_forward(3), Some(1));
        assert_eq!(cursor.step_forward(3), Some(2));
        assert_eq!(cursor.step_forward(3), Some(2));
    }

    #[test]
    fn test_cursor_revalidated_after_shrink() {
        let mut cursor = Cursor::default();
        cursor.set(5);
        assert_eq!(cursor.get(2), Some(1));

        cursor.clamp(2);
        assert_eq!(cursor.step_back(2), Some(0));
    }
}
