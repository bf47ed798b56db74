use crate::host::{ElementHost, Rect, ScrollService, ViewportSize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Request the navigator made of the host, in the order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    ScrollToPage(usize),
    Focus { id: String, found: bool },
}

#[derive(Debug, Default)]
struct HeadlessState {
    viewport: ViewportSize,
    elements: HashMap<String, Rect>,
    requests: Vec<HostRequest>,
    focused: Option<String>,
}

/// In-memory viewer used by the replay harness and tests.
///
/// Clones share state, so one clone can be handed to the navigator as its scroll
/// service, another as its element host, and a third kept to inspect requests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessHost {
    pub fn new(viewport: ViewportSize) -> Self {
        let host = Self::default();
        host.state.borrow_mut().viewport = viewport;
        host
    }

    pub fn place_element(&self, id: impl Into<String>, rect: Rect) {
        self.state.borrow_mut().elements.insert(id.into(), rect);
    }

    pub fn remove_element(&self, id: &str) {
        self.state.borrow_mut().elements.remove(id);
    }

    pub fn set_viewport(&self, viewport: ViewportSize) {
        self.state.borrow_mut().viewport = viewport;
    }

    pub fn requests(&self) -> Vec<HostRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn take_requests(&self) -> Vec<HostRequest> {
        std::mem::take(&mut self.state.borrow_mut().requests)
    }

    pub fn scrolled_pages(&self) -> Vec<usize> {
        self.state
            .borrow()
            .requests
            .iter()
            .filter_map(|r| match r {
                HostRequest::ScrollToPage(page) => Some(*page),
                HostRequest::Focus { .. } => None,
            })
            .collect()
    }

    pub fn focused(&self) -> Option<String> {
        self.state.borrow().focused.clone()
    }
}

impl ScrollService for HeadlessHost {
    fn scroll_page_into_view(&mut self, page_number: usize) {
        self.state
            .borrow_mut()
            .requests
            .push(HostRequest::ScrollToPage(page_number));
    }
}

impl ElementHost for HeadlessHost {
    fn viewport(&self) -> ViewportSize {
        self.state.borrow().viewport
    }

    fn element_rect(&self, id: &str) -> Option<Rect> {
        self.state.borrow().elements.get(id).copied()
    }

    fn focus_element(&mut self, id: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let found = state.elements.contains_key(id);
        if found {
            state.focused = Some(id.to_string());
        }
        state.requests.push(HostRequest::Focus {
            id: id.to_string(),
            found,
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let host = HeadlessHost::new(ViewportSize::new(100.0, 100.0));
        let mut scroll = host.clone();
        let mut elements = host.clone();
        host.place_element("a", Rect::new(0.0, 0.0, 10.0, 10.0));

        scroll.scroll_page_into_view(3);
        assert!(elements.focus_element("a"));
        assert!(!elements.focus_element("b"));

        assert_eq!(host.scrolled_pages(), vec![3]);
        assert_eq!(host.focused().as_deref(), Some("a"));
        assert_eq!(host.take_requests().len(), 3);
        assert!(host.requests().is_empty());
    }

    #[test]
    fn test_visibility_follows_placement() {
        let host = HeadlessHost::new(ViewportSize::new(100.0, 100.0));
        assert!(!host.is_element_visible("a"));

        host.place_element("a", Rect::new(0.0, 50.0, 10.0, 10.0));
        assert!(host.is_element_visible("a"));

        host.set_viewport(ViewportSize::new(100.0, 40.0));
        assert!(!host.is_element_visible("a"));

        host.remove_element("a");
        assert!(host.element_rect("a").is_none());
    }
}
