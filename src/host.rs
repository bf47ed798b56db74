//! Seams to the document viewer that hosts the navigator.
//!
//! The viewer pushes annotation notifications through an [`EventSource`] and exposes
//! scrolling, element lookup and focus through [`ScrollService`] and [`ElementHost`].

use crate::annotation::RawAnnotation;
use anyhow::Result;
use flume::{Receiver, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Notification emitted by the viewer's annotation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Emitted both when an annotation is created and when it changes.
    AnnotationAdded { annotation: RawAnnotation },
    AnnotationRemoved { id: String },
}

impl HostEvent {
    pub fn added(annotation: RawAnnotation) -> Self {
        Self::AnnotationAdded { annotation }
    }

    pub fn removed(id: impl Into<String>) -> Self {
        Self::AnnotationRemoved { id: id.into() }
    }
}

/// Trait for abstracting event sources to enable testing
pub trait EventSource {
    /// Poll for events with a timeout
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event
    fn read(&mut self) -> Result<HostEvent>;
}

/// Sending half handed to the viewer; each clone is one subscription point.
#[derive(Debug, Clone)]
pub struct HostEventSender {
    tx: Sender<HostEvent>,
}

impl HostEventSender {
    /// Returns false once the navigator side has been dropped.
    pub fn send(&self, event: HostEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Event source fed by the viewer through a [`HostEventSender`].
pub struct ChannelEventSource {
    rx: Receiver<HostEvent>,
    pending: Option<HostEvent>,
}

/// Creates a connected sender/source pair.
pub fn subscribe() -> (HostEventSender, ChannelEventSource) {
    let (tx, rx) = flume::unbounded();
    (
        HostEventSender { tx },
        ChannelEventSource { rx, pending: None },
    )
}

impl EventSource for ChannelEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        let received = if timeout.is_zero() {
            self.rx.try_recv().ok()
        } else {
            match self.rx.recv_timeout(timeout) {
                Ok(event) => Some(event),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
            }
        };
        self.pending = received;
        Ok(self.pending.is_some())
    }

    fn read(&mut self) -> Result<HostEvent> {
        if let Some(event) = self.pending.take() {
            return Ok(event);
        }
        Ok(self.rx.recv()?)
    }
}

/// Replays a fixed list of host events, one per `read`.
pub struct SimulatedEventSource {
    events: Vec<HostEvent>,
    current_index: usize,
}

impl SimulatedEventSource {
    pub fn new(events: Vec<HostEvent>) -> Self {
        Self {
            events,
            current_index: 0,
        }
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(self.current_index < self.events.len())
    }

    fn read(&mut self) -> Result<HostEvent> {
        let event = self
            .events
            .get(self.current_index)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("simulated event source is exhausted"))?;
        self.current_index += 1;
        Ok(event)
    }
}

/// Element bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            bottom: top + height,
            right: left + width,
        }
    }

    /// True when any part of the box overlaps the viewport; touching an edge counts.
    pub fn is_visible_in(&self, viewport: ViewportSize) -> bool {
        self.bottom >= 0.0
            && self.right >= 0.0
            && self.top <= viewport.height
            && self.left <= viewport.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

pub trait ScrollService {
    /// Scrolls the one-based `page_number` into the visible viewport.
    fn scroll_page_into_view(&mut self, page_number: usize);
}

pub trait ElementHost {
    fn viewport(&self) -> ViewportSize;

    /// Bounding box of the on-page element for an annotation, if it currently exists.
    fn element_rect(&self, id: &str) -> Option<Rect>;

    /// Focuses the element. Returns false if no such element exists.
    fn focus_element(&mut self, id: &str) -> bool;

    fn is_element_visible(&self, id: &str) -> bool {
        self.element_rect(id)
            .is_some_and(|rect| rect.is_visible_in(self.viewport()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str) -> RawAnnotation {
        RawAnnotation {
            id: id.to_string(),
            name: "InkEditor".to_string(),
            page_index: 0,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    #[test]
    fn test_scripted_events_are_read_once_in_order() {
        let events = vec![HostEvent::added(raw("a")), HostEvent::removed("a")];
        let mut source = SimulatedEventSource::new(events);

        assert!(source.poll(Duration::from_millis(0)).unwrap());
        assert_eq!(source.read().unwrap(), HostEvent::added(raw("a")));
        assert_eq!(source.read().unwrap(), HostEvent::removed("a"));

        assert!(!source.poll(Duration::from_millis(0)).unwrap());
        assert!(source.read().is_err());
    }

    #[test]
    fn test_channel_event_source_delivers_in_order() {
        let (sender, mut source) = subscribe();
        assert!(sender.send(HostEvent::added(raw("a"))));
        assert!(sender.send(HostEvent::removed("a")));

        assert!(source.poll(Duration::from_millis(0)).unwrap());
        assert_eq!(source.read().unwrap(), HostEvent::added(raw("a")));
        assert!(source.poll(Duration::from_millis(0)).unwrap());
        assert_eq!(source.read().unwrap(), HostEvent::removed("a"));
        assert!(!source.poll(Duration::from_millis(0)).unwrap());
    }

    #[test]
    fn test_sender_reports_dropped_source() {
        let (sender, source) = subscribe();
        drop(source);
        assert!(!sender.send(HostEvent::removed("a")));
    }

    #[test]
    fn test_cloned_senders_feed_one_source_across_threads() {
        let (sender, mut source) = subscribe();
        let worker = sender.clone();
        let handle = std::thread::spawn(move || worker.send(HostEvent::removed("b")));
        assert!(handle.join().unwrap());
        assert!(sender.send(HostEvent::removed("c")));

        assert!(source.poll(Duration::from_millis(50)).unwrap());
        assert_eq!(source.read().unwrap(), HostEvent::removed("b"));
        assert!(source.poll(Duration::from_millis(50)).unwrap());
        assert_eq!(source.read().unwrap(), HostEvent::removed("c"));
        assert!(!source.poll(Duration::from_millis(10)).unwrap());
    }

    #[test]
    fn test_host_event_json_shape() {
        let json = r#"{"type": "annotation_removed", "id": "x"}"#;
        let event: HostEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, HostEvent::removed("x"));
    }

    #[test]
    fn test_visibility_fully_inside() {
        let viewport = ViewportSize::new(800.0, 600.0);
        assert!(Rect::new(10.0, 10.0, 50.0, 50.0).is_visible_in(viewport));
    }

    #[test]
    fn test_visibility_partial_overlap_counts() {
        let viewport = ViewportSize::new(800.0, 600.0);
        // Sticking out above the top edge.
        assert!(Rect::new(10.0, -40.0, 50.0, 50.0).is_visible_in(viewport));
        // Sticking out past the right edge.
        assert!(Rect::new(790.0, 10.0, 50.0, 50.0).is_visible_in(viewport));
    }

    #[test]
    fn test_visibility_touching_edges_counts() {
        let viewport = ViewportSize::new(800.0, 600.0);
        assert!(Rect::new(0.0, 600.0, 10.0, 10.0).is_visible_in(viewport));
        assert!(Rect::new(-10.0, -10.0, 10.0, 10.0).is_visible_in(viewport));
    }

    #[test]
    fn test_visibility_outside() {
        let viewport = ViewportSize::new(800.0, 600.0);
        assert!(!Rect::new(10.0, 700.0, 50.0, 50.0).is_visible_in(viewport));
        assert!(!Rect::new(10.0, -100.0, 50.0, 50.0).is_visible_in(viewport));
        assert!(!Rect::new(900.0, 10.0, 50.0, 50.0).is_visible_in(viewport));
        assert!(!Rect::new(-100.0, 10.0, 50.0, 50.0).is_visible_in(viewport));
    }
}
