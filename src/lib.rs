pub mod annotation;
pub mod focus_scheduler;
pub mod headless;
pub mod host;
pub mod navigator;
pub mod panic_handler;
pub mod reading_order;
pub mod registry;
pub mod settings;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use annotation::{AnnotationSummary, RawAnnotation};
pub use headless::{HeadlessHost, HostRequest};
pub use host::{ElementHost, EventSource, HostEvent, Rect, ScrollService, ViewportSize};
pub use navigator::Navigator;
pub use registry::AnnotationRegistry;
pub use settings::NavigatorSettings;
pub use view::{AnnotationListView, ListAction};
