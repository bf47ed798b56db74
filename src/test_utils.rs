pub mod test_helpers {
    use crate::annotation::RawAnnotation;
    use crate::headless::HeadlessHost;
    use crate::host::{HostEvent, Rect, ViewportSize};
    use crate::navigator::Navigator;
    use crate::settings::NavigatorSettings;

    pub const VIEWPORT: ViewportSize = ViewportSize {
        width: 800.0,
        height: 600.0,
    };

    /// Builder for raw annotation records as the viewer reports them
    pub struct AnnotationBuilder {
        raw: RawAnnotation,
    }

    impl AnnotationBuilder {
        pub fn new(id: &str) -> Self {
            Self {
                raw: RawAnnotation {
                    id: id.to_string(),
                    name: "FreeTextEditor".to_string(),
                    page_index: 0,
                    x: 0.0,
                    y: 0.0,
                    width: 0.1,
                    height: 0.05,
                },
            }
        }

        pub fn kind(mut self, name: &str) -> Self {
            self.raw.name = name.to_string();
            self
        }

        pub fn page(mut self, page_index: usize) -> Self {
            self.raw.page_index = page_index;
            self
        }

        pub fn at(mut self, x: f64, y: f64) -> Self {
            self.raw.x = x;
            self.raw.y = y;
            self
        }

        pub fn build(self) -> RawAnnotation {
            self.raw
        }

        pub fn added(self) -> HostEvent {
            HostEvent::added(self.raw)
        }
    }

    pub fn annotation(id: &str, page_index: usize, x: f64, y: f64) -> RawAnnotation {
        AnnotationBuilder::new(id).page(page_index).at(x, y).build()
    }

    pub fn on_screen() -> Rect {
        Rect::new(100.0, 100.0, 40.0, 20.0)
    }

    pub fn off_screen() -> Rect {
        Rect::new(100.0, 2_000.0, 40.0, 20.0)
    }

    /// Navigator wired to a headless host, plus a handle to inspect that host
    pub fn headless_navigator(
        settings: &NavigatorSettings,
    ) -> (Navigator<HeadlessHost, HeadlessHost>, HeadlessHost) {
        let host = HeadlessHost::new(VIEWPORT);
        let navigator = Navigator::with_settings(host.clone(), host.clone(), settings);
        (navigator, host)
    }

    /// Navigator holding `annotations`, each with an on-screen element
    pub fn populated_navigator(
        annotations: &[RawAnnotation],
    ) -> (Navigator<HeadlessHost, HeadlessHost>, HeadlessHost) {
        let (mut navigator, host) = headless_navigator(&NavigatorSettings::default());
        for raw in annotations {
            host.place_element(raw.id.clone(), on_screen());
            navigator.handle_event(HostEvent::added(raw.clone()));
        }
        (navigator, host)
    }
}
