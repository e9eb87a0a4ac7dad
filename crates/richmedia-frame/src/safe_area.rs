//! Safe-area geometry observation.

use richmedia_protocol::SafeRect;

/// Bounding box of an element in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Turns resize observations of the safe-area element into page-space
/// rectangles, emitting only when the box size changes.
#[derive(Debug, Default)]
pub struct SafeAreaObserver {
    last_size: Option<(f64, f64)>,
}

impl SafeAreaObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first observation always emits.
    pub fn observe(&mut self, bounds: ElementBox, scroll_x: f64, scroll_y: f64) -> Option<SafeRect> {
        if !(bounds.width.is_finite() && bounds.height.is_finite()) {
            return None;
        }
        let size = (bounds.width, bounds.height);
        if self.last_size == Some(size) {
            return None;
        }
        self.last_size = Some(size);
        Some(SafeRect::new(
            bounds.x + scroll_x,
            bounds.y + scroll_y,
            bounds.width,
            bounds.height,
        ))
    }

    pub fn reset(&mut self) {
        self.last_size = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_page_coordinates() {
        let mut observer = SafeAreaObserver::new();
        let rect = observer.observe(ElementBox::new(10.0, 20.0, 300.0, 200.0), 0.0, 150.0);
        assert_eq!(rect, Some(SafeRect::new(10.0, 170.0, 300.0, 200.0)));
    }

    #[test]
    fn emits_only_on_size_change() {
        let mut observer = SafeAreaObserver::new();
        assert!(observer.observe(ElementBox::new(0.0, 0.0, 300.0, 200.0), 0.0, 0.0).is_some());
        assert!(observer.observe(ElementBox::new(5.0, 5.0, 300.0, 200.0), 0.0, 0.0).is_none());
        assert!(observer.observe(ElementBox::new(5.0, 5.0, 320.0, 200.0), 0.0, 0.0).is_some());

        observer.reset();
        assert!(observer.observe(ElementBox::new(5.0, 5.0, 320.0, 200.0), 0.0, 0.0).is_some());
    }

    #[test]
    fn ignores_non_finite_boxes() {
        let mut observer = SafeAreaObserver::new();
        assert!(observer.observe(ElementBox::new(0.0, 0.0, f64::NAN, 1.0), 0.0, 0.0).is_none());
    }
}
