//! Browser environment helpers for the widgets.

use crate::core::slider::SliderLayout;
use gloo::utils::window;
use web_sys::Element;

/// Fallback viewport width when the window reports nothing usable.
const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

pub(crate) fn viewport_width() -> f64 {
    window()
        .inner_width()
        .ok()
        .and_then(|width| width.as_f64())
        .unwrap_or(DEFAULT_VIEWPORT_WIDTH)
}

pub(crate) fn current_layout() -> SliderLayout {
    SliderLayout::from_viewport(viewport_width())
}

/// Attribute lookup closure over a DOM element, for the config parsers.
pub(crate) fn attribute_lookup(element: &Element) -> impl Fn(&str) -> Option<String> + '_ {
    move |name| element.get_attribute(name)
}
