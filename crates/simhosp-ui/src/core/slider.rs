//! Rate slider geometry and scene construction.
//!
//! # Design
//! - Every position is a pure function of one [`SliderValue`] and the [`SliderLayout`].
//! - [`SliderScene::apply`] rewrites handle, label and pointer together so they never drift.
//! - Layout follows the viewport width; values stay fixed across a relayout.

use crate::core::scale::{LinearScale, tick_format, tick_step};
use crate::core::scene::{NodeId, Scene, SceneError};
use thiserror::Error;

/// Radius of the circular handle.
pub const HANDLE_RADIUS: f64 = 50.0;
/// Gap between the handle and the track.
pub const HANDLE_PADDING: f64 = 10.0;
/// Thickness of the track rectangle.
pub const SLIDER_HEIGHT: f64 = 5.0;
/// Vertical room reserved for the axis labels.
pub const AXIS_HEIGHT: f64 = 20.0;
/// Largest value a slider represents.
pub const DOMAIN_MAX: f64 = 400.0;
/// Share of the viewport width given to each slider.
pub const VIEWPORT_FRACTION: f64 = 0.8;
/// Requested number of axis ticks.
pub const AXIS_TICK_COUNT: usize = 10;

const TICK_SIZE: f64 = 6.0;
const TICK_LABEL_OFFSET: f64 = 9.0;

/// CSS class of the axis group.
pub const CLASS_AXIS: &str = "range-axis";
/// CSS class of the track rectangle.
pub const CLASS_BODY: &str = "range-body";
/// CSS class shared by every draggable shape.
pub const CLASS_DRAGGER: &str = "range-dragger";
/// CSS class of the circular handle.
pub const CLASS_HANDLE: &str = "range-handle";
/// CSS class of the triangular pointer.
pub const CLASS_POINTER: &str = "range-pointer";
/// CSS class of the numeric label.
pub const CLASS_LABEL: &str = "range-label";
/// Attribute carrying the slider ordinal on draggable shapes.
pub const SLIDER_NUMBER_ATTRIBUTE: &str = "data-slider-number";

/// Failure to read a slider value from a response body.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    /// The body was blank.
    #[error("slider value response was empty")]
    Empty,
    /// The body was not a finite number.
    #[error("slider value '{0}' is not a number")]
    NotNumeric(String),
}

/// Value shown by a slider, always inside `[0, DOMAIN_MAX]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderValue(f64);

impl SliderValue {
    /// Clamp `raw` into the slider domain. `NaN` and negative zero become zero.
    #[must_use]
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() || raw <= 0.0 {
            Self(0.0)
        } else if raw > DOMAIN_MAX {
            Self(DOMAIN_MAX)
        } else {
            Self(raw)
        }
    }

    /// Parse the body returned by a slider's GET endpoint.
    ///
    /// # Errors
    /// Returns [`ValueError`] when the body is blank or not a finite number.
    pub fn parse(body: &str) -> Result<Self, ValueError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(ValueError::Empty);
        }
        match trimmed.parse::<f64>() {
            Ok(raw) if raw.is_finite() => Ok(Self::new(raw)),
            _ => Err(ValueError::NotNumeric(trimmed.to_string())),
        }
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Label text; whole numbers print without decimals.
    #[must_use]
    pub fn label(self) -> String {
        format!("{}", self.0)
    }
}

impl From<u32> for SliderValue {
    fn from(value: u32) -> Self {
        Self::new(f64::from(value))
    }
}

/// Pixel geometry for one slider, derived from the SVG width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderLayout {
    svg_width: f64,
}

impl SliderLayout {
    /// Layout for an SVG of `svg_width` pixels. Negative or non-finite widths become zero.
    #[must_use]
    pub fn new(svg_width: f64) -> Self {
        let svg_width = if svg_width.is_finite() {
            svg_width.max(0.0)
        } else {
            0.0
        };
        Self { svg_width }
    }

    /// Layout sized from the browser viewport width.
    #[must_use]
    pub fn from_viewport(viewport_width: f64) -> Self {
        Self::new(viewport_width * VIEWPORT_FRACTION)
    }

    /// SVG element width.
    #[must_use]
    pub const fn svg_width(&self) -> f64 {
        self.svg_width
    }

    /// SVG element height.
    #[must_use]
    pub const fn svg_height(&self) -> f64 {
        HANDLE_RADIUS * 2.0 + SLIDER_HEIGHT + HANDLE_PADDING + AXIS_HEIGHT
    }

    /// Usable track width; the handle may overhang each end by its radius.
    #[must_use]
    pub fn track_width(&self) -> f64 {
        (self.svg_width - 2.0 * HANDLE_RADIUS).max(0.0)
    }

    /// Height of the drawable range area (the axis sits at its bottom).
    #[must_use]
    pub const fn range_height(&self) -> f64 {
        self.svg_height() - 2.0 * HANDLE_PADDING
    }

    /// Vertical centre of the handle and label.
    #[must_use]
    pub const fn handle_y(&self) -> f64 {
        self.range_height() - SLIDER_HEIGHT - HANDLE_RADIUS - HANDLE_PADDING
    }

    /// Transform applied to the slider group.
    #[must_use]
    pub fn group_transform(&self) -> String {
        format!("translate({HANDLE_RADIUS}, 0)")
    }

    /// Scale from the value domain onto the track.
    #[must_use]
    pub fn scale(&self) -> LinearScale {
        LinearScale::new((0.0, DOMAIN_MAX), (0.0, self.track_width()))
    }

    /// X offset of `value` on the track.
    #[must_use]
    pub fn x_for(&self, value: SliderValue) -> f64 {
        self.scale().map(value.get())
    }

    /// Whole value under a pointer at group-local `x`, clamped to the track.
    #[must_use]
    pub fn value_at(&self, x: f64) -> u32 {
        self.scale().value_at(x)
    }

    /// Convert a client x coordinate into slider group coordinates.
    #[must_use]
    pub fn local_x(&self, client_x: f64, svg_left: f64) -> f64 {
        client_x - svg_left - HANDLE_RADIUS
    }

    /// Space-delimited `x,y` points of the pointer triangle for `value`.
    #[must_use]
    pub fn pointer_points(&self, value: SliderValue) -> String {
        let x = self.x_for(value);
        let half_base = HANDLE_RADIUS / 4.0;
        let base_y = self.range_height() - SLIDER_HEIGHT - HANDLE_PADDING - HANDLE_RADIUS / 10.0;
        let tip_y = self.range_height() - SLIDER_HEIGHT;
        format!(
            "{},{base_y} {},{base_y} {x},{tip_y}",
            x - half_base,
            x + half_base
        )
    }
}

/// A slider's scene plus the ids of the nodes that move.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderScene {
    scene: Scene,
    layout: SliderLayout,
    value: SliderValue,
    index: usize,
    axis: NodeId,
    body: NodeId,
    handle: NodeId,
    label: NodeId,
    pointer: NodeId,
}

impl SliderScene {
    /// Build the full slider group for the control at `index`.
    ///
    /// # Errors
    /// Propagates [`SceneError`] from scene construction.
    pub fn build(
        layout: SliderLayout,
        value: SliderValue,
        index: usize,
    ) -> Result<Self, SceneError> {
        let mut scene = Scene::new();
        let group = scene.create(None, "g", [("transform", layout.group_transform())])?;
        let axis = scene.create(
            Some(group),
            "g",
            [
                ("class", CLASS_AXIS.to_string()),
                ("fill", "none".to_string()),
                ("font-size", "10".to_string()),
                ("text-anchor", "middle".to_string()),
            ],
        )?;
        let body = scene.create(
            Some(group),
            "rect",
            [
                ("class", CLASS_BODY.to_string()),
                ("x", "0".to_string()),
                ("y", (layout.range_height() - SLIDER_HEIGHT).to_string()),
                ("height", SLIDER_HEIGHT.to_string()),
            ],
        )?;
        let handle = scene.create(
            Some(group),
            "circle",
            [
                ("class", format!("{CLASS_DRAGGER} {CLASS_HANDLE}")),
                ("cy", layout.handle_y().to_string()),
                ("r", HANDLE_RADIUS.to_string()),
                (SLIDER_NUMBER_ATTRIBUTE, index.to_string()),
            ],
        )?;
        let label = scene.create(
            Some(group),
            "text",
            [
                ("class", CLASS_LABEL.to_string()),
                ("y", layout.handle_y().to_string()),
                ("dy", ".3em".to_string()),
            ],
        )?;
        let pointer = scene.create(
            Some(group),
            "polygon",
            [
                ("class", format!("{CLASS_DRAGGER} {CLASS_POINTER}")),
                (SLIDER_NUMBER_ATTRIBUTE, index.to_string()),
            ],
        )?;

        let mut slider = Self {
            scene,
            layout,
            value,
            index,
            axis,
            body,
            handle,
            label,
            pointer,
        };
        slider.draw_track()?;
        slider.apply(value)?;
        Ok(slider)
    }

    /// Move handle, label and pointer to `value`.
    ///
    /// # Errors
    /// Propagates [`SceneError`] if a slider node went missing.
    pub fn apply(&mut self, value: SliderValue) -> Result<(), SceneError> {
        let x = self.layout.x_for(value).to_string();
        self.scene.set_attr(self.handle, "cx", x.clone())?;
        self.scene.set_attr(self.label, "x", x)?;
        self.scene.set_text(self.label, value.label())?;
        self.scene
            .set_attr(self.pointer, "points", self.layout.pointer_points(value))?;
        self.value = value;
        Ok(())
    }

    /// Re-fit the slider to a new layout, keeping its value.
    ///
    /// # Errors
    /// Propagates [`SceneError`] if a slider node went missing.
    pub fn relayout(&mut self, layout: SliderLayout) -> Result<(), SceneError> {
        if layout == self.layout {
            return Ok(());
        }
        self.layout = layout;
        self.draw_track()?;
        self.apply(self.value)
    }

    /// Underlying scene for rendering.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current layout.
    #[must_use]
    pub const fn layout(&self) -> SliderLayout {
        self.layout
    }

    /// Current value.
    #[must_use]
    pub const fn value(&self) -> SliderValue {
        self.value
    }

    /// Ordinal of the owning range control.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    fn draw_track(&mut self) -> Result<(), SceneError> {
        let layout = self.layout;
        let width = layout.track_width();
        self.scene.set_attr(self.body, "width", width.to_string())?;
        self.scene.set_attr(
            self.axis,
            "transform",
            format!("translate(0, {})", layout.range_height()),
        )?;
        self.scene.clear_children(self.axis)?;
        self.scene.create(
            Some(self.axis),
            "path",
            [
                ("class", "domain".to_string()),
                ("stroke", "currentColor".to_string()),
                ("d", format!("M0,{TICK_SIZE}V0H{width}V{TICK_SIZE}")),
            ],
        )?;

        let scale = layout.scale();
        let step = tick_step(0.0, DOMAIN_MAX, AXIS_TICK_COUNT).unwrap_or(DOMAIN_MAX);
        for tick in scale.ticks(AXIS_TICK_COUNT) {
            let group = self.scene.create(
                Some(self.axis),
                "g",
                [
                    ("class", "tick".to_string()),
                    ("transform", format!("translate({}, 0)", scale.map(tick))),
                ],
            )?;
            self.scene.create(
                Some(group),
                "line",
                [
                    ("stroke", "currentColor".to_string()),
                    ("y2", TICK_SIZE.to_string()),
                ],
            )?;
            let text = self.scene.create(
                Some(group),
                "text",
                [
                    ("fill", "currentColor".to_string()),
                    ("y", TICK_LABEL_OFFSET.to_string()),
                    ("dy", "0.71em".to_string()),
                ],
            )?;
            self.scene.set_text(text, tick_format(tick, step))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1280px viewport -> 1024px svg -> 924px track.
    fn layout() -> SliderLayout {
        SliderLayout::from_viewport(1280.0)
    }

    #[test]
    fn layout_matches_fixed_constants() {
        let layout = layout();
        assert_eq!(layout.svg_width(), 1024.0);
        assert_eq!(layout.svg_height(), 135.0);
        assert_eq!(layout.track_width(), 924.0);
        assert_eq!(layout.range_height(), 115.0);
        assert_eq!(layout.handle_y(), 50.0);
        assert_eq!(layout.group_transform(), "translate(50, 0)");
    }

    #[test]
    fn tiny_viewports_never_produce_negative_tracks() {
        assert_eq!(SliderLayout::from_viewport(100.0).track_width(), 0.0);
        assert_eq!(SliderLayout::new(f64::NAN).svg_width(), 0.0);
    }

    #[test]
    fn values_parse_from_response_bodies() {
        assert_eq!(SliderValue::parse("120"), Ok(SliderValue::new(120.0)));
        assert_eq!(SliderValue::parse(" 7.5\n"), Ok(SliderValue::new(7.5)));
        assert_eq!(SliderValue::parse(""), Err(ValueError::Empty));
        assert_eq!(
            SliderValue::parse("fast"),
            Err(ValueError::NotNumeric("fast".into()))
        );
        assert!(SliderValue::parse("inf").is_err());
        assert_eq!(SliderValue::parse("9000"), Ok(SliderValue::new(400.0)));
        assert_eq!(SliderValue::parse("-3"), Ok(SliderValue::new(0.0)));
    }

    #[test]
    fn labels_print_whole_numbers_plainly() {
        assert_eq!(SliderValue::from(120).label(), "120");
        assert_eq!(SliderValue::new(7.5).label(), "7.5");
    }

    #[test]
    fn negative_zero_reads_as_zero() {
        let value = SliderValue::parse("-0").expect("numeric body");
        assert_eq!(value.label(), "0");
        assert!(value.get().is_sign_positive());
        assert_eq!(SliderValue::new(-0.0).label(), "0");
    }

    #[test]
    fn pointer_is_a_triangle_under_the_handle() {
        let layout = SliderLayout::new(500.0);
        // track 400px, so values map one-to-one onto pixels
        assert_eq!(
            layout.pointer_points(SliderValue::from(100)),
            "87.5,95 112.5,95 100,110"
        );
    }

    #[test]
    fn local_x_removes_svg_offset_and_group_translation() {
        assert_eq!(layout().local_x(260.0, 40.0), 170.0);
    }

    #[test]
    fn initial_handle_uses_linear_mapping() -> Result<(), SceneError> {
        let layout = layout();
        let slider = SliderScene::build(layout, SliderValue::from(120), 0)?;
        let expected = (120.0 / 400.0 * 924.0).to_string();
        let scene = slider.scene();
        assert_eq!(scene.attr_of(CLASS_HANDLE, "cx"), Some(expected.as_str()));
        assert_eq!(scene.attr_of(CLASS_LABEL, "x"), Some(expected.as_str()));
        assert_eq!(
            scene.find_by_class(CLASS_LABEL).and_then(|id| scene.node(id)?.text()),
            Some("120")
        );
        assert_eq!(scene.attr_of(CLASS_HANDLE, "r"), Some("50"));
        assert_eq!(scene.attr_of(CLASS_HANDLE, SLIDER_NUMBER_ATTRIBUTE), Some("0"));
        Ok(())
    }

    #[test]
    fn build_orders_axis_track_handle_label_pointer() -> Result<(), SceneError> {
        let slider = SliderScene::build(layout(), SliderValue::from(0), 2)?;
        let scene = slider.scene();
        let group = scene.roots()[0];
        let classes: Vec<_> = scene
            .node(group)
            .map(|node| node.children().to_vec())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| scene.node(id)?.attr("class"))
            .collect();
        assert_eq!(
            classes,
            vec![
                CLASS_AXIS,
                CLASS_BODY,
                "range-dragger range-handle",
                CLASS_LABEL,
                "range-dragger range-pointer",
            ]
        );
        Ok(())
    }

    #[test]
    fn axis_has_ticks_every_fifty() -> Result<(), SceneError> {
        let slider = SliderScene::build(layout(), SliderValue::from(0), 0)?;
        let scene = slider.scene();
        let axis = scene.find_by_class(CLASS_AXIS).expect("axis exists");
        let ticks = scene.node(axis).map(|node| node.children().len()).unwrap_or(0);
        // domain path + 9 tick groups
        assert_eq!(ticks, 10);
        assert_eq!(
            scene.attr_of(CLASS_AXIS, "transform"),
            Some("translate(0, 115)")
        );
        Ok(())
    }

    #[test]
    fn apply_keeps_handle_label_and_pointer_together() -> Result<(), SceneError> {
        let layout = SliderLayout::new(500.0);
        let mut slider = SliderScene::build(layout, SliderValue::from(10), 0)?;
        slider.apply(SliderValue::from(250))?;
        let scene = slider.scene();
        assert_eq!(scene.attr_of(CLASS_HANDLE, "cx"), Some("250"));
        assert_eq!(scene.attr_of(CLASS_LABEL, "x"), Some("250"));
        assert_eq!(
            scene.attr_of(CLASS_POINTER, "points"),
            Some("237.5,95 262.5,95 250,110")
        );
        Ok(())
    }

    #[test]
    fn relayout_rescales_without_changing_value() -> Result<(), SceneError> {
        let mut slider = SliderScene::build(SliderLayout::new(500.0), SliderValue::from(200), 0)?;
        let nodes_before = slider.scene().len();
        slider.relayout(SliderLayout::new(900.0))?;
        let scene = slider.scene();
        assert_eq!(slider.value(), SliderValue::from(200));
        assert_eq!(scene.attr_of(CLASS_HANDLE, "cx"), Some("400"));
        assert_eq!(scene.attr_of(CLASS_BODY, "width"), Some("800"));
        assert_eq!(scene.len(), nodes_before);
        Ok(())
    }
}
