//! Rate slider component.
//!
//! # Design
//! - Nothing is drawn until the initial value arrives; a failed fetch leaves the SVG empty.
//! - The scene lives in a `RefCell` and is mutated in place on every drag tick, then redrawn.
//! - Pointer events bind on the SVG root; the shape under the pointer picks the drag target.
//! - Only the end of a gesture talks to the backend; a cancelled or lost capture restores
//!   the value the drag started from.

use crate::app::environment::current_layout;
use crate::app::view::render_scene;
use crate::core::config::RangeConfig;
use crate::core::drag::{DragMachine, DragOutcome, DragTarget};
use crate::core::requests::PostRequest;
use crate::core::scene::SceneError;
use crate::core::slider::{SliderLayout, SliderScene, SliderValue, ValueError};
use crate::services::http::{EndpointClient, HttpError};
use gloo::console;
use gloo::events::EventListener;
use gloo::utils::window;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, PointerEvent};
use yew::prelude::*;

type SharedSlider = Rc<RefCell<Option<SliderScene>>>;

#[derive(Debug, Error)]
enum LoadError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

#[derive(Properties, PartialEq)]
pub(crate) struct RangeSliderProps {
    pub(crate) config: RangeConfig,
}

#[function_component(RangeSlider)]
pub(crate) fn range_slider(props: &RangeSliderProps) -> Html {
    let slider: SharedSlider = use_mut_ref(|| None);
    let drag = use_mut_ref(DragMachine::new);
    let origin = use_mut_ref(|| None as Option<SliderValue>);
    let redraw = use_force_update();
    let svg_ref = use_node_ref();
    let client = use_memo(|path| EndpointClient::new(path.clone()), props.config.path.clone());

    {
        let slider = slider.clone();
        let redraw = redraw.clone();
        let client = client.clone();
        use_effect_with_deps(
            move |config| {
                let index = config.index;
                spawn_local(async move {
                    match load_slider(&client, index).await {
                        Ok(scene) => {
                            *slider.borrow_mut() = Some(scene);
                            redraw.force_update();
                        }
                        Err(err) => {
                            console::error!("slider not initialised", client.path(), err.to_string());
                        }
                    }
                });
                || ()
            },
            props.config.clone(),
        );
    }

    {
        let slider = slider.clone();
        let redraw = redraw.clone();
        use_effect_with_deps(
            move |_| {
                let listener = EventListener::new(&window(), "resize", move |_event| {
                    let relaid = slider
                        .borrow_mut()
                        .as_mut()
                        .map(|scene| scene.relayout(current_layout()));
                    match relaid {
                        Some(Err(err)) => console::error!("slider relayout failed", err.to_string()),
                        Some(Ok(())) | None => redraw.force_update(),
                    }
                });
                move || drop(listener)
            },
            (),
        );
    }

    let onpointerdown = {
        let drag = drag.clone();
        let origin = origin.clone();
        let slider = slider.clone();
        let svg_ref = svg_ref.clone();
        Callback::from(move |event: PointerEvent| {
            let Some(shape) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.get_attribute("class"))
                .as_deref()
                .and_then(DragTarget::from_class_list)
            else {
                return;
            };
            if slider.borrow().is_none() {
                return;
            }
            if let DragOutcome::Started(_) = drag.borrow_mut().begin(shape, event.pointer_id()) {
                event.prevent_default();
                *origin.borrow_mut() = slider.borrow().as_ref().map(SliderScene::value);
                if let Some(svg) = svg_ref.cast::<Element>()
                    && let Err(err) = svg.set_pointer_capture(event.pointer_id())
                {
                    console::warn!("pointer capture failed", err);
                }
            }
        })
    };

    let onpointermove = {
        let drag = drag.clone();
        let slider = slider.clone();
        let svg_ref = svg_ref.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: PointerEvent| {
            if !drag.borrow().tracks(event.pointer_id()) {
                return;
            }
            let Some(layout) = slider.borrow().as_ref().map(SliderScene::layout) else {
                return;
            };
            let x = pointer_x(&svg_ref, &layout, &event);
            if let DragOutcome::Preview(value) = drag.borrow_mut().tick(&layout, event.pointer_id(), x)
            {
                show_value(&slider, SliderValue::from(value));
                redraw.force_update();
            }
        })
    };

    let onpointerup = {
        let drag = drag.clone();
        let slider = slider.clone();
        let svg_ref = svg_ref.clone();
        let redraw = redraw.clone();
        let client = client.clone();
        Callback::from(move |event: PointerEvent| {
            let Some(layout) = slider.borrow().as_ref().map(SliderScene::layout) else {
                return;
            };
            let x = pointer_x(&svg_ref, &layout, &event);
            if let DragOutcome::Commit(value) = drag.borrow_mut().end(&layout, event.pointer_id(), x)
            {
                show_value(&slider, SliderValue::from(value));
                redraw.force_update();
                let client = client.clone();
                spawn_local(async move {
                    let request = PostRequest::slider(client.path(), value);
                    if let Err(err) = client.post(&request, None).await {
                        console::warn!("slider value not saved", client.path(), err.to_string());
                    }
                });
            }
        })
    };

    let onpointercancel = {
        let drag = drag.clone();
        let origin = origin.clone();
        let slider = slider.clone();
        let redraw = redraw.clone();
        Callback::from(move |event: PointerEvent| {
            let cancelled = drag.borrow_mut().cancel(event.pointer_id()) == DragOutcome::Cancelled;
            if cancelled && let Some(value) = origin.borrow_mut().take() {
                show_value(&slider, value);
                redraw.force_update();
            }
        })
    };

    let current = slider.borrow();
    let layout = current
        .as_ref()
        .map_or_else(current_layout, SliderScene::layout);
    let content = current.as_ref().map_or_else(
        || html! { <g transform={layout.group_transform()} /> },
        |scene| render_scene(scene.scene()),
    );

    html! {
        <svg
            ref={svg_ref}
            class="range-slider"
            style="touch-action: none"
            width={layout.svg_width().to_string()}
            height={layout.svg_height().to_string()}
            {onpointerdown}
            {onpointermove}
            {onpointerup}
            onpointercancel={onpointercancel.clone()}
            onlostpointercapture={onpointercancel}
        >
            { content }
        </svg>
    }
}

async fn load_slider(client: &EndpointClient, index: usize) -> Result<SliderScene, LoadError> {
    let body = client.fetch_text(None).await?;
    let value = SliderValue::parse(&body)?;
    Ok(SliderScene::build(current_layout(), value, index)?)
}

fn show_value(slider: &SharedSlider, value: SliderValue) {
    if let Some(scene) = slider.borrow_mut().as_mut()
        && let Err(err) = scene.apply(value)
    {
        console::error!("slider update failed", err.to_string());
    }
}

fn pointer_x(svg_ref: &NodeRef, layout: &SliderLayout, event: &PointerEvent) -> f64 {
    let svg_left = svg_ref
        .cast::<Element>()
        .map_or(0.0, |svg| svg.get_bounding_client_rect().left());
    layout.local_x(f64::from(event.client_x()), svg_left)
}
