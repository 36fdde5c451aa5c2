use crate::core::config::{RANGE_CLASS, RangeConfig, STARTER_CONTAINER_ID, StarterConfig};
use environment::attribute_lookup;
use gloo::console;
use gloo::utils::document;
use slider::{RangeSlider, RangeSliderProps};
use starter::{PathwayStarter, PathwayStarterProps};
use web_sys::Element;

mod environment;
mod slider;
mod starter;
mod view;

/// Entry point for the wasm bundle: mount every widget the page declares.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let mounted = mount_sliders() + mount_starter();
    console::debug!("simhosp widgets mounted", mounted);
}

fn mount_sliders() -> u32 {
    let collection = document().get_elements_by_class_name(RANGE_CLASS);
    let elements: Vec<Element> = (0..collection.length())
        .filter_map(|position| collection.item(position))
        .collect();

    let mut mounted = 0;
    for (index, element) in elements.into_iter().enumerate() {
        match RangeConfig::from_attributes(index, attribute_lookup(&element)) {
            Ok(config) => {
                yew::Renderer::<RangeSlider>::with_root_and_props(
                    element,
                    RangeSliderProps { config },
                )
                .render();
                mounted += 1;
            }
            Err(err) => console::error!("range control skipped", err.to_string()),
        }
    }
    mounted
}

fn mount_starter() -> u32 {
    let Some(container) = document().get_element_by_id(STARTER_CONTAINER_ID) else {
        return 0;
    };
    match StarterConfig::from_attributes(attribute_lookup(&container)) {
        Ok(config) => {
            yew::Renderer::<PathwayStarter>::with_root_and_props(
                container,
                PathwayStarterProps { config },
            )
            .render();
            1
        }
        Err(err) => {
            console::error!("pathway starter skipped", err.to_string());
            0
        }
    }
}
