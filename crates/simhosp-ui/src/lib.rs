#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Simulated hospital dashboard widgets.
//!
//! Two widgets live here: SVG rate sliders that read and persist a value through a backend
//! path, and a pathway starter panel that submits text and polls for the backend's answer.
//! Everything DOM-free sits in [`core`] and is tested natively; the Yew components and the
//! HTTP client only build for `wasm32`.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod services;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;

#[cfg(test)]
mod tests {
    use crate::core::config::RangeConfig;
    use crate::core::requests::PostRequest;
    use crate::core::slider::{SliderLayout, SliderScene, SliderValue};

    #[test]
    fn configured_slider_posts_to_its_own_path() {
        let config = RangeConfig::from_attributes(1, |name| {
            (name == "data-path").then(|| "/simulated-hospital/rate".to_string())
        })
        .expect("path present");
        let scene =
            SliderScene::build(SliderLayout::new(1024.0), SliderValue::new(80.0), config.index)
                .expect("scene builds");
        let request = PostRequest::slider(&config.path, 80);
        assert_eq!(scene.index(), 1);
        assert_eq!(request.path(), "/simulated-hospital/rate");
        assert_eq!(request.body(), "value=80");
    }
}
