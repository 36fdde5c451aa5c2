//! Render a [`Scene`] into Yew virtual DOM.

use crate::core::scene::{NodeId, Scene};
use yew::prelude::*;
use yew::virtual_dom::{VNode, VTag, VText};

pub(crate) fn render_scene(scene: &Scene) -> Html {
    scene
        .roots()
        .iter()
        .map(|id| render_node(scene, *id))
        .collect::<Html>()
}

fn render_node(scene: &Scene, id: NodeId) -> Html {
    let Some(node) = scene.node(id) else {
        return Html::default();
    };
    let mut tag = VTag::new(node.tag());
    for (name, value) in node.attrs() {
        tag.add_attribute(name, value.to_string());
    }
    if let Some(text) = node.text() {
        tag.add_child(VNode::from(VText::new(text.to_string())));
    }
    for child in node.children() {
        tag.add_child(render_node(scene, *child));
    }
    VNode::from(tag)
}
