//! Retained scene graph for SVG widgets.
//!
//! # Design
//! - Widgets describe markup as nodes with attributes instead of touching the document.
//! - Drag handlers mutate attributes in place; the view layer renders whatever the scene holds.
//! - Removal is recursive and never renumbers surviving nodes.

use std::collections::BTreeMap;
use thiserror::Error;

/// Stable handle to a node inside a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Errors raised by scene mutations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The node was never created or has been removed.
    #[error("scene node {0:?} does not exist")]
    MissingNode(NodeId),
}

/// A single element: tag, attributes, optional text and ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneNode {
    tag: &'static str,
    attrs: BTreeMap<&'static str, String>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl SceneNode {
    /// Element name.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// All attributes, ordered by name.
    pub fn attrs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.attrs.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// Text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the `class` attribute lists `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_whitespace().any(|item| item == class))
    }
}

/// Arena of scene nodes with a list of top-level roots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
    roots: Vec<NodeId>,
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node under `parent` (or as a root) with the given attributes.
    ///
    /// # Errors
    /// Returns [`SceneError::MissingNode`] when `parent` does not exist.
    pub fn create<I>(
        &mut self,
        parent: Option<NodeId>,
        tag: &'static str,
        attrs: I,
    ) -> Result<NodeId, SceneError>
    where
        I: IntoIterator<Item = (&'static str, String)>,
    {
        if let Some(parent) = parent {
            self.node(parent).ok_or(SceneError::MissingNode(parent))?;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(SceneNode {
            tag,
            attrs: attrs.into_iter().collect(),
            text: None,
            children: Vec::new(),
            parent,
        }));
        match parent {
            Some(parent) => self.node_mut(parent)?.children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Set (or overwrite) one attribute.
    ///
    /// # Errors
    /// Returns [`SceneError::MissingNode`] when `id` does not exist.
    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: &'static str,
        value: impl Into<String>,
    ) -> Result<(), SceneError> {
        self.node_mut(id)?.attrs.insert(name, value.into());
        Ok(())
    }

    /// Replace the node's text content.
    ///
    /// # Errors
    /// Returns [`SceneError::MissingNode`] when `id` does not exist.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), SceneError> {
        self.node_mut(id)?.text = Some(text.into());
        Ok(())
    }

    /// Remove a node and its whole subtree.
    ///
    /// # Errors
    /// Returns [`SceneError::MissingNode`] when `id` does not exist.
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parent = self.node(id).ok_or(SceneError::MissingNode(id))?.parent;
        match parent {
            Some(parent) => self.node_mut(parent)?.children.retain(|child| *child != id),
            None => self.roots.retain(|root| *root != id),
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    /// Remove every child of `id`, keeping the node itself.
    ///
    /// # Errors
    /// Returns [`SceneError::MissingNode`] when `id` does not exist.
    pub fn clear_children(&mut self, id: NodeId) -> Result<(), SceneError> {
        let children = self
            .node(id)
            .ok_or(SceneError::MissingNode(id))?
            .children
            .clone();
        for child in children {
            self.remove(child)?;
        }
        Ok(())
    }

    /// Look up a live node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Top-level nodes in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// First live node, in creation order, whose class list contains `class`.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, node)| node.as_ref().is_some_and(|node| node.has_class(class)))
            .map(|(index, _)| NodeId(index))
    }

    /// Attribute of the first node carrying `class`.
    #[must_use]
    pub fn attr_of(&self, class: &str, name: &str) -> Option<&str> {
        self.find_by_class(class)
            .and_then(|id| self.node(id))
            .and_then(|node| node.attr(name))
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_some()).count()
    }

    /// Whether the scene holds no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SceneError::MissingNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_nests_nodes_and_keeps_order() -> Result<(), SceneError> {
        let mut scene = Scene::new();
        let group = scene.create(None, "g", [("transform", "translate(50, 0)".into())])?;
        let rect = scene.create(Some(group), "rect", [("class", "range-body".into())])?;
        let circle = scene.create(Some(group), "circle", [("class", "range-handle".into())])?;

        assert_eq!(scene.roots(), &[group]);
        assert_eq!(scene.node(group).map(SceneNode::children), Some(&[rect, circle][..]));
        assert_eq!(scene.find_by_class("range-handle"), Some(circle));
        Ok(())
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut scene = Scene::new();
        let err = scene.create(Some(NodeId(7)), "g", []).unwrap_err();
        assert_eq!(err, SceneError::MissingNode(NodeId(7)));
        assert!(scene.is_empty());
    }

    #[test]
    fn attributes_and_text_update_in_place() -> Result<(), SceneError> {
        let mut scene = Scene::new();
        let label = scene.create(None, "text", [("class", "range-label".into())])?;
        scene.set_attr(label, "x", "12")?;
        scene.set_text(label, "120")?;
        scene.set_attr(label, "x", "24")?;

        let node = scene.node(label).expect("label exists");
        assert_eq!(node.attr("x"), Some("24"));
        assert_eq!(node.text(), Some("120"));
        assert_eq!(scene.attr_of("range-label", "x"), Some("24"));
        Ok(())
    }

    #[test]
    fn remove_drops_the_whole_subtree() -> Result<(), SceneError> {
        let mut scene = Scene::new();
        let root = scene.create(None, "g", [])?;
        let axis = scene.create(Some(root), "g", [("class", "range-axis".into())])?;
        let tick = scene.create(Some(axis), "g", [("class", "tick".into())])?;
        scene.create(Some(tick), "line", [])?;

        scene.remove(axis)?;

        assert_eq!(scene.len(), 1);
        assert!(scene.find_by_class("tick").is_none());
        assert!(scene.node(root).is_some_and(|node| node.children().is_empty()));
        assert_eq!(scene.set_attr(tick, "x", "1"), Err(SceneError::MissingNode(tick)));
        Ok(())
    }

    #[test]
    fn clear_children_keeps_the_parent() -> Result<(), SceneError> {
        let mut scene = Scene::new();
        let list = scene.create(None, "ul", [])?;
        scene.create(Some(list), "li", [])?;
        scene.create(Some(list), "li", [])?;

        scene.clear_children(list)?;

        assert_eq!(scene.len(), 1);
        assert_eq!(scene.roots(), &[list]);
        Ok(())
    }

    #[test]
    fn class_lookup_matches_whole_words() -> Result<(), SceneError> {
        let mut scene = Scene::new();
        scene.create(None, "circle", [("class", "range-dragger range-handle".into())])?;
        assert!(scene.find_by_class("range-dragger").is_some());
        assert!(scene.find_by_class("range").is_none());
        Ok(())
    }
}
