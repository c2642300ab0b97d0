use serde::{Deserialize, Serialize};
use tracing::debug;

use super::node::{GroupNode, Node, NodeId};
use super::visitor::Visitor;
use crate::error::{Result, SceneError};
use crate::geometry::Matrix4x4;

/// Arena-backed scene tree.
///
/// Every node except the root is created as the child of exactly one group and
/// is never re-parented, so the arena always describes a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SceneGraph {
    pub fn new(root_matrix: Matrix4x4) -> Self {
        SceneGraph {
            nodes: vec![Node::Group(GroupNode::new(root_matrix))],
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Appends `node` to the end of `parent`'s child list.
    pub fn add(&mut self, parent: NodeId, node: impl Into<Node>) -> Result<NodeId> {
        let node = node.into();
        match &node {
            Node::Group(group) if !group.children.is_empty() => {
                return Err(SceneError::InvalidScene(
                    "groups must be added before their children".to_string(),
                ));
            }
            other => {
                if let Some(appearance) = other.appearance() {
                    appearance.validate()?;
                }
            }
        }

        let id = self.nodes.len() as NodeId;
        self.group_mut(parent)?.children.push(id);
        self.nodes.push(node);
        Ok(id)
    }

    pub fn add_group(&mut self, parent: NodeId, matrix: Matrix4x4) -> Result<NodeId> {
        self.add(parent, GroupNode::new(matrix))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id as usize).ok_or(SceneError::InvalidNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id as usize).ok_or(SceneError::InvalidNode(id))
    }

    pub fn group(&self, id: NodeId) -> Result<&GroupNode> {
        match self.node(id)? {
            Node::Group(group) => Ok(group),
            _ => Err(SceneError::NotAGroup(id)),
        }
    }

    pub fn group_mut(&mut self, id: NodeId) -> Result<&mut GroupNode> {
        match self.node_mut(id)? {
            Node::Group(group) => Ok(group),
            _ => Err(SceneError::NotAGroup(id)),
        }
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.group(id)?.children)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dispatches `visitor` on node `id` according to its variant.
    pub fn accept<V: Visitor + ?Sized>(&self, id: NodeId, visitor: &mut V) {
        let Some(node) = self.nodes.get(id as usize) else {
            debug!("skipping dangling node id {}", id);
            return;
        };
        match node {
            Node::Group(group) => visitor.visit_group(self, group),
            Node::Sphere(sphere) => visitor.visit_sphere(sphere),
            Node::AABox(aabox) => visitor.visit_aabox(aabox),
            Node::Pyramid(pyramid) => visitor.visit_pyramid(pyramid),
            Node::Camera(camera) => visitor.visit_camera(camera),
            Node::Light(light) => visitor.visit_light(light),
        }
    }

    /// Checks the tree invariants of a graph that did not come from [`SceneGraph::add`],
    /// e.g. one read from disk.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(SceneError::InvalidScene(msg)) };

        match self.nodes.get(self.root as usize) {
            Some(Node::Group(_)) => {}
            Some(other) => return invalid(format!("root node {} is a {}", self.root, other.kind_name())),
            None => return invalid(format!("root node {} does not exist", self.root)),
        }

        let mut parents: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(appearance) = node.appearance() {
                if let Err(e) = appearance.validate() {
                    return invalid(format!("node {}: {}", id, e));
                }
            }

            let Node::Group(group) = node else { continue };
            for &child in &group.children {
                let Some(parent) = parents.get_mut(child as usize) else {
                    return invalid(format!("node {} references missing child {}", id, child));
                };
                if child == self.root {
                    return invalid(format!("root node is a child of node {}", id));
                }
                if let Some(existing) = parent {
                    return invalid(format!(
                        "node {} has two parents ({} and {})",
                        child, existing, id
                    ));
                }
                *parent = Some(id as NodeId);
            }
        }

        // one parent each rules out sharing, reachability rules out detached cycles
        let mut reached = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if reached[id as usize] {
                continue;
            }
            reached[id as usize] = true;
            if let Node::Group(group) = &self.nodes[id as usize] {
                stack.extend(group.children.iter().copied());
            }
        }
        if let Some(orphan) = reached.iter().position(|r| !r) {
            return invalid(format!("node {} is not reachable from the root", orphan));
        }

        Ok(())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        SceneGraph::new(Matrix4x4::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec4;
    use crate::scene::{Appearance, LightNode, SphereNode};

    fn sphere() -> SphereNode {
        SphereNode::new(Vec4::point(0.0, 0.0, 0.0), 1.0, Appearance::default())
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut graph = SceneGraph::default();
        let root = graph.root();
        let a = graph.add(root, sphere()).unwrap();
        let g = graph.add_group(root, Matrix4x4::identity()).unwrap();
        let b = graph.add(root, LightNode::new(Vec4::point(0.0, 1.0, 0.0), 0.5)).unwrap();
        assert_eq!(graph.children(root).unwrap(), &[a, g, b]);
        assert_eq!(graph.len(), 4);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn leaves_cannot_have_children() {
        let mut graph = SceneGraph::default();
        let leaf = graph.add(graph.root(), sphere()).unwrap();
        assert!(matches!(graph.add(leaf, sphere()), Err(SceneError::NotAGroup(id)) if id == leaf));
        assert!(matches!(graph.add(42, sphere()), Err(SceneError::InvalidNode(42))));
    }

    #[test]
    fn empty_appearance_is_rejected_on_add() {
        let mut graph = SceneGraph::default();
        let mut bad = sphere();
        bad.appearance.colors.clear();
        assert!(matches!(
            graph.add(graph.root(), bad),
            Err(SceneError::EmptyAppearance(_))
        ));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn validate_rejects_shared_children() {
        let mut graph = SceneGraph::default();
        let root = graph.root();
        let g = graph.add_group(root, Matrix4x4::identity()).unwrap();
        let leaf = graph.add(root, sphere()).unwrap();
        graph.group_mut(g).unwrap().children.push(leaf);
        assert!(matches!(graph.validate(), Err(SceneError::InvalidScene(_))));
    }

    #[test]
    fn validate_rejects_detached_cycles() {
        let mut graph = SceneGraph::default();
        let root = graph.root();
        let a = graph.add_group(root, Matrix4x4::identity()).unwrap();
        let b = graph.add_group(a, Matrix4x4::identity()).unwrap();
        // detach `a` from the root and close the loop a -> b -> a
        graph.group_mut(root).unwrap().children.clear();
        graph.group_mut(b).unwrap().children.push(a);
        assert!(matches!(graph.validate(), Err(SceneError::InvalidScene(_))));
    }
}
