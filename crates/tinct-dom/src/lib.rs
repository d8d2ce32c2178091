//! DOM tree implementation for the tinct engine.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), together with
//! [`Range`] boundary-point arithmetic and a per-document live selection.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.
//! Removed nodes stay in the arena, detached; [`DomTree::is_connected`]
//! tells them apart from live ones.
//!
//! Offsets into text nodes count Unicode scalar values, not UTF-16 code units.

mod attributes;
mod error;
mod range;

pub use attributes::AttributeList;
pub use error::DomError;
pub use range::{BoundaryPoint, Range, compare_points};

use std::cmp::Ordering;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    /// "A DocumentFragment node has an associated host (null or an element
    /// in a different node tree)."
    DocumentFragment,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// NOTE: We only store the local name and attributes. Namespaces and custom
/// element state are out of scope for inline editing.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name", ASCII-lowercased.
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributeList,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: AttributeList::new(),
        }
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
///
/// The tree also owns the document's live selection
/// ([Selection API § 2](https://w3c.github.io/selection-api/#definition)):
/// "Each document has a unique selection associated with it."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by NodeId.
    /// The Document node is always at index 0 (NodeId::ROOT).
    nodes: Vec<Node>,
    /// The selection's single range, if any.
    selection: Option<Range>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
            selection: None,
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the arena (attached or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.5 createElement()](https://dom.spec.whatwg.org/#dom-document-createelement)
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// [§ 4.5 createTextNode()](https://dom.spec.whatwg.org/#dom-document-createtextnode)
    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(data.into()))
    }

    /// [§ 4.5 createDocumentFragment()](https://dom.spec.whatwg.org/#dom-document-createdocumentfragment)
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeType::DocumentFragment)
    }

    /// [§ 4.4 cloneNode()](https://dom.spec.whatwg.org/#concept-node-clone)
    ///
    /// Shallow clone: "Let copy be a node that implements the same interfaces
    /// as node", with the same local name and attribute list, but no children.
    pub fn clone_shallow(&mut self, id: NodeId) -> Option<NodeId> {
        let node_type = self.get(id)?.node_type.clone();
        Some(self.alloc(node_type))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`. A child that already has
    /// a parent is moved. Fragments contribute their children instead of
    /// themselves. Invalid insertions (cycles, unknown ids) are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        let _ = self.insert_at(parent, index, child);
    }

    /// [§ 4.2.2 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Inserts `new_child` into `parent` immediately before `reference`.
    /// If `reference` is not a child of `parent`, appends instead.
    pub fn insert_before(&mut self, parent: NodeId, new_child: NodeId, reference: NodeId) {
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == reference)
            .unwrap_or_else(|| self.children(parent).len());
        let _ = self.insert_at(parent, index, new_child);
    }

    /// [§ 4.2.2 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Inserts `node` at child position `index` of `parent`.
    ///
    /// "If node is a DocumentFragment node, then set nodes to node's children."
    ///
    /// # Errors
    ///
    /// - [`DomError::NotFound`] if either id is not in this tree.
    /// - [`DomError::HierarchyRequest`] if `node` is an inclusive ancestor of
    ///   `parent`, `node` is the Document, or `parent` cannot have children.
    /// - [`DomError::IndexSize`] if `index` exceeds the child count.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, node: NodeId) -> Result<(), DomError> {
        let parent_node = self.get(parent).ok_or(DomError::NotFound)?;
        if matches!(parent_node.node_type, NodeType::Text(_) | NodeType::Comment(_)) {
            return Err(DomError::HierarchyRequest);
        }
        let node_type = &self.get(node).ok_or(DomError::NotFound)?.node_type;
        if matches!(node_type, NodeType::Document) || self.contains(node, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if index > self.children(parent).len() {
            return Err(DomError::IndexSize);
        }

        let nodes: Vec<NodeId> = if matches!(node_type, NodeType::DocumentFragment) {
            self.children(node).to_vec()
        } else {
            vec![node]
        };

        // Detaching from the same parent shifts the target index.
        let mut index = index;
        for &n in &nodes {
            if let Some(old_parent) = self.parent(n) {
                if old_parent == parent
                    && let Some(old_index) = self.index_of(n)
                    && old_index < index
                {
                    index -= 1;
                }
                self.unlink(old_parent, n);
            }
        }

        for (offset, &n) in nodes.iter().enumerate() {
            self.nodes[parent.0].children.insert(index + offset, n);
            self.nodes[n.0].parent = Some(parent);
        }
        self.relink_children(parent);
        Ok(())
    }

    /// [§ 4.2.2 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Removes `child` from `parent`. The node stays in the arena, detached.
    /// Does nothing if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.unlink(parent, child);
        }
    }

    /// Removes `node` from whatever parent it has.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.unlink(parent, node);
        }
    }

    /// Moves every child of `from` to the end of `to`, preserving order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        if from == to || self.contains(from, to) {
            return;
        }
        for child in self.children(from).to_vec() {
            self.append_child(to, child);
        }
    }

    /// Replaces `node` with its own children ("unwrap").
    ///
    /// Returns false if the node has no parent.
    pub fn replace_with_children(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.parent(node) else {
            return false;
        };
        let Some(index) = self.index_of(node) else {
            return false;
        };
        let children = self.children(node).to_vec();
        self.unlink(parent, node);
        for (offset, child) in children.into_iter().enumerate() {
            let _ = self.insert_at(parent, index + offset, child);
        }
        true
    }

    /// Removes `child` from `parent`'s child list and clears its links.
    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.retain(|&c| c != child);
        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        self.relink_children(parent);
    }

    /// Recomputes sibling links for all children of `parent`.
    fn relink_children(&mut self, parent: NodeId) {
        let children = self.nodes[parent.0].children.clone();
        for (i, &child) in children.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| children[p]);
            let next = children.get(i + 1).copied();
            let node = &mut self.nodes[child.0];
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
    }

    /// [§ 4.11 splitText()](https://dom.spec.whatwg.org/#concept-text-split)
    ///
    /// "Let new data be the result of substringing data with offset offset...
    /// If parent is non-null, insert new node into parent before node's next
    /// sibling."
    ///
    /// Returns the new text node holding the data after `offset`.
    ///
    /// # Errors
    ///
    /// [`DomError::IndexSize`] if `offset` is beyond the text length,
    /// [`DomError::InvalidNodeType`] if `id` is not a text node.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let Some(NodeType::Text(data)) = self.get(id).map(|n| &n.node_type) else {
            return Err(DomError::InvalidNodeType);
        };
        let byte_index = char_to_byte_index(data, offset).ok_or(DomError::IndexSize)?;
        let tail = data[byte_index..].to_string();
        if let Some(NodeType::Text(data)) = self.get_mut(id).map(|n| &mut n.node_type) {
            data.truncate(byte_index);
        }
        let new_node = self.create_text(tail);
        if let Some(parent) = self.parent(id)
            && let Some(index) = self.index_of(id)
        {
            self.insert_at(parent, index + 1, new_node)?;
        }
        Ok(new_node)
    }

    /// Replaces the data of a text node. Does nothing for other node types.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(NodeType::Text(data)) = self.get_mut(id).map(|n| &mut n.node_type) {
            *data = text.into();
        }
    }

    /// [§ 4.4 normalize()](https://dom.spec.whatwg.org/#dom-node-normalize)
    ///
    /// "The normalize() method steps are to run these steps for each
    /// descendant exclusive Text node node of this: ... If length is zero,
    /// then remove node... Concatenate the data of contiguous exclusive Text
    /// nodes."
    pub fn normalize(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let mut previous_text: Option<NodeId> = None;
        for child in children {
            match self.as_text(child).map(str::to_owned) {
                Some(data) if data.is_empty() => self.remove_child(id, child),
                Some(data) => {
                    if let Some(prev) = previous_text {
                        if let Some(NodeType::Text(prev_data)) =
                            self.get_mut(prev).map(|n| &mut n.node_type)
                        {
                            prev_data.push_str(&data);
                        }
                        self.remove_child(id, child);
                    } else {
                        previous_text = Some(child);
                    }
                }
                None => {
                    previous_text = None;
                    self.normalize(child);
                }
            }
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Get an attribute value if `id` is an element that has it.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id).and_then(|e| e.attrs.get(name))
    }

    /// Set an attribute on an element. Does nothing for other node types.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.as_element_mut(id) {
            element.attrs.set(name, value);
        }
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.as_element_mut(id).and_then(|e| e.attrs.remove(name))
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.1 Index](https://dom.spec.whatwg.org/#concept-tree-index)
    ///
    /// "The index of an object is its number of preceding siblings, or 0 if it
    /// has none."
    ///
    /// Returns None for nodes without a parent.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// [§ 4.2 Length](https://dom.spec.whatwg.org/#concept-node-length)
    ///
    /// "If node is a CharacterData node, then return node's data's length.
    /// Return the number of node's children."
    #[must_use]
    pub fn node_length(&self, id: NodeId) -> usize {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Text(data) | NodeType::Comment(data)) => data.chars().count(),
            Some(_) => self.children(id).len(),
            None => 0,
        }
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// [§ 4.4 contains()](https://dom.spec.whatwg.org/#dom-node-contains)
    ///
    /// "The contains(other) method steps are to return true if other is an
    /// inclusive descendant of this; otherwise false."
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.get(node).is_some() && (ancestor == node || self.is_descendant_of(node, ancestor))
    }

    /// [§ 4.4 isConnected](https://dom.spec.whatwg.org/#dom-node-isconnected)
    ///
    /// "The isConnected getter steps are to return true, if this is
    /// connected; otherwise false." A node is connected if its shadow-including
    /// root is a document.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.get(id).is_some() && (id == NodeId::ROOT || self.is_descendant_of(id, NodeId::ROOT))
    }

    /// [§ 4.2 Root](https://dom.spec.whatwg.org/#concept-tree-root)
    #[must_use]
    pub fn tree_root(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// All descendants of `id` in tree order, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// [§ 4.2 Tree order](https://dom.spec.whatwg.org/#concept-tree-order)
    ///
    /// "In tree order is preorder, depth-first traversal of a tree."
    ///
    /// Returns None when the nodes are in different trees.
    #[must_use]
    pub fn tree_order(&self, a: NodeId, b: NodeId) -> Option<Ordering> {
        if self.tree_root(a) != self.tree_root(b) {
            return None;
        }
        let path_a = self.index_path(a);
        let path_b = self.index_path(b);
        // A prefix (an ancestor) precedes its descendants.
        Some(path_a.cmp(&path_b))
    }

    /// Child indices from the tree root down to `id`.
    fn index_path(&self, id: NodeId) -> Vec<usize> {
        let mut path: Vec<usize> = std::iter::once(id)
            .chain(self.ancestors(id))
            .filter_map(|n| self.index_of(n))
            .collect();
        path.reverse();
        path
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Returns true if `id` is an element with the given (lowercase) local name.
    #[must_use]
    pub fn is_element_named(&self, id: NodeId, tag_name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.tag_name == tag_name)
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Returns true if this node is a text node.
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        self.as_text(id).is_some()
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// "The descendant text content of a node node is the concatenation of the
    /// data of all the Text node descendants of node, in tree order."
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.as_text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.as_text(n))
            .collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// [Selection API getRangeAt(0)](https://w3c.github.io/selection-api/#dom-selection-getrangeat)
    ///
    /// The selection's range, if it has one.
    #[must_use]
    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    /// [Selection API addRange()](https://w3c.github.io/selection-api/#dom-selection-addrange)
    ///
    /// Replaces the selection's range.
    pub fn set_selection(&mut self, range: Range) {
        self.selection = Some(range);
    }

    /// [Selection API removeAllRanges()](https://w3c.github.io/selection-api/#dom-selection-removeallranges)
    pub fn remove_all_ranges(&mut self) {
        self.selection = None;
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Byte index of the `offset`-th character, allowing one-past-the-end.
fn char_to_byte_index(data: &str, offset: usize) -> Option<usize> {
    if offset == data.chars().count() {
        return Some(data.len());
    }
    data.char_indices().nth(offset).map(|(i, _)| i)
}
