//! [§ 5 Ranges](https://dom.spec.whatwg.org/#ranges)
//!
//! Static boundary-point ranges over a [`DomTree`]. Unlike browser ranges,
//! these are not "live": tree mutations do not adjust them. Callers that
//! mutate the tree re-derive their ranges afterwards, and
//! [`Range::is_valid`] guards every use.

use std::cmp::Ordering;

use crate::{DomError, DomTree, NodeId, NodeType};

/// [§ 5.2 Boundary points](https://dom.spec.whatwg.org/#concept-range-bp)
///
/// "A boundary point is a tuple consisting of a node (a node) and an offset
/// (a non-negative integer)."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    /// The boundary point's node.
    pub node: NodeId,
    /// The boundary point's offset.
    pub offset: usize,
}

impl BoundaryPoint {
    /// Create a boundary point.
    #[must_use]
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// [§ 5.2 Boundary points](https://dom.spec.whatwg.org/#concept-range-bp-position)
///
/// "The position of a boundary point (nodeA, offsetA) relative to a boundary
/// point (nodeB, offsetB) is before, equal, or after."
///
/// Returns None if the nodes are in different trees.
#[must_use]
pub fn compare_points(tree: &DomTree, a: BoundaryPoint, b: BoundaryPoint) -> Option<Ordering> {
    // "If nodeA is nodeB, then return before if offsetA is less than offsetB,
    // equal if offsetA is offsetB, and after if offsetA is greater than offsetB."
    if a.node == b.node {
        return Some(a.offset.cmp(&b.offset));
    }
    // "If nodeA is following nodeB, then if the position of (nodeB, offsetB)
    // relative to (nodeA, offsetA) is before, return after, and if it is
    // after, return before."
    if tree.tree_order(a.node, b.node)? == Ordering::Greater {
        return compare_points(tree, b, a).map(Ordering::reverse);
    }
    // "If nodeA is an ancestor of nodeB:"
    if tree.is_descendant_of(b.node, a.node) {
        // "Let child be nodeB. While child is not a child of nodeA, set child
        // to its parent."
        let mut child = b.node;
        while tree.parent(child) != Some(a.node) {
            child = tree.parent(child)?;
        }
        // "If child's index is less than offsetA, then return after."
        if tree.index_of(child)? < a.offset {
            return Some(Ordering::Greater);
        }
    }
    // "Return before."
    Some(Ordering::Less)
}

/// [§ 5.5 Interface Range](https://dom.spec.whatwg.org/#interface-range)
///
/// "Objects implementing the Range interface are known as live ranges."
/// This one is static; see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl Range {
    /// Create a range from two boundary points. No validation is performed;
    /// use [`Range::is_valid`] before acting on it.
    #[must_use]
    pub const fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    /// A collapsed range (a caret) at `(node, offset)`.
    #[must_use]
    pub const fn collapsed_at(node: NodeId, offset: usize) -> Self {
        let point = BoundaryPoint::new(node, offset);
        Self {
            start: point,
            end: point,
        }
    }

    /// [§ 5.5 selectNodeContents()](https://dom.spec.whatwg.org/#dom-range-selectnodecontents)
    ///
    /// "Set start to the boundary point (node, 0). Set end to the boundary
    /// point (node, length)."
    #[must_use]
    pub fn select_node_contents(tree: &DomTree, node: NodeId) -> Self {
        Self {
            start: BoundaryPoint::new(node, 0),
            end: BoundaryPoint::new(node, tree.node_length(node)),
        }
    }

    /// [§ 5.5 selectNode()](https://dom.spec.whatwg.org/#concept-range-select)
    ///
    /// Returns None if the node has no parent.
    #[must_use]
    pub fn select_node(tree: &DomTree, node: NodeId) -> Option<Self> {
        let parent = tree.parent(node)?;
        let index = tree.index_of(node)?;
        Some(Self {
            start: BoundaryPoint::new(parent, index),
            end: BoundaryPoint::new(parent, index + 1),
        })
    }

    /// The range's start boundary point.
    #[must_use]
    pub const fn start(&self) -> BoundaryPoint {
        self.start
    }

    /// The range's end boundary point.
    #[must_use]
    pub const fn end(&self) -> BoundaryPoint {
        self.end
    }

    /// "The start node"
    #[must_use]
    pub const fn start_container(&self) -> NodeId {
        self.start.node
    }

    /// "The end node"
    #[must_use]
    pub const fn end_container(&self) -> NodeId {
        self.end.node
    }

    /// [§ 5.3 collapsed](https://dom.spec.whatwg.org/#range-collapsed)
    ///
    /// "A range is collapsed if its start node is its end node and its start
    /// offset is its end offset."
    #[must_use]
    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// [§ 5.5 collapse()](https://dom.spec.whatwg.org/#dom-range-collapse)
    pub const fn collapse(&mut self, to_start: bool) {
        if to_start {
            self.end = self.start;
        } else {
            self.start = self.end;
        }
    }

    /// [§ 5.5 setStart()](https://dom.spec.whatwg.org/#concept-range-bp-set)
    ///
    /// # Errors
    ///
    /// [`DomError::IndexSize`] if `offset` is greater than the node's length.
    pub fn set_start(&mut self, tree: &DomTree, node: NodeId, offset: usize) -> Result<(), DomError> {
        let point = Self::checked_point(tree, node, offset)?;
        // "If range's root is not equal to node's root, or if bp is after the
        // range's end, set range's end to bp."
        match compare_points(tree, point, self.end) {
            Some(Ordering::Greater) | None => self.end = point,
            _ => {}
        }
        self.start = point;
        Ok(())
    }

    /// [§ 5.5 setEnd()](https://dom.spec.whatwg.org/#concept-range-bp-set)
    ///
    /// # Errors
    ///
    /// [`DomError::IndexSize`] if `offset` is greater than the node's length.
    pub fn set_end(&mut self, tree: &DomTree, node: NodeId, offset: usize) -> Result<(), DomError> {
        let point = Self::checked_point(tree, node, offset)?;
        // "If range's root is not equal to node's root, or if bp is before
        // the range's start, set range's start to bp."
        match compare_points(tree, point, self.start) {
            Some(Ordering::Less) | None => self.start = point,
            _ => {}
        }
        self.end = point;
        Ok(())
    }

    fn checked_point(tree: &DomTree, node: NodeId, offset: usize) -> Result<BoundaryPoint, DomError> {
        if tree.get(node).is_none() {
            return Err(DomError::NotFound);
        }
        if offset > tree.node_length(node) {
            return Err(DomError::IndexSize);
        }
        Ok(BoundaryPoint::new(node, offset))
    }

    /// Returns true if both boundary points name live nodes of `tree`, are
    /// connected, have in-bounds offsets, and start is not after end.
    ///
    /// Never panics, whatever ids the range holds.
    #[must_use]
    pub fn is_valid(&self, tree: &DomTree) -> bool {
        let point_ok = |p: BoundaryPoint| tree.is_connected(p.node) && p.offset <= tree.node_length(p.node);
        point_ok(self.start)
            && point_ok(self.end)
            && matches!(
                compare_points(tree, self.start, self.end),
                Some(Ordering::Less | Ordering::Equal)
            )
    }

    /// [§ 5.5 commonAncestorContainer](https://dom.spec.whatwg.org/#dom-range-commonancestorcontainer)
    ///
    /// "Let container be start node. While container is not an inclusive
    /// ancestor of end node, let container be container's parent."
    #[must_use]
    pub fn common_ancestor_container(&self, tree: &DomTree) -> Option<NodeId> {
        let mut container = self.start.node;
        while !tree.contains(container, self.end.node) {
            container = tree.parent(container)?;
        }
        Some(container)
    }

    /// [§ 5.5 stringifier](https://dom.spec.whatwg.org/#dom-range-stringifier)
    ///
    /// The concatenated data of the text the range covers.
    #[must_use]
    pub fn text(&self, tree: &DomTree) -> String {
        let (start, end) = (self.start, self.end);
        // "If this's start node is this's end node and it is a Text node,
        // then return the substring of that Text node's data beginning at
        // this's start offset and ending at this's end offset."
        if start.node == end.node
            && let Some(data) = tree.as_text(start.node)
        {
            return data.chars().skip(start.offset).take(end.offset.saturating_sub(start.offset)).collect();
        }
        let Some(root) = self.common_ancestor_container(tree) else {
            return String::new();
        };
        let mut out = String::new();
        for node in std::iter::once(root).chain(tree.descendants(root)) {
            let Some(data) = tree.as_text(node) else {
                continue;
            };
            let len = data.chars().count();
            let from = if node == start.node { start.offset } else { 0 };
            let to = if node == end.node { end.offset } else { len };
            let inside = node == start.node
                || node == end.node
                || (compare_points(tree, BoundaryPoint::new(node, 0), start) != Some(Ordering::Less)
                    && compare_points(tree, BoundaryPoint::new(node, len), end) != Some(Ordering::Greater));
            if inside {
                out.extend(data.chars().skip(from).take(to.saturating_sub(from)));
            }
        }
        out
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// [§ 5.5 extractContents()](https://dom.spec.whatwg.org/#concept-range-extract)
    ///
    /// Moves the contents of the range into a new DocumentFragment and
    /// collapses the range to where the contents were. Partially contained
    /// elements are shallow-cloned into the fragment, so the extracted
    /// fragment keeps their attributes.
    ///
    /// Boundary points inside text nodes are first turned into element-level
    /// boundary points by splitting the text, which lets the rest of the
    /// algorithm move whole nodes only.
    ///
    /// # Errors
    ///
    /// [`DomError::InvalidState`] if the range is not valid; the tree is left
    /// untouched in that case.
    pub fn extract_contents(&mut self, tree: &mut DomTree) -> Result<NodeId, DomError> {
        if !self.is_valid(tree) {
            return Err(DomError::InvalidState);
        }
        // "Let fragment be a new DocumentFragment node"
        let fragment = tree.create_fragment();
        // "If range is collapsed, then return fragment."
        if self.collapsed() {
            return Ok(fragment);
        }
        self.split_text_boundaries(tree)?;
        let (node, offset) = extract_between(tree, self.start, self.end, fragment)?;
        // "Set range's start and end to (new node, new offset)."
        *self = Self::collapsed_at(node, offset);
        Ok(fragment)
    }

    /// Rewrites text-node boundary points as `(parent, index)` points,
    /// splitting the text where a boundary falls inside it.
    fn split_text_boundaries(&mut self, tree: &mut DomTree) -> Result<(), DomError> {
        // End first, so the start offset still refers to the unsplit data.
        if tree.is_text(self.end.node) {
            let text = self.end.node;
            let parent = tree.parent(text).ok_or(DomError::HierarchyRequest)?;
            let index = tree.index_of(text).ok_or(DomError::HierarchyRequest)?;
            let offset = self.end.offset;
            if offset == 0 {
                self.end = BoundaryPoint::new(parent, index);
            } else {
                if offset < tree.node_length(text) {
                    let _ = tree.split_text(text, offset)?;
                }
                self.end = BoundaryPoint::new(parent, index + 1);
            }
        }
        if tree.is_text(self.start.node) {
            let text = self.start.node;
            let parent = tree.parent(text).ok_or(DomError::HierarchyRequest)?;
            let index = tree.index_of(text).ok_or(DomError::HierarchyRequest)?;
            let offset = self.start.offset;
            if offset == 0 {
                self.start = BoundaryPoint::new(parent, index);
            } else if offset >= tree.node_length(text) {
                self.start = BoundaryPoint::new(parent, index + 1);
            } else {
                let _ = tree.split_text(text, offset)?;
                self.start = BoundaryPoint::new(parent, index + 1);
                // The split inserted a sibling right after `text`.
                if self.end.node == parent && self.end.offset > index {
                    self.end.offset += 1;
                }
            }
        }
        Ok(())
    }

    /// [§ 5.5 insertNode()](https://dom.spec.whatwg.org/#concept-range-insert)
    ///
    /// Inserts `node` at the start of the range. A text start container is
    /// split at the start offset. If the range was collapsed it grows to
    /// cover the inserted nodes, matching "If range is collapsed, then set
    /// range's end to (parent, newOffset)."
    ///
    /// # Errors
    ///
    /// - [`DomError::InvalidState`] if the range is not valid.
    /// - [`DomError::HierarchyRequest`] if `node` is an inclusive ancestor of
    ///   the insertion parent, or the start container is a comment.
    pub fn insert_node(&mut self, tree: &mut DomTree, node: NodeId) -> Result<(), DomError> {
        if !self.is_valid(tree) {
            return Err(DomError::InvalidState);
        }
        let was_collapsed = self.collapsed();
        let start = self.start;

        let (parent, index) = if tree.is_text(start.node) {
            let text = start.node;
            let parent = tree.parent(text).ok_or(DomError::HierarchyRequest)?;
            let index = tree.index_of(text).ok_or(DomError::HierarchyRequest)?;
            if tree.contains(node, parent) {
                return Err(DomError::HierarchyRequest);
            }
            if start.offset == 0 {
                (parent, index)
            } else if start.offset >= tree.node_length(text) {
                (parent, index + 1)
            } else {
                let tail = tree.split_text(text, start.offset)?;
                if self.end.node == text {
                    self.end = BoundaryPoint::new(tail, self.end.offset - start.offset);
                } else if self.end.node == parent && self.end.offset > index {
                    self.end.offset += 1;
                }
                (parent, index + 1)
            }
        } else {
            if matches!(tree.get(start.node).map(|n| &n.node_type), Some(NodeType::Comment(_))) {
                return Err(DomError::HierarchyRequest);
            }
            (start.node, start.offset)
        };

        let inserted = if matches!(tree.get(node).map(|n| &n.node_type), Some(NodeType::DocumentFragment)) {
            tree.children(node).len()
        } else {
            1
        };
        tree.insert_at(parent, index, node)?;

        self.start = BoundaryPoint::new(parent, index);
        if was_collapsed {
            self.end = BoundaryPoint::new(parent, index + inserted);
        } else if self.end.node == parent && self.end.offset >= index {
            self.end.offset += inserted;
        }
        Ok(())
    }

    /// [§ 5.5 surroundContents()](https://dom.spec.whatwg.org/#dom-range-surroundcontents)
    ///
    /// Wraps the range's contents in `new_parent` and selects it.
    ///
    /// # Errors
    ///
    /// - [`DomError::InvalidState`] if "a non-Text node is partially contained
    ///   in this", or the range is not valid.
    /// - [`DomError::InvalidNodeType`] if `new_parent` is a Document or
    ///   DocumentFragment.
    pub fn surround_contents(&mut self, tree: &mut DomTree, new_parent: NodeId) -> Result<(), DomError> {
        if !self.is_valid(tree) {
            return Err(DomError::InvalidState);
        }
        let root = self.common_ancestor_container(tree).ok_or(DomError::InvalidState)?;
        let partially_contained = |container: NodeId| {
            std::iter::once(container)
                .chain(tree.ancestors(container))
                .take_while(|&n| n != root)
                .any(|n| !tree.is_text(n))
        };
        if partially_contained(self.start.node) || partially_contained(self.end.node) {
            return Err(DomError::InvalidState);
        }
        if matches!(
            tree.get(new_parent).map(|n| &n.node_type),
            Some(NodeType::Document | NodeType::DocumentFragment) | None
        ) {
            return Err(DomError::InvalidNodeType);
        }

        // "Let fragment be the result of extracting this."
        let fragment = self.extract_contents(tree)?;
        // "If newParent has children, then replace all with null within newParent."
        for child in tree.children(new_parent).to_vec() {
            tree.remove_child(new_parent, child);
        }
        // "Insert newParent into this."
        self.insert_node(tree, new_parent)?;
        // "Append fragment to newParent."
        tree.append_child(new_parent, fragment);
        // "Select newParent within this."
        *self = Self::select_node(tree, new_parent).ok_or(DomError::InvalidState)?;
        Ok(())
    }
}

/// Moves everything between two element-level boundary points into `target`
/// and returns the collapsed position the range ends up at.
fn extract_between(
    tree: &mut DomTree,
    start: BoundaryPoint,
    end: BoundaryPoint,
    target: NodeId,
) -> Result<(NodeId, usize), DomError> {
    // "If original start node is original end node and it is a CharacterData
    // node" cannot happen here; boundaries were lifted out of text already.
    if start.node == end.node {
        let moved = tree.children(start.node)[start.offset..end.offset.max(start.offset)].to_vec();
        for child in moved {
            tree.append_child(target, child);
        }
        return Ok((start.node, start.offset));
    }

    let common = Range::new(start, end)
        .common_ancestor_container(tree)
        .ok_or(DomError::InvalidState)?;

    // "Let first partially contained child be null. If original start node
    // is not an inclusive ancestor of original end node, set first partially
    // contained child to the first child of common ancestor that is partially
    // contained in range."
    let first_partial = if tree.contains(start.node, end.node) {
        None
    } else {
        Some(child_of_towards(tree, common, start.node).ok_or(DomError::InvalidState)?)
    };
    let last_partial = if tree.contains(end.node, start.node) {
        None
    } else {
        Some(child_of_towards(tree, common, end.node).ok_or(DomError::InvalidState)?)
    };

    let lo = match first_partial {
        Some(child) => tree.index_of(child).ok_or(DomError::InvalidState)? + 1,
        None => start.offset,
    };
    let hi = match last_partial {
        Some(child) => tree.index_of(child).ok_or(DomError::InvalidState)?,
        None => end.offset,
    };
    let contained: Vec<NodeId> = if lo < hi {
        tree.children(common)[lo..hi].to_vec()
    } else {
        Vec::new()
    };

    // "If original start node is an inclusive ancestor of original end node,
    // set new node to original start node and new offset to original start
    // offset. Otherwise ... set new node to the parent of reference node, and
    // new offset to one plus reference node's index."
    let new_position = match first_partial {
        None => (start.node, start.offset),
        Some(_) => (common, lo),
    };

    if let Some(child) = first_partial {
        let clone = tree.clone_shallow(child).ok_or(DomError::NotFound)?;
        tree.append_child(target, clone);
        let child_end = BoundaryPoint::new(child, tree.node_length(child));
        let _ = extract_between(tree, start, child_end, clone)?;
    }
    for child in contained {
        tree.append_child(target, child);
    }
    if let Some(child) = last_partial {
        let clone = tree.clone_shallow(child).ok_or(DomError::NotFound)?;
        tree.append_child(target, clone);
        let child_start = BoundaryPoint::new(child, 0);
        let _ = extract_between(tree, child_start, end, clone)?;
    }

    Ok(new_position)
}

/// The child of `ancestor` that is an inclusive ancestor of `node`.
fn child_of_towards(tree: &DomTree, ancestor: NodeId, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&n| tree.parent(n) == Some(ancestor))
}
