//! Arena storage for argument trees
//!
//! Nested `subArguments` records are flattened into a vector of nodes with
//! explicit parent/child indices. A node is always stored after its parent,
//! so iterating indices in reverse visits every child before its parent.
//! That ordering is what lets the engine score bottom-up without recursion.

use crate::{Argument, ArgumentId, ArgumentSpec, DomainError, EvidenceId, Side};
use std::collections::{HashMap, VecDeque};

/// Position of a node inside an [`ArgumentTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Raw position in the arena
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A node in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentNode {
    /// The argument stored at this node
    pub argument: Argument,

    /// Parent node, `None` when the argument attaches directly to the claim
    pub parent: Option<NodeIndex>,

    /// Child nodes in insertion order
    pub children: Vec<NodeIndex>,

    /// Distance from the claim (direct arguments have depth 0)
    pub depth: usize,
}

/// A flat argument record naming its parent by id
#[derive(Debug, Clone, PartialEq)]
pub struct FlatArgument {
    /// The argument
    pub argument: Argument,

    /// Parent argument id, `None` for arguments on the claim itself
    pub parent: Option<ArgumentId>,
}

/// Arguments sharing a parent and a side
#[derive(Debug, Clone, PartialEq)]
pub struct SiblingGroup {
    /// Shared parent (`None` = the claim)
    pub parent: Option<NodeIndex>,

    /// Shared side
    pub side: Side,

    /// Members in insertion order
    pub members: Vec<NodeIndex>,
}

/// Arena of argument nodes owned by one claim
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentTree {
    nodes: Vec<ArgumentNode>,
    roots: Vec<NodeIndex>,
    index: HashMap<ArgumentId, NodeIndex>,
}

impl ArgumentTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from nested argument records
    pub fn from_specs(specs: Vec<ArgumentSpec>) -> Result<Self, DomainError> {
        let mut tree = Self::new();
        let mut stack: Vec<(Option<NodeIndex>, ArgumentSpec)> =
            specs.into_iter().rev().map(|spec| (None, spec)).collect();

        while let Some((parent, spec)) = stack.pop() {
            let ArgumentSpec {
                argument,
                sub_arguments,
            } = spec;
            let node = tree.insert(parent, argument)?;
            stack.extend(sub_arguments.into_iter().rev().map(|child| (Some(node), child)));
        }

        Ok(tree)
    }

    /// Build a tree from flat records that name their parent by id
    ///
    /// Records may arrive in any order. Duplicate ids, unknown parents and
    /// cycles are reported as errors.
    pub fn from_flat(records: Vec<FlatArgument>) -> Result<Self, DomainError> {
        let mut positions: HashMap<ArgumentId, usize> = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            if positions.insert(record.argument.id, pos).is_some() {
                return Err(DomainError::DuplicateArgument(record.argument.id));
            }
        }

        let mut children: HashMap<Option<ArgumentId>, Vec<usize>> = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            if let Some(parent) = record.parent {
                if parent == record.argument.id {
                    return Err(DomainError::Cycle(parent));
                }
                if !positions.contains_key(&parent) {
                    return Err(DomainError::UnknownParent {
                        argument: record.argument.id,
                        parent,
                    });
                }
            }
            children.entry(record.parent).or_default().push(pos);
        }

        let ids: Vec<ArgumentId> = records.iter().map(|r| r.argument.id).collect();
        let mut pending: Vec<Option<Argument>> =
            records.into_iter().map(|r| Some(r.argument)).collect();

        let mut tree = Self::new();
        let mut queue: VecDeque<(Option<NodeIndex>, usize)> = children
            .get(&None)
            .map(|roots| roots.iter().map(|&pos| (None, pos)).collect())
            .unwrap_or_default();

        while let Some((parent, pos)) = queue.pop_front() {
            let Some(argument) = pending[pos].take() else {
                continue;
            };
            let node = tree.insert(parent, argument)?;
            if let Some(kids) = children.get(&Some(ids[pos])) {
                queue.extend(kids.iter().map(|&kid| (Some(node), kid)));
            }
        }

        // Anything never reached hangs off a loop of parents
        if let Some(pos) = pending.iter().position(Option::is_some) {
            return Err(DomainError::Cycle(ids[pos]));
        }

        Ok(tree)
    }

    /// Attach an argument under `parent` (or the claim when `None`)
    pub fn attach(
        &mut self,
        parent: Option<ArgumentId>,
        argument: Argument,
    ) -> Result<NodeIndex, DomainError> {
        let parent_index = match parent {
            Some(parent_id) => Some(self.find(parent_id).ok_or(DomainError::UnknownParent {
                argument: argument.id,
                parent: parent_id,
            })?),
            None => None,
        };
        self.insert(parent_index, argument)
    }

    fn insert(
        &mut self,
        parent: Option<NodeIndex>,
        argument: Argument,
    ) -> Result<NodeIndex, DomainError> {
        if self.index.contains_key(&argument.id) {
            return Err(DomainError::DuplicateArgument(argument.id));
        }

        let node = NodeIndex(self.nodes.len());
        let depth = match parent {
            Some(p) => self.nodes[p.0].depth + 1,
            None => 0,
        };

        self.index.insert(argument.id, node);
        self.nodes.push(ArgumentNode {
            argument,
            parent,
            children: Vec::new(),
            depth,
        });

        match parent {
            Some(p) => self.nodes[p.0].children.push(node),
            None => self.roots.push(node),
        }

        Ok(node)
    }

    /// Edit an argument in place
    ///
    /// The argument's id is restored after `edit` runs so the index stays valid.
    pub fn update<F>(&mut self, id: ArgumentId, edit: F) -> Result<NodeIndex, DomainError>
    where
        F: FnOnce(&mut Argument),
    {
        let node = self.find(id).ok_or(DomainError::UnknownArgument(id))?;
        let argument = &mut self.nodes[node.0].argument;
        edit(argument);
        argument.id = id;
        Ok(node)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no arguments
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by argument id
    pub fn find(&self, id: ArgumentId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    /// Get a node
    ///
    /// # Panics
    /// Panics if `node` was not produced by this tree.
    pub fn node(&self, node: NodeIndex) -> &ArgumentNode {
        &self.nodes[node.0]
    }

    /// Get the argument stored at a node
    pub fn argument(&self, node: NodeIndex) -> &Argument {
        &self.nodes[node.0].argument
    }

    /// Get a node if the index is in range
    pub fn get(&self, node: NodeIndex) -> Option<&ArgumentNode> {
        self.nodes.get(node.0)
    }

    /// Arguments attached directly to the claim
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Children of a node
    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.nodes[node.0].children
    }

    /// Parent chain of a node, nearest first
    pub fn ancestors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut chain = Vec::new();
        let mut current = self.nodes[node.0].parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.nodes[parent.0].parent;
        }
        chain
    }

    /// All nodes with children visited before their parents
    pub fn post_order(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        (0..self.nodes.len()).rev().map(NodeIndex)
    }

    /// Iterate over nodes in storage order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &ArgumentNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIndex(i), n))
    }

    /// Nodes grouped by depth; `levels()[0]` holds the claim's direct arguments
    pub fn levels(&self) -> Vec<Vec<NodeIndex>> {
        let mut levels: Vec<Vec<NodeIndex>> = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if levels.len() <= node.depth {
                levels.resize_with(node.depth + 1, Vec::new);
            }
            levels[node.depth].push(NodeIndex(i));
        }
        levels
    }

    /// Number of levels (0 for an empty tree)
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }

    /// All (parent, side) sibling groups, claim-level groups first, pro before con
    pub fn sibling_groups(&self) -> Vec<SiblingGroup> {
        let mut groups = Vec::new();
        Self::split_by_side(None, &self.roots, &self.nodes, &mut groups);
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.children.is_empty() {
                Self::split_by_side(Some(NodeIndex(i)), &node.children, &self.nodes, &mut groups);
            }
        }
        groups
    }

    /// The sibling group a node belongs to
    pub fn group_of(&self, node: NodeIndex) -> SiblingGroup {
        let parent = self.nodes[node.0].parent;
        let side = self.nodes[node.0].argument.side;
        let members = match parent {
            Some(p) => &self.nodes[p.0].children,
            None => &self.roots,
        }
        .iter()
        .copied()
        .filter(|m| self.nodes[m.0].argument.side == side)
        .collect();

        SiblingGroup {
            parent,
            side,
            members,
        }
    }

    /// Nodes whose argument cites the given evidence
    pub fn nodes_citing(&self, evidence: EvidenceId) -> Vec<NodeIndex> {
        self.iter()
            .filter(|(_, n)| n.argument.evidence.contains(&evidence))
            .map(|(i, _)| i)
            .collect()
    }

    fn split_by_side(
        parent: Option<NodeIndex>,
        members: &[NodeIndex],
        nodes: &[ArgumentNode],
        out: &mut Vec<SiblingGroup>,
    ) {
        for side in [Side::Pro, Side::Con] {
            let group: Vec<NodeIndex> = members
                .iter()
                .copied()
                .filter(|m| nodes[m.0].argument.side == side)
                .collect();
            if !group.is_empty() {
                out.push(SiblingGroup {
                    parent,
                    side,
                    members: group,
                });
            }
        }
    }
}
