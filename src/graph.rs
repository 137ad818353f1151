//! ResourceAllocationGraph: process and resource nodes over one `KeyedIndex`.
//!
//! Every node lives in a single index keyed by `GraphKey` (kind + id). Two
//! `OrderedList`s record first-insertion order per kind and drive every
//! ordered walk; node fields are always reached back through the index.
//! Edges are `NodeId`s, i.e. stable index handles, never references.

use crate::config::{ConfigError, IndexConfig};
use crate::keyed_index::{EntryId, KeyedIndex};
use crate::ordered_list::{ListHandle, OrderedList};
use core::hash::{BuildHasher, Hash};
use core::sync::atomic::{AtomicU64, Ordering};
use hashbrown::hash_map::DefaultHashBuilder;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Process,
    Resource,
}

/// Identity of a graph node. `kind` takes part in equality and hashing, so a
/// process and a resource with the same `id` are different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphKey<I> {
    pub kind: NodeKind,
    pub id: I,
}

impl<I> GraphKey<I> {
    pub fn new(kind: NodeKind, id: I) -> Self {
        Self { kind, id }
    }
    pub fn process(id: I) -> Self {
        Self::new(NodeKind::Process, id)
    }
    pub fn resource(id: I) -> Self {
        Self::new(NodeKind::Resource, id)
    }
}

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle to a node; stays valid across index growth and stops
/// resolving once the node is removed. A handle carries the id of the graph
/// that issued it and never resolves in any other graph.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId {
    graph: u64,
    entry: EntryId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Neither data nor an outgoing edge.
    Unbound,
    PartiallyBound,
    Bound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStatus {
    AddedNode,
    UpdatedNext,
    UpdatedData,
    UpdatedNextData,
    NoUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge target {0:?} is not a node of this graph")]
    UnknownNode(NodeId),
    #[error("edge target {0:?} was issued by a different graph")]
    WrongGraph(NodeId),
}

#[derive(Debug)]
pub struct GraphNode<D> {
    data: Option<D>,
    next: Option<NodeId>,
    prev: Option<NodeId>,
    order: ListHandle,
}

impl<D> GraphNode<D> {
    fn new(data: Option<D>, next: Option<NodeId>) -> Self {
        Self {
            data,
            next,
            prev: None,
            order: ListHandle::default(),
        }
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut D> {
        self.data.as_mut()
    }

    /// Outgoing edge.
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Backward edge; only populated by `convert_to_undirected`.
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn state(&self) -> NodeState {
        match (self.data.is_some(), self.next.is_some()) {
            (false, false) => NodeState::Unbound,
            (true, true) => NodeState::Bound,
            _ => NodeState::PartiallyBound,
        }
    }

    pub fn into_data(self) -> Option<D> {
        self.data
    }

    // Fill only fields that are unset and supplied.
    fn merge(&mut self, data: Option<D>, next: Option<NodeId>) -> InsertStatus {
        let fill_next = next.is_some() && self.next.is_none();
        let fill_data = data.is_some() && self.data.is_none();
        match (fill_next, fill_data) {
            (true, true) => {
                self.next = next;
                self.data = data;
                InsertStatus::UpdatedNextData
            }
            (true, false) => {
                self.next = next;
                InsertStatus::UpdatedNext
            }
            (false, true) => {
                self.data = data;
                InsertStatus::UpdatedData
            }
            (false, false) => InsertStatus::NoUpdate,
        }
    }

    // Overwrite every supplied field; `None` arguments are skipped.
    fn overwrite(&mut self, data: Option<D>, next: Option<NodeId>) -> InsertStatus {
        match (next, data) {
            (Some(n), Some(d)) => {
                self.next = Some(n);
                self.data = Some(d);
                InsertStatus::UpdatedNextData
            }
            (Some(n), None) => {
                self.next = Some(n);
                InsertStatus::UpdatedNext
            }
            (None, Some(d)) => {
                self.data = Some(d);
                InsertStatus::UpdatedData
            }
            (None, None) => InsertStatus::NoUpdate,
        }
    }
}

pub struct ResourceAllocationGraph<I, D, S = DefaultHashBuilder> {
    graph: u64,
    index: KeyedIndex<GraphKey<I>, GraphNode<D>, S>,
    processes: OrderedList<NodeId>,
    resources: OrderedList<NodeId>,
    n_processes: usize,
    n_resources: usize,
}

impl<I, D> ResourceAllocationGraph<I, D>
where
    I: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_config(config: IndexConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_index(KeyedIndex::with_config(config)?))
    }
}

impl<I, D> Default for ResourceAllocationGraph<I, D>
where
    I: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, D, S> ResourceAllocationGraph<I, D, S>
where
    I: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_index(KeyedIndex::with_hasher(hasher))
    }

    fn from_index(index: KeyedIndex<GraphKey<I>, GraphNode<D>, S>) -> Self {
        Self {
            graph: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            index,
            processes: OrderedList::new(),
            resources: OrderedList::new(),
            n_processes: 0,
            n_resources: 0,
        }
    }

    /// Total number of nodes of both kinds.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn process_count(&self) -> usize {
        self.n_processes
    }

    pub fn resource_count(&self) -> usize {
        self.n_resources
    }

    pub fn increment(&mut self, kind: NodeKind) {
        match kind {
            NodeKind::Process => self.n_processes += 1,
            NodeKind::Resource => self.n_resources += 1,
        }
    }

    /// Saturates at zero.
    pub fn decrement(&mut self, kind: NodeKind) {
        match kind {
            NodeKind::Process => self.n_processes = self.n_processes.saturating_sub(1),
            NodeKind::Resource => self.n_resources = self.n_resources.saturating_sub(1),
        }
    }

    pub fn contains(&self, key: &GraphKey<I>) -> bool {
        self.index.contains_key(key)
    }

    pub fn node_id(&self, key: &GraphKey<I>) -> Option<NodeId> {
        self.index.find(key).map(|entry| NodeId {
            graph: self.graph,
            entry,
        })
    }

    pub fn node(&self, key: &GraphKey<I>) -> Option<&GraphNode<D>> {
        self.index.get(key)
    }

    pub fn node_mut(&mut self, key: &GraphKey<I>) -> Option<&mut GraphNode<D>> {
        self.index.get_mut(key)
    }

    #[inline]
    fn owns(&self, id: NodeId) -> bool {
        id.graph == self.graph
    }

    /// `None` for removed nodes and for handles issued by another graph.
    pub fn node_by_id(&self, id: NodeId) -> Option<&GraphNode<D>> {
        if !self.owns(id) {
            return None;
        }
        self.index.handle_value(id.entry)
    }

    pub fn key_of(&self, id: NodeId) -> Option<&GraphKey<I>> {
        if !self.owns(id) {
            return None;
        }
        self.index.handle_key(id.entry)
    }

    fn order(&self, kind: NodeKind) -> &OrderedList<NodeId> {
        match kind {
            NodeKind::Process => &self.processes,
            NodeKind::Resource => &self.resources,
        }
    }

    fn order_mut(&mut self, kind: NodeKind) -> &mut OrderedList<NodeId> {
        match kind {
            NodeKind::Process => &mut self.processes,
            NodeKind::Resource => &mut self.resources,
        }
    }

    /// Node handles of one kind in first-insertion order.
    pub fn ids(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.order(kind).iter().copied()
    }

    pub fn process_keys(&self) -> impl Iterator<Item = &GraphKey<I>> + '_ {
        self.keys(NodeKind::Process)
    }

    pub fn resource_keys(&self) -> impl Iterator<Item = &GraphKey<I>> + '_ {
        self.keys(NodeKind::Resource)
    }

    fn keys(&self, kind: NodeKind) -> impl Iterator<Item = &GraphKey<I>> + '_ {
        self.order(kind)
            .iter()
            .filter_map(move |id| self.index.handle_key(id.entry))
    }

    /// Every `(from, to)` edge, processes first, each kind in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&GraphKey<I>, &GraphKey<I>)> + '_ {
        self.processes
            .iter()
            .chain(self.resources.iter())
            .filter_map(move |&id| {
                let from = self.index.handle_key(id.entry)?;
                let to = self.index.handle_value(id.entry)?.next?;
                Some((from, self.index.handle_key(to.entry)?))
            })
    }

    fn check_target(&self, next: Option<NodeId>) -> Result<(), GraphError> {
        match next {
            Some(t) if !self.owns(t) => Err(GraphError::WrongGraph(t)),
            Some(t) if self.index.handle_value(t.entry).is_none() => {
                Err(GraphError::UnknownNode(t))
            }
            _ => Ok(()),
        }
    }

    fn add_node(&mut self, key: GraphKey<I>, data: Option<D>, next: Option<NodeId>) -> NodeId {
        let kind = key.kind;
        let entry = self
            .index
            .unique_insert(key, GraphNode::new(data, next))
            .expect("key checked absent before add_node");
        let id = NodeId {
            graph: self.graph,
            entry,
        };
        let order = self.order_mut(kind).push_back(id);
        if let Some(node) = self.index.handle_value_mut(entry) {
            node.order = order;
        }
        self.increment(kind);
        trace!(?kind, nodes = self.index.len(), "graph node added");
        id
    }

    /// Merge insert. A new key creates the node; an existing node only has
    /// its unset fields filled from the supplied `data`/`next`, and values
    /// that would overwrite a set field are dropped.
    pub fn insert(
        &mut self,
        key: GraphKey<I>,
        data: Option<D>,
        next: Option<NodeId>,
    ) -> Result<InsertStatus, GraphError> {
        self.check_target(next)?;
        if let Some(node) = self.index.get_mut(&key) {
            return Ok(node.merge(data, next));
        }
        self.add_node(key, data, next);
        Ok(InsertStatus::AddedNode)
    }

    /// Overwriting insert. A new key creates the node; on an existing node
    /// every supplied field replaces the current one.
    pub fn hard_insert(
        &mut self,
        key: GraphKey<I>,
        data: Option<D>,
        next: Option<NodeId>,
    ) -> Result<InsertStatus, GraphError> {
        self.check_target(next)?;
        if let Some(node) = self.index.get_mut(&key) {
            return Ok(node.overwrite(data, next));
        }
        self.add_node(key, data, next);
        Ok(InsertStatus::AddedNode)
    }

    /// Derive backward edges: for each node with `next == B`, set B's `prev`
    /// to that node. Processes are visited before resources, each in
    /// insertion order, so when several nodes point at B the last one
    /// visited wins. Existing edges are never cleared; call this once the
    /// edge set is final.
    pub fn convert_to_undirected(&mut self) {
        let Self {
            index,
            processes,
            resources,
            ..
        } = self;
        let mut linked = 0usize;
        for &id in processes.iter().chain(resources.iter()) {
            let Some(next) = index.handle_value(id.entry).and_then(|n| n.next) else {
                continue;
            };
            if let Some(succ) = index.handle_value_mut(next.entry) {
                succ.prev = Some(id);
                linked += 1;
            }
        }
        debug!(nodes = index.len(), linked, "graph converted to undirected");
    }

    /// Remove a node, its slot in the order list and every `next`/`prev`
    /// edge pointing at it, and decrement its kind's counter.
    ///
    /// Nodes keep no incoming-edge list, so clearing those edges scans every
    /// node: each call is O(n) in the size of the graph.
    pub fn remove(&mut self, key: &GraphKey<I>) -> Option<(GraphKey<I>, GraphNode<D>)> {
        let id = self.node_id(key)?;
        let (key, node) = self.index.remove_entry(id.entry)?;
        self.order_mut(key.kind).remove(node.order);
        self.decrement(key.kind);
        for (_, _, other) in self.index.iter_mut() {
            if other.next == Some(id) {
                other.next = None;
            }
            if other.prev == Some(id) {
                other.prev = None;
            }
        }
        trace!(kind = ?key.kind, nodes = self.index.len(), "graph node removed");
        Some((key, node))
    }

    pub fn clean(self) {
        self.clean_with(|_, _| {});
    }

    /// Tear the graph down, handing each owned key and node to `release`.
    /// The order lists only hold handles and are dropped without callbacks.
    pub fn clean_with<F>(self, release: F)
    where
        F: FnMut(GraphKey<I>, GraphNode<D>),
    {
        let Self {
            index,
            processes,
            resources,
            ..
        } = self;
        processes.clean_with(|_| {});
        resources.clean_with(|_| {});
        debug!(nodes = index.len(), "graph cleaned");
        index.clean_with(release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Rag = ResourceAllocationGraph<&'static str, u32>;

    fn p(id: &'static str) -> GraphKey<&'static str> {
        GraphKey::process(id)
    }
    fn r(id: &'static str) -> GraphKey<&'static str> {
        GraphKey::resource(id)
    }

    /// Invariant: soft insert on P1 reports AddedNode, then UpdatedData, then
    /// NoUpdate, and the first data value is retained.
    #[test]
    fn soft_insert_scenario() {
        let mut g = Rag::new();
        assert_eq!(g.insert(p("P1"), None, None), Ok(InsertStatus::AddedNode));
        assert_eq!(g.insert(p("P1"), Some(1), None), Ok(InsertStatus::UpdatedData));
        assert_eq!(g.insert(p("P1"), Some(2), None), Ok(InsertStatus::NoUpdate));
        assert_eq!(g.node(&p("P1")).and_then(|n| n.data()), Some(&1));
        assert_eq!(g.process_count(), 1);
    }

    /// Invariant: soft insert fills data then next and never overwrites data.
    #[test]
    fn soft_insert_is_monotone() {
        let mut g = Rag::new();
        g.insert(r("R1"), None, None).unwrap();
        let r1 = g.node_id(&r("R1")).unwrap();
        assert_eq!(g.insert(p("P1"), Some(10), None), Ok(InsertStatus::AddedNode));
        assert_eq!(g.node(&p("P1")).unwrap().state(), NodeState::PartiallyBound);
        assert_eq!(g.insert(p("P1"), None, Some(r1)), Ok(InsertStatus::UpdatedNext));
        assert_eq!(g.insert(p("P1"), Some(20), None), Ok(InsertStatus::NoUpdate));
        let n = g.node(&p("P1")).unwrap();
        assert_eq!(n.data(), Some(&10));
        assert_eq!(n.next(), Some(r1));
        assert_eq!(n.state(), NodeState::Bound);
    }

    /// Invariant: with both fields supplied, only the unset one is filled.
    #[test]
    fn soft_insert_partial_fill() {
        let mut g = Rag::new();
        g.insert(r("R1"), None, None).unwrap();
        g.insert(r("R2"), None, None).unwrap();
        let r1 = g.node_id(&r("R1")).unwrap();
        let r2 = g.node_id(&r("R2")).unwrap();
        g.insert(p("P1"), None, Some(r1)).unwrap();
        assert_eq!(
            g.insert(p("P1"), Some(5), Some(r2)),
            Ok(InsertStatus::UpdatedData)
        );
        assert_eq!(g.node(&p("P1")).unwrap().next(), Some(r1));
        g.insert(p("P2"), None, None).unwrap();
        assert_eq!(
            g.insert(p("P2"), Some(6), Some(r2)),
            Ok(InsertStatus::UpdatedNextData)
        );
    }

    /// Invariant: hard insert replaces supplied fields and skips `None`s.
    #[test]
    fn hard_insert_overwrites() {
        let mut g = Rag::new();
        g.insert(r("R1"), None, None).unwrap();
        g.insert(r("R2"), None, None).unwrap();
        let r1 = g.node_id(&r("R1")).unwrap();
        let r2 = g.node_id(&r("R2")).unwrap();
        assert_eq!(g.hard_insert(p("P1"), Some(1), Some(r1)), Ok(InsertStatus::AddedNode));
        assert_eq!(g.hard_insert(p("P1"), Some(2), None), Ok(InsertStatus::UpdatedData));
        assert_eq!(g.hard_insert(p("P1"), None, Some(r2)), Ok(InsertStatus::UpdatedNext));
        assert_eq!(g.hard_insert(p("P1"), None, None), Ok(InsertStatus::NoUpdate));
        let n = g.node(&p("P1")).unwrap();
        assert_eq!(n.data(), Some(&2));
        assert_eq!(n.next(), Some(r2));
        assert_eq!(
            g.hard_insert(p("P1"), Some(3), Some(r1)),
            Ok(InsertStatus::UpdatedNextData)
        );
        assert_eq!(g.len(), 3);
    }

    /// Invariant: kind discriminates keys with the same id.
    #[test]
    fn process_and_resource_with_same_id_are_distinct() {
        let mut g = Rag::new();
        assert_eq!(g.insert(p("A"), Some(1), None), Ok(InsertStatus::AddedNode));
        assert_eq!(g.insert(r("A"), Some(2), None), Ok(InsertStatus::AddedNode));
        assert_eq!(g.len(), 2);
        assert_eq!(g.process_count(), 1);
        assert_eq!(g.resource_count(), 1);
        assert_eq!(g.node(&p("A")).unwrap().data(), Some(&1));
        assert_eq!(g.node(&r("A")).unwrap().data(), Some(&2));
    }

    /// Invariant: order lists hold exactly their kind, in first-insertion order.
    #[test]
    fn order_lists_follow_first_insertion() {
        let mut g = Rag::new();
        for k in [p("P2"), r("R9"), p("P1"), r("R1"), p("P2"), p("P3")] {
            g.insert(k, None, None).unwrap();
        }
        let procs: Vec<_> = g.process_keys().map(|k| k.id).collect();
        let res: Vec<_> = g.resource_keys().map(|k| k.id).collect();
        assert_eq!(procs, vec!["P2", "P1", "P3"]);
        assert_eq!(res, vec!["R9", "R1"]);
        assert!(g.process_keys().all(|k| k.kind == NodeKind::Process));
    }

    /// Invariant: an edge target must be a live node of this graph; the
    /// rejected insert leaves the graph untouched.
    #[test]
    fn unknown_edge_target_rejected() {
        let mut g = Rag::new();
        g.insert(r("gone"), None, None).unwrap();
        let gone = g.node_id(&r("gone")).unwrap();
        g.remove(&r("gone")).unwrap();
        assert_eq!(
            g.insert(p("P1"), Some(1), Some(gone)),
            Err(GraphError::UnknownNode(gone))
        );
        assert_eq!(
            g.hard_insert(p("P1"), None, Some(gone)),
            Err(GraphError::UnknownNode(gone))
        );
        assert!(!g.contains(&p("P1")));
        assert_eq!(g.process_count(), 0);
    }

    /// Invariant: after conversion every A with next == B has B.prev == A.
    #[test]
    fn undirected_symmetry() {
        let mut g = Rag::new();
        g.insert(r("R1"), None, None).unwrap();
        let r1 = g.node_id(&r("R1")).unwrap();
        g.insert(p("P1"), None, Some(r1)).unwrap();
        let p1 = g.node_id(&p("P1")).unwrap();
        g.insert(p("P2"), None, None).unwrap();
        let p2 = g.node_id(&p("P2")).unwrap();
        g.insert(r("R1"), None, Some(p2)).unwrap();

        assert_eq!(g.node(&r("R1")).unwrap().prev(), None);
        g.convert_to_undirected();
        assert_eq!(g.node(&r("R1")).unwrap().prev(), Some(p1));
        assert_eq!(g.node(&p("P2")).unwrap().prev(), Some(r1));
        assert_eq!(g.node(&p("P1")).unwrap().prev(), None);

        // Re-running reproduces the same backward edges.
        g.convert_to_undirected();
        assert_eq!(g.node(&r("R1")).unwrap().prev(), Some(p1));
        assert_eq!(g.node(&p("P1")).unwrap().next(), Some(r1));

        let edges: Vec<_> = g.edges().map(|(a, b)| (a.id, b.id)).collect();
        assert_eq!(edges, vec![("P1", "R1"), ("R1", "P2")]);
    }

    /// Invariant: counters saturate at zero on decrement.
    #[test]
    fn counters_increment_and_saturate() {
        let mut g = Rag::new();
        g.decrement(NodeKind::Process);
        assert_eq!(g.process_count(), 0);
        g.increment(NodeKind::Resource);
        g.increment(NodeKind::Resource);
        g.decrement(NodeKind::Resource);
        assert_eq!(g.resource_count(), 1);
    }

    /// Invariant: remove drops the node from index and order list, clears
    /// edges pointing at it and decrements its counter.
    #[test]
    fn remove_unlinks_everything() {
        let mut g = Rag::new();
        g.insert(r("R1"), Some(7), None).unwrap();
        let r1 = g.node_id(&r("R1")).unwrap();
        g.insert(p("P1"), None, Some(r1)).unwrap();
        g.insert(p("P2"), None, None).unwrap();
        g.convert_to_undirected();

        let (k, node) = g.remove(&r("R1")).unwrap();
        assert_eq!(k, r("R1"));
        assert_eq!(node.into_data(), Some(7));
        assert_eq!(g.resource_count(), 0);
        assert_eq!(g.resource_keys().count(), 0);
        assert!(g.node_by_id(r1).is_none());
        assert_eq!(g.node(&p("P1")).unwrap().next(), None);
        assert!(g.remove(&r("R1")).is_none());

        g.remove(&p("P1")).unwrap();
        let procs: Vec<_> = g.process_keys().map(|k| k.id).collect();
        assert_eq!(procs, vec!["P2"]);
        assert_eq!(g.process_count(), 1);
    }

    /// Invariant: a handle issued by one graph never resolves in another and
    /// is refused as an edge target there, even when the arena slot matches.
    #[test]
    fn handles_from_another_graph_are_rejected() {
        let mut a = Rag::new();
        a.insert(r("RA"), None, None).unwrap();
        let foreign = a.node_id(&r("RA")).unwrap();

        let mut b = Rag::new();
        b.insert(p("PB"), None, None).unwrap();
        assert!(b.node_by_id(foreign).is_none());
        assert!(b.key_of(foreign).is_none());

        assert_eq!(
            b.insert(r("RB"), None, Some(foreign)),
            Err(GraphError::WrongGraph(foreign))
        );
        assert_eq!(
            b.hard_insert(p("PB"), None, Some(foreign)),
            Err(GraphError::WrongGraph(foreign))
        );
        assert!(!b.contains(&r("RB")));
        assert_eq!(b.node(&p("PB")).unwrap().next(), None);
        assert_eq!(a.key_of(foreign), Some(&r("RA")));
    }

    /// Invariant: removing a node with many incoming edges clears all of
    /// them and leaves edges to other nodes alone.
    #[test]
    fn remove_clears_fan_in() {
        let mut g: ResourceAllocationGraph<u32, ()> = ResourceAllocationGraph::new();
        g.insert(GraphKey::resource(0), None, None).unwrap();
        g.insert(GraphKey::resource(1), None, None).unwrap();
        let r0 = g.node_id(&GraphKey::resource(0)).unwrap();
        let r1 = g.node_id(&GraphKey::resource(1)).unwrap();
        for i in 0..200 {
            let target = if i % 2 == 0 { r0 } else { r1 };
            g.insert(GraphKey::process(i), None, Some(target)).unwrap();
        }
        g.convert_to_undirected();

        g.remove(&GraphKey::resource(0)).unwrap();
        for i in 0..200 {
            let next = g.node(&GraphKey::process(i)).unwrap().next();
            let want = if i % 2 == 0 { None } else { Some(r1) };
            assert_eq!(next, want);
        }
        assert_eq!(g.edges().count(), 100);
        assert!(g.node_by_id(r1).unwrap().prev().is_some());
    }

    #[test]
    fn clean_hands_back_nodes() {
        let mut g: ResourceAllocationGraph<u32, String> = ResourceAllocationGraph::new();
        g.insert(GraphKey::process(1), Some("a".into()), None).unwrap();
        g.insert(GraphKey::resource(1), None, None).unwrap();
        let mut released = Vec::new();
        g.clean_with(|k, n| released.push((k, n.into_data())));
        released.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            released,
            vec![
                (GraphKey::process(1), Some("a".to_string())),
                (GraphKey::resource(1), None),
            ]
        );
    }
}
