//! rag-index: a separately chained hash index with stable entry handles,
//! and a resource-allocation graph layered on top of it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep node identity stable while the index underneath grows, so
//!   the graph can hold edges between nodes without aliasing references.
//! - Layers:
//!   - KeyedIndex<K, V, S>: bucket vector of chain heads over a
//!     generational arena of chain nodes. Unique keys, overwrite-on-insert,
//!     reactive 2x growth once `len >= buckets`, never shrinks.
//!   - OrderedList<T>: arena-backed doubly linked list; O(1) push/pop at
//!     both ends and O(1) removal by handle. KeyedList pairs one with a
//!     KeyedIndex for removal by key.
//!   - ResourceAllocationGraph<I, D, S>: one KeyedIndex holding every
//!     process and resource node plus one OrderedList per kind recording
//!     first-insertion order.
//!
//! Constraints
//! - Single-threaded and synchronous. Nothing locks internally; callers
//!   sharing a structure across threads hold one exclusive lock around
//!   every call.
//! - Handles (`EntryId`, `ListHandle`, `NodeId`) are generational: they
//!   survive growth and never alias a later entry after removal.
//! - Equal keys hash equally; `K: Hash` runs once per lookup or insert and
//!   never during growth, which rehomes nodes by their stored hash.
//!
//! Graph invariants
//! - A node's id appears in the process order list iff its key is a
//!   process key present in the index; likewise for resources.
//! - Edges are `NodeId`s. An edge target must resolve in the same graph at
//!   insert time; a `NodeId` carries its graph's id, so handles from another
//!   graph are refused. Removing a node clears every edge that pointed at it.
//! - Counters track inserts and `remove`; direct `increment`/`decrement`
//!   calls adjust them without touching nodes.
//!
//! Reentrancy
//! - KeyedIndex carries a debug-only busy flag around the sections that run
//!   user `Eq`/`Hash` code; nested entry from those impls panics in debug
//!   builds and is unchecked in release builds.
//!
//! Ownership
//! - Removal hands back owned `(K, V)`. `reset_with`/`clean_with` pass each
//!   owned entry to a caller closure; plain `reset`/`clean` drop them.

pub mod config;
pub mod graph;
pub mod keyed_index;
mod keyed_index_proptest;
pub mod keyed_list;
pub mod ordered_list;
mod reentrancy;
pub mod stack;

// Public surface
pub use config::{ConfigError, IndexConfig};
pub use graph::{
    GraphError, GraphKey, GraphNode, InsertStatus, NodeId, NodeKind, NodeState,
    ResourceAllocationGraph,
};
pub use keyed_index::{EntryId, InsertError, KeyedIndex};
pub use keyed_list::KeyedList;
pub use ordered_list::{ListHandle, OrderedList};
pub use stack::Stack;
