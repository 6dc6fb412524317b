pub mod builder;
pub mod check;
pub mod labels;
pub mod nodeps;
pub mod ops;
pub mod tree;
pub mod viz;

pub use builder::{build_graph, build_graph_from_text, BuildOptions, BuildReport};
pub use nodeps::{compute_nodeps_ids, filter_graph, nodeps_graph, DEFAULT_SENTINEL_ID};
pub use ops::{find_node_by_id, find_node_by_label, predecessors_of, successors_of};
pub use tree::{build_tree, CyclePolicy, TreeError};
