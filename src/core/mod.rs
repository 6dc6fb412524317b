pub mod model;
pub mod search;
pub mod source;
pub mod store;

pub use model::{Graph, Link, Node, NodeRef, TreeNode};
pub use search::{search, SearchOptions, SearchOutcome};
pub use source::{FileSource, GraphSource, InlineSource, SourceError, SourceText};
pub use store::GraphStore;
