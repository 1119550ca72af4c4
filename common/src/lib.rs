pub mod dag;
pub mod pipeline;

pub use dag::{is_dag, topological_order, validate};
pub use pipeline::{Edge, EdgeId, Node, NodeId, PipelineRequest, PipelineStats};
