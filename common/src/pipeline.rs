use serde::{Deserialize, Serialize};

use crate::dag;

pub type NodeId = String;
pub type EdgeId = String;

/* --------- Modelo de datos que llega desde el editor --------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Tipo de nodo ("input", "llm", "text"...). No se valida aquí.
    #[serde(rename = "type")]
    pub kind: String,

    /// Texto libre del nodo, el algoritmo no lo usa.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Pipeline completo enviado en una sola petición.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl PipelineRequest {
    pub fn stats(&self) -> PipelineStats {
        dag::validate(&self.nodes, &self.edges)
    }
}

/// Respuesta de `/pipelines/parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_dag: bool,
}
