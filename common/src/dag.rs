//! Validación de pipelines como grafo dirigido.
//!
//! Se usa el algoritmo de Kahn: se arma el conjunto de vértices a partir de
//! los ids de nodo, se calcula el indegree de cada uno y se van sacando los
//! vértices con indegree 0 en orden FIFO. Si al vaciar la cola se visitaron
//! todos los vértices, el grafo no tiene ciclos.
//!
//! Los ids duplicados colapsan en un solo vértice y las aristas con algún
//! extremo desconocido se ignoran en el recorrido (pero sí cuentan en
//! `num_edges`).

use std::collections::{HashMap, VecDeque};

use crate::pipeline::{Edge, Node, PipelineStats};

/// Grafo interno indexado por posición; `ids[i]` es el id del vértice `i`.
struct Graph<'a> {
    ids: Vec<&'a str>,
    successors: Vec<Vec<usize>>,
    indegree: Vec<usize>,
}

impl<'a> Graph<'a> {
    fn build(nodes: &'a [Node], edges: &[Edge]) -> Self {
        // conjunto de vértices en orden de primera aparición
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(nodes.len());
        let mut ids: Vec<&'a str> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let next = ids.len();
            index.entry(node.id.as_str()).or_insert_with(|| {
                ids.push(node.id.as_str());
                next
            });
        }

        let mut successors = vec![Vec::new(); ids.len()];
        let mut indegree = vec![0usize; ids.len()];

        for edge in edges {
            let (Some(&from), Some(&to)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) else {
                continue;
            };
            successors[from].push(to);
            indegree[to] += 1;
        }

        Self {
            ids,
            successors,
            indegree,
        }
    }

    fn vertex_count(&self) -> usize {
        self.ids.len()
    }

    /// Recorrido de Kahn. Devuelve los vértices en el orden en que se
    /// visitaron; si hay un ciclo la lista queda corta.
    fn visit(mut self) -> (Vec<&'a str>, usize) {
        let total = self.vertex_count();

        let mut queue: VecDeque<usize> = self
            .indegree
            .iter()
            .enumerate()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(v, _)| v)
            .collect();

        let mut order = Vec::with_capacity(total);

        while let Some(current) = queue.pop_front() {
            order.push(self.ids[current]);

            for &next in &self.successors[current] {
                self.indegree[next] -= 1;
                if self.indegree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        (order, total)
    }
}

/// `true` si las aristas entre nodos conocidos no forman ningún ciclo.
pub fn is_dag(nodes: &[Node], edges: &[Edge]) -> bool {
    let (visited, total) = Graph::build(nodes, edges).visit();
    visited.len() == total
}

/// Orden topológico de los ids (deduplicados), o `None` si hay un ciclo.
///
/// Con varios vértices de indegree 0 a la vez se respeta el orden de
/// aparición en `nodes`.
pub fn topological_order<'a>(nodes: &'a [Node], edges: &[Edge]) -> Option<Vec<&'a str>> {
    let (visited, total) = Graph::build(nodes, edges).visit();
    (visited.len() == total).then_some(visited)
}

/// Estadísticas que devuelve `/pipelines/parse`.
///
/// `num_nodes` y `num_edges` son los largos crudos de la entrada: con ids
/// repetidos `num_nodes` puede ser mayor que la cantidad de vértices que
/// usa el chequeo de ciclos.
pub fn validate(nodes: &[Node], edges: &[Edge]) -> PipelineStats {
    PipelineStats {
        num_nodes: nodes.len(),
        num_edges: edges.len(),
        is_dag: is_dag(nodes, edges),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> Vec<Node> {
        ids.iter().map(|id| Node::new(*id, "text")).collect()
    }

    fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, (s, t))| Edge::new(format!("e{i}"), *s, *t))
            .collect()
    }

    #[test]
    fn grafo_vacio_es_dag() {
        let stats = validate(&[], &[]);
        assert_eq!(
            stats,
            PipelineStats {
                num_nodes: 0,
                num_edges: 0,
                is_dag: true
            }
        );
    }

    #[test]
    fn un_nodo_sin_aristas_es_dag() {
        let stats = validate(&nodes(&["a"]), &[]);
        assert_eq!(stats.num_nodes, 1);
        assert_eq!(stats.num_edges, 0);
        assert!(stats.is_dag);
    }

    #[test]
    fn arista_simple_es_dag() {
        assert!(is_dag(&nodes(&["a", "b"]), &edges(&[("a", "b")])));
    }

    #[test]
    fn ida_y_vuelta_es_ciclo() {
        let stats = validate(&nodes(&["a", "b"]), &edges(&[("a", "b"), ("b", "a")]));
        assert_eq!(stats.num_edges, 2);
        assert!(!stats.is_dag);
    }

    #[test]
    fn ciclo_de_tres_no_visita_ningun_vertice() {
        let ns = nodes(&["a", "b", "c"]);
        let es = edges(&[("a", "b"), ("b", "c"), ("c", "a")]);

        let (visited, total) = Graph::build(&ns, &es).visit();
        assert_eq!(visited.len(), 0);
        assert_eq!(total, 3);
        assert!(!is_dag(&ns, &es));
    }

    #[test]
    fn autolazo_es_ciclo() {
        assert!(!is_dag(&nodes(&["a"]), &edges(&[("a", "a")])));
    }

    #[test]
    fn ciclo_aguas_abajo_deja_visitados_parciales() {
        // a -> b -> c -> b : a se visita, b y c quedan trabados
        let ns = nodes(&["a", "b", "c"]);
        let es = edges(&[("a", "b"), ("b", "c"), ("c", "b")]);

        let (visited, total) = Graph::build(&ns, &es).visit();
        assert_eq!(visited, vec!["a"]);
        assert!(visited.len() < total);
    }

    #[test]
    fn arista_a_nodo_inexistente_cuenta_pero_no_afecta() {
        let stats = validate(&nodes(&["a"]), &edges(&[("a", "ghost")]));
        assert_eq!(
            stats,
            PipelineStats {
                num_nodes: 1,
                num_edges: 1,
                is_dag: true
            }
        );
    }

    #[test]
    fn ciclo_entre_nodos_inexistentes_se_ignora() {
        let ns = nodes(&["a"]);
        let es = edges(&[("x", "y"), ("y", "x")]);
        assert!(is_dag(&ns, &es));
        assert_eq!(validate(&ns, &es).num_edges, 2);
    }

    #[test]
    fn ids_duplicados_colapsan_pero_num_nodes_es_crudo() {
        let ns = nodes(&["a", "a", "b"]);
        let es = edges(&[("a", "b")]);

        let stats = validate(&ns, &es);
        assert_eq!(stats.num_nodes, 3);
        assert!(stats.is_dag);
        assert_eq!(topological_order(&ns, &es), Some(vec!["a", "b"]));
    }

    #[test]
    fn aristas_paralelas_no_rompen_el_indegree() {
        let ns = nodes(&["a", "b"]);
        let es = edges(&[("a", "b"), ("a", "b"), ("a", "b")]);
        assert_eq!(topological_order(&ns, &es), Some(vec!["a", "b"]));
    }

    #[test]
    fn orden_topologico_respeta_aristas_y_orden_de_entrada() {
        let ns = nodes(&["llm", "input", "output", "prompt"]);
        let es = edges(&[
            ("input", "prompt"),
            ("prompt", "llm"),
            ("llm", "output"),
        ]);

        let order = topological_order(&ns, &es).unwrap();
        assert_eq!(order, vec!["input", "prompt", "llm", "output"]);
    }

    #[test]
    fn orden_topologico_es_none_con_ciclo() {
        let ns = nodes(&["a", "b"]);
        assert_eq!(topological_order(&ns, &edges(&[("a", "b"), ("b", "a")])), None);
    }

    #[test]
    fn validate_es_idempotente() {
        let ns = nodes(&["a", "b", "c"]);
        let es = edges(&[("a", "b"), ("b", "c"), ("c", "a"), ("a", "zzz")]);
        assert_eq!(validate(&ns, &es), validate(&ns, &es));
    }
}
