use crate::error::{NativeError, Result};
use crate::ir::{Circuit, Gate};
use petgraph::graph::{Graph, NodeIndex};
use petgraph::Directed;
use std::collections::HashSet;
use tracing::debug;

/// Target description a native circuit is checked against.
#[derive(Debug, Clone)]
pub struct Backend {
    pub name: String,
    pub num_qubits: usize,
    /// Lowercase gate names, e.g. `"gpi"`.
    pub basis_gates: HashSet<String>,
    /// One node per ion. An MS gate is allowed on a pair joined by an edge
    /// in either direction.
    pub coupling_map: Graph<(), (), Directed>,
}

impl Backend {
    /// Empty target: no basis gates and no coupled pairs yet.
    pub fn new(name: impl Into<String>, num_qubits: usize) -> Self {
        let mut coupling_map = Graph::with_capacity(num_qubits, 0);
        (0..num_qubits).for_each(|_| {
            coupling_map.add_node(());
        });
        Self {
            name: name.into(),
            num_qubits,
            basis_gates: HashSet::new(),
            coupling_map,
        }
    }

    /// Trapped-ion target: the native basis with every pair of ions coupled.
    pub fn trapped_ion(name: impl Into<String>, num_qubits: usize) -> Self {
        let mut backend = Self::new(name, num_qubits);
        for gate in ["gpi", "gpi2", "ms"] {
            backend.add_basis_gate(gate);
        }
        backend.set_coupling_map(
            (0..num_qubits).flat_map(|a| ((a + 1)..num_qubits).map(move |b| (a, b))),
        );
        backend
    }

    pub fn add_basis_gate(&mut self, gate: &str) {
        self.basis_gates.insert(gate.to_lowercase());
    }

    /// Replaces the coupled pairs. Pairs naming an ion the target does not
    /// have are ignored.
    pub fn set_coupling_map(&mut self, pairs: impl IntoIterator<Item = (usize, usize)>) {
        let n = self.num_qubits;
        self.coupling_map.clear_edges();
        self.coupling_map.extend_with_edges(
            pairs
                .into_iter()
                .filter(|&(a, b)| a < n && b < n)
                .map(|(a, b)| (NodeIndex::new(a), NodeIndex::new(b))),
        );
    }

    pub fn is_coupled(&self, q0: usize, q1: usize) -> bool {
        let (a, b) = (NodeIndex::new(q0), NodeIndex::new(q1));
        self.coupling_map.contains_edge(a, b) || self.coupling_map.contains_edge(b, a)
    }

    /// Checks that `circuit` fits this target: width, basis and connectivity.
    pub fn validate(&self, circuit: &Circuit) -> Result<()> {
        debug!(
            backend = %self.name,
            num_qubits = circuit.num_qubits(),
            "validating circuit"
        );
        if circuit.num_qubits() > self.num_qubits {
            return Err(NativeError::CircuitTooWide {
                required: circuit.num_qubits(),
                available: self.num_qubits,
            });
        }

        for (gate, qubits) in circuit.gates() {
            if !self.basis_gates.contains(&gate.name().to_lowercase()) {
                return Err(NativeError::UnsupportedGate {
                    gate: gate.name().to_string(),
                    backend: self.name.clone(),
                });
            }
            if let &[q0, q1] = qubits {
                if !self.is_coupled(q0, q1) {
                    return Err(NativeError::NotCoupled { q0, q1 });
                }
            }
        }
        Ok(())
    }
}
