use super::gates::{Gate, NativeGate};
use crate::error::{NativeError, Result};

/// Represents a single operation in a native circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// A native gate applied to qubits in operand order.
    Gate {
        gate: NativeGate,
        /// Indices of the qubits involved.
        qubits: Vec<usize>,
    },
    /// A barrier; drawn in diagrams and skipped on export.
    Barrier {
        /// Indices of the qubits involved in the barrier.
        qubits: Vec<usize>,
    },
}

impl Operation {
    /// Builds a gate operation, see [`Operation::check`].
    pub fn gate(gate: impl Into<NativeGate>, qubits: &[usize]) -> Result<Self> {
        let op = Operation::Gate {
            gate: gate.into(),
            qubits: qubits.to_vec(),
        };
        op.check()?;
        Ok(op)
    }

    pub fn barrier(qubits: &[usize]) -> Result<Self> {
        let op = Operation::Barrier {
            qubits: qubits.to_vec(),
        };
        op.check()?;
        Ok(op)
    }

    /// Checks arity and that no qubit repeats, also for operations built
    /// from the variants directly.
    pub fn check(&self) -> Result<()> {
        match self {
            Operation::Gate { gate, qubits } if qubits.len() != gate.num_qubits() => Err(
                NativeError::qubit_count(gate.name(), gate.num_qubits(), qubits.len()),
            ),
            Operation::Gate { qubits, .. } | Operation::Barrier { qubits } => {
                check_distinct(qubits)
            }
        }
    }

    pub fn qubits(&self) -> &[usize] {
        match self {
            Operation::Gate { qubits, .. } | Operation::Barrier { qubits } => qubits,
        }
    }
}

fn check_distinct(qubits: &[usize]) -> Result<()> {
    for (i, q) in qubits.iter().enumerate() {
        if qubits[i + 1..].contains(q) {
            return Err(NativeError::DuplicateQubit(*q));
        }
    }
    Ok(())
}
