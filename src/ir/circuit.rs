use super::diagram::DiagramArgs;
use super::gates::{Gate, Gpi2Gate, GpiGate, MsGate, NativeGate};
use super::matrix::{dimension, embed};
use super::operations::Operation;
use super::phase::{self, Phase};
use crate::error::{NativeError, Result};
use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

/// A sequence of native operations over a fixed number of qubits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    operations: Vec<Operation>,
}

/// One entry of the native interchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "lowercase")]
enum NativeInstruction {
    Gpi {
        target: usize,
        #[serde(with = "phase")]
        phase: f64,
    },
    Gpi2 {
        target: usize,
        #[serde(with = "phase")]
        phase: f64,
    },
    Ms {
        targets: [usize; 2],
        phases: [Phase; 2],
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NativeProgram {
    gateset: String,
    qubits: usize,
    circuit: Vec<NativeInstruction>,
}

const NATIVE_GATESET: &str = "native";

impl Circuit {
    /// Creates a new empty circuit over `num_qubits` wires.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            operations: Vec::new(),
        }
    }

    /// Total number of qubits in the circuit.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Operations in application order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Appends an operation after checking it and that its qubits fit the
    /// circuit.
    pub fn append(&mut self, op: Operation) -> Result<()> {
        op.check()?;
        if let Some(&qubit) = op.qubits().iter().find(|&&q| q >= self.num_qubits) {
            return Err(NativeError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        trace!(?op, "appending operation");
        self.operations.push(op);
        Ok(())
    }

    /// Binds `gate` to `qubits` and appends it.
    pub fn push_gate(&mut self, gate: impl Into<NativeGate>, qubits: &[usize]) -> Result<()> {
        self.append(Operation::gate(gate, qubits)?)
    }

    /// Gate operations with their qubits, barriers skipped.
    pub fn gates(&self) -> impl Iterator<Item = (&NativeGate, &[usize])> + '_ {
        self.operations.iter().filter_map(|op| match op {
            Operation::Gate { gate, qubits } => Some((gate, qubits.as_slice())),
            Operation::Barrier { .. } => None,
        })
    }

    /// Product of all gate matrices, first operation applied first.
    ///
    /// The result is `2^n × 2^n`; circuits wider than
    /// [`MAX_UNITARY_QUBITS`](super::matrix::MAX_UNITARY_QUBITS) are rejected
    /// with [`NativeError::UnitaryTooWide`].
    pub fn unitary(&self) -> Result<DMatrix<Complex64>> {
        debug!(
            num_qubits = self.num_qubits,
            operations = self.operations.len(),
            "computing circuit unitary"
        );
        let dim = dimension(self.num_qubits)?;
        self.gates()
            .try_fold(DMatrix::identity(dim, dim), |acc, (gate, qubits)| {
                Ok(embed(&gate.matrix(), qubits, self.num_qubits)? * acc)
            })
    }

    /// Renders the circuit as text, one line per qubit and one column per
    /// operation.
    ///
    /// ```
    /// use ionq_native::{Circuit, DiagramArgs, GpiGate};
    ///
    /// let mut circuit = Circuit::new(1);
    /// circuit.push_gate(GpiGate::new(0.25), &[0]).unwrap();
    /// assert_eq!(circuit.to_text_diagram(&DiagramArgs::ascii()), "q0: -GPI(0.25)-");
    /// ```
    pub fn to_text_diagram(&self, args: &DiagramArgs) -> String {
        let wire = args.wire_char();
        let mut lines: Vec<String> = (0..self.num_qubits).map(|q| format!("q{}: ", q)).collect();
        let label_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        for line in lines.iter_mut() {
            while line.chars().count() < label_width {
                line.push(' ');
            }
            line.push(wire);
        }

        for op in &self.operations {
            let cells = self.column_cells(op, args);
            let width = cells
                .iter()
                .flatten()
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(1);
            let span = op
                .qubits()
                .iter()
                .min()
                .zip(op.qubits().iter().max())
                .filter(|_| matches!(op, Operation::Gate { .. }));

            for (q, line) in lines.iter_mut().enumerate() {
                let cell = match &cells[q] {
                    Some(symbol) => pad(symbol, width, wire),
                    None => match span {
                        Some((&lo, &hi)) if lo < q && q < hi => connector(width, wire, args),
                        _ => wire.to_string().repeat(width),
                    },
                };
                line.push_str(&cell);
                line.push(wire);
            }
        }
        lines.join("\n")
    }

    fn column_cells(&self, op: &Operation, args: &DiagramArgs) -> Vec<Option<String>> {
        let mut cells = vec![None; self.num_qubits];
        match op {
            Operation::Gate { gate, qubits } => {
                let info = gate.diagram_info(args);
                for (&q, symbol) in qubits.iter().zip(info.wire_symbols) {
                    if let Some(cell) = cells.get_mut(q) {
                        *cell = Some(symbol);
                    }
                }
            }
            Operation::Barrier { qubits } => {
                for &q in qubits {
                    if let Some(cell) = cells.get_mut(q) {
                        *cell = Some(args.barrier_char().to_string());
                    }
                }
            }
        }
        cells
    }

    /// Exports the circuit in the native-gateset interchange format.
    ///
    /// Barriers carry no meaning there and are dropped.
    pub fn to_native_json(&self) -> Result<Value> {
        let circuit = self
            .gates()
            .map(|(gate, qubits)| match gate {
                NativeGate::Gpi(g) => NativeInstruction::Gpi {
                    target: qubits[0],
                    phase: g.phase(),
                },
                NativeGate::Gpi2(g) => NativeInstruction::Gpi2 {
                    target: qubits[0],
                    phase: g.phase(),
                },
                NativeGate::Ms(g) => {
                    let (phi0, phi1) = g.phases();
                    NativeInstruction::Ms {
                        targets: [qubits[0], qubits[1]],
                        phases: [Phase(phi0), Phase(phi1)],
                    }
                }
            })
            .collect();
        let program = NativeProgram {
            gateset: NATIVE_GATESET.to_string(),
            qubits: self.num_qubits,
            circuit,
        };
        Ok(serde_json::to_value(program)?)
    }

    /// Reads a document produced by [`Circuit::to_native_json`].
    pub fn from_native_json(value: &Value) -> Result<Self> {
        let program: NativeProgram = serde_json::from_value(value.clone())?;
        if program.gateset != NATIVE_GATESET {
            return Err(NativeError::MalformedEntry(format!(
                "expected gateset '{}', found '{}'",
                NATIVE_GATESET, program.gateset
            )));
        }
        debug!(
            qubits = program.qubits,
            instructions = program.circuit.len(),
            "reading native circuit"
        );

        let mut circuit = Circuit::new(program.qubits);
        for instruction in program.circuit {
            match instruction {
                NativeInstruction::Gpi { target, phase } => {
                    circuit.push_gate(GpiGate::new(phase), &[target])?
                }
                NativeInstruction::Gpi2 { target, phase } => {
                    circuit.push_gate(Gpi2Gate::new(phase), &[target])?
                }
                NativeInstruction::Ms {
                    targets,
                    phases: [phi0, phi1],
                } => circuit.push_gate(MsGate::new(phi0.0, phi1.0), &targets)?,
            }
        }
        Ok(circuit)
    }
}

fn pad(symbol: &str, width: usize, wire: char) -> String {
    let mut cell = symbol.to_string();
    for _ in symbol.chars().count()..width {
        cell.push(wire);
    }
    cell
}

fn connector(width: usize, wire: char, args: &DiagramArgs) -> String {
    (0..width)
        .map(|i| if i == width / 2 { args.barrier_char() } else { wire })
        .collect()
}
