//! Error types for native circuits, targets and parsing

use thiserror::Error;

/// Errors raised at the circuit and backend boundary.
///
/// Gate construction and matrix evaluation never fail; these only arise when
/// gates are bound to qubits, circuits are checked against a target, or
/// interchange documents are read back.
#[derive(Debug, Error)]
pub enum NativeError {
    /// Gate applied to the wrong number of qubits
    #[error("Gate '{gate}' acts on {expected} qubits, but {actual} were provided")]
    QubitCount {
        gate: String,
        expected: usize,
        actual: usize,
    },

    /// Same qubit used twice in one operation
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(usize),

    /// Qubit index beyond the circuit width
    #[error("Qubit index {qubit} out of range: circuit has {num_qubits} qubits")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// Gate not in the target's basis
    #[error("Gate '{gate}' is not supported by backend '{backend}'")]
    UnsupportedGate { gate: String, backend: String },

    /// Two-qubit gate on an uncoupled pair
    #[error("Qubits {q0} and {q1} are not coupled")]
    NotCoupled { q0: usize, q1: usize },

    /// Circuit needs more qubits than the target has
    #[error("Circuit requires {required} qubits, backend provides {available}")]
    CircuitTooWide { required: usize, available: usize },

    /// Register too wide for a dense unitary
    #[error("Unitary over {num_qubits} qubits is too large, at most {max} are supported")]
    UnitaryTooWide { num_qubits: usize, max: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Interchange entry that does not describe a native gate
    #[error("Malformed circuit entry: {0}")]
    MalformedEntry(String),
}

impl NativeError {
    pub fn qubit_count(gate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::QubitCount {
            gate: gate.into(),
            expected,
            actual,
        }
    }
}

/// Errors raised while reading construction expressions or program text.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error at: {at}")]
    Syntax { at: String },

    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    #[error("Gate '{gate}' expects {expected} phases, got {actual}")]
    Arity {
        gate: String,
        expected: usize,
        actual: usize,
    },

    #[error("Gate '{gate}' has no parameter named '{name}'")]
    Parameter { gate: String, name: String },

    #[error("Undefined quantum register: {0}")]
    UndefinedRegister(String),

    #[error("Qubit index out of bounds: {register}[{index}]")]
    IndexOutOfRange { register: String, index: usize },

    #[error("Only one qreg declaration is supported, found a second: {0}")]
    DuplicateRegister(String),

    #[error("Division by zero in phase expression")]
    DivisionByZero,

    #[error(transparent)]
    Circuit(#[from] NativeError),
}

impl ParseError {
    /// Syntax error pointing at the first line of the remaining input.
    pub fn syntax(remaining: &str) -> Self {
        let at = remaining.lines().next().unwrap_or_default().trim();
        Self::Syntax { at: at.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, NativeError>;
