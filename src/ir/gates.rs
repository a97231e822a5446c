use super::diagram::{DiagramArgs, DiagramInfo};
use super::operations::Operation;
use super::phase;
use crate::error::Result;
use nalgebra::{DMatrix, Matrix2, Matrix4};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Capabilities every native gate exposes to the circuit layer.
///
/// # Examples
///
/// ```
/// use ionq_native::{DiagramArgs, Gate, MsGate};
///
/// let ms = MsGate::new(0.1, 0.2);
/// assert_eq!(ms.num_qubits(), 2);
/// assert_eq!(ms.matrix().shape(), (4, 4));
/// assert_eq!(
///     ms.diagram_info(&DiagramArgs::default()).wire_symbols,
///     vec!["MS(0.1)".to_string(), "MS(0.2)".to_string()]
/// );
/// ```
pub trait Gate {
    /// Short gate name, also used as the serialized type tag.
    fn name(&self) -> &'static str;

    /// Number of qubits the gate acts on.
    fn num_qubits(&self) -> usize;

    /// Unitary matrix, `2^n × 2^n`.
    fn matrix(&self) -> DMatrix<Complex64>;

    /// Wire labels for circuit diagrams, one per operand.
    fn diagram_info(&self, args: &DiagramArgs) -> DiagramInfo;

    /// Tagged field record from which an equal gate can be rebuilt with
    /// [`NativeGate::from_json_dict`]. Non-finite phases are written as
    /// `"inf"`, `"-inf"` or `"NaN"`.
    fn json_dict(&self) -> Value;

    /// Construction expression, e.g. `GPIGate(phi=0.25)`.
    fn repr(&self) -> String;
}

/// `e^{2πi·turns}`
fn expi_turns(turns: f64) -> Complex64 {
    Complex64::from_polar(1.0, 2.0 * PI * turns)
}

const NEG_I: Complex64 = Complex64::new(0.0, -1.0);

// 0.0 and -0.0 compare equal, so they must hash equal too.
fn hash_phase<H: Hasher>(phase: f64, state: &mut H) {
    let bits = if phase == 0.0 { 0 } else { phase.to_bits() };
    state.write_u64(bits);
}

fn to_dmatrix2(m: Matrix2<Complex64>) -> DMatrix<Complex64> {
    DMatrix::from_column_slice(2, 2, m.as_slice())
}

/// Single-qubit GPI gate, a π rotation about an equatorial axis set by `phi`.
///
/// ```text
/// [[0,          e^{-2πiφ}],
///  [e^{2πiφ},   0        ]]
/// ```
///
/// `phi` is in turns. Any value is accepted, NaN included; a non-finite phase
/// simply yields a non-finite matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpiGate {
    #[serde(with = "phase")]
    phi: f64,
}

impl GpiGate {
    pub const fn new(phi: f64) -> Self {
        Self { phi }
    }

    pub fn phase(&self) -> f64 {
        self.phi
    }

    pub fn unitary(&self) -> Matrix2<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let top = expi_turns(-self.phi);
        let bot = expi_turns(self.phi);
        Matrix2::new(zero, top, bot, zero)
    }
}

// NaN phases break reflexivity, as they do for f64 itself.
impl Eq for GpiGate {}

impl Hash for GpiGate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_phase(self.phi, state);
    }
}

impl fmt::Display for GpiGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GPI")
    }
}

impl Gate for GpiGate {
    fn name(&self) -> &'static str {
        "GPI"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> DMatrix<Complex64> {
        to_dmatrix2(self.unitary())
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> DiagramInfo {
        DiagramInfo::new(vec![format!("GPI({:?})", self.phi)])
    }

    fn json_dict(&self) -> Value {
        NativeGate::from(*self).json_dict()
    }

    fn repr(&self) -> String {
        format!("GPIGate(phi={:?})", self.phi)
    }
}

/// Single-qubit GPI2 gate, a π/2 rotation about an equatorial axis.
///
/// ```text
/// 1/√2 · [[1,             -i·e^{-2πiφ}],
///         [-i·e^{2πiφ},   1           ]]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gpi2Gate {
    #[serde(with = "phase")]
    phi: f64,
}

impl Gpi2Gate {
    pub const fn new(phi: f64) -> Self {
        Self { phi }
    }

    pub fn phase(&self) -> f64 {
        self.phi
    }

    pub fn unitary(&self) -> Matrix2<Complex64> {
        let d = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let top = NEG_I * expi_turns(-self.phi);
        let bot = NEG_I * expi_turns(self.phi);
        Matrix2::new(d, d * top, d * bot, d)
    }
}

impl Eq for Gpi2Gate {}

impl Hash for Gpi2Gate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_phase(self.phi, state);
    }
}

impl fmt::Display for Gpi2Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GPI2")
    }
}

impl Gate for Gpi2Gate {
    fn name(&self) -> &'static str {
        "GPI2"
    }

    fn num_qubits(&self) -> usize {
        1
    }

    fn matrix(&self) -> DMatrix<Complex64> {
        to_dmatrix2(self.unitary())
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> DiagramInfo {
        DiagramInfo::new(vec![format!("GPI2({:?})", self.phi)])
    }

    fn json_dict(&self) -> Value {
        NativeGate::from(*self).json_dict()
    }

    fn repr(&self) -> String {
        format!("GPI2Gate(phi={:?})", self.phi)
    }
}

/// Two-qubit Mølmer–Sørensen gate with one phase per ion.
///
/// In the basis |00>, |01>, |10>, |11>:
///
/// ```text
/// 1/√2 · [[1,                0,                0,                -i·e^{-2πi(φ0+φ1)}],
///         [0,                1,                -i·e^{-2πi(φ0-φ1)}, 0               ],
///         [0,                -i·e^{2πi(φ0-φ1)}, 1,                0               ],
///         [-i·e^{2πi(φ0+φ1)}, 0,                0,                1               ]]
/// ```
///
/// Equality compares `(phi0, phi1)` as an ordered pair: `MS(a, b)` and
/// `MS(b, a)` are different values even where they act identically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MsGate {
    #[serde(with = "phase")]
    phi0: f64,
    #[serde(with = "phase")]
    phi1: f64,
}

impl MsGate {
    pub const fn new(phi0: f64, phi1: f64) -> Self {
        Self { phi0, phi1 }
    }

    pub fn phases(&self) -> (f64, f64) {
        (self.phi0, self.phi1)
    }

    pub fn unitary(&self) -> Matrix4<Complex64> {
        let zero = Complex64::new(0.0, 0.0);
        let d = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let sum = self.phi0 + self.phi1;
        let diff = self.phi0 - self.phi1;
        let m03 = d * NEG_I * expi_turns(-sum);
        let m12 = d * NEG_I * expi_turns(-diff);
        let m21 = d * NEG_I * expi_turns(diff);
        let m30 = d * NEG_I * expi_turns(sum);
        #[rustfmt::skip]
        let rows = [
            d,    zero, zero, m03,
            zero, d,    m12,  zero,
            zero, m21,  d,    zero,
            m30,  zero, zero, d,
        ];
        Matrix4::from_row_slice(&rows)
    }
}

impl Eq for MsGate {}

impl Hash for MsGate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_phase(self.phi0, state);
        hash_phase(self.phi1, state);
    }
}

impl fmt::Display for MsGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MS")
    }
}

impl Gate for MsGate {
    fn name(&self) -> &'static str {
        "MS"
    }

    fn num_qubits(&self) -> usize {
        2
    }

    fn matrix(&self) -> DMatrix<Complex64> {
        let m = self.unitary();
        DMatrix::from_column_slice(4, 4, m.as_slice())
    }

    fn diagram_info(&self, _args: &DiagramArgs) -> DiagramInfo {
        DiagramInfo::new(vec![
            format!("MS({:?})", self.phi0),
            format!("MS({:?})", self.phi1),
        ])
    }

    fn json_dict(&self) -> Value {
        NativeGate::from(*self).json_dict()
    }

    fn repr(&self) -> String {
        format!("MSGate(phi0={:?}, phi1={:?})", self.phi0, self.phi1)
    }
}

/// GPI with zero phase: the Pauli-X matrix. Driven by the Rabi laser.
pub const GPI: GpiGate = GpiGate::new(0.0);

/// GPI2 with zero phase: a π/2 rotation about X. Driven by the Rabi laser.
pub const GPI2: Gpi2Gate = Gpi2Gate::new(0.0);

/// MS with both phases zero: the fully entangling XX interaction.
pub const MS: MsGate = MsGate::new(0.0, 0.0);

/// Any one of the native gates.
///
/// This is the serialized form: the variant name is written under `"type"`
/// next to the gate's phase fields.
///
/// ```
/// use ionq_native::{Gate, NativeGate, Gpi2Gate};
///
/// let gate = NativeGate::from(Gpi2Gate::new(0.5));
/// let dict = gate.json_dict();
/// assert_eq!(dict["type"], "GPI2");
/// assert_eq!(NativeGate::from_json_dict(&dict).unwrap(), gate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NativeGate {
    #[serde(rename = "GPI")]
    Gpi(GpiGate),
    #[serde(rename = "GPI2")]
    Gpi2(Gpi2Gate),
    #[serde(rename = "MS")]
    Ms(MsGate),
}

impl NativeGate {
    /// Rebuilds a gate from the record produced by [`Gate::json_dict`].
    pub fn from_json_dict(value: &Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Binds the gate to `qubits`, checking arity and distinctness.
    pub fn on(self, qubits: &[usize]) -> Result<Operation> {
        Operation::gate(self, qubits)
    }

    fn inner(&self) -> &dyn Gate {
        match self {
            NativeGate::Gpi(g) => g,
            NativeGate::Gpi2(g) => g,
            NativeGate::Ms(g) => g,
        }
    }
}

impl Gate for NativeGate {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn num_qubits(&self) -> usize {
        self.inner().num_qubits()
    }

    fn matrix(&self) -> DMatrix<Complex64> {
        self.inner().matrix()
    }

    fn diagram_info(&self, args: &DiagramArgs) -> DiagramInfo {
        self.inner().diagram_info(args)
    }

    // Serializing a tagged struct of numbers and strings cannot fail.
    fn json_dict(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn repr(&self) -> String {
        self.inner().repr()
    }
}

impl fmt::Display for NativeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<GpiGate> for NativeGate {
    fn from(gate: GpiGate) -> Self {
        NativeGate::Gpi(gate)
    }
}

impl From<Gpi2Gate> for NativeGate {
    fn from(gate: Gpi2Gate) -> Self {
        NativeGate::Gpi2(gate)
    }
}

impl From<MsGate> for NativeGate {
    fn from(gate: MsGate) -> Self {
        NativeGate::Ms(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::matrix::{approx_eq, is_unitary, DEFAULT_TOLERANCE};
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_gpi_zero_is_pauli_x() {
        let entries = [c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)];
        let expected = DMatrix::from_row_slice(2, 2, &entries);
        assert!(approx_eq(&GPI.matrix(), &expected, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_gpi_quarter_turn() {
        // e^{-iπ/2} = -i, e^{iπ/2} = i: the Pauli-Y matrix
        let entries = [c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)];
        let expected = DMatrix::from_row_slice(2, 2, &entries);
        assert!(approx_eq(&GpiGate::new(0.25).matrix(), &expected, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_gpi2_zero() {
        let d = FRAC_1_SQRT_2;
        let entries = [c(d, 0.0), c(0.0, -d), c(0.0, -d), c(d, 0.0)];
        let expected = DMatrix::from_row_slice(2, 2, &entries);
        assert!(approx_eq(&GPI2.matrix(), &expected, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_gpi2_quarter_turn() {
        // -i·e^{-iπ/2} = -1, -i·e^{iπ/2} = 1
        let d = FRAC_1_SQRT_2;
        let entries = [c(d, 0.0), c(-d, 0.0), c(d, 0.0), c(d, 0.0)];
        let expected = DMatrix::from_row_slice(2, 2, &entries);
        assert!(approx_eq(&Gpi2Gate::new(0.25).matrix(), &expected, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_gpi2_twice_is_gpi_up_to_phase() {
        let m = Gpi2Gate::new(0.1).unitary();
        let squared = m * m;
        let gpi = GpiGate::new(0.1).unitary() * NEG_I;
        assert!(approx_eq(&to_dmatrix2(squared), &to_dmatrix2(gpi), DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_ms_zero() {
        let d = FRAC_1_SQRT_2;
        let z = c(0.0, 0.0);
        let one = c(d, 0.0);
        let mi = c(0.0, -d);
        #[rustfmt::skip]
        let expected = DMatrix::from_row_slice(4, 4, &[
            one, z,   z,   mi,
            z,   one, mi,  z,
            z,   mi,  one, z,
            mi,  z,   z,   one,
        ]);
        assert!(approx_eq(&MS.matrix(), &expected, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_ms_entry_placement() {
        let m = MsGate::new(0.125, 0.0).unitary();
        let d = FRAC_1_SQRT_2;
        // phi0 + phi1 = phi0 - phi1 = 1/8 turn
        let expected_03 = c(d, 0.0) * NEG_I * Complex64::from_polar(1.0, -PI / 4.0);
        let expected_30 = c(d, 0.0) * NEG_I * Complex64::from_polar(1.0, PI / 4.0);
        assert!((m[(0, 3)] - expected_03).norm() < DEFAULT_TOLERANCE);
        assert!((m[(1, 2)] - expected_03).norm() < DEFAULT_TOLERANCE);
        assert!((m[(2, 1)] - expected_30).norm() < DEFAULT_TOLERANCE);
        assert!((m[(3, 0)] - expected_30).norm() < DEFAULT_TOLERANCE);
        assert_eq!(m[(0, 1)], c(0.0, 0.0));
        assert_eq!(m[(3, 2)], c(0.0, 0.0));
    }

    #[test]
    fn test_nan_phase_propagates() {
        let m = GpiGate::new(f64::NAN).unitary();
        assert!(m[(0, 1)].re.is_nan());
        assert_eq!(m[(0, 0)], c(0.0, 0.0));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(GpiGate::new(0.3).to_string(), "GPI");
        assert_eq!(Gpi2Gate::new(0.3).to_string(), "GPI2");
        assert_eq!(MsGate::new(0.3, 0.1).to_string(), "MS");
        assert_eq!(NativeGate::from(MS).to_string(), "MS");
    }

    #[test]
    fn test_repr() {
        assert_eq!(GpiGate::new(0.25).repr(), "GPIGate(phi=0.25)");
        assert_eq!(Gpi2Gate::new(1.0).repr(), "GPI2Gate(phi=1.0)");
        assert_eq!(MsGate::new(0.1, -0.2).repr(), "MSGate(phi0=0.1, phi1=-0.2)");
    }

    #[test]
    fn test_diagram_info() {
        let args = DiagramArgs::default();
        assert_eq!(GpiGate::new(0.25).diagram_info(&args).wire_symbols, vec!["GPI(0.25)"]);
        assert_eq!(Gpi2Gate::new(0.5).diagram_info(&args).wire_symbols, vec!["GPI2(0.5)"]);
        assert_eq!(
            MsGate::new(0.1, 0.7).diagram_info(&args).wire_symbols,
            vec!["MS(0.1)", "MS(0.7)"]
        );
    }

    #[test]
    fn test_diagram_ignores_args() {
        let gate = MsGate::new(0.1, 0.2);
        assert_eq!(
            gate.diagram_info(&DiagramArgs::default()),
            gate.diagram_info(&DiagramArgs::ascii())
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(GpiGate::new(0.4).phase(), 0.4);
        assert_eq!(Gpi2Gate::new(0.6).phase(), 0.6);
        assert_eq!(MsGate::new(0.1, 0.2).phases(), (0.1, 0.2));
    }

    #[test]
    fn test_num_qubits() {
        assert_eq!(GPI.num_qubits(), 1);
        assert_eq!(GPI2.num_qubits(), 1);
        assert_eq!(MS.num_qubits(), 2);
        assert_eq!(NativeGate::from(MS).num_qubits(), 2);
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(GpiGate::new(0.1), GpiGate::new(0.1));
        assert_ne!(GpiGate::new(0.1), GpiGate::new(0.1 + 1e-15));
    }

    #[test]
    fn test_type_is_part_of_identity() {
        assert_ne!(NativeGate::from(GpiGate::new(0.3)), NativeGate::from(Gpi2Gate::new(0.3)));
    }

    #[test]
    fn test_ms_equality_is_ordered() {
        assert_ne!(MsGate::new(0.1, 0.2), MsGate::new(0.2, 0.1));
        assert_eq!(MsGate::new(0.3, 0.3), MsGate::new(0.3, 0.3));
    }

    #[test]
    fn test_signed_zero_hash_matches_equality() {
        assert_eq!(GpiGate::new(0.0), GpiGate::new(-0.0));
        assert_eq!(hash_of(&GpiGate::new(0.0)), hash_of(&GpiGate::new(-0.0)));
    }

    #[test]
    fn test_gates_as_set_members() {
        let mut set = HashSet::new();
        set.insert(NativeGate::from(GpiGate::new(0.5)));
        set.insert(NativeGate::from(GpiGate::new(0.5)));
        set.insert(NativeGate::from(Gpi2Gate::new(0.5)));
        set.insert(NativeGate::from(MsGate::new(0.5, 0.25)));
        set.insert(NativeGate::from(MsGate::new(0.25, 0.5)));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_json_dict_shape() {
        assert_eq!(GpiGate::new(0.25).json_dict(), json!({"type": "GPI", "phi": 0.25}));
        assert_eq!(Gpi2Gate::new(0.5).json_dict(), json!({"type": "GPI2", "phi": 0.5}));
        assert_eq!(
            MsGate::new(0.1, 0.2).json_dict(),
            json!({"type": "MS", "phi0": 0.1, "phi1": 0.2})
        );
    }

    #[test]
    fn test_json_dict_matches_serde() {
        let gate = NativeGate::from(MsGate::new(0.1, 0.2));
        assert_eq!(serde_json::to_value(gate).unwrap(), gate.json_dict());
    }

    #[test]
    fn test_json_dict_non_finite_phases() {
        assert_eq!(
            GpiGate::new(f64::INFINITY).json_dict(),
            json!({"type": "GPI", "phi": "inf"})
        );
        assert_eq!(
            MsGate::new(f64::NEG_INFINITY, f64::NAN).json_dict(),
            json!({"type": "MS", "phi0": "-inf", "phi1": "NaN"})
        );
    }

    #[test]
    fn test_json_dict_reconstructs_infinite_phases() {
        for phi in [f64::INFINITY, f64::NEG_INFINITY] {
            for gate in [
                NativeGate::from(GpiGate::new(phi)),
                NativeGate::from(Gpi2Gate::new(phi)),
                NativeGate::from(MsGate::new(phi, -phi)),
                NativeGate::from(MsGate::new(0.25, phi)),
            ] {
                let back = NativeGate::from_json_dict(&gate.json_dict()).unwrap();
                assert_eq!(back, gate);
            }
        }
    }

    #[test]
    fn test_json_dict_nan_phase_reads_back_as_nan() {
        let dict = Gpi2Gate::new(f64::NAN).json_dict();
        match NativeGate::from_json_dict(&dict).unwrap() {
            NativeGate::Gpi2(g) => assert!(g.phase().is_nan()),
            other => panic!("Expected GPI2 gate, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_dict_rejects_unknown_type() {
        let err = NativeGate::from_json_dict(&json!({"type": "CZ", "phi": 0.1}));
        assert!(err.is_err());
    }

    #[test]
    fn test_from_json_dict_rejects_missing_field() {
        assert!(NativeGate::from_json_dict(&json!({"type": "MS", "phi0": 0.1})).is_err());
    }

    proptest! {
        #[test]
        fn prop_gpi_unitary(phi in -10.0f64..10.0) {
            prop_assert!(is_unitary(&GpiGate::new(phi).matrix(), DEFAULT_TOLERANCE));
        }

        #[test]
        fn prop_gpi2_unitary(phi in -10.0f64..10.0) {
            prop_assert!(is_unitary(&Gpi2Gate::new(phi).matrix(), DEFAULT_TOLERANCE));
        }

        #[test]
        fn prop_ms_unitary(phi0 in -10.0f64..10.0, phi1 in -10.0f64..10.0) {
            prop_assert!(is_unitary(&MsGate::new(phi0, phi1).matrix(), DEFAULT_TOLERANCE));
        }

        #[test]
        fn prop_json_dict_reconstructs(phi0 in -1e6f64..1e6, phi1 in -1e6f64..1e6) {
            for gate in [
                NativeGate::from(GpiGate::new(phi0)),
                NativeGate::from(Gpi2Gate::new(phi1)),
                NativeGate::from(MsGate::new(phi0, phi1)),
            ] {
                prop_assert_eq!(NativeGate::from_json_dict(&gate.json_dict()).unwrap(), gate);
            }
        }
    }
}
