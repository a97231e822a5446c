//! Matrix helpers shared by gates and circuits.
//!
//! Basis states are indexed big-endian: qubit 0 is the most significant bit,
//! so a two-qubit index runs |00>, |01>, |10>, |11>.

use crate::error::{NativeError, Result};
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Tolerance used when checking unitarity of native gate matrices.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Widest register a dense unitary is built for: `2^12 × 2^12` complex
/// entries is already 256 MiB.
pub const MAX_UNITARY_QUBITS: usize = 12;

/// Side length `2^n` of the unitary over `num_qubits` wires.
pub fn dimension(num_qubits: usize) -> Result<usize> {
    if num_qubits > MAX_UNITARY_QUBITS {
        return Err(NativeError::UnitaryTooWide {
            num_qubits,
            max: MAX_UNITARY_QUBITS,
        });
    }
    Ok(1 << num_qubits)
}

/// Returns `true` if `m · m† = I` within `tol` on every entry.
pub fn is_unitary(m: &DMatrix<Complex64>, tol: f64) -> bool {
    if !m.is_square() {
        return false;
    }
    let product = m * m.adjoint();
    let identity = DMatrix::<Complex64>::identity(m.nrows(), m.ncols());
    approx_eq(&product, &identity, tol)
}

/// Element-wise comparison of two complex matrices of the same shape.
pub fn approx_eq(a: &DMatrix<Complex64>, b: &DMatrix<Complex64>, tol: f64) -> bool {
    a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= tol)
}

/// Lifts a `2^k × 2^k` gate matrix acting on `targets` into the full
/// `2^n × 2^n` space of `num_qubits` wires.
///
/// `targets[0]` is the most significant bit of the gate's own basis, so the
/// operand order of the gate is preserved.
pub fn embed(
    gate: &DMatrix<Complex64>,
    targets: &[usize],
    num_qubits: usize,
) -> Result<DMatrix<Complex64>> {
    let dim = dimension(num_qubits)?;
    if let Some(&qubit) = targets.iter().find(|&&q| q >= num_qubits) {
        return Err(NativeError::QubitOutOfRange { qubit, num_qubits });
    }
    let k = targets.len();
    let sub_dim = dimension(k)?;
    if gate.shape() != (sub_dim, sub_dim) {
        return Err(NativeError::qubit_count(
            format!("{}x{} matrix", gate.nrows(), gate.ncols()),
            gate.nrows().trailing_zeros() as usize,
            k,
        ));
    }
    let zero = Complex64::new(0.0, 0.0);
    let mut full = DMatrix::from_element(dim, dim, zero);

    for col in 0..dim {
        let sub_col = extract_bits(col, targets, num_qubits);
        for sub_row in 0..sub_dim {
            let amp = gate[(sub_row, sub_col)];
            if amp == zero {
                continue;
            }
            let row = deposit_bits(col, sub_row, targets, num_qubits);
            full[(row, col)] += amp;
        }
    }
    Ok(full)
}

fn extract_bits(index: usize, targets: &[usize], num_qubits: usize) -> usize {
    let k = targets.len();
    targets.iter().enumerate().fold(0, |acc, (j, &q)| {
        let bit = (index >> (num_qubits - 1 - q)) & 1;
        acc | (bit << (k - 1 - j))
    })
}

fn deposit_bits(index: usize, sub: usize, targets: &[usize], num_qubits: usize) -> usize {
    let k = targets.len();
    targets.iter().enumerate().fold(index, |acc, (j, &q)| {
        let shift = num_qubits - 1 - q;
        let bit = (sub >> (k - 1 - j)) & 1;
        (acc & !(1 << shift)) | (bit << shift)
    })
}
