pub mod ast;
pub mod rules;

use self::ast::{Expr, GateExpr, ParsedStatement, QubitArg};
use self::rules::{barrier, comment, construction, gate_call, qreg};
use crate::error::ParseError;
use crate::ir::{Circuit, Gpi2Gate, GpiGate, MsGate, NativeGate, Operation};
use nom::{branch::alt, character::complete::multispace0};
use tracing::debug;

// --- Construction expressions ---

/// Re-reads a construction expression produced by [`Gate::repr`](crate::Gate::repr).
///
/// ```
/// use ionq_native::{parse_gate, Gate, MsGate, NativeGate};
///
/// let gate = NativeGate::from(MsGate::new(0.1, 0.2));
/// assert_eq!(parse_gate(&gate.repr()).unwrap(), gate);
/// ```
pub fn parse_gate(input: &str) -> Result<NativeGate, ParseError> {
    let (rest, expr) = construction(input).map_err(|_| ParseError::syntax(input))?;
    if !rest.is_empty() {
        return Err(ParseError::syntax(rest));
    }
    build_gate(&expr)
}

fn build_gate(expr: &GateExpr) -> Result<NativeGate, ParseError> {
    let expected: &[&str] = match expr.name.as_str() {
        "GPIGate" | "GPI2Gate" => &["phi"],
        "MSGate" => &["phi0", "phi1"],
        other => return Err(ParseError::UnknownGate(other.to_string())),
    };
    if expr.params.len() != expected.len() {
        return Err(ParseError::Arity {
            gate: expr.name.clone(),
            expected: expected.len(),
            actual: expr.params.len(),
        });
    }
    if let Some((name, _)) = expr
        .params
        .iter()
        .find(|(name, _)| !expected.contains(&name.as_str()))
    {
        return Err(ParseError::Parameter {
            gate: expr.name.clone(),
            name: name.clone(),
        });
    }

    let phase = |key: &str| {
        expr.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| *value)
            .ok_or_else(|| ParseError::Parameter {
                gate: expr.name.clone(),
                name: key.to_string(),
            })
    };

    Ok(match expr.name.as_str() {
        "GPIGate" => GpiGate::new(phase("phi")?).into(),
        "GPI2Gate" => Gpi2Gate::new(phase("phi")?).into(),
        _ => MsGate::new(phase("phi0")?, phase("phi1")?).into(),
    })
}

// --- Program text ---

fn native_gate(name: &str, phases: &[f64]) -> Result<NativeGate, ParseError> {
    let expected = match name {
        "gpi" | "gpi2" => 1,
        "ms" => 2,
        _ => return Err(ParseError::UnknownGate(name.to_string())),
    };
    if phases.len() != expected {
        return Err(ParseError::Arity {
            gate: name.to_string(),
            expected,
            actual: phases.len(),
        });
    }
    Ok(match name {
        "gpi" => GpiGate::new(phases[0]).into(),
        "gpi2" => Gpi2Gate::new(phases[0]).into(),
        _ => MsGate::new(phases[0], phases[1]).into(),
    })
}

fn resolve_argument(
    arg: &QubitArg,
    register: Option<&(String, usize)>,
) -> Result<Vec<usize>, ParseError> {
    let (name, idx) = arg;
    match register {
        Some((reg_name, size)) if reg_name == name => match idx {
            Some(i) if i < size => Ok(vec![*i]),
            Some(i) => Err(ParseError::IndexOutOfRange {
                register: name.clone(),
                index: *i,
            }),
            // Broadcasting: the whole register
            None => Ok((0..*size).collect()),
        },
        _ => Err(ParseError::UndefinedRegister(name.clone())),
    }
}

/// Expands register arguments into one qubit list per gate application.
fn broadcast(
    args: &[QubitArg],
    register: Option<&(String, usize)>,
) -> Result<Vec<Vec<usize>>, ParseError> {
    let resolved = args
        .iter()
        .map(|arg| resolve_argument(arg, register))
        .collect::<Result<Vec<_>, _>>()?;
    // With a single register every broadcast argument has the same length
    let max_len = resolved.iter().map(Vec::len).max().unwrap_or(1);

    Ok((0..max_len)
        .map(|i| {
            resolved
                .iter()
                .map(|r| if r.len() == 1 { r[0] } else { r[i] })
                .collect()
        })
        .collect())
}

/// Parses native program text into a [`Circuit`].
///
/// ```
/// use ionq_native::parse_program;
///
/// let circuit = parse_program("qreg q[2]; gpi(0.25) q[0]; ms(0, 1/2) q[0], q[1];").unwrap();
/// assert_eq!(circuit.num_qubits(), 2);
/// assert_eq!(circuit.operations().len(), 2);
/// ```
pub fn parse_program(input: &str) -> Result<Circuit, ParseError> {
    let mut circuit = Circuit::new(0);
    let mut register: Option<(String, usize)> = None;
    let mut current_input = input;

    loop {
        // Consume whitespace
        let (rem, _) = multispace0::<&str, nom::error::Error<&str>>(current_input)
            .map_err(|_| ParseError::syntax(current_input))?;
        current_input = rem;

        if current_input.is_empty() {
            break;
        }

        if let Ok((rem, _)) = comment(current_input) {
            current_input = rem;
            continue;
        }

        let (rem, stmt) = alt((qreg, barrier, gate_call))(current_input)
            .map_err(|_| ParseError::syntax(current_input))?;
        current_input = rem;
        debug!(?stmt, "parsed statement");

        match stmt {
            ParsedStatement::QReg(name, size) => {
                if register.is_some() {
                    return Err(ParseError::DuplicateRegister(name));
                }
                // Gate calls before the qreg fail to resolve, so nothing is lost
                circuit = Circuit::new(size);
                register = Some((name, size));
            }
            ParsedStatement::Gate(name, params, args) => {
                let phases = params
                    .iter()
                    .map(Expr::evaluate)
                    .collect::<Result<Vec<_>, _>>()?;
                let gate = native_gate(&name, &phases)?;
                for qubits in broadcast(&args, register.as_ref())? {
                    circuit.push_gate(gate, &qubits)?;
                }
            }
            ParsedStatement::Barrier(args) => {
                let mut qubits = Vec::new();
                for arg in &args {
                    qubits.extend(resolve_argument(arg, register.as_ref())?);
                }
                circuit.append(Operation::barrier(&qubits)?)?;
            }
        }
    }

    Ok(circuit)
}
