use crate::error::ParseError;

/// Phase expression, evaluated in turns.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Float(f64),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn evaluate(&self) -> Result<f64, ParseError> {
        match self {
            Expr::Float(val) => Ok(*val),
            Expr::Neg(inner) => Ok(-inner.evaluate()?),
            Expr::Add(lhs, rhs) => Ok(lhs.evaluate()? + rhs.evaluate()?),
            Expr::Sub(lhs, rhs) => Ok(lhs.evaluate()? - rhs.evaluate()?),
            Expr::Mul(lhs, rhs) => Ok(lhs.evaluate()? * rhs.evaluate()?),
            Expr::Div(lhs, rhs) => {
                let denom = rhs.evaluate()?;
                if denom == 0.0 {
                    Err(ParseError::DivisionByZero)
                } else {
                    Ok(lhs.evaluate()? / denom)
                }
            }
        }
    }
}

/// Register name with an optional index; no index means the whole register.
pub type QubitArg = (String, Option<usize>);

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedStatement {
    QReg(String, usize),
    Gate(String, Vec<Expr>, Vec<QubitArg>), // Name, Phases, Qubits
    Barrier(Vec<QubitArg>),
}

/// A construction expression such as `MSGate(phi0=0.1, phi1=0.2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GateExpr {
    pub name: String,
    pub params: Vec<(String, f64)>,
}
