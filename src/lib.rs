//! Native gate set for trapped-ion hardware.
//!
//! The crate provides the three native gates ([`GpiGate`], [`Gpi2Gate`],
//! [`MsGate`]), their unitaries, diagram labels and serialized forms, plus a
//! small circuit layer and parser that consume them.
//!
//! ```
//! use ionq_native::{Gate, GpiGate};
//!
//! let gate = GpiGate::new(0.25);
//! assert_eq!(gate.to_string(), "GPI");
//! assert_eq!(gate.repr(), "GPIGate(phi=0.25)");
//! assert_eq!(gate.num_qubits(), 1);
//! ```

pub mod backend;
pub mod error;
pub mod ir;
pub mod parser;

pub use backend::Backend;
pub use error::{NativeError, ParseError, Result};
pub use ir::{
    Circuit, DiagramArgs, DiagramInfo, Gate, Gpi2Gate, GpiGate, MsGate, NativeGate, Operation,
    GPI, GPI2, MS,
};
pub use parser::{parse_gate, parse_program};
