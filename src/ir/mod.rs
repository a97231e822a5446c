pub mod circuit;
pub mod diagram;
pub mod gates;
pub mod matrix;
pub mod operations;
pub(crate) mod phase;

// Re-export for easier access
pub use circuit::Circuit;
pub use diagram::{DiagramArgs, DiagramInfo};
pub use gates::{Gate, Gpi2Gate, GpiGate, MsGate, NativeGate, GPI, GPI2, MS};
pub use operations::Operation;
