//! Error types raised by gas computation.

use thiserror::Error;

/// Errors the gas meter reports to the execution engine.
///
/// Any overflow in cost or memory-size arithmetic is folded into
/// [`GasError::OutOfGas`]: a quantity that cannot be represented in 64 bits
/// can never be paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GasError {
    /// Cost or memory-size arithmetic overflowed, or a pricing rule found
    /// insufficient resources.
    #[error("out of gas")]
    OutOfGas,
    /// The operand stack holds fewer items than the instruction consumes.
    #[error("stack underflow")]
    StackUnderflow,
}
