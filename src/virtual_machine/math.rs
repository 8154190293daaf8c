//! Overflow-checked gas arithmetic.
//!
//! Every addition and multiplication on the gas-computation path goes
//! through these helpers; an unrepresentable quantity is an out-of-gas
//! condition, never a wrapped value.

use crate::virtual_machine::errors::GasError;
use primitive_types::U256;

/// Checked addition.
pub fn add(a: u64, b: u64) -> Result<u64, GasError> {
    a.checked_add(b).ok_or(GasError::OutOfGas)
}

/// Checked multiplication.
pub fn mul(a: u64, b: u64) -> Result<u64, GasError> {
    a.checked_mul(b).ok_or(GasError::OutOfGas)
}

/// Number of 32-byte words needed to hold `n` bytes.
pub fn word_ceil(n: u64) -> Result<u64, GasError> {
    Ok(add(n, 31)? / 32)
}

/// Narrows a 256-bit stack item to `u64`, out-of-gas when it does not fit.
pub fn to_u64(word: &U256) -> Result<u64, GasError> {
    if word.bits() > 64 {
        return Err(GasError::OutOfGas);
    }
    Ok(word.as_u64())
}

/// Size in bytes of the memory region at `offset` spanning `length` bytes,
/// rounded up to a 32-byte word.
///
/// A zero-length region needs no memory, whatever the offset. Either operand
/// exceeding 64 bits, or the rounded sum overflowing, is out of gas.
pub fn calc_mem_size(offset: &U256, length: &U256) -> Result<u64, GasError> {
    if length.is_zero() {
        return Ok(0);
    }
    let end = add(to_u64(offset)?, to_u64(length)?)?;
    mul(word_ceil(end)?, 32)
}
