//! Pre-execution gas and memory metering.
//!
//! For each instruction, [`compute`] derives the exact gas cost and the new
//! memory high-water mark from the current stack, the world state and the
//! chain's pricing era, before the execution stage touches anything. All
//! arithmetic is overflow-checked; an unrepresentable cost is
//! [`GasError::OutOfGas`].
//!
//! The meter is stateless. Its only side effects are the refund
//! accumulator in the world and the rewrite of a sub-call's requested-gas
//! stack slot with the 63/64-capped forwarded amount.

use crate::types::address::Address;
use crate::virtual_machine::errors::GasError;
use crate::virtual_machine::isa::OpCode;
use crate::virtual_machine::math;
use crate::virtual_machine::program::Instruction;
use crate::virtual_machine::stack::Stack;
use crate::virtual_machine::state::{ChainParams, WorldState};
use primitive_types::U256;

/// Gas per byte of `EXP` exponent.
pub const EXP_BYTE_GAS: u64 = 10;
/// Gas per 32-byte word hashed by `SHA3`.
pub const KECCAK_WORD_GAS: u64 = 6;
/// Gas per 32-byte word moved by the copy opcodes.
pub const COPY_GAS: u64 = 3;
/// Base gas of a `LOG` opcode.
pub const LOG_GAS: u64 = 375;
/// Gas per `LOG` topic.
pub const LOG_TOPIC_GAS: u64 = 375;
/// Gas per byte of `LOG` data.
pub const LOG_DATA_GAS: u64 = 8;
/// `SSTORE` of a non-zero value into a zero slot.
pub const SSTORE_SET_GAS: u64 = 20_000;
/// `SSTORE` of zero into a non-zero slot.
pub const SSTORE_CLEAR_GAS: u64 = 5_000;
/// `SSTORE` between non-zero values.
pub const SSTORE_RESET_GAS: u64 = 5_000;
/// Refund for clearing a storage slot.
pub const SSTORE_REFUND_GAS: u64 = 15_000;
/// Refund for the first destruction of a contract.
pub const SUICIDE_REFUND_GAS: u64 = 24_000;
/// Surcharge for a call that transfers value.
pub const CALL_VALUE_TRANSFER_GAS: u64 = 9_000;
/// Surcharge for a call that brings an account into existence.
pub const CALL_NEW_ACCOUNT_GAS: u64 = 25_000;
/// Linear gas per 32-byte memory word.
pub const MEMORY_GAS: u64 = 3;
/// Divisor of the quadratic memory cost term.
pub const QUAD_COEFF_DIV: u64 = 512;

/// Execution context the meter needs from its caller: whose storage and
/// balance the storage opcodes touch, how much gas the frame still holds,
/// and which block's pricing applies.
#[derive(Debug, Clone, Copy)]
pub struct ExecContext {
    /// Address of the executing contract.
    pub address: Address,
    /// Gas remaining in the frame before this instruction.
    pub gas_available: u64,
    /// Block height, used to select the gas table and account rules.
    pub block_number: u64,
}

/// Computes the gas cost of `instr` and the memory size it requires.
///
/// `mem_size` is the current memory high-water mark in bytes (a multiple of
/// 32); the returned size is the new mark, again rounded to 32 bytes. The
/// memory itself is not resized and no gas is deducted; the execution
/// stage owns both.
pub fn compute<W: WorldState, P: ChainParams>(
    instr: &Instruction,
    world: &mut W,
    params: &P,
    ctx: &ExecContext,
    mem_size: u64,
    stack: &mut Stack,
) -> Result<(u64, u64), GasError> {
    stack.require(instr.pops as usize)?;
    let mut gas = instr.base_gas;
    let mut required_mem = 0u64;

    let op = match instr.op {
        Some(op) => op,
        // Invalid instructions trap at the execution stage; nothing to
        // price here.
        None => return Ok((mem_size, gas)),
    };

    match op {
        OpCode::Suicide => {
            let table = params.gas_table(ctx.block_number);
            // A non-zero CreateBySuicide marks the repriced era, where
            // SUICIDE itself costs gas and may pay for a fresh account.
            if table.create_by_suicide > 0 {
                gas = math::add(gas, table.suicide)?;
                let beneficiary = Address::from_word(stack.back(0));
                if params.empty_account_rule(ctx.block_number) {
                    let sends_balance = !world.balance(&ctx.address).is_zero();
                    if world.is_empty(&beneficiary) && sends_balance {
                        gas = math::add(gas, table.create_by_suicide)?;
                    }
                } else if !world.exists(&beneficiary) {
                    gas = math::add(gas, table.create_by_suicide)?;
                }
            }
            if !world.has_suicided(&ctx.address) {
                world.add_refund(SUICIDE_REFUND_GAS);
            }
        }
        OpCode::ExtCodeSize => gas = params.gas_table(ctx.block_number).ext_code_size,
        OpCode::Balance => gas = params.gas_table(ctx.block_number).balance,
        OpCode::Sload => gas = params.gas_table(ctx.block_number).sload,
        OpCode::Sstore => {
            stack.require(2)?;
            let key = *stack.back(0);
            let value = *stack.back(1);
            let prior = world.storage(&ctx.address, &key);
            // Three transitions price differently: setting a fresh slot,
            // clearing a live one (refunded), and changing in place.
            if prior.is_zero() && !value.is_zero() {
                gas = SSTORE_SET_GAS;
            } else if !prior.is_zero() && value.is_zero() {
                world.add_refund(SSTORE_REFUND_GAS);
                gas = SSTORE_CLEAR_GAS;
            } else {
                gas = SSTORE_RESET_GAS;
            }
        }
        OpCode::Exp => {
            let exponent_bytes = (stack.back(1).bits() as u64 + 7) / 8;
            let byte_gas = math::mul(exponent_bytes, EXP_BYTE_GAS)?;
            gas = math::add(gas, byte_gas)?;
        }
        OpCode::Mload | OpCode::Mstore => {
            required_mem = math::calc_mem_size(stack.back(0), &U256::from(32u64))?;
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;
        }
        OpCode::Mstore8 => {
            required_mem = math::calc_mem_size(stack.back(0), &U256::from(1u64))?;
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;
        }
        OpCode::Return => {
            required_mem = math::calc_mem_size(stack.back(0), stack.back(1))?;
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;
        }
        OpCode::Sha3 => {
            required_mem = math::calc_mem_size(stack.back(0), stack.back(1))?;
            let words = math::word_ceil(math::to_u64(stack.back(1))?)?;
            gas = math::add(gas, math::mul(words, KECCAK_WORD_GAS)?)?;
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;
        }
        OpCode::CalldataCopy | OpCode::CodeCopy => {
            required_mem = math::calc_mem_size(stack.back(0), stack.back(2))?;
            let words = math::word_ceil(math::to_u64(stack.back(2))?)?;
            gas = math::add(gas, math::mul(words, COPY_GAS)?)?;
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;
        }
        OpCode::ExtCodeCopy => {
            required_mem = math::calc_mem_size(stack.back(1), stack.back(3))?;
            let words = math::word_ceil(math::to_u64(stack.back(3))?)?;
            gas = math::add(gas, math::mul(words, COPY_GAS)?)?;
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;
        }
        OpCode::Create => {
            required_mem = math::calc_mem_size(stack.back(1), stack.back(2))?;
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;
        }
        OpCode::Call | OpCode::CallCode => {
            gas = params.gas_table(ctx.block_number).calls;

            let transfers_value = !stack.back(2).is_zero();
            if op == OpCode::Call {
                let callee = Address::from_word(stack.back(1));
                if params.empty_account_rule(ctx.block_number) {
                    if world.is_empty(&callee) && transfers_value {
                        gas = math::add(gas, CALL_NEW_ACCOUNT_GAS)?;
                    }
                } else if !world.exists(&callee) {
                    gas = math::add(gas, CALL_NEW_ACCOUNT_GAS)?;
                }
            }
            if transfers_value {
                gas = math::add(gas, CALL_VALUE_TRANSFER_GAS)?;
            }

            let input = math::calc_mem_size(stack.back(3), stack.back(4))?;
            let output = math::calc_mem_size(stack.back(5), stack.back(6))?;
            required_mem = input.max(output);
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;

            let forwarded = forwarded_gas(ctx.gas_available, gas, stack.back(0))?;
            // Rewrite the requested-gas slot so the execution stage sees
            // the final forwarded amount; the original request is lost
            // once the frame's available gas changes.
            stack.set_back(0, U256::from(forwarded));
            gas = math::add(gas, forwarded)?;
        }
        OpCode::DelegateCall => {
            gas = params.gas_table(ctx.block_number).calls;

            let input = math::calc_mem_size(stack.back(2), stack.back(3))?;
            let output = math::calc_mem_size(stack.back(4), stack.back(5))?;
            required_mem = input.max(output);
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;

            let forwarded = forwarded_gas(ctx.gas_available, gas, stack.back(0))?;
            stack.set_back(0, U256::from(forwarded));
            gas = math::add(gas, forwarded)?;
        }
        op if op.log_topics().is_some() => {
            let topics = op.log_topics().unwrap_or(0);
            stack.require(topics as usize + 2)?;

            let length = *stack.back(1);
            let data_gas = math::mul(math::to_u64(&length)?, LOG_DATA_GAS)?;
            gas = math::add(gas, LOG_GAS)?;
            gas = math::add(gas, math::mul(topics, LOG_TOPIC_GAS)?)?;
            gas = math::add(gas, data_gas)?;

            required_mem = math::calc_mem_size(stack.back(0), &length)?;
            gas = math::add(gas, memory_gas(mem_size, required_mem)?)?;
        }
        op if op.dup_index().is_some() => {
            stack.require(op.dup_index().unwrap_or(0) as usize)?;
        }
        op if op.swap_index().is_some() => {
            stack.require(op.swap_index().unwrap_or(0) as usize)?;
        }
        // Everything else is base gas only.
        _ => {}
    }

    Ok((required_mem.max(mem_size), gas))
}

/// Charge for growing memory from `current` to `required` bytes (both
/// 32-byte aligned): linear per added word plus a quadratic term.
fn memory_gas(current: u64, required: u64) -> Result<u64, GasError> {
    if required <= current {
        return Ok(0);
    }
    let new_words = required / 32;
    let cur_words = current / 32;
    let linear = math::mul(MEMORY_GAS, new_words - cur_words)?;
    // cur_words² cannot overflow when new_words² does not.
    let quad = (math::mul(new_words, new_words)? - cur_words * cur_words) / QUAD_COEFF_DIV;
    math::add(linear, quad)
}

/// Gas forwarded to a sub-call: the requested amount, capped at all but a
/// 64th of what remains after the call's own cost.
fn forwarded_gas(available: u64, consumed: u64, requested: &U256) -> Result<u64, GasError> {
    let remaining = available.saturating_sub(consumed);
    let cap = remaining - remaining / 64;
    if *requested > U256::from(cap) {
        Ok(cap)
    } else {
        math::to_u64(requested)
    }
}
