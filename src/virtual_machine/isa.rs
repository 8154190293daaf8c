//! Instruction Set Architecture (ISA) definitions.
//!
//! Defines the stack machine's opcode set. The
//! [`for_each_opcode!`](crate::for_each_opcode) macro holds the canonical
//! opcode table (byte value, mnemonic, base gas, stack pops and pushes)
//! and invokes a callback macro for code generation, so the decoder and the
//! gas meter share a single definition.
//!
//! This module generates:
//! - The [`OpCode`] enum with byte mappings
//! - [`OpCode::from_byte`] for decoding
//! - [`OpCode::mnemonic`] and [`OpCode::cost`]
//!
//! `PUSH1`–`PUSH32` all carry the `PUSH1` cost row, and `DUP`/`SWAP`
//! variants the `DUP1`/`SWAP1` rows; variant-depth stack checks happen at
//! the gas stage. Bytes with no row decode to invalid instructions with the
//! [`OpCost::INVALID`] fallback so the program counter map stays dense.

/// Base cost row for an opcode: gas charged before any dynamic pricing,
/// and the stack items consumed and produced.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OpCost {
    pub gas: u64,
    pub pops: u32,
    pub pushes: u32,
}

impl OpCost {
    /// Fallback row for unknown code bytes: decoded but not executable.
    pub const INVALID: OpCost = OpCost {
        gas: 0,
        pops: 0,
        pushes: 0,
    };
}

/// Cheapest tier: context reads that copy a live value.
pub const GAS_QUICK_STEP: u64 = 2;
/// Tier for single ALU operations and stack shuffling.
pub const GAS_FASTEST_STEP: u64 = 3;
/// Tier for multiplication and division.
pub const GAS_FAST_STEP: u64 = 5;
/// Tier for modular arithmetic and unconditional jumps.
pub const GAS_MID_STEP: u64 = 8;
/// Tier for conditional jumps and exponentiation base cost.
pub const GAS_SLOW_STEP: u64 = 10;
/// Tier for external account reads.
pub const GAS_EXT_STEP: u64 = 20;

/// Base cost of a jump destination marker.
pub const GAS_JUMPDEST: u64 = 1;
/// Static base for `SLOAD` (pricing-era tables may replace it).
pub const GAS_SLOAD_BASE: u64 = 50;
/// Static base for `BALANCE` (pricing-era tables may replace it).
pub const GAS_BALANCE_BASE: u64 = 20;
/// Static base for `EXTCODESIZE` (pricing-era tables may replace it).
pub const GAS_EXTCODE_BASE: u64 = 20;
/// Static base for `CALL`-family opcodes (pricing-era tables may replace it).
pub const GAS_CALL_BASE: u64 = 40;
/// Base cost of a `SHA3` hash, before per-word pricing.
pub const GAS_SHA3_BASE: u64 = 30;
/// Base cost of spawning a contract.
pub const GAS_CREATE: u64 = 32_000;

/// Invokes a callback macro with the complete opcode table.
///
/// Row format: `Name = byte, "MNEMONIC", base_gas, pops, pushes`.
#[macro_export]
macro_rules! for_each_opcode {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Halt and arithmetic
            // =========================
            /// STOP ; halts execution
            Stop = 0x00, "STOP", G_ZERO, 0, 0,
            /// ADD ; a + b
            Add = 0x01, "ADD", GAS_FASTEST_STEP, 2, 1,
            /// MUL ; a * b
            Mul = 0x02, "MUL", GAS_FAST_STEP, 2, 1,
            /// SUB ; a - b
            Sub = 0x03, "SUB", GAS_FASTEST_STEP, 2, 1,
            /// DIV ; a / b, unsigned
            Div = 0x04, "DIV", GAS_FAST_STEP, 2, 1,
            /// SDIV ; a / b, signed
            Sdiv = 0x05, "SDIV", GAS_FAST_STEP, 2, 1,
            /// MOD ; a % b, unsigned
            Mod = 0x06, "MOD", GAS_FAST_STEP, 2, 1,
            /// SMOD ; a % b, signed
            Smod = 0x07, "SMOD", GAS_FAST_STEP, 2, 1,
            /// ADDMOD ; (a + b) % m
            Addmod = 0x08, "ADDMOD", GAS_MID_STEP, 3, 1,
            /// MULMOD ; (a * b) % m
            Mulmod = 0x09, "MULMOD", GAS_MID_STEP, 3, 1,
            /// EXP ; a ** b, per-byte priced at the gas stage
            Exp = 0x0a, "EXP", GAS_SLOW_STEP, 2, 1,
            /// SIGNEXTEND ; extend the sign of a b-byte value
            Signextend = 0x0b, "SIGNEXTEND", GAS_FAST_STEP, 2, 1,
            // =========================
            // Comparison and bitwise
            // =========================
            /// LT ; a < b, unsigned
            Lt = 0x10, "LT", GAS_FASTEST_STEP, 2, 1,
            /// GT ; a > b, unsigned
            Gt = 0x11, "GT", GAS_FASTEST_STEP, 2, 1,
            /// SLT ; a < b, signed
            Slt = 0x12, "SLT", GAS_FASTEST_STEP, 2, 1,
            /// SGT ; a > b, signed
            Sgt = 0x13, "SGT", GAS_FASTEST_STEP, 2, 1,
            /// EQ ; a == b
            Eq = 0x14, "EQ", GAS_FASTEST_STEP, 2, 1,
            /// ISZERO ; a == 0
            Iszero = 0x15, "ISZERO", GAS_FASTEST_STEP, 1, 1,
            /// AND ; a & b
            And = 0x16, "AND", GAS_FASTEST_STEP, 2, 1,
            /// OR ; a | b
            Or = 0x17, "OR", GAS_FASTEST_STEP, 2, 1,
            /// XOR ; a ^ b
            Xor = 0x18, "XOR", GAS_FASTEST_STEP, 2, 1,
            /// NOT ; !a
            Not = 0x19, "NOT", GAS_FASTEST_STEP, 1, 1,
            /// BYTE ; byte i of a
            Byte = 0x1a, "BYTE", GAS_FASTEST_STEP, 2, 1,
            // =========================
            // Hashing
            // =========================
            /// SHA3 ; hash of a memory region, per-word priced at the gas stage
            Sha3 = 0x20, "SHA3", GAS_SHA3_BASE, 2, 1,
            // =========================
            // Environment
            // =========================
            /// ADDRESS ; executing account
            Address = 0x30, "ADDRESS", GAS_QUICK_STEP, 0, 1,
            /// BALANCE ; balance of an account
            Balance = 0x31, "BALANCE", GAS_BALANCE_BASE, 1, 1,
            /// ORIGIN ; transaction originator
            Origin = 0x32, "ORIGIN", GAS_QUICK_STEP, 0, 1,
            /// CALLER ; direct caller
            Caller = 0x33, "CALLER", GAS_QUICK_STEP, 0, 1,
            /// CALLVALUE ; value sent with the call
            CallValue = 0x34, "CALLVALUE", GAS_QUICK_STEP, 0, 1,
            /// CALLDATALOAD ; word of call input
            CalldataLoad = 0x35, "CALLDATALOAD", GAS_FASTEST_STEP, 1, 1,
            /// CALLDATASIZE ; size of call input
            CalldataSize = 0x36, "CALLDATASIZE", GAS_QUICK_STEP, 0, 1,
            /// CALLDATACOPY ; copy call input to memory
            CalldataCopy = 0x37, "CALLDATACOPY", GAS_FASTEST_STEP, 3, 0,
            /// CODESIZE ; size of own code
            CodeSize = 0x38, "CODESIZE", GAS_QUICK_STEP, 0, 1,
            /// CODECOPY ; copy own code to memory
            CodeCopy = 0x39, "CODECOPY", GAS_FASTEST_STEP, 3, 0,
            /// GASPRICE ; gas price of the transaction
            GasPrice = 0x3a, "GASPRICE", GAS_QUICK_STEP, 0, 1,
            /// EXTCODESIZE ; code size of an account
            ExtCodeSize = 0x3b, "EXTCODESIZE", GAS_EXTCODE_BASE, 1, 1,
            /// EXTCODECOPY ; copy an account's code to memory
            ExtCodeCopy = 0x3c, "EXTCODECOPY", GAS_EXT_STEP, 4, 0,
            // =========================
            // Block context
            // =========================
            /// BLOCKHASH ; hash of a recent block
            BlockHash = 0x40, "BLOCKHASH", GAS_EXT_STEP, 1, 1,
            /// COINBASE ; block beneficiary
            Coinbase = 0x41, "COINBASE", GAS_QUICK_STEP, 0, 1,
            /// TIMESTAMP ; block timestamp
            Timestamp = 0x42, "TIMESTAMP", GAS_QUICK_STEP, 0, 1,
            /// NUMBER ; block number
            Number = 0x43, "NUMBER", GAS_QUICK_STEP, 0, 1,
            /// DIFFICULTY ; block difficulty
            Difficulty = 0x44, "DIFFICULTY", GAS_QUICK_STEP, 0, 1,
            /// GASLIMIT ; block gas limit
            GasLimit = 0x45, "GASLIMIT", GAS_QUICK_STEP, 0, 1,
            // =========================
            // Memory, storage and flow
            // =========================
            /// POP ; discard the top item
            Pop = 0x50, "POP", GAS_QUICK_STEP, 1, 0,
            /// MLOAD ; load a word from memory
            Mload = 0x51, "MLOAD", GAS_FASTEST_STEP, 1, 1,
            /// MSTORE ; store a word to memory
            Mstore = 0x52, "MSTORE", GAS_FASTEST_STEP, 2, 0,
            /// MSTORE8 ; store a byte to memory
            Mstore8 = 0x53, "MSTORE8", GAS_FASTEST_STEP, 2, 0,
            /// SLOAD ; load a storage slot
            Sload = 0x54, "SLOAD", GAS_SLOAD_BASE, 1, 1,
            /// SSTORE ; write a storage slot, priced by state transition
            Sstore = 0x55, "SSTORE", G_ZERO, 2, 0,
            /// JUMP ; unconditional jump
            Jump = 0x56, "JUMP", GAS_MID_STEP, 1, 0,
            /// JUMPI ; conditional jump
            Jumpi = 0x57, "JUMPI", GAS_SLOW_STEP, 2, 0,
            /// PC ; current program counter
            Pc = 0x58, "PC", GAS_QUICK_STEP, 0, 1,
            /// MSIZE ; active memory size
            Msize = 0x59, "MSIZE", GAS_QUICK_STEP, 0, 1,
            /// GAS ; remaining gas
            Gas = 0x5a, "GAS", GAS_QUICK_STEP, 0, 1,
            /// JUMPDEST ; legal jump target marker
            JumpDest = 0x5b, "JUMPDEST", GAS_JUMPDEST, 0, 0,
            // =========================
            // Pushes (immediate follows in code)
            // =========================
            /// PUSH1 ; push a 1-byte immediate
            Push1 = 0x60, "PUSH1", GAS_FASTEST_STEP, 0, 1,
            Push2 = 0x61, "PUSH2", GAS_FASTEST_STEP, 0, 1,
            Push3 = 0x62, "PUSH3", GAS_FASTEST_STEP, 0, 1,
            Push4 = 0x63, "PUSH4", GAS_FASTEST_STEP, 0, 1,
            Push5 = 0x64, "PUSH5", GAS_FASTEST_STEP, 0, 1,
            Push6 = 0x65, "PUSH6", GAS_FASTEST_STEP, 0, 1,
            Push7 = 0x66, "PUSH7", GAS_FASTEST_STEP, 0, 1,
            Push8 = 0x67, "PUSH8", GAS_FASTEST_STEP, 0, 1,
            Push9 = 0x68, "PUSH9", GAS_FASTEST_STEP, 0, 1,
            Push10 = 0x69, "PUSH10", GAS_FASTEST_STEP, 0, 1,
            Push11 = 0x6a, "PUSH11", GAS_FASTEST_STEP, 0, 1,
            Push12 = 0x6b, "PUSH12", GAS_FASTEST_STEP, 0, 1,
            Push13 = 0x6c, "PUSH13", GAS_FASTEST_STEP, 0, 1,
            Push14 = 0x6d, "PUSH14", GAS_FASTEST_STEP, 0, 1,
            Push15 = 0x6e, "PUSH15", GAS_FASTEST_STEP, 0, 1,
            Push16 = 0x6f, "PUSH16", GAS_FASTEST_STEP, 0, 1,
            Push17 = 0x70, "PUSH17", GAS_FASTEST_STEP, 0, 1,
            Push18 = 0x71, "PUSH18", GAS_FASTEST_STEP, 0, 1,
            Push19 = 0x72, "PUSH19", GAS_FASTEST_STEP, 0, 1,
            Push20 = 0x73, "PUSH20", GAS_FASTEST_STEP, 0, 1,
            Push21 = 0x74, "PUSH21", GAS_FASTEST_STEP, 0, 1,
            Push22 = 0x75, "PUSH22", GAS_FASTEST_STEP, 0, 1,
            Push23 = 0x76, "PUSH23", GAS_FASTEST_STEP, 0, 1,
            Push24 = 0x77, "PUSH24", GAS_FASTEST_STEP, 0, 1,
            Push25 = 0x78, "PUSH25", GAS_FASTEST_STEP, 0, 1,
            Push26 = 0x79, "PUSH26", GAS_FASTEST_STEP, 0, 1,
            Push27 = 0x7a, "PUSH27", GAS_FASTEST_STEP, 0, 1,
            Push28 = 0x7b, "PUSH28", GAS_FASTEST_STEP, 0, 1,
            Push29 = 0x7c, "PUSH29", GAS_FASTEST_STEP, 0, 1,
            Push30 = 0x7d, "PUSH30", GAS_FASTEST_STEP, 0, 1,
            Push31 = 0x7e, "PUSH31", GAS_FASTEST_STEP, 0, 1,
            /// PUSH32 ; push a full-word immediate
            Push32 = 0x7f, "PUSH32", GAS_FASTEST_STEP, 0, 1,
            // =========================
            // Stack duplication and swaps
            // =========================
            /// DUP1 ; duplicate the n-th item (depth checked at the gas stage)
            Dup1 = 0x80, "DUP1", GAS_FASTEST_STEP, 1, 2,
            Dup2 = 0x81, "DUP2", GAS_FASTEST_STEP, 1, 2,
            Dup3 = 0x82, "DUP3", GAS_FASTEST_STEP, 1, 2,
            Dup4 = 0x83, "DUP4", GAS_FASTEST_STEP, 1, 2,
            Dup5 = 0x84, "DUP5", GAS_FASTEST_STEP, 1, 2,
            Dup6 = 0x85, "DUP6", GAS_FASTEST_STEP, 1, 2,
            Dup7 = 0x86, "DUP7", GAS_FASTEST_STEP, 1, 2,
            Dup8 = 0x87, "DUP8", GAS_FASTEST_STEP, 1, 2,
            Dup9 = 0x88, "DUP9", GAS_FASTEST_STEP, 1, 2,
            Dup10 = 0x89, "DUP10", GAS_FASTEST_STEP, 1, 2,
            Dup11 = 0x8a, "DUP11", GAS_FASTEST_STEP, 1, 2,
            Dup12 = 0x8b, "DUP12", GAS_FASTEST_STEP, 1, 2,
            Dup13 = 0x8c, "DUP13", GAS_FASTEST_STEP, 1, 2,
            Dup14 = 0x8d, "DUP14", GAS_FASTEST_STEP, 1, 2,
            Dup15 = 0x8e, "DUP15", GAS_FASTEST_STEP, 1, 2,
            Dup16 = 0x8f, "DUP16", GAS_FASTEST_STEP, 1, 2,
            /// SWAP1 ; swap the top with the n+1-th item
            Swap1 = 0x90, "SWAP1", GAS_FASTEST_STEP, 2, 2,
            Swap2 = 0x91, "SWAP2", GAS_FASTEST_STEP, 2, 2,
            Swap3 = 0x92, "SWAP3", GAS_FASTEST_STEP, 2, 2,
            Swap4 = 0x93, "SWAP4", GAS_FASTEST_STEP, 2, 2,
            Swap5 = 0x94, "SWAP5", GAS_FASTEST_STEP, 2, 2,
            Swap6 = 0x95, "SWAP6", GAS_FASTEST_STEP, 2, 2,
            Swap7 = 0x96, "SWAP7", GAS_FASTEST_STEP, 2, 2,
            Swap8 = 0x97, "SWAP8", GAS_FASTEST_STEP, 2, 2,
            Swap9 = 0x98, "SWAP9", GAS_FASTEST_STEP, 2, 2,
            Swap10 = 0x99, "SWAP10", GAS_FASTEST_STEP, 2, 2,
            Swap11 = 0x9a, "SWAP11", GAS_FASTEST_STEP, 2, 2,
            Swap12 = 0x9b, "SWAP12", GAS_FASTEST_STEP, 2, 2,
            Swap13 = 0x9c, "SWAP13", GAS_FASTEST_STEP, 2, 2,
            Swap14 = 0x9d, "SWAP14", GAS_FASTEST_STEP, 2, 2,
            Swap15 = 0x9e, "SWAP15", GAS_FASTEST_STEP, 2, 2,
            Swap16 = 0x9f, "SWAP16", GAS_FASTEST_STEP, 2, 2,
            // =========================
            // Logging
            // =========================
            /// LOG0 ; emit an event with no topics
            Log0 = 0xa0, "LOG0", G_ZERO, 2, 0,
            Log1 = 0xa1, "LOG1", G_ZERO, 3, 0,
            Log2 = 0xa2, "LOG2", G_ZERO, 4, 0,
            Log3 = 0xa3, "LOG3", G_ZERO, 5, 0,
            /// LOG4 ; emit an event with four topics
            Log4 = 0xa4, "LOG4", G_ZERO, 6, 0,
            // =========================
            // System calls
            // =========================
            /// CREATE ; spawn a contract from an init-code region
            Create = 0xf0, "CREATE", GAS_CREATE, 3, 1,
            /// CALL ; message-call an account
            Call = 0xf1, "CALL", GAS_CALL_BASE, 7, 1,
            /// CALLCODE ; call with the callee's code, own storage
            CallCode = 0xf2, "CALLCODE", GAS_CALL_BASE, 7, 1,
            /// RETURN ; halt and return a memory region
            Return = 0xf3, "RETURN", G_ZERO, 2, 0,
            /// DELEGATECALL ; call preserving caller and value
            DelegateCall = 0xf4, "DELEGATECALL", GAS_CALL_BASE, 6, 1,
            /// SUICIDE ; halt and schedule account destruction
            Suicide = 0xff, "SUICIDE", G_ZERO, 1, 0,
        }
    };
}

const G_ZERO: u64 = 0;

#[macro_export]
macro_rules! define_opcodes {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $byte:literal, $mnemonic:literal, $gas:expr, $pops:expr, $pushes:expr
        ),* $(,)?
    ) => {
        /// An opcode of the stack machine.
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        #[repr(u8)]
        pub enum OpCode {
            $(
                $(#[$doc])*
                $name = $byte,
            )*
        }

        impl OpCode {
            /// Decodes a code byte, returning `None` for bytes with no row.
            pub const fn from_byte(byte: u8) -> Option<OpCode> {
                match byte {
                    $( $byte => Some(OpCode::$name), )*
                    _ => None,
                }
            }

            /// Returns the mnemonic for this opcode.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( OpCode::$name => $mnemonic, )*
                }
            }

            /// Returns the base cost row for this opcode.
            pub const fn cost(&self) -> OpCost {
                match self {
                    $( OpCode::$name => OpCost { gas: $gas, pops: $pops, pushes: $pushes }, )*
                }
            }
        }
    };
}

for_each_opcode!(define_opcodes);

impl OpCode {
    /// Returns the number of immediate bytes a push opcode consumes,
    /// `None` for non-push opcodes.
    pub const fn push_bytes(self) -> Option<u64> {
        let byte = self as u8;
        if byte >= OpCode::Push1 as u8 && byte <= OpCode::Push32 as u8 {
            Some((byte - OpCode::Push1 as u8) as u64 + 1)
        } else {
            None
        }
    }

    /// Returns the duplication depth (1–16) for `DUP` opcodes.
    pub const fn dup_index(self) -> Option<u64> {
        let byte = self as u8;
        if byte >= OpCode::Dup1 as u8 && byte <= OpCode::Dup16 as u8 {
            Some((byte - OpCode::Dup1 as u8) as u64 + 1)
        } else {
            None
        }
    }

    /// Returns the swap reach (2–17, items touched) for `SWAP` opcodes.
    pub const fn swap_index(self) -> Option<u64> {
        let byte = self as u8;
        if byte >= OpCode::Swap1 as u8 && byte <= OpCode::Swap16 as u8 {
            Some((byte - OpCode::Swap1 as u8) as u64 + 2)
        } else {
            None
        }
    }

    /// Returns the topic count (0–4) for `LOG` opcodes.
    pub const fn log_topics(self) -> Option<u64> {
        let byte = self as u8;
        if byte >= OpCode::Log0 as u8 && byte <= OpCode::Log4 as u8 {
            Some((byte - OpCode::Log0 as u8) as u64)
        } else {
            None
        }
    }

    /// Returns true for opcodes that terminate execution.
    pub const fn is_terminator(self) -> bool {
        matches!(self, OpCode::Return | OpCode::Suicide | OpCode::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_byte_roundtrip() {
        for byte in 0u16..=255 {
            if let Some(op) = OpCode::from_byte(byte as u8) {
                assert_eq!(op as u8, byte as u8);
            }
        }
    }

    #[test]
    fn from_byte_rejects_gaps() {
        assert_eq!(OpCode::from_byte(0x0c), None);
        assert_eq!(OpCode::from_byte(0x1b), None);
        assert_eq!(OpCode::from_byte(0x21), None);
        assert_eq!(OpCode::from_byte(0xa5), None);
        assert_eq!(OpCode::from_byte(0xfe), None);
    }

    #[test]
    fn opcode_bytes_unchanged() {
        assert_eq!(OpCode::Stop as u8, 0x00);
        assert_eq!(OpCode::Add as u8, 0x01);
        assert_eq!(OpCode::Exp as u8, 0x0a);
        assert_eq!(OpCode::Sha3 as u8, 0x20);
        assert_eq!(OpCode::Balance as u8, 0x31);
        assert_eq!(OpCode::ExtCodeCopy as u8, 0x3c);
        assert_eq!(OpCode::Sstore as u8, 0x55);
        assert_eq!(OpCode::JumpDest as u8, 0x5b);
        assert_eq!(OpCode::Push1 as u8, 0x60);
        assert_eq!(OpCode::Push32 as u8, 0x7f);
        assert_eq!(OpCode::Dup1 as u8, 0x80);
        assert_eq!(OpCode::Swap16 as u8, 0x9f);
        assert_eq!(OpCode::Log4 as u8, 0xa4);
        assert_eq!(OpCode::Create as u8, 0xf0);
        assert_eq!(OpCode::DelegateCall as u8, 0xf4);
        assert_eq!(OpCode::Suicide as u8, 0xff);
    }

    #[test]
    fn push_variants_share_the_push1_row() {
        let row = OpCode::Push1.cost();
        for byte in OpCode::Push1 as u8..=OpCode::Push32 as u8 {
            let op = OpCode::from_byte(byte).unwrap();
            assert_eq!(op.cost(), row);
        }
        assert_eq!(OpCode::Push1.push_bytes(), Some(1));
        assert_eq!(OpCode::Push32.push_bytes(), Some(32));
        assert_eq!(OpCode::Add.push_bytes(), None);
    }

    #[test]
    fn dup_and_swap_share_their_first_row() {
        for byte in OpCode::Dup1 as u8..=OpCode::Dup16 as u8 {
            assert_eq!(OpCode::from_byte(byte).unwrap().cost(), OpCode::Dup1.cost());
        }
        for byte in OpCode::Swap1 as u8..=OpCode::Swap16 as u8 {
            assert_eq!(OpCode::from_byte(byte).unwrap().cost(), OpCode::Swap1.cost());
        }
        assert_eq!(OpCode::Dup16.dup_index(), Some(16));
        assert_eq!(OpCode::Swap1.swap_index(), Some(2));
        assert_eq!(OpCode::Swap16.swap_index(), Some(17));
    }

    #[test]
    fn log_topic_counts() {
        assert_eq!(OpCode::Log0.log_topics(), Some(0));
        assert_eq!(OpCode::Log4.log_topics(), Some(4));
        assert_eq!(OpCode::Sha3.log_topics(), None);
        assert_eq!(OpCode::Log2.cost().pops, 4);
    }

    #[test]
    fn terminators() {
        assert!(OpCode::Stop.is_terminator());
        assert!(OpCode::Return.is_terminator());
        assert!(OpCode::Suicide.is_terminator());
        assert!(!OpCode::Jump.is_terminator());
        assert!(!OpCode::Call.is_terminator());
    }

    #[test]
    fn mnemonics() {
        assert_eq!(OpCode::Stop.mnemonic(), "STOP");
        assert_eq!(OpCode::Push7.mnemonic(), "PUSH7");
        assert_eq!(OpCode::DelegateCall.mnemonic(), "DELEGATECALL");
    }

    #[test]
    fn base_rows() {
        assert_eq!(OpCode::Add.cost(), OpCost { gas: 3, pops: 2, pushes: 1 });
        assert_eq!(OpCode::Call.cost().pops, 7);
        assert_eq!(OpCode::DelegateCall.cost().pops, 6);
        assert_eq!(OpCode::Sstore.cost(), OpCost { gas: 0, pops: 2, pushes: 0 });
        assert_eq!(OpCode::JumpDest.cost().gas, 1);
        assert_eq!(OpCost::INVALID.gas, 0);
    }
}
