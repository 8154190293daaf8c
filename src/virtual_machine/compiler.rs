//! One-pass bytecode compiler.
//!
//! Decodes a raw code byte string into an indexable instruction array,
//! registering the result in a [`ProgramStore`] keyed by the code's
//! Keccak-256 fingerprint. Decoding is total: every byte becomes exactly
//! one instruction (unknown bytes become invalid instructions that trap at
//! run time), so the program-counter map is dense over instruction starts.

use crate::types::bytes::Bytes;
use crate::types::hash::Hash;
use crate::virtual_machine::isa::{OpCode, OpCost};
use crate::virtual_machine::program::{Instruction, Program, ProgramBody, ProgramStatus};
use crate::virtual_machine::store::ProgramStore;
use primitive_types::U256;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::debug;

/// Compiles `code`, registering the program in `store`.
///
/// If the store already holds a `Ready` program for this code it is
/// returned as-is; a `Compiling` entry (another thread's in-flight pass) is
/// likewise joined rather than duplicated. Otherwise a shell is inserted at
/// `Unknown`, transitioned to `Compiling`, decoded, and published `Ready`.
///
/// Compilation runs to completion on the calling thread; it is bounded by
/// the code length and not cancellable.
pub fn compile(store: &ProgramStore, code: Bytes) -> Arc<Program> {
    let id = Hash::keccak(&code);
    if let Some(existing) = store.get(&id) {
        match existing.status() {
            ProgramStatus::Ready | ProgramStatus::Compiling => return existing,
            // Unknown or Error shells are replaced by a fresh pass.
            _ => {}
        }
    }

    let program = Arc::new(Program::shell(id, code));
    store.insert(Arc::clone(&program));
    if !program.begin_compile() {
        return program;
    }

    debug!(id = %program.id, "compiling");
    let started = Instant::now();
    let body = decode(&program.code);
    let instructions = body.instructions.len();
    program.finish_ready(body);
    debug!(
        id = %program.id,
        instructions,
        elapsed = ?started.elapsed(),
        "compiled"
    );

    program
}

/// Decodes `code` into an instruction array, PC map and jump-target set.
fn decode(code: &[u8]) -> ProgramBody {
    let mut body = ProgramBody::default();
    let mut pc = 0u64;

    while (pc as usize) < code.len() {
        let byte = code[pc as usize];
        let op = OpCode::from_byte(byte);
        let mut data = None;
        let mut width = 1u64;

        if let Some(op) = op {
            if let Some(n) = op.push_bytes() {
                // The immediate is the next n code bytes, big-endian. A push
                // truncated by end-of-code reads only the available bytes,
                // so the missing low-order bytes count as zero.
                let start = (pc as usize).saturating_add(1).min(code.len());
                let end = start.saturating_add(n as usize).min(code.len());
                data = Some(U256::from_big_endian(&code[start..end]));
                width += n;
            } else if let Some(n) = op.dup_index() {
                data = Some(U256::from(n));
            } else if let Some(n) = op.swap_index() {
                data = Some(U256::from(n));
            } else if let Some(n) = op.log_topics() {
                data = Some(U256::from(n));
            } else if op == OpCode::Pc {
                data = Some(U256::from(pc));
            }

            if op == OpCode::JumpDest {
                body.destinations.insert(pc);
            }
        }

        let cost = op.map(|op| op.cost()).unwrap_or(OpCost::INVALID);
        body.instructions.push(Instruction {
            op,
            pc,
            base_gas: cost.gas,
            pops: cost.pops,
            pushes: cost.pushes,
            halts: op.map_or(false, |op| op.is_terminator()),
            data,
        });
        body.pc_map.insert(pc, body.instructions.len() - 1);
        pc += width;
    }

    body
}

/// Waits for the program's status to leave `Compiling`.
///
/// Resolves immediately with `Unknown` for fingerprints absent from the
/// store.
pub async fn wait_status(store: &ProgramStore, id: Hash) -> ProgramStatus {
    match store.get(&id) {
        Some(program) => program.wait().await,
        None => ProgramStatus::Unknown,
    }
}

/// One-shot channel form of [`wait_status`].
///
/// The returned receiver yields the first non-`Compiling` status, then the
/// channel closes. Firing (or simply dropping) the `cancel` sender ends
/// the wait without delivering a value.
///
/// Must be called within a tokio runtime.
pub fn wait_compile(
    store: &ProgramStore,
    id: Hash,
    cancel: oneshot::Receiver<()>,
) -> oneshot::Receiver<ProgramStatus> {
    let (tx, rx) = oneshot::channel();
    let program = store.get(&id);
    tokio::spawn(async move {
        let mut cancel = cancel;
        let wait = async {
            match program {
                Some(program) => program.wait().await,
                None => ProgramStatus::Unknown,
            }
        };
        tokio::select! {
            _ = &mut cancel => {}
            status = wait => {
                let _ = tx.send(status);
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_machine::store::ProgramStore;
    use std::num::NonZeroUsize;

    fn store() -> ProgramStore {
        ProgramStore::new(NonZeroUsize::new(16).unwrap())
    }

    fn body(program: &Program) -> &ProgramBody {
        program.body().expect("compiled program has a body")
    }

    #[test]
    fn add_program_decodes_to_four_instructions() {
        // PUSH1 3, PUSH1 5, ADD, STOP
        let store = store();
        let program = compile(&store, Bytes::new(vec![0x60, 0x03, 0x60, 0x05, 0x01, 0x00]));
        assert_eq!(program.status(), ProgramStatus::Ready);

        let body = body(&program);
        assert_eq!(body.instructions.len(), 4);
        let expected_map = [(0u64, 0usize), (2, 1), (4, 2), (5, 3)];
        assert_eq!(body.pc_map.len(), expected_map.len());
        for (pc, index) in expected_map {
            assert_eq!(body.pc_map[&pc], index);
        }
        assert!(body.destinations.is_empty());

        assert_eq!(body.instructions[0].op, Some(OpCode::Push1));
        assert_eq!(body.instructions[0].data, Some(U256::from(3u64)));
        assert_eq!(body.instructions[2].op, Some(OpCode::Add));
        assert!(body.instructions[3].halts);
    }

    #[test]
    fn pc_map_inverts_instruction_pcs() {
        let code: Vec<u8> = vec![
            0x5b, // JUMPDEST
            0x61, 0xaa, 0xbb, // PUSH2
            0x80, // DUP1
            0x55, // SSTORE
            0xf3, // RETURN
        ];
        let store = store();
        let program = compile(&store, Bytes::new(code));
        let body = body(&program);
        for (index, instr) in body.instructions.iter().enumerate() {
            assert_eq!(body.pc_map[&instr.pc], index);
        }
        assert_eq!(body.destinations, [0u64].into_iter().collect());
    }

    #[test]
    fn instructions_partition_the_code() {
        // Windows of 1 + push_bytes cover the code exactly once.
        let code: Vec<u8> = vec![0x60, 0x5b, 0x00, 0x62, 0x01, 0x02, 0x03, 0xfe, 0x7f, 0x44];
        let store = store();
        let program = compile(&store, Bytes::new(code.clone()));
        let mut covered = 0u64;
        for instr in program.instructions() {
            assert_eq!(instr.pc, covered);
            let width = 1 + instr.op.and_then(OpCode::push_bytes).unwrap_or(0);
            covered += width;
        }
        assert!(covered >= code.len() as u64);
    }

    #[test]
    fn jumpdest_inside_push_immediate_is_not_registered() {
        // PUSH1 0x5B, STOP: the 0x5B byte is immediate data, not an opcode.
        let store = store();
        let program = compile(&store, Bytes::new(vec![0x60, 0x5b, 0x00]));
        let body = body(&program);
        assert!(body.destinations.is_empty());
        assert!(!program.is_valid_dest(&U256::from(1u64)));
        assert_eq!(body.instructions.len(), 2);
    }

    #[test]
    fn truncated_push_reads_available_bytes() {
        // PUSH32 with a single immediate byte: the value is that byte.
        let store = store();
        let program = compile(&store, Bytes::new(vec![0x7f, 0x2a]));
        let body = body(&program);
        assert_eq!(body.instructions.len(), 1);
        assert_eq!(body.instructions[0].data, Some(U256::from(0x2au64)));
    }

    #[test]
    fn push_at_last_byte_has_zero_immediate() {
        let store = store();
        let program = compile(&store, Bytes::new(vec![0x00, 0x7f]));
        let body = body(&program);
        assert_eq!(body.instructions.len(), 2);
        assert_eq!(body.instructions[1].data, Some(U256::zero()));
    }

    #[test]
    fn unknown_bytes_decode_as_invalid() {
        let store = store();
        let program = compile(&store, Bytes::new(vec![0xfe, 0x01]));
        let body = body(&program);
        assert_eq!(body.instructions.len(), 2);
        assert_eq!(body.instructions[0].op, None);
        assert_eq!(body.instructions[0].base_gas, 0);
        assert_eq!(body.pc_map[&0], 0);
        assert_eq!(body.instructions[1].op, Some(OpCode::Add));
    }

    #[test]
    fn empty_code_compiles_ready() {
        let store = store();
        let program = compile(&store, Bytes::default());
        assert_eq!(program.status(), ProgramStatus::Ready);
        assert!(program.instructions().is_empty());
        assert!(!program.is_valid_dest(&U256::zero()));
        assert!(!program.is_valid_dest(&U256::from(123u64)));
    }

    #[test]
    fn pc_opcode_carries_its_own_pc() {
        let store = store();
        let program = compile(&store, Bytes::new(vec![0x00, 0x58]));
        let body = body(&program);
        assert_eq!(body.instructions[1].op, Some(OpCode::Pc));
        assert_eq!(body.instructions[1].data, Some(U256::from(1u64)));
    }

    #[test]
    fn variant_immediates() {
        let store = store();
        let program = compile(&store, Bytes::new(vec![0x85, 0x93, 0xa3]));
        let body = body(&program);
        assert_eq!(body.instructions[0].data, Some(U256::from(6u64))); // DUP6
        assert_eq!(body.instructions[1].data, Some(U256::from(5u64))); // SWAP4 reaches 5 deep
        assert_eq!(body.instructions[2].data, Some(U256::from(3u64))); // LOG3
    }

    #[test]
    fn compile_is_deterministic() {
        let code = vec![0x60, 0x01, 0x60, 0x02, 0x01, 0x5b, 0x56, 0x00];
        let store = store();
        let a = compile(&store, Bytes::new(code.clone()));

        let other = ProgramStore::new(NonZeroUsize::new(16).unwrap());
        let b = compile(&other, Bytes::new(code.clone()));

        assert_eq!(a.id, b.id);
        assert_eq!(a.id, Hash::keccak(&code));
        assert_eq!(a.instructions(), b.instructions());
    }

    #[test]
    fn compile_returns_cached_ready_program() {
        let store = store();
        let code = vec![0x60, 0x01, 0x00];
        let first = compile(&store, Bytes::new(code.clone()));
        let second = compile(&store, Bytes::new(code));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn wait_status_for_absent_fingerprint() {
        let store = store();
        assert_eq!(
            wait_status(&store, Hash::keccak(b"nope")).await,
            ProgramStatus::Unknown
        );
    }

    #[tokio::test]
    async fn wait_compile_delivers_ready() {
        let store = store();
        let program = compile(&store, Bytes::new(vec![0x00]));
        let (_cancel_tx, cancel_rx) = oneshot::channel();
        let rx = wait_compile(&store, program.id, cancel_rx);
        assert_eq!(rx.await.unwrap(), ProgramStatus::Ready);
    }

    #[tokio::test]
    async fn wait_compile_observes_cancellation() {
        let store = store();
        let code = Bytes::new(vec![0x00, 0x01]);
        let id = Hash::keccak(&code);
        let program = Arc::new(Program::shell(id, code));
        store.insert(Arc::clone(&program));
        assert!(program.begin_compile());

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let rx = wait_compile(&store, id, cancel_rx);
        drop(cancel_tx);
        // The channel closes without a value.
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn wait_compile_wakes_on_transition() {
        let store = store();
        let code = Bytes::new(vec![0x00, 0x02]);
        let id = Hash::keccak(&code);
        let program = Arc::new(Program::shell(id, code));
        store.insert(Arc::clone(&program));
        assert!(program.begin_compile());

        let (_cancel_tx, cancel_rx) = oneshot::channel();
        let rx = wait_compile(&store, id, cancel_rx);
        tokio::task::yield_now().await;
        assert!(program.finish_ready(ProgramBody::default()));
        assert_eq!(rx.await.unwrap(), ProgramStatus::Ready);
    }
}
