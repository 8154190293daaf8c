//! Decoded program representation and compilation status.
//!
//! A [`Program`] is the unit the store caches: the source bytes, the decoded
//! instruction array with its program-counter map and jump-target set, and
//! an atomic status tag tracking compilation progress.
//!
//! Status transitions are monotonic (`Unknown -> Compiling -> Ready`, or
//! `Compiling -> Error` with `Error` terminal) and use acquire/release
//! ordering, so a thread that observes [`ProgramStatus::Ready`] also
//! observes the fully written instruction array. Every transition wakes
//! waiters through a notifier; nothing in this crate polls.

use crate::types::bytes::Bytes;
use crate::types::hash::Hash;
use crate::virtual_machine::isa::OpCode;
use primitive_types::U256;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;
use tokio::sync::Notify;

/// A decoded opcode instance.
///
/// `op` is `None` for code bytes outside the opcode table: such bytes are
/// still decoded, keeping the PC map dense, but carry no execution
/// behavior and trap at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Decoded opcode, or `None` for an unknown byte.
    pub op: Option<OpCode>,
    /// Program counter of the opcode byte in the source code.
    pub pc: u64,
    /// Base gas from the opcode table.
    pub base_gas: u64,
    /// Stack items consumed.
    pub pops: u32,
    /// Stack items produced.
    pub pushes: u32,
    /// True if this opcode terminates execution.
    pub halts: bool,
    /// Immediate operand: the PUSH value, the DUP/SWAP/LOG variant index,
    /// or the PC itself for the `PC` opcode.
    pub data: Option<U256>,
}

/// Lifecycle tag of a decoded program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProgramStatus {
    /// Not yet scheduled for compilation (also: absent from the store).
    Unknown = 0,
    /// A compile pass is in flight.
    Compiling = 1,
    /// Decoded and safe to execute.
    Ready = 2,
    /// Compilation failed; terminal.
    Error = 3,
}

impl ProgramStatus {
    fn from_bits(bits: u8) -> ProgramStatus {
        match bits {
            1 => ProgramStatus::Compiling,
            2 => ProgramStatus::Ready,
            3 => ProgramStatus::Error,
            _ => ProgramStatus::Unknown,
        }
    }
}

/// Atomic status slot with a notifier for waiters.
#[derive(Debug)]
struct StatusCell {
    bits: AtomicU8,
    changed: Notify,
}

impl StatusCell {
    fn new(status: ProgramStatus) -> Self {
        Self {
            bits: AtomicU8::new(status as u8),
            changed: Notify::new(),
        }
    }

    fn load(&self) -> ProgramStatus {
        ProgramStatus::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Moves `from -> to` if the cell still holds `from`, waking waiters on
    /// success. Restricting writes to compare-exchange keeps illegal edges
    /// (e.g. out of `Error`) unrepresentable.
    fn transition(&self, from: ProgramStatus, to: ProgramStatus) -> bool {
        let swapped = self
            .bits
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if swapped {
            self.changed.notify_waiters();
        }
        swapped
    }
}

/// The decoded body of a program, published once compilation finishes.
#[derive(Debug, Default)]
pub struct ProgramBody {
    /// Instruction sequence, indexable by instruction index.
    pub instructions: Vec<Instruction>,
    /// Original program counter to instruction index. Keys are exactly the
    /// PCs that begin an instruction; PUSH immediate bytes are skipped.
    pub pc_map: HashMap<u64, usize>,
    /// Program counters hosting a `JUMPDEST` opcode.
    pub destinations: HashSet<u64>,
}

/// A compiled program: fingerprint, source bytes, decoded body and status.
#[derive(Debug)]
pub struct Program {
    /// Content address: Keccak-256 of the source bytes.
    pub id: Hash,
    /// The original code, kept for reference copies and code-copy opcodes.
    pub code: Bytes,
    status: StatusCell,
    body: OnceLock<ProgramBody>,
}

impl Program {
    /// Creates an uncompiled shell for `code` at status `Unknown`.
    pub(crate) fn shell(id: Hash, code: Bytes) -> Program {
        Program {
            id,
            code,
            status: StatusCell::new(ProgramStatus::Unknown),
            body: OnceLock::new(),
        }
    }

    /// Current compilation status.
    pub fn status(&self) -> ProgramStatus {
        self.status.load()
    }

    /// The decoded body, present once the program has reached `Ready`.
    pub fn body(&self) -> Option<&ProgramBody> {
        self.body.get()
    }

    /// Decoded instruction sequence; empty until compiled.
    pub fn instructions(&self) -> &[Instruction] {
        self.body().map(|b| b.instructions.as_slice()).unwrap_or(&[])
    }

    /// Returns true iff `dest` fits in 64 bits and names a decoded
    /// `JUMPDEST` (one not buried inside a PUSH immediate).
    pub fn is_valid_dest(&self, dest: &U256) -> bool {
        // A PC beyond 64 bits can never land on code; skip the lookup.
        if dest.bits() > 64 {
            return false;
        }
        self.body()
            .map(|b| b.destinations.contains(&dest.as_u64()))
            .unwrap_or(false)
    }

    /// Resolves once the status leaves `Compiling`.
    ///
    /// Programs that are already `Unknown`, `Ready` or `Error` resolve
    /// immediately.
    pub async fn wait(&self) -> ProgramStatus {
        loop {
            // Register interest before loading, so a transition between the
            // load and the await still wakes us.
            let changed = self.status.changed.notified();
            let status = self.status();
            if status != ProgramStatus::Compiling {
                return status;
            }
            changed.await;
        }
    }

    pub(crate) fn begin_compile(&self) -> bool {
        self.status
            .transition(ProgramStatus::Unknown, ProgramStatus::Compiling)
    }

    pub(crate) fn finish_ready(&self, body: ProgramBody) -> bool {
        if self.body.set(body).is_err() {
            return false;
        }
        self.status
            .transition(ProgramStatus::Compiling, ProgramStatus::Ready)
    }

    pub(crate) fn finish_error(&self) -> bool {
        self.status
            .transition(ProgramStatus::Compiling, ProgramStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Program {
        let code = Bytes::new(vec![0x00]);
        Program::shell(Hash::keccak(&code), code)
    }

    #[test]
    fn status_starts_unknown() {
        let p = shell();
        assert_eq!(p.status(), ProgramStatus::Unknown);
        assert!(p.body().is_none());
        assert!(p.instructions().is_empty());
    }

    #[test]
    fn legal_transitions_only() {
        let p = shell();
        // Unknown cannot go straight to Ready or Error.
        assert!(!p.finish_ready(ProgramBody::default()));
        assert!(!p.finish_error());

        let p = shell();
        assert!(p.begin_compile());
        assert_eq!(p.status(), ProgramStatus::Compiling);
        assert!(!p.begin_compile());
        assert!(p.finish_ready(ProgramBody::default()));
        assert_eq!(p.status(), ProgramStatus::Ready);
        // Ready is final for a successful compile.
        assert!(!p.finish_error());
    }

    #[test]
    fn error_is_terminal() {
        let p = shell();
        assert!(p.begin_compile());
        assert!(p.finish_error());
        assert_eq!(p.status(), ProgramStatus::Error);
        assert!(!p.begin_compile());
        assert!(!p.finish_ready(ProgramBody::default()));
        assert_eq!(p.status(), ProgramStatus::Error);
    }

    #[test]
    fn is_valid_dest_rejects_wide_and_unknown() {
        let p = shell();
        assert!(p.begin_compile());
        let mut body = ProgramBody::default();
        body.destinations.insert(4);
        assert!(p.finish_ready(body));

        assert!(p.is_valid_dest(&U256::from(4u64)));
        assert!(!p.is_valid_dest(&U256::from(5u64)));
        let wide = U256::from(u64::MAX) + U256::one();
        assert!(!p.is_valid_dest(&wide));
    }

    #[tokio::test]
    async fn wait_resolves_on_transition() {
        use std::sync::Arc;

        let p = Arc::new(shell());
        assert!(p.begin_compile());

        let waiter = {
            let p = Arc::clone(&p);
            tokio::spawn(async move { p.wait().await })
        };
        tokio::task::yield_now().await;
        assert!(p.finish_ready(ProgramBody::default()));
        assert_eq!(waiter.await.unwrap(), ProgramStatus::Ready);
    }

    #[tokio::test]
    async fn wait_resolves_immediately_when_not_compiling() {
        let p = shell();
        assert_eq!(p.wait().await, ProgramStatus::Unknown);
    }
}
