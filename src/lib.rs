//! Stack-machine bytecode compiler, bounded program cache and gas core.
//!
//! Provides content-addressed program compilation and caching, exact
//! pre-execution gas and memory metering, and a binary Merkle tree for
//! content addressing and integrity proofs.

pub mod types;
pub mod virtual_machine;

pub use types::bytes::Bytes;
pub use types::hash::Hash;
pub use virtual_machine::compiler::{compile, wait_compile, wait_status};
pub use virtual_machine::program::{Program, ProgramStatus};
pub use virtual_machine::store::ProgramStore;
