//! World-state and chain-parameter interfaces consumed by the gas meter.
//!
//! The meter never owns state: the surrounding node supplies a
//! [`WorldState`] view of accounts and storage, and a [`ChainParams`]
//! oracle selecting the gas-table version for a block. Everything else in
//! this crate is pure with respect to these traits.

use crate::types::address::Address;
use primitive_types::U256;

/// Read view of accounts and storage, plus the refund accumulator.
///
/// `add_refund` is the meter's only write: a rebate recorded during the run
/// and applied at the end. The executor may roll it back on exceptional
/// halt; the meter does not.
pub trait WorldState {
    /// Returns true if the account exists at all.
    fn exists(&self, address: &Address) -> bool;
    /// Returns true if the account has zero balance, zero nonce and no code.
    fn is_empty(&self, address: &Address) -> bool;
    /// Balance of the account, zero when absent.
    fn balance(&self, address: &Address) -> U256;
    /// Value of a storage slot, zero when unset.
    fn storage(&self, address: &Address, key: &U256) -> U256;
    /// Returns true if the account was already marked for destruction in
    /// this run.
    fn has_suicided(&self, address: &Address) -> bool;
    /// Accumulates a gas refund.
    fn add_refund(&mut self, amount: u64);
}

/// Per-era pricing for the opcodes whose cost changed across protocol
/// versions. Selected per block by [`ChainParams::gas_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasTable {
    pub ext_code_size: u64,
    pub balance: u64,
    pub sload: u64,
    pub calls: u64,
    pub suicide: u64,
    /// Surcharge for destructing into a fresh account. Zero marks the
    /// original pricing era; non-zero enables the suicide surcharges.
    pub create_by_suicide: u64,
}

impl GasTable {
    /// The original pricing schedule.
    pub const fn frontier() -> GasTable {
        GasTable {
            ext_code_size: 20,
            balance: 20,
            sload: 50,
            calls: 40,
            suicide: 0,
            create_by_suicide: 0,
        }
    }

    /// The repriced schedule for IO-heavy opcodes.
    pub const fn eip150() -> GasTable {
        GasTable {
            ext_code_size: 700,
            balance: 400,
            sload: 200,
            calls: 700,
            suicide: 5_000,
            create_by_suicide: 25_000,
        }
    }
}

/// Chain-parameter oracle: which pricing rules apply at a block height.
pub trait ChainParams {
    /// Gas table in force at `block_number`.
    fn gas_table(&self, block_number: u64) -> GasTable;
    /// Returns true when the empty-account rule applies at `block_number`:
    /// new-account surcharges trigger on *empty* beneficiaries rather than
    /// nonexistent ones.
    fn empty_account_rule(&self, block_number: u64) -> bool;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// In-memory world for gas tests.
    #[derive(Default)]
    pub struct TestWorld {
        pub existing: HashSet<Address>,
        pub empty: HashSet<Address>,
        pub balances: HashMap<Address, U256>,
        pub slots: HashMap<(Address, U256), U256>,
        pub suicided: HashSet<Address>,
        pub refund: u64,
    }

    impl TestWorld {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_slot(mut self, address: Address, key: u64, value: u64) -> Self {
            self.slots
                .insert((address, U256::from(key)), U256::from(value));
            self
        }

        pub fn with_balance(mut self, address: Address, balance: u64) -> Self {
            self.balances.insert(address, U256::from(balance));
            self.existing.insert(address);
            self
        }
    }

    impl WorldState for TestWorld {
        fn exists(&self, address: &Address) -> bool {
            self.existing.contains(address)
        }

        fn is_empty(&self, address: &Address) -> bool {
            self.empty.contains(address)
        }

        fn balance(&self, address: &Address) -> U256 {
            self.balances.get(address).copied().unwrap_or_default()
        }

        fn storage(&self, address: &Address, key: &U256) -> U256 {
            self.slots.get(&(*address, *key)).copied().unwrap_or_default()
        }

        fn has_suicided(&self, address: &Address) -> bool {
            self.suicided.contains(address)
        }

        fn add_refund(&mut self, amount: u64) {
            self.refund += amount;
        }
    }

    /// Fixed chain parameters for tests.
    pub struct TestParams {
        pub table: GasTable,
        pub empty_rule: bool,
    }

    impl TestParams {
        pub fn eip150() -> Self {
            Self {
                table: GasTable::eip150(),
                empty_rule: true,
            }
        }

        pub fn frontier() -> Self {
            Self {
                table: GasTable::frontier(),
                empty_rule: false,
            }
        }
    }

    impl ChainParams for TestParams {
        fn gas_table(&self, _block_number: u64) -> GasTable {
            self.table
        }

        fn empty_account_rule(&self, _block_number: u64) -> bool {
            self.empty_rule
        }
    }

    #[test]
    fn gas_tables_differ_between_eras() {
        let frontier = GasTable::frontier();
        let eip150 = GasTable::eip150();
        assert_eq!(frontier.create_by_suicide, 0);
        assert!(eip150.create_by_suicide > 0);
        assert!(eip150.sload > frontier.sload);
    }
}
