//! Test fixtures and helpers.
//!
//! [`TestChain`] stands in for the execution host: it owns a set of named
//! accounts and a block height that only moves forward.

use docuchain::{Call, Registry, RegistryConfig};
use docuchain_core::{BlockHeight, DocumentHash, Keypair, Principal};
use docuchain_store::MemoryStore;

/// Names of the accounts every [`TestChain`] starts with.
pub const ACCOUNT_NAMES: [&str; 5] = ["deployer", "wallet_1", "wallet_2", "wallet_3", "wallet_4"];

/// A named account with a deterministic keypair.
#[derive(Debug, Clone)]
pub struct Account {
    pub name: String,
    pub keypair: Keypair,
}

impl Account {
    /// Deterministic account whose key seed encodes `index`.
    pub fn with_index(name: &str, index: u8) -> Self {
        let mut seed = [0u8; 32];
        seed[0] = index;
        seed[31] = 0xd0;
        Self {
            name: name.to_string(),
            keypair: Keypair::from_seed(&seed),
        }
    }

    pub fn principal(&self) -> Principal {
        self.keypair.principal()
    }
}

/// A simulated host: accounts plus a monotonic block height.
#[derive(Debug, Clone)]
pub struct TestChain {
    accounts: Vec<Account>,
    height: BlockHeight,
}

impl TestChain {
    /// Chain at height 1 with the accounts in [`ACCOUNT_NAMES`].
    pub fn new() -> Self {
        let accounts = ACCOUNT_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| Account::with_index(name, i as u8))
            .collect();
        Self {
            accounts,
            height: BlockHeight::new(1),
        }
    }

    /// Look up an account by name.
    ///
    /// # Panics
    /// If no such account exists; fixtures are only used from tests.
    pub fn account(&self, name: &str) -> &Account {
        self.accounts
            .iter()
            .find(|a| a.name == name)
            .unwrap_or_else(|| panic!("unknown test account {:?}", name))
    }

    pub fn principal(&self, name: &str) -> Principal {
        self.account(name).principal()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn height(&self) -> BlockHeight {
        self.height
    }

    /// Mine `blocks` empty blocks.
    pub fn advance(&mut self, blocks: u64) -> BlockHeight {
        self.height = self.height.advanced_by(blocks);
        self.height
    }

    /// A call from the named account at the current height.
    pub fn call(&self, name: &str) -> Call {
        Call::new(self.principal(name), self.height)
    }
}

impl Default for TestChain {
    fn default() -> Self {
        Self::new()
    }
}

/// A registry over a fresh in-memory store.
pub fn memory_registry() -> Registry<MemoryStore> {
    Registry::new(MemoryStore::new(), RegistryConfig::default())
}

/// A document hash whose last byte is `n` (`0x00..0n`).
pub fn sample_hash(n: u8) -> DocumentHash {
    let mut bytes = [0u8; 32];
    bytes[31] = n;
    DocumentHash::from_bytes(bytes)
}
