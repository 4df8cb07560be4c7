//! The execution host's view of a call: who is calling, and when.
//!
//! The registry never authenticates callers or reads a clock. The host
//! supplies both per call through [`ExecutionContext`].

use docuchain_core::{BlockHeight, Principal};

/// Collaborator interface supplied by the execution host.
pub trait ExecutionContext {
    /// The authenticated caller.
    fn caller(&self) -> Principal;

    /// The current block height. Never decreases between calls.
    fn block_height(&self) -> BlockHeight;
}

/// A single call as sequenced by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub caller: Principal,
    pub block_height: BlockHeight,
}

impl Call {
    pub fn new(caller: Principal, block_height: impl Into<BlockHeight>) -> Self {
        Self {
            caller,
            block_height: block_height.into(),
        }
    }
}

impl ExecutionContext for Call {
    fn caller(&self) -> Principal {
        self.caller
    }

    fn block_height(&self) -> BlockHeight {
        self.block_height
    }
}

impl<C: ExecutionContext + ?Sized> ExecutionContext for &C {
    fn caller(&self) -> Principal {
        (**self).caller()
    }

    fn block_height(&self) -> BlockHeight {
        (**self).block_height()
    }
}
