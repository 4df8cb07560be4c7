//! Scripted call scenarios with expected host responses.
//!
//! Each scenario is a sequence of calls from named accounts against a fresh
//! [`TestChain`], with the `(ok true)` / `(err uNNN)` response each call must
//! produce. Scenarios serialize to JSON so other hosts can replay them.

use serde::{Deserialize, Serialize};

use docuchain::{Operation, Registry, RegistryError, Response};
use docuchain_core::{BlockHeight, DocumentHash, ErrorCode, Principal};
use docuchain_store::Store;

use crate::fixtures::{sample_hash, TestChain};

/// The response a step must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expected {
    Ok,
    Err(u32),
}

impl Expected {
    pub fn err(code: ErrorCode) -> Self {
        Expected::Err(code.as_u32())
    }

    pub fn matches(&self, response: &Response) -> bool {
        match (self, response) {
            (Expected::Ok, Response::Ok(true)) => true,
            (Expected::Err(code), Response::Err(actual)) => *code == actual.as_u32(),
            _ => false,
        }
    }
}

/// One call in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Account name in the [`TestChain`].
    pub caller: String,
    /// Blocks to mine before the call.
    #[serde(default)]
    pub advance: u64,
    pub operation: Operation,
    pub expect: Expected,
}

/// A named sequence of steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub steps: Vec<Step>,
}

/// What one step actually did.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub index: usize,
    pub height: BlockHeight,
    pub expected: Expected,
    pub actual: Response,
}

impl StepOutcome {
    pub fn passed(&self) -> bool {
        self.expected.matches(&self.actual)
    }
}

/// Run `scenario` step by step, advancing `chain` as it goes.
pub async fn run_scenario<S: Store>(
    registry: &mut Registry<S>,
    chain: &mut TestChain,
    scenario: &Scenario,
) -> Result<Vec<StepOutcome>, RegistryError> {
    let mut outcomes = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        chain.advance(step.advance);
        let call = chain.call(&step.caller);
        let actual = registry.dispatch(&call, step.operation.clone()).await?;
        outcomes.push(StepOutcome {
            index,
            height: chain.height(),
            expected: step.expect,
            actual,
        });
    }

    Ok(outcomes)
}

struct Builder {
    name: &'static str,
    description: &'static str,
    steps: Vec<Step>,
}

impl Builder {
    fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            steps: Vec::new(),
        }
    }

    fn step(mut self, caller: &str, advance: u64, operation: Operation, expect: Expected) -> Self {
        self.steps.push(Step {
            caller: caller.to_string(),
            advance,
            operation,
            expect,
        });
        self
    }

    fn build(self) -> Scenario {
        Scenario {
            name: self.name.to_string(),
            description: self.description.to_string(),
            steps: self.steps,
        }
    }
}

fn store(hash: DocumentHash, name: &str, expires_at: Option<u64>) -> Operation {
    Operation::StoreDocument {
        hash,
        name: name.to_string(),
        metadata: None,
        expires_at: expires_at.map(BlockHeight::new),
    }
}

fn verify(hash: DocumentHash) -> Operation {
    Operation::VerifyDocument { hash }
}

fn set_status(hash: DocumentHash, status: &str) -> Operation {
    Operation::SetDocumentStatus {
        hash,
        status: status.to_string(),
    }
}

fn update_metadata(hash: DocumentHash, metadata: Option<&str>) -> Operation {
    Operation::UpdateMetadata {
        hash,
        metadata: metadata.map(String::from),
    }
}

fn transfer(hash: DocumentHash, new_owner: Principal) -> Operation {
    Operation::TransferOwnership { hash, new_owner }
}

/// All scenarios, built against the accounts of `chain`.
///
/// Heights assume a fresh chain per scenario (starting at height 1).
pub fn all_scenarios(chain: &TestChain) -> Vec<Scenario> {
    let ok = Expected::Ok;

    let wallet_2 = chain.principal("wallet_2");
    let wallet_3 = chain.principal("wallet_3");

    vec![
        Builder::new(
            "lifecycle_walkthrough",
            "Store, verify, deactivate, reject zero owner, transfer, owner-only metadata",
        )
        .step("wallet_1", 0, store(sample_hash(1), "doc", None), ok)
        .step("wallet_2", 0, verify(sample_hash(1)), ok)
        .step("wallet_1", 1, set_status(sample_hash(1), "inactive"), ok)
        .step("wallet_3", 0, verify(sample_hash(1)), Expected::err(ErrorCode::Inactive))
        .step(
            "wallet_1",
            0,
            transfer(sample_hash(1), Principal::ZERO),
            Expected::err(ErrorCode::InvalidOwner),
        )
        .step("wallet_1", 0, transfer(sample_hash(1), wallet_2), ok)
        .step(
            "wallet_1",
            0,
            update_metadata(sample_hash(1), Some("x")),
            Expected::err(ErrorCode::Unauthorized),
        )
        .step("wallet_2", 0, update_metadata(sample_hash(1), Some("x")), ok)
        .build(),
        Builder::new(
            "zero_address_transfer",
            "Ownership can never move to the zero principal",
        )
        .step("wallet_1", 0, store(sample_hash(1), "test-doc", None), ok)
        .step(
            "wallet_1",
            0,
            transfer(sample_hash(1), Principal::ZERO),
            Expected::err(ErrorCode::InvalidOwner),
        )
        .build(),
        Builder::new(
            "duplicates_and_names",
            "A hash is stored once; empty names create nothing",
        )
        .step("wallet_1", 0, store(sample_hash(2), "first", None), ok)
        .step(
            "wallet_2",
            0,
            store(sample_hash(2), "second", None),
            Expected::err(ErrorCode::DuplicateDocument),
        )
        .step(
            "wallet_1",
            0,
            store(sample_hash(2), "", None),
            Expected::err(ErrorCode::DuplicateDocument),
        )
        .step(
            "wallet_1",
            0,
            store(sample_hash(3), "", None),
            Expected::err(ErrorCode::InvalidName),
        )
        .step("wallet_1", 0, verify(sample_hash(3)), Expected::err(ErrorCode::NotFound))
        .build(),
        Builder::new(
            "expiration",
            "Valid through the expiry height, expired after it, expiry beats inactive",
        )
        .step("wallet_1", 0, store(sample_hash(4), "lease", Some(20)), ok)
        .step("wallet_2", 19, verify(sample_hash(4)), ok)
        .step("wallet_2", 1, verify(sample_hash(4)), Expected::err(ErrorCode::Expired))
        .step("wallet_1", 0, set_status(sample_hash(4), "inactive"), ok)
        .step("wallet_2", 0, verify(sample_hash(4)), Expected::err(ErrorCode::Expired))
        .step("wallet_1", 0, set_status(sample_hash(4), "active"), ok)
        .step("wallet_2", 100, verify(sample_hash(4)), Expected::err(ErrorCode::Expired))
        .build(),
        Builder::new(
            "custom_status",
            "Any non-empty status other than active fails verification",
        )
        .step("wallet_1", 0, store(sample_hash(5), "report", None), ok)
        .step("wallet_1", 0, set_status(sample_hash(5), "archived"), ok)
        .step("wallet_2", 0, verify(sample_hash(5)), Expected::err(ErrorCode::Inactive))
        .step(
            "wallet_1",
            0,
            set_status(sample_hash(5), ""),
            Expected::err(ErrorCode::InvalidStatus),
        )
        .step(
            "wallet_2",
            0,
            set_status(sample_hash(5), "active"),
            Expected::err(ErrorCode::Unauthorized),
        )
        .step("wallet_1", 0, set_status(sample_hash(5), "active"), ok)
        .step("wallet_2", 0, verify(sample_hash(5)), ok)
        .build(),
        Builder::new(
            "custody_chain",
            "Each transfer moves all mutation rights to the new owner",
        )
        .step("wallet_1", 0, store(sample_hash(6), "deed", None), ok)
        .step("wallet_1", 1, transfer(sample_hash(6), wallet_2), ok)
        .step("wallet_2", 1, transfer(sample_hash(6), wallet_3), ok)
        .step(
            "wallet_2",
            0,
            set_status(sample_hash(6), "inactive"),
            Expected::err(ErrorCode::Unauthorized),
        )
        .step(
            "wallet_1",
            0,
            transfer(sample_hash(6), wallet_2),
            Expected::err(ErrorCode::Unauthorized),
        )
        .step("wallet_3", 0, update_metadata(sample_hash(6), None), ok)
        .step(
            "wallet_3",
            0,
            transfer(sample_hash(7), wallet_2),
            Expected::err(ErrorCode::NotFound),
        )
        .build(),
    ]
}

/// Serialize scenarios as pretty JSON.
pub fn scenarios_to_json(scenarios: &[Scenario]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(scenarios)
}
