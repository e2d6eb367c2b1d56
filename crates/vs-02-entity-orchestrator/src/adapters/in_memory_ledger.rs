//! In-Memory Ledger Adapter
//!
//! Implements `LedgerConnection` by executing the `VolumeSubscription`
//! contract in process: storage, events, blocks and receipts.
//!
//! Every accepted call is mined into its own block immediately. Fault modes
//! let tests simulate transactions that never finalize, revert, execute
//! without emitting events, or a node that cannot be reached.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    to_hex_string, Address, BlockNumber, Bytes, Hash, LedgerError, RawLog, TransactionReceipt,
    TxHash, U256,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vs_01_log_decoding::{
    keccak256, AbiError, CallCodec, ContractAbi, DynSolValue, LogCodec, ReceiptSource,
};

use crate::contract::{events, functions, volume_subscription_abi};
use crate::ports::outbound::{LedgerConnection, ResolvedTxSettings};

/// Timestamp of block 0.
pub const GENESIS_TIME: u64 = 1_700_000_000;

/// Seconds between consecutive blocks.
pub const BLOCK_TIME_SECS: u64 = 15;

/// Simulated misbehaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FaultMode {
    /// Execute calls normally.
    #[default]
    None,
    /// Accept calls but never produce a receipt.
    NeverFinalize,
    /// Mine calls with a failed status and no effects.
    Revert,
    /// Execute calls but drop every emitted log.
    SuppressEvents,
    /// Fail every request with a transport error.
    Unavailable,
}

/// A call accepted by the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedCall {
    /// Assigned transaction hash.
    pub tx_hash: TxHash,
    /// Contract function invoked (empty when the selector is unknown).
    pub function: String,
    /// Settings the call was sent with.
    pub settings: ResolvedTxSettings,
}

#[derive(Clone, Debug, Default)]
struct StoredPlan {
    owner: Address,
    token_address: Address,
    identifier: Hash,
    interval: U256,
    amount: U256,
    fee: U256,
    data: String,
    termination_date: U256,
}

impl StoredPlan {
    fn to_values(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Address(self.owner),
            DynSolValue::Address(self.token_address),
            bytes32(self.identifier),
            uint256(self.interval),
            uint256(self.amount),
            uint256(self.fee),
            DynSolValue::String(self.data.clone()),
            uint256(self.termination_date),
        ]
    }
}

#[derive(Clone, Debug, Default)]
struct StoredSubscription {
    owner: Address,
    token_address: Address,
    plan_hash: Hash,
    last_payment_date: U256,
    termination_date: U256,
    data: String,
}

impl StoredSubscription {
    fn to_values(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Address(self.owner),
            DynSolValue::Address(self.token_address),
            bytes32(self.plan_hash),
            uint256(self.last_payment_date),
            uint256(self.termination_date),
            DynSolValue::String(self.data.clone()),
        ]
    }
}

fn bytes32(word: Hash) -> DynSolValue {
    DynSolValue::FixedBytes(word, 32)
}

fn uint256(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

#[derive(Default)]
struct LedgerState {
    block_number: BlockNumber,
    current_time: u64,
    nonce: u64,
    plans: HashMap<Hash, StoredPlan>,
    subscriptions: HashMap<Hash, StoredSubscription>,
    logs: Vec<RawLog>,
    receipts: HashMap<TxHash, TransactionReceipt>,
    pending_polls: HashMap<TxHash, usize>,
    submitted: Vec<SubmittedCall>,
    receipt_polls: usize,
}

/// Deterministic in-process ledger hosting one `VolumeSubscription` contract.
pub struct InMemoryLedger {
    contract: Address,
    abi: Arc<ContractAbi>,
    state: RwLock<LedgerState>,
    fault: RwLock<FaultMode>,
    finality_delay: RwLock<usize>,
}

/// Outcome of executing one call: emitted events, or a revert reason.
type Execution = Result<Vec<(&'static str, Vec<DynSolValue>)>, String>;

impl InMemoryLedger {
    /// Create a ledger with the contract deployed at `contract`.
    pub fn new(contract: Address) -> Result<Self, AbiError> {
        Ok(Self::with_abi(contract, Arc::new(volume_subscription_abi()?)))
    }

    /// Create a ledger executing against an already parsed ABI.
    pub fn with_abi(contract: Address, abi: Arc<ContractAbi>) -> Self {
        Self {
            contract,
            abi,
            state: RwLock::new(LedgerState {
                current_time: GENESIS_TIME,
                ..Default::default()
            }),
            fault: RwLock::new(FaultMode::None),
            finality_delay: RwLock::new(0),
        }
    }

    /// Address the contract is deployed at.
    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Switch the simulated fault mode.
    pub fn set_fault(&self, mode: FaultMode) {
        *self.fault.write() = mode;
        info!(?mode, "[vs-02] In-memory ledger fault mode changed");
    }

    /// Hide each new receipt for this many lookups.
    pub fn set_finality_delay(&self, polls: usize) {
        *self.finality_delay.write() = polls;
    }

    /// Advance the ledger clock without mining.
    pub fn advance_time(&self, secs: u64) {
        self.state.write().current_time += secs;
    }

    /// Height of the latest block.
    pub fn block_number(&self) -> BlockNumber {
        self.state.read().block_number
    }

    /// Every call accepted so far, in submission order.
    pub fn submitted_calls(&self) -> Vec<SubmittedCall> {
        self.state.read().submitted.clone()
    }

    /// Number of receipt lookups served.
    pub fn receipt_polls(&self) -> usize {
        self.state.read().receipt_polls
    }

    /// Record a payment for an active subscription, as the off-client payment
    /// processor would. Mined in its own block; a payment for an unknown or
    /// cancelled subscription is mined as reverted.
    pub fn process_payment(&self, subscription: Hash) -> Result<TxHash, LedgerError> {
        self.ensure_available()?;
        let mut state = self.state.write();
        let tx_hash = next_tx_hash(&mut state, self.contract);
        mine_block(&mut state);

        let execution = execute_payment(&mut state, subscription);
        let reverted = execution.is_err();
        let receipt = self.build_receipt(&mut state, tx_hash, execution, false);
        state.receipts.insert(tx_hash, receipt);

        if reverted {
            return Err(LedgerError::Reverted { tx_hash });
        }
        Ok(tx_hash)
    }

    fn ensure_available(&self) -> Result<(), LedgerError> {
        if *self.fault.read() == FaultMode::Unavailable {
            return Err(LedgerError::Transport("in-memory ledger unavailable".into()));
        }
        Ok(())
    }

    fn build_receipt(
        &self,
        state: &mut LedgerState,
        tx_hash: TxHash,
        execution: Execution,
        suppress_events: bool,
    ) -> TransactionReceipt {
        let block_number = state.block_number;
        let (status, emitted) = match execution {
            Ok(emitted) => (true, emitted),
            Err(reason) => {
                debug!(?tx_hash, %reason, "[vs-02] In-memory call reverted");
                (false, Vec::new())
            }
        };

        let mut logs = Vec::new();
        if !suppress_events {
            for (event, values) in emitted {
                match self
                    .abi
                    .event(event)
                    .and_then(|definition| definition.encode_log(self.contract, &values))
                {
                    Ok(mut log) => {
                        log.block_number = Some(block_number);
                        log.transaction_hash = Some(tx_hash);
                        log.log_index = Some(logs.len() as u64);
                        logs.push(log);
                    }
                    Err(e) => warn!(event, error = %e, "[vs-02] Could not encode event"),
                }
            }
        }
        state.logs.extend(logs.iter().cloned());

        TransactionReceipt {
            transaction_hash: tx_hash,
            block_number,
            status,
            logs,
        }
    }

    fn execute(
        &self,
        state: &mut LedgerState,
        function: &str,
        args: &[DynSolValue],
        sender: Address,
    ) -> Execution {
        let now = U256::from(state.current_time);
        match function {
            functions::CREATE_PLAN => {
                let owner = address_arg(args, 0)?;
                let identifier = hash_arg(args, 2)?;
                let plan_hash = keccak256([owner.as_slice(), identifier.as_slice()].concat());
                if state.plans.contains_key(&plan_hash) {
                    return Err("plan already exists".into());
                }
                let plan = StoredPlan {
                    owner,
                    token_address: address_arg(args, 1)?,
                    identifier,
                    interval: uint_arg(args, 3)?,
                    amount: uint_arg(args, 4)?,
                    fee: uint_arg(args, 5)?,
                    data: string_arg(args, 6)?,
                    termination_date: U256::ZERO,
                };
                let event = vec![
                    DynSolValue::Address(owner),
                    bytes32(plan_hash),
                    DynSolValue::Address(plan.token_address),
                    uint256(plan.interval),
                    uint256(plan.amount),
                ];
                state.plans.insert(plan_hash, plan);
                Ok(vec![(events::CREATED_PLAN, event)])
            }
            functions::TERMINATE_PLAN => {
                let plan_hash = hash_arg(args, 0)?;
                let termination_date = uint_arg(args, 1)?;
                let plan = state
                    .plans
                    .get_mut(&plan_hash)
                    .ok_or_else(|| "unknown plan".to_string())?;
                if plan.owner != sender {
                    return Err("only the plan owner can terminate".into());
                }
                if !plan.termination_date.is_zero() {
                    return Err("plan already terminated".into());
                }
                plan.termination_date = termination_date;
                Ok(vec![(
                    events::TERMINATED_PLAN,
                    vec![
                        bytes32(plan_hash),
                        uint256(termination_date),
                    ],
                )])
            }
            functions::CREATE_SUBSCRIPTION => {
                let plan_hash = hash_arg(args, 0)?;
                let data = string_arg(args, 1)?;
                let plan = state
                    .plans
                    .get(&plan_hash)
                    .ok_or_else(|| "unknown plan".to_string())?;
                if !plan.termination_date.is_zero() {
                    return Err("plan is terminated".into());
                }
                let subscription_hash = keccak256(
                    [
                        sender.as_slice(),
                        plan_hash.as_slice(),
                        &state.nonce.to_be_bytes()[..],
                    ]
                    .concat(),
                );
                let subscription = StoredSubscription {
                    owner: sender,
                    token_address: plan.token_address,
                    plan_hash,
                    last_payment_date: now,
                    termination_date: U256::ZERO,
                    data,
                };
                state.subscriptions.insert(subscription_hash, subscription);
                Ok(vec![(
                    events::CREATED_SUBSCRIPTION,
                    vec![
                        DynSolValue::Address(sender),
                        bytes32(plan_hash),
                        bytes32(subscription_hash),
                    ],
                )])
            }
            functions::CANCEL_SUBSCRIPTION => {
                let subscription_hash = hash_arg(args, 0)?;
                let subscription = state
                    .subscriptions
                    .get_mut(&subscription_hash)
                    .ok_or_else(|| "unknown subscription".to_string())?;
                if subscription.owner != sender {
                    return Err("only the subscriber can cancel".into());
                }
                if !subscription.termination_date.is_zero() {
                    return Err("subscription already cancelled".into());
                }
                subscription.termination_date = now;
                Ok(vec![(
                    events::CANCELLED_SUBSCRIPTION,
                    vec![
                        bytes32(subscription_hash),
                        uint256(now),
                    ],
                )])
            }
            other => Err(format!("{other} is not callable")),
        }
    }
}

fn next_tx_hash(state: &mut LedgerState, contract: Address) -> TxHash {
    state.nonce += 1;
    keccak256([contract.as_slice(), &state.nonce.to_be_bytes()[..]].concat())
}

fn execute_payment(state: &mut LedgerState, subscription: Hash) -> Execution {
    let now = U256::from(state.current_time);
    let plan_hash = state
        .subscriptions
        .get(&subscription)
        .filter(|s| s.termination_date.is_zero())
        .map(|s| s.plan_hash)
        .ok_or_else(|| "no active subscription".to_string())?;
    let plan = state.plans.get(&plan_hash).cloned().unwrap_or_default();
    if let Some(stored) = state.subscriptions.get_mut(&subscription) {
        stored.last_payment_date = now;
    }

    Ok(vec![(
        events::PROCESSED_PAYMENT,
        vec![
            bytes32(subscription),
            uint256(now),
            DynSolValue::Array(vec![uint256(plan.amount), uint256(plan.fee)]),
        ],
    )])
}

fn mine_block(state: &mut LedgerState) {
    state.block_number += 1;
    state.current_time += BLOCK_TIME_SECS;
}

fn arg(args: &[DynSolValue], index: usize) -> Result<&DynSolValue, String> {
    args.get(index)
        .ok_or_else(|| format!("missing argument {index}"))
}

fn address_arg(args: &[DynSolValue], index: usize) -> Result<Address, String> {
    arg(args, index)?
        .as_address()
        .ok_or_else(|| format!("argument {index} is not an address"))
}

fn uint_arg(args: &[DynSolValue], index: usize) -> Result<U256, String> {
    arg(args, index)?
        .as_uint()
        .map(|(value, _)| value)
        .ok_or_else(|| format!("argument {index} is not a uint"))
}

fn hash_arg(args: &[DynSolValue], index: usize) -> Result<Hash, String> {
    match arg(args, index)? {
        DynSolValue::FixedBytes(word, 32) => Ok(*word),
        _ => Err(format!("argument {index} is not bytes32")),
    }
}

fn string_arg(args: &[DynSolValue], index: usize) -> Result<String, String> {
    arg(args, index)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("argument {index} is not a string"))
}

#[async_trait]
impl ReceiptSource for InMemoryLedger {
    async fn get_transaction_receipt(
        &self,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, LedgerError> {
        self.ensure_available()?;
        let mut state = self.state.write();
        state.receipt_polls += 1;

        if let Some(remaining) = state.pending_polls.get_mut(tx_hash) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(None);
            }
        }
        Ok(state.receipts.get(tx_hash).cloned())
    }
}

#[async_trait]
impl LedgerConnection for InMemoryLedger {
    async fn submit_call(
        &self,
        contract: Address,
        selector: [u8; 4],
        encoded_args: Bytes,
        settings: &ResolvedTxSettings,
    ) -> Result<TxHash, LedgerError> {
        self.ensure_available()?;
        if contract != self.contract {
            return Err(LedgerError::Rejected(format!(
                "no contract deployed at {contract:?}"
            )));
        }

        let fault = *self.fault.read();
        let delay = *self.finality_delay.read();
        let mut state = self.state.write();
        let tx_hash = next_tx_hash(&mut state, self.contract);

        let function = self.abi.function_by_selector(selector);
        state.submitted.push(SubmittedCall {
            tx_hash,
            function: function.map(|f| f.name.clone()).unwrap_or_default(),
            settings: *settings,
        });

        if fault == FaultMode::NeverFinalize {
            debug!(?tx_hash, "[vs-02] Accepted call that will never finalize");
            return Ok(tx_hash);
        }

        mine_block(&mut state);
        let execution = if fault == FaultMode::Revert {
            Err("forced revert".to_string())
        } else {
            match function {
                Some(function) => match function.decode_input(&encoded_args) {
                    Ok(args) => {
                        let name = function.name.clone();
                        self.execute(&mut state, &name, &args, settings.from)
                    }
                    Err(e) => Err(format!("bad call data: {e}")),
                },
                None => Err(format!("unknown selector {}", to_hex_string(&selector))),
            }
        };

        let receipt =
            self.build_receipt(&mut state, tx_hash, execution, fault == FaultMode::SuppressEvents);
        debug!(
            ?tx_hash,
            block = receipt.block_number,
            status = receipt.status,
            logs = receipt.logs.len(),
            "[vs-02] Mined in-memory call"
        );
        state.receipts.insert(tx_hash, receipt);
        if delay > 0 {
            state.pending_polls.insert(tx_hash, delay);
        }
        Ok(tx_hash)
    }

    async fn read_storage(
        &self,
        contract: Address,
        selector: [u8; 4],
        encoded_args: Bytes,
    ) -> Result<Bytes, LedgerError> {
        self.ensure_available()?;
        if contract != self.contract {
            // No code at the address: the node answers with empty data.
            return Ok(Bytes::new());
        }

        let function = self
            .abi
            .function_by_selector(selector)
            .ok_or_else(|| LedgerError::Rejected("unknown selector".into()))?;
        let args = function
            .decode_input(&encoded_args)
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;
        let key = hash_arg(&args, 0).map_err(LedgerError::Rejected)?;

        let state = self.state.read();
        let values = match function.name.as_str() {
            functions::PLANS => state.plans.get(&key).cloned().unwrap_or_default().to_values(),
            functions::SUBSCRIPTIONS => state
                .subscriptions
                .get(&key)
                .cloned()
                .unwrap_or_default()
                .to_values(),
            other => {
                return Err(LedgerError::Rejected(format!("{other} is not a view function")))
            }
        };

        function
            .encode_output(&values)
            .map_err(|e| LedgerError::Rejected(e.to_string()))
    }

    async fn fetch_historical_logs(
        &self,
        contract: Address,
        topic: Hash,
        from_block: BlockNumber,
        to_block: Option<BlockNumber>,
    ) -> Result<Vec<RawLog>, LedgerError> {
        self.ensure_available()?;
        let state = self.state.read();
        let to_block = to_block.unwrap_or(state.block_number);

        Ok(state
            .logs
            .iter()
            .filter(|log| log.address == contract)
            .filter(|log| log.signature_topic() == Some(&topic))
            .filter(|log| {
                log.block_number
                    .map_or(false, |n| n >= from_block && n <= to_block)
            })
            .cloned()
            .collect())
    }
}
