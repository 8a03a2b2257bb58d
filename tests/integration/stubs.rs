//! Scriptable stand-ins for the external collaborators: a job producer that
//! records instead of enqueueing, and an execution target with programmable
//! dispatch and receipt behavior.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use intent_relayer::{
    jobs::{
        JobProducerError, JobProducerTrait, TransactionRequest, TransactionSend,
        TransactionStatusCheck,
    },
    models::{Address, ProviderError, U256},
    services::{ExecutionTargetTrait, ReceiptState},
};

#[derive(Debug, Default)]
pub struct ProducedJobs {
    pub requests: Vec<(TransactionRequest, Option<i64>)>,
    pub submissions: Vec<(TransactionSend, Option<i64>)>,
    pub status_checks: Vec<(TransactionStatusCheck, Option<i64>)>,
}

/// Records every produced job instead of touching Redis.
#[derive(Default)]
pub struct RecordingJobProducer {
    pub jobs: Mutex<ProducedJobs>,
}

impl RecordingJobProducer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn submission_count(&self) -> usize {
        self.jobs.lock().unwrap().submissions.len()
    }

    pub fn status_check_count(&self) -> usize {
        self.jobs.lock().unwrap().status_checks.len()
    }
}

#[async_trait]
impl JobProducerTrait for RecordingJobProducer {
    async fn produce_transaction_request_job(
        &self,
        job: TransactionRequest,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError> {
        self.jobs.lock().unwrap().requests.push((job, scheduled_on));
        Ok(())
    }

    async fn produce_submit_transaction_job(
        &self,
        job: TransactionSend,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError> {
        self.jobs
            .lock()
            .unwrap()
            .submissions
            .push((job, scheduled_on));
        Ok(())
    }

    async fn produce_check_transaction_status_job(
        &self,
        job: TransactionStatusCheck,
        scheduled_on: Option<i64>,
    ) -> Result<(), JobProducerError> {
        self.jobs
            .lock()
            .unwrap()
            .status_checks
            .push((job, scheduled_on));
        Ok(())
    }
}

#[derive(Default)]
struct TargetState {
    /// Receipts handed out per hash.
    receipts: HashMap<String, ReceiptState>,
    /// Errors to return for the next dispatches, drained front-first.
    dispatch_failures: Vec<ProviderError>,
    dispatches: u64,
    account_sequences: HashMap<Address, u64>,
}

/// In-memory execution target. Dispatches succeed (producing
/// `0xstub-hash-N`) unless a scripted failure is queued; receipts are
/// whatever the test scripted, defaulting to not-found.
pub struct StubExecutionTarget {
    state: Mutex<TargetState>,
}

impl StubExecutionTarget {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(TargetState::default()),
        })
    }

    pub fn script_receipt(&self, hash: &str, receipt: ReceiptState) {
        self.state
            .lock()
            .unwrap()
            .receipts
            .insert(hash.to_string(), receipt);
    }

    pub fn script_dispatch_failure(&self, error: ProviderError) {
        self.state.lock().unwrap().dispatch_failures.push(error);
    }

    pub fn set_account_sequence(&self, address: Address, sequence: u64) {
        self.state
            .lock()
            .unwrap()
            .account_sequences
            .insert(address, sequence);
    }

    pub fn dispatch_count(&self) -> u64 {
        self.state.lock().unwrap().dispatches
    }
}

#[async_trait]
impl ExecutionTargetTrait for StubExecutionTarget {
    async fn send_raw_transaction(&self, _raw: Vec<u8>) -> Result<String, ProviderError> {
        let mut state = self.state.lock().unwrap();
        if !state.dispatch_failures.is_empty() {
            return Err(state.dispatch_failures.remove(0));
        }
        state.dispatches += 1;
        Ok(format!("0xstub-hash-{}", state.dispatches))
    }

    async fn get_receipt(&self, hash: String) -> Result<ReceiptState, ProviderError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .receipts
            .get(&hash)
            .copied()
            .unwrap_or(ReceiptState::NotFound))
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ProviderError> {
        let state = self.state.lock().unwrap();
        Ok(state.account_sequences.get(&address).copied().unwrap_or(0))
    }

    async fn estimate_gas(
        &self,
        _from: Address,
        _to: Address,
        _value: U256,
        _calldata: Vec<u8>,
    ) -> Result<u64, ProviderError> {
        Ok(21_000)
    }

    async fn get_gas_price(&self) -> Result<u128, ProviderError> {
        Ok(1_000_000_000)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}
