//! query protocol over the ledger state
//!
//! circuits never touch [`LedgerState`] directly. they hand a short program
//! of [`Op`]s to a [`QueryContext`], which runs it against a private copy and
//! returns a new context only if every op succeeded. the caller's context is
//! never modified, so a failed program leaves nothing behind.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::LedgerError;
use crate::ledger::{Key, LedgerState, Path, StateValue, Value};
use crate::transcript::TranscriptOp;
use crate::types::ContractAddress;

/// primitive ledger operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    /// read the cell at `path`; `cached` lets a repeated read reuse an
    /// earlier load from the same invocation
    Read { path: Path, cached: bool },
    /// replace the cell at `path`, keeping its type
    Write { path: Path, value: Value },
    /// add `amount` to the counter at `path`
    Increment { path: Path, amount: u64 },
}

impl Op {
    pub fn read(path: Path) -> Self {
        Op::Read { path, cached: false }
    }

    pub fn read_cached(path: Path) -> Self {
        Op::Read { path, cached: true }
    }

    pub fn write(path: Path, value: Value) -> Self {
        Op::Write { path, value }
    }

    pub fn increment(path: Path, amount: u64) -> Self {
        Op::Increment { path, amount }
    }
}

/// ledger state plus the per-invocation read cache
#[derive(Clone, Debug)]
pub struct QueryContext {
    state: LedgerState,
    address: ContractAddress,
    cache: BTreeMap<Path, Value>,
}

/// outcome of a committed program
#[derive(Clone, Debug)]
pub struct QueryResults {
    /// context with every op applied
    pub context: QueryContext,
    /// executed ops with read results filled in
    pub transcript: Vec<TranscriptOp>,
    /// reads served from the cache
    pub cache_hits: usize,
}

impl QueryResults {
    /// read results in program order
    pub fn reads(&self) -> impl Iterator<Item = Value> + '_ {
        self.transcript.iter().filter_map(|op| match op {
            TranscriptOp::Read { result, .. } => Some(*result),
            _ => None,
        })
    }

    /// the single read of a one-read program
    pub fn single_read(&self) -> Result<Value, LedgerError> {
        let mut reads = self.reads();
        match (reads.next(), reads.next()) {
            (Some(v), None) => Ok(v),
            _ => Err(LedgerError::SchemaMismatch(
                "program did not produce exactly one read".into(),
            )),
        }
    }
}

impl QueryContext {
    pub fn new(state: LedgerState, address: ContractAddress) -> Self {
        Self {
            state,
            address,
            cache: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn into_state(self) -> LedgerState {
        self.state
    }

    pub fn address(&self) -> ContractAddress {
        self.address
    }

    /// run `program` all-or-nothing
    pub fn query(&self, program: &[Op]) -> Result<QueryResults, LedgerError> {
        let mut next = self.clone();
        let mut transcript = Vec::with_capacity(program.len());
        let mut cache_hits = 0;

        for op in program {
            let entry = match op {
                Op::Read { path, cached } => {
                    let hit = if *cached { next.cache.get(path).copied() } else { None };
                    let result = match hit {
                        Some(v) => {
                            cache_hits += 1;
                            v
                        }
                        None => {
                            let v = next.state.data().cell(path)?;
                            if *cached {
                                next.cache.insert(path.clone(), v);
                            }
                            v
                        }
                    };
                    TranscriptOp::Read {
                        path: path.clone(),
                        cached: *cached,
                        result,
                    }
                }
                Op::Write { path, value } => {
                    next.write(path, *value)?;
                    TranscriptOp::Write {
                        path: path.clone(),
                        value: *value,
                    }
                }
                Op::Increment { path, amount } => {
                    next.increment(path, *amount)?;
                    TranscriptOp::Increment {
                        path: path.clone(),
                        amount: *amount,
                    }
                }
            };
            transcript.push(entry);
        }

        debug!(ops = program.len(), cache_hits, "query committed");

        Ok(QueryResults {
            context: next,
            transcript,
            cache_hits,
        })
    }

    fn write(&mut self, path: &[Key], value: Value) -> Result<(), LedgerError> {
        let slot = self.state.data_mut().get_mut(path)?;
        match slot {
            StateValue::Cell(current) if current.kind() == value.kind() => *current = value,
            StateValue::Cell(current) => {
                return Err(LedgerError::TypeMismatch {
                    expected: current.kind(),
                    found: value.kind(),
                })
            }
            _ => return Err(LedgerError::NotACell(path.to_vec())),
        }
        self.invalidate(path);
        Ok(())
    }

    fn increment(&mut self, path: &[Key], amount: u64) -> Result<(), LedgerError> {
        let current = self.state.data().cell(path)?.as_uint()?;
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| LedgerError::CounterOverflow(path.to_vec()))?;
        self.write(path, Value::Uint(updated))
    }

    /// drop cached reads that overlap `path`
    fn invalidate(&mut self, path: &[Key]) {
        self.cache
            .retain(|cached, _| !(cached.starts_with(path) || path.starts_with(cached)));
    }
}
