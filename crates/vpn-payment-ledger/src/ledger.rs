//! ledger state store data model
//!
//! the public state is a tree of [`StateValue`]s addressed by paths of
//! [`Key`]s. this contract only uses a flat array of five cells, but
//! lookups go through the same path walk a composite cell would need.
//!
//! ```text
//! root (array)
//! ├─ [0] providerCommitment  bytes32
//! ├─ [1] pricingTierCount    u64
//! ├─ [2] totalPayments       u64
//! ├─ [3] nullifierCount      u64
//! └─ [4] sequence            u64
//! ```

use core::fmt;

use scale_codec::{Decode, Encode};

use crate::error::LedgerError;
use crate::types::Bytes32;

/// leaf value stored in a cell
#[derive(Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum Value {
    Bytes(Bytes32),
    Uint(u64),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bytes(_) => ValueKind::Bytes32,
            Value::Uint(_) => ValueKind::Uint64,
        }
    }

    pub fn as_bytes(&self) -> Result<Bytes32, LedgerError> {
        match self {
            Value::Bytes(b) => Ok(*b),
            other => Err(LedgerError::TypeMismatch {
                expected: ValueKind::Bytes32,
                found: other.kind(),
            }),
        }
    }

    pub fn as_uint(&self) -> Result<u64, LedgerError> {
        match self {
            Value::Uint(n) => Ok(*n),
            other => Err(LedgerError::TypeMismatch {
                expected: ValueKind::Uint64,
                found: other.kind(),
            }),
        }
    }

    /// the zero value of a kind
    pub fn default_of(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bytes32 => Value::Bytes([0u8; 32]),
            ValueKind::Uint64 => Value::Uint(0),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bytes(b) => write!(f, "Bytes({})", hex::encode(b)),
            Value::Uint(n) => write!(f, "Uint({})", n),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Bytes32,
    Uint64,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bytes32 => f.write_str("Bytes<32>"),
            ValueKind::Uint64 => f.write_str("Uint<64>"),
        }
    }
}

/// node of the public state tree
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum StateValue {
    Null,
    Cell(Value),
    Array(Vec<StateValue>),
}

/// one step of a path into the state tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode)]
pub enum Key {
    Index(u8),
}

pub type Path = Vec<Key>;

impl StateValue {
    /// walk `path` and return the node it names
    pub fn get(&self, path: &[Key]) -> Result<&StateValue, LedgerError> {
        let mut node = self;
        for (depth, key) in path.iter().enumerate() {
            let Key::Index(i) = *key;
            node = match node {
                StateValue::Array(items) => items
                    .get(i as usize)
                    .ok_or_else(|| LedgerError::PathOutOfRange(path[..=depth].to_vec()))?,
                _ => return Err(LedgerError::NotAnArray(path[..depth].to_vec())),
            };
        }
        Ok(node)
    }

    pub fn get_mut(&mut self, path: &[Key]) -> Result<&mut StateValue, LedgerError> {
        let mut node = self;
        for (depth, key) in path.iter().enumerate() {
            let Key::Index(i) = *key;
            node = match node {
                StateValue::Array(items) => items
                    .get_mut(i as usize)
                    .ok_or_else(|| LedgerError::PathOutOfRange(path[..=depth].to_vec()))?,
                _ => return Err(LedgerError::NotAnArray(path[..depth].to_vec())),
            };
        }
        Ok(node)
    }

    /// the leaf value at `path`
    pub fn cell(&self, path: &[Key]) -> Result<Value, LedgerError> {
        match self.get(path)? {
            StateValue::Cell(v) => Ok(*v),
            _ => Err(LedgerError::NotACell(path.to_vec())),
        }
    }
}

/// the five public fields of the contract, in schema order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Field {
    ProviderCommitment = 0,
    PricingTierCount = 1,
    TotalPayments = 2,
    NullifierCount = 3,
    Sequence = 4,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::ProviderCommitment,
        Field::PricingTierCount,
        Field::TotalPayments,
        Field::NullifierCount,
        Field::Sequence,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn path(self) -> Path {
        vec![Key::Index(self.index())]
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Field::ProviderCommitment => ValueKind::Bytes32,
            _ => ValueKind::Uint64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::ProviderCommitment => "providerCommitment",
            Field::PricingTierCount => "pricingTierCount",
            Field::TotalPayments => "totalPayments",
            Field::NullifierCount => "nullifierCount",
            Field::Sequence => "sequence",
        }
    }
}

/// public contract state
///
/// only constructible through [`LedgerState::from_raw`], which enforces the
/// five-cell schema, or [`LedgerState::blank`]
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct LedgerState {
    data: StateValue,
}

impl LedgerState {
    /// schema-shaped state with every cell at its zero value
    pub fn blank() -> Self {
        let cells = Field::ALL
            .iter()
            .map(|f| StateValue::Cell(Value::default_of(f.kind())))
            .collect();
        Self {
            data: StateValue::Array(cells),
        }
    }

    /// wrap a raw tree after checking it against the schema
    pub fn from_raw(data: StateValue) -> Result<Self, LedgerError> {
        check_schema(&data)?;
        Ok(Self { data })
    }

    pub fn data(&self) -> &StateValue {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut StateValue {
        &mut self.data
    }

    /// raw cell read by field
    pub fn get(&self, field: Field) -> Result<Value, LedgerError> {
        self.data.cell(&field.path())
    }

    /// blake3 over the scale encoding
    pub fn root(&self) -> Bytes32 {
        *blake3::hash(&self.encode()).as_bytes()
    }
}

fn check_schema(data: &StateValue) -> Result<(), LedgerError> {
    let StateValue::Array(cells) = data else {
        return Err(LedgerError::SchemaMismatch("root is not an array".into()));
    };
    if cells.len() != Field::ALL.len() {
        return Err(LedgerError::SchemaMismatch(format!(
            "expected {} cells, found {}",
            Field::ALL.len(),
            cells.len()
        )));
    }
    for field in Field::ALL {
        let value = data.cell(&field.path())?;
        if value.kind() != field.kind() {
            return Err(LedgerError::SchemaMismatch(format!(
                "{} holds {}, expected {}",
                field.name(),
                value.kind(),
                field.kind()
            )));
        }
    }
    Ok(())
}

/// typed read-only projection of a [`LedgerState`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ledger {
    pub provider_commitment: Bytes32,
    pub pricing_tier_count: u64,
    pub total_payments: u64,
    pub nullifier_count: u64,
    pub sequence: u64,
}

impl Ledger {
    pub fn project(state: &LedgerState) -> Result<Self, LedgerError> {
        Ok(Self {
            provider_commitment: state.get(Field::ProviderCommitment)?.as_bytes()?,
            pricing_tier_count: state.get(Field::PricingTierCount)?.as_uint()?,
            total_payments: state.get(Field::TotalPayments)?.as_uint()?,
            nullifier_count: state.get(Field::NullifierCount)?.as_uint()?,
            sequence: state.get(Field::Sequence)?.as_uint()?,
        })
    }
}
