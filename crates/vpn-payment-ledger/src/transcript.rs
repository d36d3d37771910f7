//! audit transcripts produced by each invocation
//!
//! the public transcript is what an external verifier replays: every ledger
//! op a circuit ran, with the values it read. the private transcript holds
//! witness outputs and is never published.

use merlin::Transcript;
use scale_codec::Encode;

use crate::ledger::{Path, Value};
use crate::types::Bytes32;

/// domain for transcript digests
pub const TRANSCRIPT_DOMAIN: &[u8] = b"vpn-payment.transcript.v1";

/// an executed ledger op
#[derive(Clone, Debug, PartialEq, Eq, Encode)]
pub enum TranscriptOp {
    Read { path: Path, cached: bool, result: Value },
    Write { path: Path, value: Value },
    Increment { path: Path, amount: u64 },
}

/// append-only log of public ledger ops
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicTranscript(Vec<TranscriptOp>);

impl PublicTranscript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn extend(&mut self, ops: impl IntoIterator<Item = TranscriptOp>) {
        self.0.extend(ops);
    }

    pub fn ops(&self) -> &[TranscriptOp] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// reads observed, in order
    pub fn reads(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().filter_map(|op| match op {
            TranscriptOp::Read { result, .. } => Some(result),
            _ => None,
        })
    }

    /// fiat-shamir style binding of the whole log
    pub fn digest(&self) -> Bytes32 {
        let mut t = Transcript::new(TRANSCRIPT_DOMAIN);
        t.append_u64(b"len", self.0.len() as u64);
        for op in &self.0 {
            t.append_message(b"op", &op.encode());
        }
        let mut out = [0u8; 32];
        t.challenge_bytes(b"digest", &mut out);
        out
    }
}

/// append-only log of witness outputs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrivateTranscript(Vec<Value>);

impl PrivateTranscript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    pub fn outputs(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// bookkeeping an external prover needs for one invocation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProofData {
    /// encoded circuit arguments
    pub input: Vec<Value>,
    /// encoded circuit result
    pub output: Vec<Value>,
    pub public_transcript: PublicTranscript,
    pub private_transcript_outputs: PrivateTranscript,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Key;

    fn read(n: u64) -> TranscriptOp {
        TranscriptOp::Read {
            path: vec![Key::Index(4)],
            cached: true,
            result: Value::Uint(n),
        }
    }

    #[test]
    fn test_digest_binds_content() {
        let mut a = PublicTranscript::new();
        a.extend([read(1)]);
        let mut b = PublicTranscript::new();
        b.extend([read(1)]);
        assert_eq!(a.digest(), b.digest());

        let mut c = PublicTranscript::new();
        c.extend([read(2)]);
        assert_ne!(a.digest(), c.digest());

        // empty log still has a stable digest
        assert_eq!(PublicTranscript::new().digest(), PublicTranscript::new().digest());
        assert_ne!(PublicTranscript::new().digest(), a.digest());
    }

    #[test]
    fn test_reads_filter() {
        let mut t = PublicTranscript::new();
        t.extend([
            read(3),
            TranscriptOp::Increment {
                path: vec![Key::Index(4)],
                amount: 1,
            },
            read(4),
        ]);
        let reads: Vec<_> = t.reads().copied().collect();
        assert_eq!(reads, vec![Value::Uint(3), Value::Uint(4)]);
    }
}
