//! Instruction batches and their composition

use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_sdk::signature::{Keypair, Signer};

/// Ordered instructions plus the ephemeral keypairs that must sign them.
///
/// The bidder's own signature is not part of the batch; the wallet adds it
/// at submission time.
#[derive(Debug, Default)]
pub struct InstructionBatch {
    instructions: Vec<Instruction>,
    signers: Vec<Keypair>,
}

impl InstructionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(instructions: Vec<Instruction>, signers: Vec<Keypair>) -> Self {
        let mut batch = Self::new();
        batch.instructions = instructions;
        for signer in signers {
            batch.push_signer(signer);
        }
        batch
    }

    pub fn with_instruction(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    pub fn with_signer(mut self, signer: Keypair) -> Self {
        self.push_signer(signer);
        self
    }

    /// Append another batch after this one
    pub fn append(mut self, other: InstructionBatch) -> Self {
        self.instructions.extend(other.instructions);
        for signer in other.signers {
            self.push_signer(signer);
        }
        self
    }

    fn push_signer(&mut self, signer: Keypair) {
        let pubkey = signer.pubkey();
        if !self.signers.iter().any(|s| s.pubkey() == pubkey) {
            self.signers.push(signer);
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn signers(&self) -> &[Keypair] {
        &self.signers
    }

    pub fn signer_pubkeys(&self) -> Vec<Pubkey> {
        self.signers.iter().map(|s| s.pubkey()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn into_parts(self) -> (Vec<Instruction>, Vec<Keypair>) {
        (self.instructions, self.signers)
    }
}

/// Merge the parts of a place-bid into one batch.
///
/// Order is cancellation, setup, bid, cleanup. Signers are deduplicated by
/// public key.
pub fn compose(
    cancellation: Option<InstructionBatch>,
    setup: InstructionBatch,
    bid: Instruction,
    cleanup: InstructionBatch,
) -> InstructionBatch {
    cancellation
        .unwrap_or_default()
        .append(setup)
        .with_instruction(bid)
        .append(cleanup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(tag: u8) -> Instruction {
        Instruction::new_with_bytes(Pubkey::new_unique(), &[tag], vec![])
    }

    fn tags(batch: &InstructionBatch) -> Vec<u8> {
        batch.instructions().iter().map(|ix| ix.data[0]).collect()
    }

    #[test]
    fn test_compose_order() {
        let cancel = InstructionBatch::new()
            .with_instruction(marker(1))
            .with_instruction(marker(2));
        let setup = InstructionBatch::new()
            .with_instruction(marker(3))
            .with_instruction(marker(4));
        let cleanup = InstructionBatch::new().with_instruction(marker(6));

        let batch = compose(Some(cancel), setup, marker(5), cleanup);
        assert_eq!(tags(&batch), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_compose_without_cancellation() {
        let setup = InstructionBatch::new().with_instruction(marker(3));
        let batch = compose(None, setup, marker(5), InstructionBatch::new());
        assert_eq!(tags(&batch), vec![3, 5]);
    }

    #[test]
    fn test_signers_deduplicated() {
        let keypair = Keypair::new();
        let duplicate = Keypair::from_bytes(&keypair.to_bytes()).unwrap();
        let other = Keypair::new();
        let expected = vec![keypair.pubkey(), other.pubkey()];

        let cancel = InstructionBatch::new().with_signer(keypair);
        let setup = InstructionBatch::from_parts(vec![], vec![duplicate, other]);

        let batch = compose(Some(cancel), setup, marker(0), InstructionBatch::new());
        assert_eq!(batch.signer_pubkeys(), expected);
    }
}
