//! Single-use transfer delegation

use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use tracing::debug;

use crate::{batch::InstructionBatch, error::BidResult};

/// Approval granted to an ephemeral transfer authority
#[derive(Debug)]
pub struct DelegateApproval {
    /// Ephemeral delegate, signs the bid
    pub transfer_authority: Pubkey,
    /// Exact amount the delegate may move
    pub amount: u64,
    /// Approve instruction plus the delegate keypair
    pub setup: InstructionBatch,
    /// Revokes anything left of the approval
    pub cleanup: InstructionBatch,
}

/// Approve a fresh keypair to move exactly `amount` out of `source`.
///
/// The token program drops the delegate once the approved amount is spent, so
/// the authority is exhausted by the bid transfer. The revoke in `cleanup`
/// covers a bid that moved less than approved.
pub fn approve_delegate(
    token_program_id: &Pubkey,
    source: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> BidResult<DelegateApproval> {
    let authority = Keypair::new();
    let transfer_authority = authority.pubkey();

    let setup = InstructionBatch::new()
        .with_instruction(spl_token::instruction::approve(
            token_program_id,
            source,
            &transfer_authority,
            owner,
            &[],
            amount,
        )?)
        .with_signer(authority);

    let cleanup = InstructionBatch::new().with_instruction(spl_token::instruction::revoke(
        token_program_id,
        source,
        owner,
        &[],
    )?);

    debug!(
        "Delegating {} from {} to {}",
        amount, source, transfer_authority
    );
    Ok(DelegateApproval {
        transfer_authority,
        amount,
        setup,
        cleanup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_token::instruction::TokenInstruction;

    #[test]
    fn test_approve_exact_amount() {
        let source = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let approval = approve_delegate(&spl_token::id(), &source, &owner, 1_500_000).unwrap();

        assert_eq!(approval.amount, 1_500_000);
        assert_eq!(
            approval.setup.signer_pubkeys(),
            vec![approval.transfer_authority]
        );

        let approve = &approval.setup.instructions()[0];
        assert_eq!(
            TokenInstruction::unpack(&approve.data).unwrap(),
            TokenInstruction::Approve { amount: 1_500_000 }
        );
        // source, delegate, owner
        assert_eq!(approve.accounts[0].pubkey, source);
        assert_eq!(approve.accounts[1].pubkey, approval.transfer_authority);
        assert_eq!(approve.accounts[2].pubkey, owner);

        let revoke = &approval.cleanup.instructions()[0];
        assert_eq!(
            TokenInstruction::unpack(&revoke.data).unwrap(),
            TokenInstruction::Revoke
        );
    }

    #[test]
    fn test_each_approval_uses_fresh_authority() {
        let source = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let first = approve_delegate(&spl_token::id(), &source, &owner, 1).unwrap();
        let second = approve_delegate(&spl_token::id(), &source, &owner, 1).unwrap();
        assert_ne!(first.transfer_authority, second.transfer_authority);
    }
}
