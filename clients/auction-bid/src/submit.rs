//! Handing a finished batch to the ledger

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use tracing::{debug, info};

use crate::{
    batch::InstructionBatch,
    error::{BidError, BidResult, CollaboratorError},
    place_bid::{setup_place_bid, BidContext},
    state::{AuctionView, Bid, BidRequest},
    wallet::BidderWallet,
};

/// Sends one batch as a single transaction
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(
        &self,
        wallet: &dyn BidderWallet,
        batch: &InstructionBatch,
        commitment: CommitmentConfig,
    ) -> Result<Signature, CollaboratorError>;
}

/// Sign `batch` with its ephemeral keypairs and the wallet, paid by the wallet.
pub fn sign_batch(
    wallet: &dyn BidderWallet,
    batch: &InstructionBatch,
    recent_blockhash: Hash,
) -> Result<Transaction, CollaboratorError> {
    let payer = wallet.pubkey();
    let mut transaction = Transaction::new_with_payer(batch.instructions(), Some(&payer));

    let signers: Vec<&Keypair> = batch.signers().iter().collect();
    transaction.try_partial_sign(&signers, recent_blockhash)?;
    wallet.sign_transaction(&mut transaction)?;

    Ok(transaction)
}

/// Sends the transaction once, without terminal output, and waits until the
/// signature reaches `commitment`.
#[async_trait]
impl TransactionSubmitter for RpcClient {
    async fn submit(
        &self,
        wallet: &dyn BidderWallet,
        batch: &InstructionBatch,
        commitment: CommitmentConfig,
    ) -> Result<Signature, CollaboratorError> {
        let recent_blockhash = self.get_latest_blockhash().await?;
        let transaction = sign_batch(wallet, batch, recent_blockhash)?;

        let signature = self.send_transaction(&transaction).await?;
        debug!("Sent {}, waiting for {:?}", signature, commitment.commitment);
        self.poll_for_signature_with_commitment(&signature, commitment)
            .await?;

        Ok(signature)
    }
}

/// Result of a submitted bid
#[derive(Debug, Clone)]
pub struct SentBid {
    pub signature: Signature,
    pub bid: Bid,
}

/// Build the place-bid batch and submit it once at the configured commitment
pub async fn send_place_bid(
    ctx: BidContext<'_>,
    submitter: &dyn TransactionSubmitter,
    wallet: &dyn BidderWallet,
    auction: &AuctionView,
    request: &BidRequest,
) -> BidResult<SentBid> {
    let placed = setup_place_bid(ctx, auction, request).await?;

    let signature = submitter
        .submit(wallet, &placed.batch, ctx.config.commitment)
        .await
        .map_err(BidError::SubmissionFailure)?;

    info!("Bid confirmed with signature {}", signature);
    Ok(SentBid {
        signature,
        bid: placed.bid,
    })
}
