//! Bidder wallet capability

use solana_program::pubkey::Pubkey;
use solana_sdk::{
    signature::{Keypair, Signer},
    signer::SignerError,
    transaction::Transaction,
};

/// The bidder's identity and the ability to sign for it.
///
/// Browser and hardware wallets only expose these two operations, so the
/// batch builder never sees a private key.
pub trait BidderWallet: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Add the wallet's signature using the transaction's recent blockhash
    fn sign_transaction(&self, transaction: &mut Transaction) -> Result<(), SignerError>;
}

impl BidderWallet for Keypair {
    fn pubkey(&self) -> Pubkey {
        Signer::pubkey(self)
    }

    fn sign_transaction(&self, transaction: &mut Transaction) -> Result<(), SignerError> {
        let recent_blockhash = transaction.message.recent_blockhash;
        transaction.try_partial_sign(&[self], recent_blockhash)
    }
}
