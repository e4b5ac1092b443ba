//! Client configuration

use std::str::FromStr;

use solana_program::{
    pubkey,
    pubkey::{ParsePubkeyError, Pubkey},
};
use solana_sdk::commitment_config::CommitmentConfig;

/// Default deployment of the auction program
pub const AUCTION_PROGRAM_ID: Pubkey = pubkey!("auctxRXPeJoc4817jDhf4HbjnhEcr1cCXenosMhK5R8");

/// Program ids and policies used when building and sending bids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidConfig {
    /// Auction program receiving `PlaceBid`
    pub auction_program_id: Pubkey,
    /// SPL token program
    pub token_program_id: Pubkey,
    /// Confirmation level requested from the submitter
    pub commitment: CommitmentConfig,
}

impl Default for BidConfig {
    fn default() -> Self {
        Self {
            auction_program_id: AUCTION_PROGRAM_ID,
            token_program_id: spl_token::id(),
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

impl BidConfig {
    /// Build a config for an auction program deployed at a base58 address
    pub fn from_program_address(auction_program_id: &str) -> Result<Self, ParsePubkeyError> {
        Ok(Self {
            auction_program_id: Pubkey::from_str(auction_program_id)?,
            ..Self::default()
        })
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }
}
