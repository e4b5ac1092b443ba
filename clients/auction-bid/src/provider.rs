//! Read-only collaborators consumed while building a bid

use std::collections::HashMap;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::{pubkey::Pubkey, rent::Rent};

use crate::{
    batch::InstructionBatch,
    error::CollaboratorError,
    state::{AuctionView, CachedAccount, Holdings, MintInfo, TokenHolding},
};

/// Resolves addresses to already-fetched account state.
pub trait AccountCache: Send + Sync {
    fn get(&self, address: &Pubkey) -> Option<CachedAccount>;

    fn get_mint(&self, address: &Pubkey) -> Option<MintInfo> {
        match self.get(address)? {
            CachedAccount::Mint(mint) => Some(mint),
            CachedAccount::Token(_) => None,
        }
    }

    fn get_token_account(&self, address: &Pubkey) -> Option<TokenHolding> {
        match self.get(address)? {
            CachedAccount::Token(holding) => Some(holding),
            CachedAccount::Mint(_) => None,
        }
    }
}

/// In-memory account cache
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountCache {
    accounts: HashMap<Pubkey, CachedAccount>,
}

impl MemoryAccountCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: Pubkey, account: CachedAccount) -> Option<CachedAccount> {
        self.accounts.insert(address, account)
    }

    pub fn insert_mint(&mut self, address: Pubkey, mint: MintInfo) {
        self.accounts.insert(address, CachedAccount::Mint(mint));
    }

    pub fn insert_token_account(&mut self, holding: TokenHolding) {
        self.accounts
            .insert(holding.address, CachedAccount::Token(holding));
    }
}

impl AccountCache for MemoryAccountCache {
    fn get(&self, address: &Pubkey) -> Option<CachedAccount> {
        self.accounts.get(address).cloned()
    }
}

/// Minimum balance an account of a given size needs to be rent exempt
#[async_trait]
pub trait RentOracle: Send + Sync {
    async fn minimum_balance(&self, data_len: usize) -> Result<u64, CollaboratorError>;
}

#[async_trait]
impl RentOracle for RpcClient {
    async fn minimum_balance(&self, data_len: usize) -> Result<u64, CollaboratorError> {
        Ok(self
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }
}

/// Fixed rent parameters, no network access
#[async_trait]
impl RentOracle for Rent {
    async fn minimum_balance(&self, data_len: usize) -> Result<u64, CollaboratorError> {
        Ok(Rent::minimum_balance(self, data_len))
    }
}

/// Builds the batch that unwinds the bidder's current bid.
///
/// The returned batch is merged ahead of the new bid by the caller; it must
/// not rely on any other instruction in the place-bid batch.
#[async_trait]
pub trait CancelBid: Send + Sync {
    async fn build(
        &self,
        auction: &AuctionView,
        holdings: &Holdings,
        reserve: u64,
        bidder: &Pubkey,
    ) -> Result<InstructionBatch, CollaboratorError>;
}
