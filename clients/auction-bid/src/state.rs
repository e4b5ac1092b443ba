//! Auction and token state as seen by the bidding client

use std::collections::HashMap;

use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

/// Auction lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuctionState {
    /// Created but not yet accepting bids
    Created = 0,
    /// Live and accepting bids
    Started = 1,
    /// Closed, no further bids
    Ended = 2,
}

impl Default for AuctionState {
    fn default() -> Self {
        Self::Created
    }
}

/// The bidder's existing pot for an auction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidderPotView {
    /// Token account holding the escrowed bid
    pub bidder_pot: Pubkey,
    /// Bidder who owns the pot
    pub bidder_act: Pubkey,
}

/// Public state of one auction
#[derive(Debug, Clone)]
pub struct AuctionView {
    /// Auction account
    pub auction: Pubkey,
    /// Vault the auction is keyed on
    pub resource: Pubkey,
    /// Mint bids are denominated in
    pub token_mint: Pubkey,
    /// Current state
    pub state: AuctionState,
    /// Scheduled end, if the auction has a timer
    pub ended_at: Option<UnixTimestamp>,
    /// Window after the last bid during which the auction stays open
    pub end_auction_gap: Option<UnixTimestamp>,
    /// Time of the most recent bid
    pub last_bid: Option<UnixTimestamp>,
    /// The caller's pot, if they have bid before
    pub my_bidder_pot: Option<BidderPotView>,
}

impl AuctionView {
    /// Whether the auction no longer accepts bids at `now`.
    ///
    /// A timed auction is open through its `ended_at` second, and a bid placed
    /// inside the end gap keeps it open until `last_bid + end_auction_gap`.
    pub fn ended(&self, now: UnixTimestamp) -> bool {
        if self.state == AuctionState::Ended {
            return true;
        }
        let Some(ended_at) = self.ended_at else {
            return false;
        };
        if ended_at >= now {
            return false;
        }
        match (self.end_auction_gap, self.last_bid) {
            (Some(gap), Some(last_bid)) => last_bid.saturating_add(gap) < now,
            _ => true,
        }
    }
}

/// Mint metadata needed for unit conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub decimals: u8,
}

/// A cached SPL token account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHolding {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    /// Wrapped native currency
    pub is_native: bool,
}

/// Bidder token accounts grouped by mint
pub type Holdings = HashMap<Pubkey, Vec<TokenHolding>>;

/// Decoded account as returned by the account-state cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedAccount {
    Mint(MintInfo),
    Token(TokenHolding),
}

/// Everything the caller knows when placing a bid
#[derive(Debug, Clone)]
pub struct BidRequest {
    /// Bidder identity, also fee payer
    pub bidder: Pubkey,
    /// Existing token account to fund the bid from
    pub bidder_token_account: Option<Pubkey>,
    /// Bidder token accounts by mint
    pub holdings: Holdings,
    /// Decimal amount entered by the user
    pub amount: f64,
    /// Timestamp used to evaluate whether the auction has ended
    pub observed_at: UnixTimestamp,
}

/// Normalized bid amount in base units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bid {
    /// Bid amount plus one rent-exempt reserve
    lamports: u64,
    /// Rent-exempt reserve for a token account
    reserve: u64,
}

impl Bid {
    pub(crate) fn new(lamports: u64, reserve: u64) -> Self {
        Self { lamports, reserve }
    }

    /// Base amount including the reserve
    pub fn lamports(&self) -> u64 {
        self.lamports
    }

    pub fn reserve(&self) -> u64 {
        self.reserve
    }

    /// Amount actually placed in the auction
    pub fn amount(&self) -> u64 {
        self.lamports - self.reserve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(state: AuctionState, ended_at: Option<UnixTimestamp>) -> AuctionView {
        AuctionView {
            auction: Pubkey::new_unique(),
            resource: Pubkey::new_unique(),
            token_mint: Pubkey::new_unique(),
            state,
            ended_at,
            end_auction_gap: None,
            last_bid: None,
            my_bidder_pot: None,
        }
    }

    #[test]
    fn test_ended_by_state() {
        assert!(view(AuctionState::Ended, None).ended(0));
        assert!(!view(AuctionState::Started, None).ended(i64::MAX));
    }

    #[test]
    fn test_ended_by_timer() {
        let auction = view(AuctionState::Started, Some(1_700_000_000));
        assert!(!auction.ended(1_699_999_999));
        assert!(!auction.ended(1_700_000_000));
        assert!(auction.ended(1_700_000_001));
    }

    #[test]
    fn test_end_gap_extends_auction() {
        let mut auction = view(AuctionState::Started, Some(1_700_000_000));
        auction.end_auction_gap = Some(600);
        auction.last_bid = Some(1_699_999_900);

        assert!(!auction.ended(1_700_000_100));
        assert!(!auction.ended(1_700_000_500));
        assert!(auction.ended(1_700_000_501));
    }

    #[test]
    fn test_end_gap_needs_a_bid() {
        let mut auction = view(AuctionState::Started, Some(1_700_000_000));
        auction.end_auction_gap = Some(600);
        assert!(auction.ended(1_700_000_001));
    }
}
