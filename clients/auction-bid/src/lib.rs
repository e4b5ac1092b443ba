//! Auction Bid Client
//!
//! Builds the atomic instruction batch that places, or replaces, a bid on the
//! Solana auction program: bidder pot creation or cancel-before-rebid, native
//! currency wrapping, a single-use transfer delegation and the `PlaceBid`
//! instruction itself.

pub mod amount;
pub mod batch;
pub mod config;
pub mod delegate;
pub mod error;
pub mod escrow;
pub mod funding;
pub mod instruction;
pub mod place_bid;
pub mod provider;
pub mod state;
pub mod submit;
pub mod wallet;

pub use batch::InstructionBatch;
pub use config::BidConfig;
pub use error::{BidError, BidResult};
pub use place_bid::{setup_place_bid, BidContext, PlacedBid};
pub use state::{AuctionView, Bid, BidRequest};
pub use submit::{send_place_bid, SentBid, TransactionSubmitter};
pub use wallet::BidderWallet;
