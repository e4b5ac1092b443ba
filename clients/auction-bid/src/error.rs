//! Bid construction errors

use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use thiserror::Error;

/// Error type returned by external collaborators (RPC, cancellation builder, submitter)
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while assembling a place-bid batch
#[derive(Error, Debug)]
pub enum BidError {
    #[error("Bid amount must be finite and non-negative, got {0}")]
    InvalidAmount(f64),

    #[error("Account state not cached for {address}")]
    MissingAccountState { address: Pubkey },

    #[error("Bidder pot {pot} belongs to {owner}")]
    ForeignBidderPot { pot: Pubkey, owner: Pubkey },

    #[error("Existing bid cannot be cancelled: {0}")]
    CancellationUnavailable(String),

    #[error("Rent exemption query failed")]
    RentOracleFailure(#[source] CollaboratorError),

    #[error("Cannot wrap native currency into non-native mint {mint}")]
    UnwrappableQuoteMint { mint: Pubkey },

    #[error("Math overflow")]
    MathOverflow,

    #[error("Token instruction rejected: {0}")]
    TokenInstruction(#[from] ProgramError),

    #[error("Instruction data serialization failed: {0}")]
    Serialization(#[from] std::io::Error),

    #[error("Transaction submission failed")]
    SubmissionFailure(#[source] CollaboratorError),
}

pub type BidResult<T> = Result<T, BidError>;
