//! Bidder pot resolution

use solana_program::{program_pack::Pack, pubkey::Pubkey, system_instruction};
use solana_sdk::signature::{Keypair, Signer};
use spl_token::state::Account as TokenAccount;
use tracing::{debug, info};

use crate::{
    batch::InstructionBatch,
    error::{BidError, BidResult},
    provider::CancelBid,
    state::{AuctionView, Holdings},
};

/// Outcome of resolving the bidder pot
#[derive(Debug)]
pub struct EscrowResolution {
    /// Token account escrowing the bid
    pub bidder_pot_token: Pubkey,
    /// Account creation, empty when the pot is reused
    pub setup: InstructionBatch,
    /// Unwinds the previous bid; runs before everything else
    pub cancellation: Option<InstructionBatch>,
}

/// Create the bidder pot token account, or reuse it and cancel the live bid.
///
/// A new pot is a token account in the auction's mint, owned by the auction,
/// funded with the rent-exempt `reserve`. An existing pot must belong to
/// `bidder`, and on an auction that has not ended it is first emptied through
/// `cancel_bid`.
pub async fn resolve_escrow(
    token_program_id: &Pubkey,
    auction: &AuctionView,
    holdings: &Holdings,
    bidder: &Pubkey,
    reserve: u64,
    now: i64,
    cancel_bid: &dyn CancelBid,
) -> BidResult<EscrowResolution> {
    let Some(pot) = &auction.my_bidder_pot else {
        let pot_account = Keypair::new();
        let bidder_pot_token = pot_account.pubkey();

        let setup = InstructionBatch::new()
            .with_instruction(system_instruction::create_account(
                bidder,
                &bidder_pot_token,
                reserve,
                TokenAccount::LEN as u64,
                token_program_id,
            ))
            .with_instruction(spl_token::instruction::initialize_account(
                token_program_id,
                &bidder_pot_token,
                &auction.token_mint,
                &auction.auction,
            )?)
            .with_signer(pot_account);

        info!(
            "Creating bidder pot {} for {} on auction {}",
            bidder_pot_token, bidder, auction.auction
        );
        return Ok(EscrowResolution {
            bidder_pot_token,
            setup,
            cancellation: None,
        });
    };

    if pot.bidder_act != *bidder {
        return Err(BidError::ForeignBidderPot {
            pot: pot.bidder_pot,
            owner: pot.bidder_act,
        });
    }

    if auction.ended(now) {
        debug!("Auction {} ended, reusing pot without cancel", auction.auction);
        return Ok(EscrowResolution {
            bidder_pot_token: pot.bidder_pot,
            setup: InstructionBatch::new(),
            cancellation: None,
        });
    }

    let cancellation = cancel_bid
        .build(auction, holdings, reserve, bidder)
        .await
        .map_err(|e| BidError::CancellationUnavailable(e.to_string()))?;

    if cancellation.is_empty() {
        return Err(BidError::CancellationUnavailable(format!(
            "empty cancellation for bidder pot {}",
            pot.bidder_pot
        )));
    }

    info!(
        "Cancelling existing bid in pot {} before rebid ({} instructions)",
        pot.bidder_pot,
        cancellation.len()
    );
    Ok(EscrowResolution {
        bidder_pot_token: pot.bidder_pot,
        setup: InstructionBatch::new(),
        cancellation: Some(cancellation),
    })
}
