//! Place-bid batch assembly

use solana_program::program_pack::Pack;
use spl_token::state::Account as TokenAccount;
use tracing::info;

use crate::{
    amount::normalize_amount,
    batch::{compose, InstructionBatch},
    config::BidConfig,
    delegate::approve_delegate,
    error::{BidError, BidResult},
    escrow::resolve_escrow,
    funding::{provision_funding, resolve_funding_source},
    instruction::{place_bid, PlaceBidAccounts},
    provider::{AccountCache, CancelBid, RentOracle},
    state::{AuctionView, Bid, BidRequest},
};

/// A finished batch and the bid it places
#[derive(Debug)]
pub struct PlacedBid {
    pub batch: InstructionBatch,
    pub bid: Bid,
}

/// Collaborators consulted while building a bid
#[derive(Clone, Copy)]
pub struct BidContext<'a> {
    pub config: &'a BidConfig,
    pub cache: &'a dyn AccountCache,
    pub rent: &'a dyn RentOracle,
    pub cancel_bid: &'a dyn CancelBid,
}

/// Build the complete batch that places `request` on `auction`.
///
/// The batch cancels any live bid, creates or reuses the bidder pot, funds and
/// delegates the bid amount, places the bid and cleans up. Any failure returns
/// an error and no partial batch.
pub async fn setup_place_bid(
    ctx: BidContext<'_>,
    auction: &AuctionView,
    request: &BidRequest,
) -> BidResult<PlacedBid> {
    let config = ctx.config;
    let token_program_id = &config.token_program_id;

    let reserve = ctx
        .rent
        .minimum_balance(TokenAccount::LEN)
        .await
        .map_err(BidError::RentOracleFailure)?;

    let source = resolve_funding_source(
        ctx.cache,
        request.bidder_token_account.as_ref(),
        &auction.token_mint,
        &request.bidder,
    )?;
    let bid = normalize_amount(request.amount, source.mint.decimals, reserve)?;

    let escrow = resolve_escrow(
        token_program_id,
        auction,
        &request.holdings,
        &request.bidder,
        reserve,
        request.observed_at,
        ctx.cancel_bid,
    )
    .await?;

    let funding = provision_funding(
        token_program_id,
        &auction.token_mint,
        &request.bidder,
        source.token_account.as_ref(),
        &bid,
    )?;

    let approval = approve_delegate(
        token_program_id,
        &funding.funding_account,
        &request.bidder,
        bid.amount(),
    )?;

    let bid_ix = place_bid(
        &config.auction_program_id,
        token_program_id,
        &PlaceBidAccounts {
            bidder: request.bidder,
            bidder_token: funding.funding_account,
            bidder_pot_token: escrow.bidder_pot_token,
            auction: auction.auction,
            token_mint: auction.token_mint,
            transfer_authority: approval.transfer_authority,
            payer: request.bidder,
            resource: auction.resource,
        },
        bid.amount(),
    )?;

    let setup = escrow.setup.append(funding.setup).append(approval.setup);
    let cleanup = approval.cleanup.append(funding.cleanup);
    let batch = compose(escrow.cancellation, setup, bid_ix, cleanup);

    info!(
        "Bid {} placed by {} on auction {} ({} instructions, {} signers)",
        bid.amount(),
        request.bidder,
        auction.auction,
        batch.len(),
        batch.signers().len()
    );
    Ok(PlacedBid { batch, bid })
}
