//! Funding account for the bid

use solana_program::{program_pack::Pack, pubkey::Pubkey, system_instruction};
use solana_sdk::signature::{Keypair, Signer};
use spl_token::state::Account as TokenAccount;
use tracing::{debug, info};

use crate::{
    batch::InstructionBatch,
    error::{BidError, BidResult},
    provider::AccountCache,
    state::{Bid, MintInfo, TokenHolding},
};

/// Where the bid is paid from, and the mint its amount is expressed in
#[derive(Debug, Clone)]
pub struct FundingSource {
    /// Bidder's account that will fund the bid as is, if any
    pub token_account: Option<TokenHolding>,
    /// Auction token mint; both a reused account and a wrapped one hold it
    pub mint: MintInfo,
}

/// Whether `holding` can pay a bid in `token_mint` without wrapping
fn is_reusable(holding: &TokenHolding, token_mint: &Pubkey, bidder: &Pubkey) -> bool {
    holding.mint == *token_mint && holding.owner == *bidder && !holding.is_native
}

/// Look up the bidder's funding account and the mint used for unit conversion.
///
/// A supplied account that cannot fund the bid directly is dropped here, so the
/// amount is always scaled by the decimals of the mint the bid is paid in.
pub fn resolve_funding_source(
    cache: &dyn AccountCache,
    bidder_token_account: Option<&Pubkey>,
    token_mint: &Pubkey,
    bidder: &Pubkey,
) -> BidResult<FundingSource> {
    let token_account = bidder_token_account
        .map(|address| {
            cache
                .get_token_account(address)
                .ok_or(BidError::MissingAccountState { address: *address })
        })
        .transpose()?
        .filter(|holding| {
            let reusable = is_reusable(holding, token_mint, bidder);
            if !reusable {
                debug!(
                    "Account {} cannot fund a bid in {}, wrapping instead",
                    holding.address, token_mint
                );
            }
            reusable
        });

    let mint = cache
        .get_mint(token_mint)
        .ok_or(BidError::MissingAccountState {
            address: *token_mint,
        })?;

    Ok(FundingSource {
        token_account,
        mint,
    })
}

/// Resolved funding account and the instructions around it
#[derive(Debug)]
pub struct FundingResolution {
    /// Account the bid is transferred from
    pub funding_account: Pubkey,
    /// Lamports moved into a fresh wrapped account, if one was created
    pub wrapped_lamports: Option<u64>,
    /// Runs before the bid
    pub setup: InstructionBatch,
    /// Runs after the bid
    pub cleanup: InstructionBatch,
}

/// Reuse the bidder's token account or wrap native currency into a new one.
///
/// An existing non-native account in `token_mint` owned by `bidder` is used as
/// is. Otherwise a
/// fresh account is created with `bid.lamports() + 2 * reserve` lamports,
/// initialized in the native mint, and closed back to the bidder after the bid.
pub fn provision_funding(
    token_program_id: &Pubkey,
    token_mint: &Pubkey,
    bidder: &Pubkey,
    existing: Option<&TokenHolding>,
    bid: &Bid,
) -> BidResult<FundingResolution> {
    if let Some(holding) = existing {
        if is_reusable(holding, token_mint, bidder) {
            debug!("Funding bid from existing account {}", holding.address);
            return Ok(FundingResolution {
                funding_account: holding.address,
                wrapped_lamports: None,
                setup: InstructionBatch::new(),
                cleanup: InstructionBatch::new(),
            });
        }
    }

    let native_mint = spl_token::native_mint::id();
    if *token_mint != native_mint {
        return Err(BidError::UnwrappableQuoteMint { mint: *token_mint });
    }

    let lamports = bid
        .reserve()
        .checked_mul(2)
        .and_then(|reserves| bid.lamports().checked_add(reserves))
        .ok_or(BidError::MathOverflow)?;

    let wrapped = Keypair::new();
    let funding_account = wrapped.pubkey();

    let setup = InstructionBatch::new()
        .with_instruction(system_instruction::create_account(
            bidder,
            &funding_account,
            lamports,
            TokenAccount::LEN as u64,
            token_program_id,
        ))
        .with_instruction(spl_token::instruction::initialize_account(
            token_program_id,
            &funding_account,
            &native_mint,
            bidder,
        )?)
        .with_signer(wrapped);

    let cleanup = InstructionBatch::new().with_instruction(spl_token::instruction::close_account(
        token_program_id,
        &funding_account,
        bidder,
        bidder,
        &[],
    )?);

    info!(
        "Wrapping {} lamports into {} to fund bid",
        lamports, funding_account
    );
    Ok(FundingResolution {
        funding_account,
        wrapped_lamports: Some(lamports),
        setup,
        cleanup,
    })
}
