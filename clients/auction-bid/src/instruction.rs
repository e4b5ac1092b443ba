//! Auction program instructions and addresses

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::error::BidResult;

/// Seed prefix for auction PDAs
pub const PREFIX: &[u8] = b"auction";
/// Seed suffix for the auction extended data PDA
pub const EXTENDED: &[u8] = b"extended";
/// Seed suffix for the bidder metadata PDA
pub const METADATA: &[u8] = b"metadata";

/// Instruction tag of `PlaceBid` in the auction program
pub const PLACE_BID_TAG: u8 = 6;

/// Arguments of the `PlaceBid` instruction
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlaceBidArgs {
    /// Bid amount in base units of the auction's token mint
    pub amount: u64,
    /// Resource the auction is keyed on
    pub resource: Pubkey,
}

/// Derive the auction account for a resource
pub fn find_auction_address(program_id: &Pubkey, resource: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PREFIX, program_id.as_ref(), resource.as_ref()],
        program_id,
    )
}

/// Derive the auction extended data account for a resource
pub fn find_auction_extended_address(program_id: &Pubkey, resource: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PREFIX, program_id.as_ref(), resource.as_ref(), EXTENDED],
        program_id,
    )
}

/// Derive the bidder pot, unique per bidder per auction
pub fn find_bidder_pot_address(
    program_id: &Pubkey,
    auction: &Pubkey,
    bidder: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[PREFIX, program_id.as_ref(), auction.as_ref(), bidder.as_ref()],
        program_id,
    )
}

/// Derive the bidder metadata account
pub fn find_bidder_metadata_address(
    program_id: &Pubkey,
    auction: &Pubkey,
    bidder: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            PREFIX,
            program_id.as_ref(),
            auction.as_ref(),
            bidder.as_ref(),
            METADATA,
        ],
        program_id,
    )
}

/// Accounts referenced by a `PlaceBid` instruction
#[derive(Debug, Clone, Copy)]
pub struct PlaceBidAccounts {
    pub bidder: Pubkey,
    pub bidder_token: Pubkey,
    pub bidder_pot_token: Pubkey,
    pub auction: Pubkey,
    pub token_mint: Pubkey,
    pub transfer_authority: Pubkey,
    pub payer: Pubkey,
    pub resource: Pubkey,
}

/// Build the `PlaceBid` instruction.
///
/// Accounts:
/// 0. `[writable, signer]` Bidder
/// 1. `[writable]` Bidder token account funding the bid
/// 2. `[writable]` Bidder pot PDA
/// 3. `[writable]` Bidder pot token account
/// 4. `[writable]` Bidder metadata PDA
/// 5. `[writable]` Auction
/// 6. `[writable]` Auction extended data PDA
/// 7. `[writable]` Token mint
/// 8. `[signer]` Transfer authority
/// 9. `[signer]` Payer
/// 10. `[]` Clock sysvar
/// 11. `[]` Rent sysvar
/// 12. `[]` System program
/// 13. `[]` Token program
///
/// Funds are not checked here; the program rejects an underfunded bid.
pub fn place_bid(
    program_id: &Pubkey,
    token_program_id: &Pubkey,
    accounts: &PlaceBidAccounts,
    amount: u64,
) -> BidResult<Instruction> {
    let (bidder_pot, _) = find_bidder_pot_address(program_id, &accounts.auction, &accounts.bidder);
    let (bidder_meta, _) =
        find_bidder_metadata_address(program_id, &accounts.auction, &accounts.bidder);
    let (auction_extended, _) = find_auction_extended_address(program_id, &accounts.resource);

    let mut data = vec![PLACE_BID_TAG];
    PlaceBidArgs {
        amount,
        resource: accounts.resource,
    }
    .serialize(&mut data)?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.bidder, true),
            AccountMeta::new(accounts.bidder_token, false),
            AccountMeta::new(bidder_pot, false),
            AccountMeta::new(accounts.bidder_pot_token, false),
            AccountMeta::new(bidder_meta, false),
            AccountMeta::new(accounts.auction, false),
            AccountMeta::new(auction_extended, false),
            AccountMeta::new(accounts.token_mint, false),
            AccountMeta::new_readonly(accounts.transfer_authority, true),
            AccountMeta::new_readonly(accounts.payer, true),
            AccountMeta::new_readonly(sysvar::clock::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(*token_program_id, false),
        ],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> PlaceBidAccounts {
        let bidder = Pubkey::new_unique();
        PlaceBidAccounts {
            bidder,
            bidder_token: Pubkey::new_unique(),
            bidder_pot_token: Pubkey::new_unique(),
            auction: Pubkey::new_unique(),
            token_mint: Pubkey::new_unique(),
            transfer_authority: Pubkey::new_unique(),
            payer: bidder,
            resource: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_place_bid_data_layout() {
        let program_id = Pubkey::new_unique();
        let accounts = accounts();
        let ix = place_bid(&program_id, &spl_token::id(), &accounts, 1_500_000).unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data.len(), 1 + 8 + 32);
        assert_eq!(ix.data[0], PLACE_BID_TAG);

        let args = PlaceBidArgs::try_from_slice(&ix.data[1..]).unwrap();
        assert_eq!(args.amount, 1_500_000);
        assert_eq!(args.resource, accounts.resource);
    }

    #[test]
    fn test_place_bid_accounts() {
        let program_id = Pubkey::new_unique();
        let accounts = accounts();
        let ix = place_bid(&program_id, &spl_token::id(), &accounts, 1).unwrap();

        let (pot, _) = find_bidder_pot_address(&program_id, &accounts.auction, &accounts.bidder);
        assert_eq!(ix.accounts.len(), 14);
        assert_eq!(ix.accounts[0].pubkey, accounts.bidder);
        assert_eq!(ix.accounts[1].pubkey, accounts.bidder_token);
        assert_eq!(ix.accounts[2].pubkey, pot);
        assert_eq!(ix.accounts[3].pubkey, accounts.bidder_pot_token);
        assert_eq!(ix.accounts[7].pubkey, accounts.token_mint);
        assert_eq!(ix.accounts[8].pubkey, accounts.transfer_authority);
        assert_eq!(ix.accounts[13].pubkey, spl_token::id());

        let signers: Vec<_> = ix
            .accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.pubkey)
            .collect();
        assert_eq!(
            signers,
            vec![accounts.bidder, accounts.transfer_authority, accounts.payer]
        );
    }

    #[test]
    fn test_place_bid_writable_accounts() {
        let program_id = Pubkey::new_unique();
        let accounts = accounts();
        let ix = place_bid(&program_id, &spl_token::id(), &accounts, 1).unwrap();

        assert!(ix.accounts[0].is_writable && ix.accounts[0].is_signer);
        assert!(ix.accounts[1..8].iter().all(|meta| meta.is_writable));
        assert!(ix.accounts[8..].iter().all(|meta| !meta.is_writable));
    }

    #[test]
    fn test_auction_and_extended_addresses_differ() {
        let program_id = Pubkey::new_unique();
        let resource = Pubkey::new_unique();
        let (auction, _) = find_auction_address(&program_id, &resource);
        let (extended, _) = find_auction_extended_address(&program_id, &resource);
        assert_ne!(auction, extended);
        assert_ne!(
            find_bidder_metadata_address(&program_id, &auction, &resource).0,
            find_bidder_pot_address(&program_id, &auction, &resource).0
        );
    }

    #[test]
    fn test_bidder_pot_unique_per_bidder_and_auction() {
        let program_id = Pubkey::new_unique();
        let auction = Pubkey::new_unique();
        let bidder = Pubkey::new_unique();

        let (pot, _) = find_bidder_pot_address(&program_id, &auction, &bidder);
        assert_eq!(pot, find_bidder_pot_address(&program_id, &auction, &bidder).0);
        assert_ne!(
            pot,
            find_bidder_pot_address(&program_id, &Pubkey::new_unique(), &bidder).0
        );
        assert_ne!(
            pot,
            find_bidder_pot_address(&program_id, &auction, &Pubkey::new_unique()).0
        );
    }
}
