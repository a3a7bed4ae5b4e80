use anchor_lang::prelude::*;
use crate::state::Config;
use crate::errors::StakePoolError;
use crate::events::AuthorityTransferred;

#[derive(Accounts)]
pub struct TransferAuthority<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ StakePoolError::Unauthorized,
    )]
    pub config: Account<'info, Config>,
}

/// Hands admin rights (resolution, forced settlement, cancellation, fee
/// withdrawal) to `new_authority`. Treasury, KYC authority and grader are
/// untouched.
pub fn handler(ctx: Context<TransferAuthority>, new_authority: Pubkey) -> Result<()> {
    let old_authority = ctx.accounts.config.hand_over_authority(new_authority)?;

    emit!(AuthorityTransferred {
        old_authority,
        new_authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
