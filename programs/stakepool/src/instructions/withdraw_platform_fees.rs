use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::PlatformFeesWithdrawn;
use super::withdraw::transfer_from_vault;

#[derive(Accounts)]
pub struct WithdrawPlatformFees<'info> {
    #[account(
        constraint = authority.key() == config.authority @ StakePoolError::Unauthorized,
    )]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [b"vault"],
        bump = config.vault_bump,
    )]
    pub vault: Account<'info, Vault>,

    /// Treasury wallet to receive the fees
    #[account(
        mut,
        constraint = treasury.key() == config.treasury @ StakePoolError::Unauthorized,
    )]
    pub treasury: SystemAccount<'info>,
}

pub fn handler(ctx: Context<WithdrawPlatformFees>, amount: u64) -> Result<()> {
    require!(amount > 0, StakePoolError::ZeroAmount);
    require!(
        amount <= ctx.accounts.config.accrued_fees,
        StakePoolError::InsufficientAccruedFees
    );

    transfer_from_vault(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.treasury.to_account_info(),
        amount,
    )?;

    let config = &mut ctx.accounts.config;
    config.accrued_fees -= amount;

    emit!(PlatformFeesWithdrawn {
        treasury: config.treasury,
        amount,
        remaining: config.accrued_fees,
    });

    Ok(())
}
