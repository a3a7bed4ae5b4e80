use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::FundsWithdrawn;
use crate::ledger::{check_transfer_limits, load_kyc_profile, provider_metadata, TransactionKind};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
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

    #[account(
        mut,
        seeds = [b"balance", user.key().as_ref()],
        bump = user_balance.bump,
        constraint = user_balance.owner == user.key() @ StakePoolError::BalanceOwnerMismatch,
    )]
    pub user_balance: Account<'info, UserBalance>,

    /// CHECK: fixed to the `["kyc", user]` address; may be empty for
    /// users who were never verified. Read via `load_kyc_profile`.
    #[account(
        seeds = [b"kyc", user.key().as_ref()],
        bump,
    )]
    pub kyc_profile: UncheckedAccount<'info>,
}

/// Not gated by the pause flag: users can always take their money out.
pub fn handler(ctx: Context<Withdraw>, amount: u64, provider_reference: String) -> Result<()> {
    require!(amount > 0, StakePoolError::ZeroAmount);
    let kyc_profile = load_kyc_profile(&ctx.accounts.kyc_profile)?;
    check_transfer_limits(kyc_profile.as_ref(), &ctx.accounts.config, amount)?;
    let metadata = provider_metadata(provider_reference.clone())?;

    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault.key();
    let tx = ctx.accounts.user_balance
        .reserve(amount, TransactionKind::Withdrawal, vault_key, metadata, now)?;

    transfer_from_vault(
        &ctx.accounts.vault.to_account_info(),
        &ctx.accounts.user.to_account_info(),
        amount,
    )?;

    let vault = &mut ctx.accounts.vault;
    vault.total_withdrawn = vault.total_withdrawn
        .checked_add(amount)
        .ok_or(StakePoolError::MathOverflow)?;

    emit!(tx);
    emit!(FundsWithdrawn {
        user: ctx.accounts.user.key(),
        amount,
        provider_reference,
    });

    Ok(())
}

/// Pays lamports straight out of the program-owned vault, refusing to dip
/// below its rent-exempt minimum.
pub(crate) fn transfer_from_vault<'info>(
    vault: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    let min_balance = Rent::get()?.minimum_balance(Vault::SIZE);
    require!(
        vault.lamports().checked_sub(amount).unwrap_or(0) >= min_balance,
        StakePoolError::InsufficientRentBalance
    );

    **vault.try_borrow_mut_lamports()? -= amount;
    **to.try_borrow_mut_lamports()? += amount;
    Ok(())
}
