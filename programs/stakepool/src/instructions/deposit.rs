use anchor_lang::prelude::*;
use anchor_lang::system_program;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::FundsDeposited;
use crate::ledger::{check_transfer_limits, load_kyc_profile, provider_metadata, TransactionKind};

#[derive(Accounts)]
pub struct Deposit<'info> {
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
        init_if_needed,
        payer = user,
        space = UserBalance::SIZE,
        seeds = [b"balance", user.key().as_ref()],
        bump,
    )]
    pub user_balance: Account<'info, UserBalance>,

    /// CHECK: fixed to the `["kyc", user]` address; may be empty for
    /// users who were never verified. Read via `load_kyc_profile`.
    #[account(
        seeds = [b"kyc", user.key().as_ref()],
        bump,
    )]
    pub kyc_profile: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Moves lamports from the user's wallet into the vault and credits their
/// ledger balance. `provider_reference` ties the credit to the payment the
/// provider processed.
pub fn handler(ctx: Context<Deposit>, amount: u64, provider_reference: String) -> Result<()> {
    let config = &ctx.accounts.config;
    require!(!config.paused, StakePoolError::PlatformPaused);
    require!(amount > 0, StakePoolError::ZeroAmount);
    let kyc_profile = load_kyc_profile(&ctx.accounts.kyc_profile)?;
    check_transfer_limits(kyc_profile.as_ref(), config, amount)?;
    let metadata = provider_metadata(provider_reference.clone())?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.user.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    let user_key = ctx.accounts.user.key();
    let vault_key = ctx.accounts.vault.key();
    let balance = &mut ctx.accounts.user_balance;
    if balance.owner == Pubkey::default() {
        balance.owner = user_key;
        balance.bump = ctx.bumps.user_balance;
    }
    let now = Clock::get()?.unix_timestamp;
    let tx = balance.release(amount, TransactionKind::Deposit, vault_key, metadata, now)?;

    let vault = &mut ctx.accounts.vault;
    vault.total_deposited = vault.total_deposited
        .checked_add(amount)
        .ok_or(StakePoolError::MathOverflow)?;

    emit!(tx);
    emit!(FundsDeposited {
        user: user_key,
        amount,
        provider_reference,
    });

    Ok(())
}
