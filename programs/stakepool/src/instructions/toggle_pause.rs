use anchor_lang::prelude::*;
use crate::state::Config;
use crate::errors::StakePoolError;
use crate::events::PlatformPauseToggled;

#[derive(Accounts)]
pub struct TogglePause<'info> {
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
}

/// Pausing stops new money entering pools. Withdrawals, settlement and
/// refunds keep working so nothing gets stuck.
pub fn handler(ctx: Context<TogglePause>) -> Result<()> {
    let paused = ctx.accounts.config.toggle_pause();
    msg!("Platform {}", if paused { "paused" } else { "resumed" });

    emit!(PlatformPauseToggled {
        authority: ctx.accounts.authority.key(),
        paused,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
