use anchor_lang::prelude::*;
use crate::state::{Config, Vault};
use crate::events::ProtocolInitialized;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = Config::SIZE,
        seeds = [b"config"],
        bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = authority,
        space = Vault::SIZE,
        seeds = [b"vault"],
        bump,
    )]
    pub vault: Account<'info, Vault>,

    pub system_program: Program<'info, System>,
}

#[allow(clippy::too_many_arguments)]
pub fn handler(
    ctx: Context<Initialize>,
    treasury: Pubkey,
    kyc_authority: Pubkey,
    grader: Pubkey,
    wager_fee_bps: u16,
    quiz_fee_bps: u16,
    min_stake_lamports: u64,
    min_wager_duration_seconds: i64,
    max_quiz_questions: u16,
    max_quiz_participants: u16,
    min_entry_fee_per_question: u64,
    max_entry_fee_per_question: u64,
    unverified_max_transfer: u64,
) -> Result<()> {
    let config = &mut ctx.accounts.config;
    config.authority = ctx.accounts.authority.key();
    config.treasury = treasury;
    config.kyc_authority = kyc_authority;
    config.grader = grader;
    config.wager_fee_bps = wager_fee_bps;
    config.quiz_fee_bps = quiz_fee_bps;
    config.min_stake_lamports = min_stake_lamports;
    config.min_wager_duration_seconds = min_wager_duration_seconds;
    config.max_quiz_questions = max_quiz_questions;
    config.max_quiz_participants = max_quiz_participants;
    config.min_entry_fee_per_question = min_entry_fee_per_question;
    config.max_entry_fee_per_question = max_entry_fee_per_question;
    config.unverified_max_transfer = unverified_max_transfer;
    config.accrued_fees = 0;
    config.wager_count = 0;
    config.quiz_count = 0;
    config.paused = false;
    config.bump = ctx.bumps.config;
    config.vault_bump = ctx.bumps.vault;
    config.validate()?;

    let vault = &mut ctx.accounts.vault;
    vault.total_deposited = 0;
    vault.total_withdrawn = 0;
    vault.bump = ctx.bumps.vault;

    emit!(ProtocolInitialized {
        authority: config.authority,
        treasury,
        wager_fee_bps,
        quiz_fee_bps,
    });

    Ok(())
}
