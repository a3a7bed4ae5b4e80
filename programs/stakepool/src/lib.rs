use anchor_lang::prelude::*;

declare_id!("DBBEN2EUyZskY7PcN3JvKWKGAwZh9G6rRjFoHCD8s8kv");

pub mod state;
pub mod instructions;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod math;

use instructions::*;
use state::{SettlementMethod, Side, VerificationTier, WagerOutcome};

#[program]
pub mod stakepool {
    use super::*;

    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
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
        instructions::initialize::handler(
            ctx,
            treasury,
            kyc_authority,
            grader,
            wager_fee_bps,
            quiz_fee_bps,
            min_stake_lamports,
            min_wager_duration_seconds,
            max_quiz_questions,
            max_quiz_participants,
            min_entry_fee_per_question,
            max_entry_fee_per_question,
            unverified_max_transfer,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update_config(
        ctx: Context<UpdateConfig>,
        treasury: Option<Pubkey>,
        kyc_authority: Option<Pubkey>,
        grader: Option<Pubkey>,
        wager_fee_bps: Option<u16>,
        quiz_fee_bps: Option<u16>,
        min_stake_lamports: Option<u64>,
        min_wager_duration_seconds: Option<i64>,
        max_quiz_questions: Option<u16>,
        max_quiz_participants: Option<u16>,
        min_entry_fee_per_question: Option<u64>,
        max_entry_fee_per_question: Option<u64>,
        unverified_max_transfer: Option<u64>,
    ) -> Result<()> {
        instructions::update_config::handler(
            ctx,
            treasury,
            kyc_authority,
            grader,
            wager_fee_bps,
            quiz_fee_bps,
            min_stake_lamports,
            min_wager_duration_seconds,
            max_quiz_questions,
            max_quiz_participants,
            min_entry_fee_per_question,
            max_entry_fee_per_question,
            unverified_max_transfer,
        )
    }

    pub fn toggle_pause(ctx: Context<TogglePause>) -> Result<()> {
        instructions::toggle_pause::handler(ctx)
    }

    pub fn transfer_authority(ctx: Context<TransferAuthority>, new_authority: Pubkey) -> Result<()> {
        instructions::transfer_authority::handler(ctx, new_authority)
    }

    pub fn set_kyc_profile(
        ctx: Context<SetKycProfile>,
        user: Pubkey,
        tier: VerificationTier,
        min_transfer: u64,
        max_transfer: u64,
    ) -> Result<()> {
        instructions::set_kyc_profile::handler(ctx, user, tier, min_transfer, max_transfer)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64, provider_reference: String) -> Result<()> {
        instructions::deposit::handler(ctx, amount, provider_reference)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64, provider_reference: String) -> Result<()> {
        instructions::withdraw::handler(ctx, amount, provider_reference)
    }

    pub fn withdraw_platform_fees(ctx: Context<WithdrawPlatformFees>, amount: u64) -> Result<()> {
        instructions::withdraw_platform_fees::handler(ctx, amount)
    }

    pub fn create_wager(
        ctx: Context<CreateWager>,
        side_a_label: String,
        side_b_label: String,
        stake_lamports: u64,
        deadline: i64,
    ) -> Result<()> {
        instructions::create_wager::handler(ctx, side_a_label, side_b_label, stake_lamports, deadline)
    }

    pub fn join_wager(ctx: Context<JoinWager>, side: Side) -> Result<()> {
        instructions::join_wager::handler(ctx, side)
    }

    pub fn resolve_wager(ctx: Context<ResolveWager>, outcome: WagerOutcome, force: bool) -> Result<()> {
        instructions::resolve_wager::handler(ctx, outcome, force)
    }

    pub fn settle_wager<'info>(ctx: Context<'_, '_, 'info, 'info, SettleWager<'info>>) -> Result<()> {
        instructions::settle_wager::handler(ctx)
    }

    pub fn refund_wager<'info>(ctx: Context<'_, '_, 'info, 'info, RefundWager<'info>>) -> Result<()> {
        instructions::refund_wager::handler(ctx)
    }

    pub fn distribute_wager_payouts<'info>(
        ctx: Context<'_, '_, 'info, 'info, DistributeWagerPayouts<'info>>,
    ) -> Result<()> {
        instructions::distribute_wager_payouts::handler(ctx)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_quiz(
        ctx: Context<CreateQuiz>,
        title: String,
        entry_fee_per_question: u64,
        total_questions: u16,
        max_participants: u16,
        settlement_method: SettlementMethod,
        top_n: u16,
        duration_seconds: i64,
    ) -> Result<()> {
        instructions::create_quiz::handler(
            ctx,
            title,
            entry_fee_per_question,
            total_questions,
            max_participants,
            settlement_method,
            top_n,
            duration_seconds,
        )
    }

    pub fn add_quiz_question(
        ctx: Context<AddQuizQuestion>,
        prompt: String,
        options: Vec<String>,
        answer_commitment: [u8; 32],
    ) -> Result<()> {
        instructions::add_quiz_question::handler(ctx, prompt, options, answer_commitment)
    }

    pub fn publish_quiz(ctx: Context<PublishQuiz>) -> Result<()> {
        instructions::publish_quiz::handler(ctx)
    }

    pub fn invite_quiz_participant(ctx: Context<InviteQuizParticipant>, user: Pubkey) -> Result<()> {
        instructions::invite_quiz_participant::handler(ctx, user)
    }

    pub fn join_quiz(ctx: Context<JoinQuiz>) -> Result<()> {
        instructions::join_quiz::handler(ctx)
    }

    pub fn start_quiz(ctx: Context<StartQuiz>) -> Result<()> {
        instructions::start_quiz::handler(ctx)
    }

    pub fn complete_quiz_participant(ctx: Context<CompleteQuizParticipant>, score: u32) -> Result<()> {
        instructions::complete_quiz_participant::handler(ctx, score)
    }

    pub fn close_quiz(ctx: Context<CloseQuiz>) -> Result<()> {
        instructions::close_quiz::handler(ctx)
    }

    pub fn settle_quiz<'info>(ctx: Context<'_, '_, 'info, 'info, SettleQuiz<'info>>) -> Result<()> {
        instructions::settle_quiz::handler(ctx)
    }

    pub fn cancel_quiz(ctx: Context<CancelQuiz>, reason: String) -> Result<()> {
        instructions::cancel_quiz::handler(ctx, reason)
    }
}
