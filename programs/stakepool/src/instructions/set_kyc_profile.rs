use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::KycProfileUpdated;

#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct SetKycProfile<'info> {
    #[account(
        mut,
        constraint = kyc_authority.key() == config.kyc_authority @ StakePoolError::Unauthorized,
    )]
    pub kyc_authority: Signer<'info>,

    #[account(
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        init_if_needed,
        payer = kyc_authority,
        space = KycProfile::SIZE,
        seeds = [b"kyc", user.as_ref()],
        bump,
    )]
    pub kyc_profile: Account<'info, KycProfile>,

    pub system_program: Program<'info, System>,
}

/// Records the outcome of the off-chain identity check. Downgrading to
/// `Unverified` puts the user back under the unverified ceiling.
pub fn handler(
    ctx: Context<SetKycProfile>,
    user: Pubkey,
    tier: VerificationTier,
    min_transfer: u64,
    max_transfer: u64,
) -> Result<()> {
    require!(min_transfer <= max_transfer, StakePoolError::InvalidKycLimits);
    if tier != VerificationTier::Unverified {
        require!(max_transfer > 0, StakePoolError::InvalidKycLimits);
    }

    let profile = &mut ctx.accounts.kyc_profile;
    profile.user = user;
    profile.tier = tier;
    profile.min_transfer = min_transfer;
    profile.max_transfer = max_transfer;
    profile.updated_at = Clock::get()?.unix_timestamp;
    profile.bump = ctx.bumps.kyc_profile;

    emit!(KycProfileUpdated {
        user,
        tier,
        min_transfer,
        max_transfer,
    });

    Ok(())
}
