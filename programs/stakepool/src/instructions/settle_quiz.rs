use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::{LedgerTransaction, QuizSettled};
use crate::ledger::{TransactionKind, TransactionMetadata};
use crate::math::{distribute_quiz_pool, RankedPayout, ScoreCard};

#[derive(Accounts)]
pub struct SettleQuiz<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [b"quiz", quiz.quiz_id.to_le_bytes().as_ref()],
        bump = quiz.bump,
    )]
    pub quiz: Account<'info, Quiz>,

    #[account(
        init_if_needed,
        payer = payer,
        space = Settlement::SIZE,
        seeds = [b"settlement", quiz.key().as_ref()],
        bump,
    )]
    pub settlement: Account<'info, Settlement>,

    #[account(
        mut,
        seeds = [b"balance", quiz.creator.as_ref()],
        bump = creator_balance.bump,
    )]
    pub creator_balance: Account<'info, UserBalance>,

    pub system_program: Program<'info, System>,
}

/// Splits the prize pool over completed participants and books the platform
/// fee. Unlike wagers this is all-or-nothing: every completed participant
/// must be supplied.
///
/// remaining_accounts: [participant, user_balance] pairs, one per completed
/// participant, in any order.
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, SettleQuiz<'info>>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let quiz_key = ctx.accounts.quiz.key();
    let forced = ctx.accounts.payer.key() == ctx.accounts.config.authority;

    require!(!ctx.accounts.settlement.is_written(), StakePoolError::AlreadySettled);
    ctx.accounts.quiz.begin_settlement(now, forced)?;

    let remaining = ctx.remaining_accounts;
    require!(remaining.len() % 2 == 0, StakePoolError::MalformedRemainingAccounts);

    let mut participants = remaining
        .chunks(2)
        .map(|pair| Account::<'info, QuizParticipant>::try_from(&pair[0]))
        .collect::<Result<Vec<_>>>()?;
    let listed: Vec<(Pubkey, &QuizParticipant)> =
        participants.iter().map(|p| (p.key(), &**p)).collect();
    let cards = collect_score_cards(quiz_key, ctx.accounts.quiz.completed_count, &listed)?;

    let quiz = &ctx.accounts.quiz;
    let distribution = distribute_quiz_pool(&cards, quiz.base_cost, quiz.settlement_method, quiz.top_n)?;

    for (participant, pair) in participants.iter_mut().zip(remaining.chunks(2)) {
        let line = distribution
            .payouts
            .iter()
            .find(|p| p.participant == participant.user)
            .ok_or(StakePoolError::ParticipantMismatch)?;

        if line.amount > 0 {
            let mut balance: Account<'info, UserBalance> = Account::try_from(&pair[1])?;
            if let Some(tx) = award_participant(participant, line, Some(&mut *balance), quiz_key, now)? {
                balance.exit(&crate::ID)?;
                emit!(tx);
            }
        } else {
            award_participant(participant, line, None, quiz_key, now)?;
        }
        participant.exit(&crate::ID)?;
    }

    msg!(
        "Quiz settled: {} winners, {} distributed, {} residual",
        distribution.winner_count,
        distribution.distributed,
        distribution.residual
    );

    if distribution.returned_to_creator > 0 {
        let tx = ctx.accounts.creator_balance.release(
            distribution.returned_to_creator,
            TransactionKind::QuizRefund,
            quiz_key,
            TransactionMetadata::Quiz { quiz: quiz_key },
            now,
        )?;
        emit!(tx);
    }

    let fee = ctx.accounts.quiz.platform_fee
        .checked_add(distribution.residual)
        .ok_or(StakePoolError::MathOverflow)?;
    ctx.accounts.config.accrue_fee(fee)?;
    ctx.accounts.quiz.residual = distribution.residual;

    let quiz = &ctx.accounts.quiz;
    let settlement = &mut ctx.accounts.settlement;
    settlement.subject = quiz_key;
    settlement.kind = SettlementKind::Quiz;
    settlement.policy = distribution.policy;
    settlement.total_pool = quiz.total_cost;
    settlement.platform_fee = quiz.platform_fee;
    settlement.distributable = quiz.base_cost;
    settlement.winning_total = distribution.weight_total;
    settlement.winner_count = distribution.winner_count;
    settlement.settled_at = now;
    settlement.bump = ctx.bumps.settlement;

    emit!(QuizSettled {
        quiz: quiz_key,
        policy: distribution.policy,
        prize_pool: quiz.base_cost,
        distributed: distribution.distributed,
        winner_count: distribution.winner_count,
        returned_to_creator: distribution.returned_to_creator,
    });

    Ok(())
}

/// Checks the supplied participants are exactly the quiz's completed set and
/// turns them into score cards.
pub(crate) fn collect_score_cards(
    quiz_key: Pubkey,
    completed_count: u16,
    participants: &[(Pubkey, &QuizParticipant)],
) -> Result<Vec<ScoreCard>> {
    require!(
        participants.len() == completed_count as usize,
        StakePoolError::ParticipantMismatch
    );

    let mut cards = Vec::with_capacity(participants.len());
    for (i, (key, participant)) in participants.iter().enumerate() {
        require_keys_eq!(participant.quiz, quiz_key, StakePoolError::ParticipantMismatch);
        require!(
            participant.status == ParticipantStatus::Completed,
            StakePoolError::ParticipantMismatch
        );
        require!(
            participants[..i].iter().all(|(seen, _)| seen != key),
            StakePoolError::ParticipantMismatch
        );
        cards.push(ScoreCard {
            participant: participant.user,
            score: participant.score,
            completed_at: participant.completed_at,
        });
    }
    Ok(cards)
}

/// Writes rank and winnings to the participant and credits a non-zero payout
/// to their balance.
pub(crate) fn award_participant(
    participant: &mut QuizParticipant,
    line: &RankedPayout,
    balance: Option<&mut UserBalance>,
    quiz_key: Pubkey,
    now: i64,
) -> Result<Option<LedgerTransaction>> {
    let tx = match balance {
        Some(balance) if line.amount > 0 => {
            require_keys_eq!(balance.owner, participant.user, StakePoolError::BalanceOwnerMismatch);
            Some(balance.release(
                line.amount,
                TransactionKind::QuizWinnings,
                quiz_key,
                TransactionMetadata::QuizPayout { quiz: quiz_key, rank: line.rank, score: line.score },
                now,
            )?)
        }
        None if line.amount > 0 => return err!(StakePoolError::BalanceOwnerMismatch),
        _ => None,
    };

    participant.rank = line.rank;
    participant.winnings = line.amount;
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(quiz: Pubkey, score: u32, completed_at: i64) -> QuizParticipant {
        QuizParticipant {
            quiz,
            user: Pubkey::new_unique(),
            score,
            rank: 0,
            winnings: 0,
            status: ParticipantStatus::Completed,
            joined_at: 0,
            completed_at,
            bump: 255,
        }
    }

    fn balance_of(owner: Pubkey) -> UserBalance {
        UserBalance {
            owner,
            balance: 0,
            total_credited: 0,
            total_debited: 0,
            tx_count: 0,
            bump: 255,
        }
    }

    #[test]
    fn test_complete_set_becomes_score_cards() {
        let quiz = Pubkey::new_unique();
        let a = completed(quiz, 4, 10);
        let b = completed(quiz, 2, 20);
        let listed = [(Pubkey::new_unique(), &a), (Pubkey::new_unique(), &b)];

        let cards = collect_score_cards(quiz, 2, &listed).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].participant, a.user);
        assert_eq!(cards[1].score, 2);
    }

    #[test]
    fn test_missing_participant_rejected() {
        let quiz = Pubkey::new_unique();
        let a = completed(quiz, 4, 10);
        let listed = [(Pubkey::new_unique(), &a)];
        assert_eq!(
            collect_score_cards(quiz, 2, &listed).unwrap_err(),
            error!(StakePoolError::ParticipantMismatch)
        );
    }

    #[test]
    fn test_duplicate_participant_rejected() {
        let quiz = Pubkey::new_unique();
        let a = completed(quiz, 4, 10);
        let key = Pubkey::new_unique();
        // Passing the same account twice to pad out the completed count.
        let listed = [(key, &a), (key, &a)];
        assert_eq!(
            collect_score_cards(quiz, 2, &listed).unwrap_err(),
            error!(StakePoolError::ParticipantMismatch)
        );
    }

    #[test]
    fn test_unfinished_or_foreign_participant_rejected() {
        let quiz = Pubkey::new_unique();
        let mut started = completed(quiz, 0, 0);
        started.status = ParticipantStatus::Started;
        let listed = [(Pubkey::new_unique(), &started)];
        assert_eq!(
            collect_score_cards(quiz, 1, &listed).unwrap_err(),
            error!(StakePoolError::ParticipantMismatch)
        );

        let foreign = completed(Pubkey::new_unique(), 3, 5);
        let listed = [(Pubkey::new_unique(), &foreign)];
        assert_eq!(
            collect_score_cards(quiz, 1, &listed).unwrap_err(),
            error!(StakePoolError::ParticipantMismatch)
        );
    }

    #[test]
    fn test_winner_credited_with_rank() {
        let quiz = Pubkey::new_unique();
        let mut participant = completed(quiz, 5, 30);
        let mut balance = balance_of(participant.user);
        let line = RankedPayout { participant: participant.user, score: 5, rank: 1, amount: 100 };

        let tx = award_participant(&mut participant, &line, Some(&mut balance), quiz, 40)
            .unwrap()
            .unwrap();
        assert_eq!(tx.kind, TransactionKind::QuizWinnings);
        assert_eq!(tx.metadata, TransactionMetadata::QuizPayout { quiz, rank: 1, score: 5 });
        assert_eq!(balance.balance, 100);
        assert_eq!(participant.rank, 1);
        assert_eq!(participant.winnings, 100);
    }

    #[test]
    fn test_winnings_never_reach_another_balance() {
        let quiz = Pubkey::new_unique();
        let mut participant = completed(quiz, 5, 30);
        let mut stranger = balance_of(Pubkey::new_unique());
        let line = RankedPayout { participant: participant.user, score: 5, rank: 1, amount: 100 };

        assert_eq!(
            award_participant(&mut participant, &line, Some(&mut stranger), quiz, 40).unwrap_err(),
            error!(StakePoolError::BalanceOwnerMismatch)
        );
        assert_eq!(stranger.balance, 0);
        assert_eq!(participant.winnings, 0);
    }

    #[test]
    fn test_zero_payout_only_records_rank() {
        let quiz = Pubkey::new_unique();
        let mut participant = completed(quiz, 0, 30);
        let line = RankedPayout { participant: participant.user, score: 0, rank: 3, amount: 0 };

        assert!(award_participant(&mut participant, &line, None, quiz, 40).unwrap().is_none());
        assert_eq!(participant.rank, 3);
        assert_eq!(participant.winnings, 0);
    }
}
