use anchor_lang::prelude::*;
use crate::errors::StakePoolError;
use crate::state::{PayoutPolicy, SettlementMethod, Side, WagerOutcome};

pub const BPS_DENOMINATOR: u128 = 10_000;

/// floor(amount * fee_bps / 10_000)
pub fn fee_for(amount: u64, fee_bps: u16) -> Result<u64> {
    let fee = (amount as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(StakePoolError::MathOverflow)?
        / BPS_DENOMINATOR;
    Ok(fee as u64)
}

/// floor(weight / weight_total * distributable), computed in u128.
pub fn pro_rata_share(weight: u64, weight_total: u64, distributable: u64) -> Result<u64> {
    if weight_total == 0 {
        return Ok(0);
    }
    let share = (weight as u128)
        .checked_mul(distributable as u128)
        .ok_or(StakePoolError::MathOverflow)?
        .checked_div(weight_total as u128)
        .ok_or(StakePoolError::MathOverflow)?;
    u64::try_from(share).map_err(|_| error!(StakePoolError::MathOverflow))
}

/// Everything needed to price a single wager entry once the outcome is known.
/// Derived from the wager's side aggregates, so entries can be paid in any order
/// and across several transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolTerms {
    pub policy: PayoutPolicy,
    pub total_pool: u64,
    pub platform_fee: u64,
    pub distributable: u64,
    pub winning_side: Option<Side>,
    pub winning_total: u64,
}

impl PoolTerms {
    /// Pari-mutuel terms. A push, or a winning side nobody backed, refunds every
    /// stake and takes no fee.
    pub fn pari_mutuel(
        side_a_total: u64,
        side_b_total: u64,
        outcome: WagerOutcome,
        fee_bps: u16,
    ) -> Result<Self> {
        let total_pool = side_a_total
            .checked_add(side_b_total)
            .ok_or(StakePoolError::MathOverflow)?;

        let winning_side = match outcome.winning_side() {
            Some(side) => side,
            None => return Ok(Self::refund(total_pool)),
        };
        let winning_total = match winning_side {
            Side::A => side_a_total,
            Side::B => side_b_total,
        };
        if winning_total == 0 {
            return Ok(Self::refund(total_pool));
        }

        let platform_fee = fee_for(total_pool, fee_bps)?;
        let distributable = total_pool
            .checked_sub(platform_fee)
            .ok_or(StakePoolError::MathOverflow)?;

        Ok(Self {
            policy: PayoutPolicy::ProRataStake,
            total_pool,
            platform_fee,
            distributable,
            winning_side: Some(winning_side),
            winning_total,
        })
    }

    pub fn refund(total_pool: u64) -> Self {
        Self {
            policy: PayoutPolicy::RefundStakes,
            total_pool,
            platform_fee: 0,
            distributable: total_pool,
            winning_side: None,
            winning_total: total_pool,
        }
    }

    pub fn payout_for(&self, side: Side, amount: u64) -> Result<u64> {
        match self.policy {
            PayoutPolicy::RefundStakes => Ok(amount),
            PayoutPolicy::ProRataStake if self.winning_side == Some(side) => {
                pro_rata_share(amount, self.winning_total, self.distributable)
            }
            _ => Ok(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Quiz pricing and payouts
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizCost {
    pub base_cost: u64,
    pub platform_fee: u64,
    pub total_cost: u64,
}

/// base = fee_per_question * questions * participants; total = base + fee(base).
pub fn quiz_cost(
    entry_fee_per_question: u64,
    total_questions: u16,
    max_participants: u16,
    fee_bps: u16,
) -> Result<QuizCost> {
    let base_cost = entry_fee_per_question
        .checked_mul(total_questions as u64)
        .ok_or(StakePoolError::MathOverflow)?
        .checked_mul(max_participants as u64)
        .ok_or(StakePoolError::MathOverflow)?;
    let platform_fee = fee_for(base_cost, fee_bps)?;
    let total_cost = base_cost
        .checked_add(platform_fee)
        .ok_or(StakePoolError::MathOverflow)?;
    Ok(QuizCost { base_cost, platform_fee, total_cost })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreCard {
    pub participant: Pubkey,
    pub score: u32,
    pub completed_at: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedPayout {
    pub participant: Pubkey,
    pub score: u32,
    pub rank: u16,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizDistribution {
    pub policy: PayoutPolicy,
    /// One line per score card, in rank order.
    pub payouts: Vec<RankedPayout>,
    pub weight_total: u64,
    pub winner_count: u32,
    pub distributed: u64,
    pub residual: u64,
    pub returned_to_creator: u64,
}

/// Highest score first; ties go to whoever finished first, then to the lower key.
pub fn rank_score_cards(cards: &mut [ScoreCard]) {
    cards.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.completed_at.cmp(&b.completed_at))
            .then(a.participant.to_bytes().cmp(&b.participant.to_bytes()))
    });
}

/// Splits `prize_pool` over completed participants.
///
/// `Proportional` weights each participant by score. `TopN` pays the best
/// `min(top_n, scorers)` participants with linearly decreasing weights
/// (m, m-1, .., 1). Zero scores are never paid; if nobody scored, the whole
/// pool is returned to the creator.
pub fn distribute_quiz_pool(
    cards: &[ScoreCard],
    prize_pool: u64,
    method: SettlementMethod,
    top_n: u16,
) -> Result<QuizDistribution> {
    let mut ranked = cards.to_vec();
    rank_score_cards(&mut ranked);

    let scorers = ranked.iter().take_while(|c| c.score > 0).count();

    let weight_of = |index: usize, card: &ScoreCard| -> u64 {
        match method {
            SettlementMethod::Proportional => card.score as u64,
            SettlementMethod::TopN => {
                let m = scorers.min(top_n as usize);
                if index < m { (m - index) as u64 } else { 0 }
            }
        }
    };

    let weight_total = ranked
        .iter()
        .enumerate()
        .take(scorers)
        .try_fold(0u64, |acc, (i, card)| acc.checked_add(weight_of(i, card)))
        .ok_or(StakePoolError::MathOverflow)?;

    let policy = if weight_total == 0 {
        PayoutPolicy::ReturnToCreator
    } else {
        match method {
            SettlementMethod::Proportional => PayoutPolicy::ProportionalScore,
            SettlementMethod::TopN => PayoutPolicy::TopRanked,
        }
    };

    let mut payouts = Vec::with_capacity(ranked.len());
    let mut distributed: u64 = 0;
    let mut winner_count: u32 = 0;
    for (i, card) in ranked.iter().enumerate() {
        let amount = if i < scorers {
            pro_rata_share(weight_of(i, card), weight_total, prize_pool)?
        } else {
            0
        };
        if amount > 0 {
            winner_count += 1;
            distributed = distributed.checked_add(amount).ok_or(StakePoolError::MathOverflow)?;
        }
        payouts.push(RankedPayout {
            participant: card.participant,
            score: card.score,
            rank: u16::try_from(i + 1).map_err(|_| error!(StakePoolError::MathOverflow))?,
            amount,
        });
    }

    let (residual, returned_to_creator) = if policy == PayoutPolicy::ReturnToCreator {
        (0, prize_pool)
    } else {
        let residual = prize_pool
            .checked_sub(distributed)
            .ok_or(StakePoolError::PoolExhausted)?;
        (residual, 0)
    };

    Ok(QuizDistribution {
        policy,
        payouts,
        weight_total,
        winner_count,
        distributed,
        residual,
        returned_to_creator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(score: u32, completed_at: i64) -> ScoreCard {
        ScoreCard { participant: Pubkey::new_unique(), score, completed_at }
    }

    /// Prices every stake through `payout_for`, returning the terms, the
    /// per-stake payouts and the rounding residual.
    fn price(stakes: &[(Side, u64)], outcome: WagerOutcome, fee_bps: u16) -> (PoolTerms, Vec<u64>, u64) {
        let side_a: u64 = stakes.iter().filter(|(s, _)| *s == Side::A).map(|(_, a)| a).sum();
        let side_b: u64 = stakes.iter().filter(|(s, _)| *s == Side::B).map(|(_, a)| a).sum();
        let terms = PoolTerms::pari_mutuel(side_a, side_b, outcome, fee_bps).unwrap();
        let payouts: Vec<u64> = stakes
            .iter()
            .map(|(side, amount)| terms.payout_for(*side, *amount).unwrap())
            .collect();
        let residual = terms.distributable - payouts.iter().sum::<u64>();
        (terms, payouts, residual)
    }

    fn conserved(terms: &PoolTerms, payouts: &[u64], residual: u64) -> bool {
        payouts.iter().sum::<u64>() + terms.platform_fee + residual == terms.total_pool
    }

    #[test]
    fn test_fee_for() {
        assert_eq!(fee_for(3_000, 500).unwrap(), 150);
        assert_eq!(fee_for(199, 100).unwrap(), 1);
        assert_eq!(fee_for(u64::MAX, 10_000).unwrap(), u64::MAX);
        assert_eq!(fee_for(1_000, 0).unwrap(), 0);
    }

    #[test]
    fn test_two_winners_split_fee_adjusted_pool() {
        let stakes = [(Side::A, 1_000), (Side::A, 1_000), (Side::B, 1_000)];
        let (terms, payouts, residual) = price(&stakes, WagerOutcome::SideA, 500);

        assert_eq!(terms.total_pool, 3_000);
        assert_eq!(terms.platform_fee, 150);
        assert_eq!(terms.distributable, 2_850);
        assert_eq!(terms.winning_total, 2_000);
        assert_eq!(payouts, vec![1_425, 1_425, 0]);
        assert_eq!(residual, 0);
        assert!(conserved(&terms, &payouts, residual));
    }

    #[test]
    fn test_rounding_residual_is_tracked() {
        let stakes = [(Side::A, 1_000), (Side::A, 1_000), (Side::A, 1_000), (Side::B, 1_000)];
        let (terms, payouts, residual) = price(&stakes, WagerOutcome::SideA, 500);

        assert_eq!(terms.platform_fee, 200);
        assert_eq!(payouts, vec![1_266, 1_266, 1_266, 0]);
        assert_eq!(residual, 2);
        assert!(conserved(&terms, &payouts, residual));
    }

    #[test]
    fn test_uneven_stakes_never_exceed_pool() {
        let stakes = [(Side::B, 7), (Side::B, 13), (Side::B, 29), (Side::A, 101)];
        let (terms, payouts, residual) = price(&stakes, WagerOutcome::SideB, 333);
        assert!(payouts.iter().sum::<u64>() <= terms.distributable);
        assert!(conserved(&terms, &payouts, residual));
    }

    #[test]
    fn test_empty_winning_side_refunds_everyone() {
        let stakes = [(Side::A, 1_000), (Side::A, 500)];
        let (terms, payouts, residual) = price(&stakes, WagerOutcome::SideB, 500);

        assert_eq!(terms.policy, PayoutPolicy::RefundStakes);
        assert_eq!(terms.platform_fee, 0);
        assert_eq!(payouts, vec![1_000, 500]);
        assert_eq!(residual, 0);
    }

    #[test]
    fn test_push_refunds_both_sides() {
        let terms = PoolTerms::pari_mutuel(2_000, 1_000, WagerOutcome::Push, 500).unwrap();
        assert_eq!(terms.policy, PayoutPolicy::RefundStakes);
        assert_eq!(terms.payout_for(Side::A, 1_000).unwrap(), 1_000);
        assert_eq!(terms.payout_for(Side::B, 1_000).unwrap(), 1_000);
    }

    #[test]
    fn test_losing_side_gets_nothing() {
        let terms = PoolTerms::pari_mutuel(2_000, 1_000, WagerOutcome::SideA, 500).unwrap();
        assert_eq!(terms.payout_for(Side::B, 1_000).unwrap(), 0);
        assert_eq!(terms.payout_for(Side::A, 1_000).unwrap(), 1_425);
    }

    #[test]
    fn test_quiz_cost() {
        let cost = quiz_cost(10, 5, 4, 1_000).unwrap();
        assert_eq!(cost.base_cost, 200);
        assert_eq!(cost.platform_fee, 20);
        assert_eq!(cost.total_cost, 220);

        assert!(quiz_cost(u64::MAX, 2, 1, 0).is_err());
    }

    #[test]
    fn test_proportional_quiz_payouts() {
        let cards = vec![card(3, 20), card(0, 5), card(5, 30), card(2, 10)];
        let dist = distribute_quiz_pool(&cards, 200, SettlementMethod::Proportional, 0).unwrap();

        assert_eq!(dist.policy, PayoutPolicy::ProportionalScore);
        assert_eq!(dist.weight_total, 10);
        let amounts: Vec<u64> = dist.payouts.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![100, 60, 40, 0]);
        let ranks: Vec<u16> = dist.payouts.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        assert_eq!(dist.payouts[0].participant, cards[2].participant);
        assert_eq!(dist.payouts[3].participant, cards[1].participant);
        assert_eq!(dist.winner_count, 3);
        assert_eq!(dist.residual, 0);
    }

    #[test]
    fn test_top_n_linear_weights() {
        let cards = vec![card(4, 10), card(5, 10), card(1, 10)];
        let dist = distribute_quiz_pool(&cards, 200, SettlementMethod::TopN, 2).unwrap();

        assert_eq!(dist.policy, PayoutPolicy::TopRanked);
        assert_eq!(dist.weight_total, 3);
        assert_eq!(dist.payouts[0].participant, cards[1].participant);
        assert_eq!(dist.payouts[0].amount, 133);
        assert_eq!(dist.payouts[1].amount, 66);
        assert_eq!(dist.payouts[2].amount, 0);
        assert_eq!(dist.winner_count, 2);
        assert_eq!(dist.residual, 1);
        assert_eq!(dist.distributed + dist.residual, 200);
    }

    #[test]
    fn test_top_n_larger_than_scorers() {
        let cards = vec![card(2, 10), card(0, 1)];
        let dist = distribute_quiz_pool(&cards, 90, SettlementMethod::TopN, 3).unwrap();
        assert_eq!(dist.payouts[0].amount, 90);
        assert_eq!(dist.payouts[1].amount, 0);
        assert_eq!(dist.winner_count, 1);
    }

    #[test]
    fn test_equal_scores_rank_by_completion_time() {
        let cards = vec![card(3, 50), card(3, 40)];
        let dist = distribute_quiz_pool(&cards, 100, SettlementMethod::TopN, 1).unwrap();
        assert_eq!(dist.payouts[0].participant, cards[1].participant);
        assert_eq!(dist.payouts[0].amount, 100);
        assert_eq!(dist.payouts[1].rank, 2);
    }

    #[test]
    fn test_no_scorers_returns_pool_to_creator() {
        let cards = vec![card(0, 1), card(0, 2)];
        let dist = distribute_quiz_pool(&cards, 200, SettlementMethod::Proportional, 0).unwrap();
        assert_eq!(dist.policy, PayoutPolicy::ReturnToCreator);
        assert_eq!(dist.returned_to_creator, 200);
        assert_eq!(dist.distributed, 0);
        assert_eq!(dist.winner_count, 0);
    }
}
