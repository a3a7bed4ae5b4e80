use anchor_lang::prelude::*;
use crate::state::*;
use crate::errors::StakePoolError;
use crate::events::{LedgerTransaction, WagerPayoutsCompleted};
use crate::ledger::{TransactionKind, TransactionMetadata};
use crate::math::PoolTerms;

#[derive(Accounts)]
pub struct DistributeWagerPayouts<'info> {
    pub cranker: Signer<'info>,

    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [b"wager", wager.wager_id.to_le_bytes().as_ref()],
        bump = wager.bump,
    )]
    pub wager: Account<'info, Wager>,
}

/// Pays the next batch of entries of a settled or refunded wager. Anyone may
/// crank it; entries already paid are skipped.
///
/// remaining_accounts: [entry, user_balance] pairs.
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, DistributeWagerPayouts<'info>>,
) -> Result<()> {
    let terms = ctx.accounts.wager.payout_terms()?;
    let wager_key = ctx.accounts.wager.key();
    let now = Clock::get()?.unix_timestamp;

    pay_entries(
        &mut ctx.accounts.wager,
        wager_key,
        &mut ctx.accounts.config,
        &terms,
        ctx.remaining_accounts,
        now,
    )
}

/// Result of offering one entry to `pay_entry`.
#[derive(Debug, PartialEq)]
pub(crate) enum EntryPayout {
    /// Paid in an earlier batch; nothing changed.
    AlreadyPaid,
    /// Marked paid. Carries the credit record when the payout was non-zero.
    Processed(Option<LedgerTransaction>),
}

/// Prices one entry, credits its owner and marks it paid.
pub(crate) fn pay_entry(
    wager: &mut Wager,
    wager_key: Pubkey,
    terms: &PoolTerms,
    entry: &mut WagerEntry,
    balance: &mut UserBalance,
    now: i64,
) -> Result<EntryPayout> {
    require_keys_eq!(entry.wager, wager_key, StakePoolError::EntryMismatch);
    if entry.paid {
        return Ok(EntryPayout::AlreadyPaid);
    }
    require_keys_eq!(balance.owner, entry.user, StakePoolError::BalanceOwnerMismatch);

    let payout = terms.payout_for(entry.side, entry.amount)?;
    let tx = if payout > 0 {
        let kind = match terms.policy {
            PayoutPolicy::RefundStakes => TransactionKind::WagerRefund,
            _ => TransactionKind::WagerWin,
        };
        Some(balance.release(
            payout,
            kind,
            wager_key,
            TransactionMetadata::Wager { wager: wager_key, side: entry.side },
            now,
        )?)
    } else {
        None
    };

    entry.paid = true;
    entry.payout = payout;
    wager.record_payout(payout)?;
    require!(wager.paid_out <= terms.distributable, StakePoolError::PoolExhausted);

    Ok(EntryPayout::Processed(tx))
}

/// Once every entry is processed, moves the rounding residual to the platform
/// fee. Returns the residual the first time only.
pub(crate) fn finish_payouts(
    wager: &mut Wager,
    config: &mut Config,
    terms: &PoolTerms,
) -> Result<Option<u64>> {
    if wager.payouts_complete || wager.processed_entries != wager.entry_count() {
        return Ok(None);
    }
    let residual = terms.distributable
        .checked_sub(wager.paid_out)
        .ok_or(StakePoolError::PoolExhausted)?;
    config.accrue_fee(residual)?;
    wager.residual = residual;
    wager.payouts_complete = true;
    Ok(Some(residual))
}

/// Runs `pay_entry` over [entry, user_balance] pairs from remaining accounts,
/// writing each account back before the next pair is read so a repeated entry
/// in the same batch is seen as paid.
pub(crate) fn pay_entries<'info>(
    wager: &mut Wager,
    wager_key: Pubkey,
    config: &mut Config,
    terms: &PoolTerms,
    remaining: &'info [AccountInfo<'info>],
    now: i64,
) -> Result<()> {
    require!(remaining.len() % 2 == 0, StakePoolError::MalformedRemainingAccounts);

    for pair in remaining.chunks(2) {
        let mut entry: Account<'info, WagerEntry> = Account::try_from(&pair[0])?;
        let mut balance: Account<'info, UserBalance> = Account::try_from(&pair[1])?;

        match pay_entry(wager, wager_key, terms, &mut entry, &mut balance, now)? {
            EntryPayout::AlreadyPaid => continue,
            EntryPayout::Processed(tx) => {
                if let Some(tx) = tx {
                    balance.exit(&crate::ID)?;
                    emit!(tx);
                }
                entry.exit(&crate::ID)?;
            }
        }
    }

    msg!("Processed {}/{} wager entries", wager.processed_entries, wager.entry_count());

    if let Some(residual) = finish_payouts(wager, config, terms)? {
        emit!(WagerPayoutsCompleted {
            wager: wager_key,
            paid_out: wager.paid_out,
            residual,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled_wager(stakes: &[(Side, u64)], outcome: WagerOutcome) -> Wager {
        let mut wager = Wager {
            wager_id: 0,
            creator: Pubkey::new_unique(),
            side_a_label: "Home".to_string(),
            side_b_label: "Away".to_string(),
            stake_lamports: 1_000,
            deadline: 100,
            status: WagerStatus::Open,
            outcome: None,
            fee_bps: 500,
            side_a_total: 0,
            side_b_total: 0,
            side_a_count: 0,
            side_b_count: 0,
            processed_entries: 0,
            paid_out: 0,
            residual: 0,
            payouts_complete: false,
            created_at: 0,
            resolved_at: 0,
            bump: 255,
        };
        for (side, amount) in stakes {
            wager.record_entry(*side, *amount).unwrap();
        }
        wager.resolve(outcome, 100, false).unwrap();
        wager.begin_settlement().unwrap();
        wager
    }

    fn entry_for(wager_key: Pubkey, side: Side, amount: u64) -> (WagerEntry, UserBalance) {
        let user = Pubkey::new_unique();
        let entry = WagerEntry {
            wager: wager_key,
            user,
            side,
            amount,
            joined_at: 0,
            paid: false,
            payout: 0,
            bump: 255,
        };
        let balance = UserBalance {
            owner: user,
            balance: 0,
            total_credited: amount,
            total_debited: amount,
            tx_count: 2,
            bump: 255,
        };
        (entry, balance)
    }

    fn empty_config() -> Config {
        Config {
            authority: Pubkey::default(),
            treasury: Pubkey::default(),
            kyc_authority: Pubkey::default(),
            grader: Pubkey::default(),
            wager_fee_bps: 500,
            quiz_fee_bps: 1_000,
            min_stake_lamports: 1,
            min_wager_duration_seconds: 60,
            max_quiz_questions: 50,
            max_quiz_participants: 24,
            min_entry_fee_per_question: 1,
            max_entry_fee_per_question: 1_000,
            unverified_max_transfer: 1_000_000,
            accrued_fees: 0,
            wager_count: 0,
            quiz_count: 0,
            paused: false,
            bump: 255,
            vault_bump: 254,
        }
    }

    #[test]
    fn test_retry_never_pays_twice() {
        let wager_key = Pubkey::new_unique();
        let mut wager = settled_wager(&[(Side::A, 1_000), (Side::B, 1_000)], WagerOutcome::SideA);
        let terms = wager.payout_terms().unwrap();
        let (mut entry, mut balance) = entry_for(wager_key, Side::A, 1_000);

        let first = pay_entry(&mut wager, wager_key, &terms, &mut entry, &mut balance, 5).unwrap();
        match first {
            EntryPayout::Processed(Some(tx)) => assert_eq!(tx.amount, 1_900),
            other => panic!("unexpected {:?}", other),
        }
        assert!(entry.paid);
        assert_eq!(balance.balance, 1_900);

        let second = pay_entry(&mut wager, wager_key, &terms, &mut entry, &mut balance, 6).unwrap();
        assert_eq!(second, EntryPayout::AlreadyPaid);
        assert_eq!(balance.balance, 1_900);
        assert_eq!(wager.processed_entries, 1);
        assert_eq!(wager.paid_out, 1_900);
    }

    #[test]
    fn test_foreign_entry_rejected() {
        let wager_key = Pubkey::new_unique();
        let mut wager = settled_wager(&[(Side::A, 1_000)], WagerOutcome::SideA);
        let terms = wager.payout_terms().unwrap();
        let (mut entry, mut balance) = entry_for(Pubkey::new_unique(), Side::A, 1_000);

        assert_eq!(
            pay_entry(&mut wager, wager_key, &terms, &mut entry, &mut balance, 0).unwrap_err(),
            error!(StakePoolError::EntryMismatch)
        );
        assert!(!entry.paid);
        assert_eq!(wager.processed_entries, 0);
    }

    #[test]
    fn test_balance_of_another_user_rejected() {
        let wager_key = Pubkey::new_unique();
        let mut wager = settled_wager(&[(Side::A, 1_000)], WagerOutcome::SideA);
        let terms = wager.payout_terms().unwrap();
        let (mut entry, _) = entry_for(wager_key, Side::A, 1_000);
        let (_, mut stranger) = entry_for(wager_key, Side::A, 1_000);

        assert_eq!(
            pay_entry(&mut wager, wager_key, &terms, &mut entry, &mut stranger, 0).unwrap_err(),
            error!(StakePoolError::BalanceOwnerMismatch)
        );
        assert_eq!(stranger.balance, 0);
        assert!(!entry.paid);
    }

    #[test]
    fn test_losers_are_processed_without_credit() {
        let wager_key = Pubkey::new_unique();
        let mut wager = settled_wager(&[(Side::A, 1_000), (Side::B, 1_000)], WagerOutcome::SideA);
        let terms = wager.payout_terms().unwrap();
        let (mut entry, mut balance) = entry_for(wager_key, Side::B, 1_000);

        let outcome = pay_entry(&mut wager, wager_key, &terms, &mut entry, &mut balance, 0).unwrap();
        assert_eq!(outcome, EntryPayout::Processed(None));
        assert!(entry.paid);
        assert_eq!(entry.payout, 0);
        assert_eq!(balance.tx_count, 2);
    }

    #[test]
    fn test_residual_accrues_once_after_last_entry() {
        let wager_key = Pubkey::new_unique();
        let stakes = [(Side::A, 1_000), (Side::A, 1_000), (Side::A, 1_000), (Side::B, 1_000)];
        let mut wager = settled_wager(&stakes, WagerOutcome::SideA);
        let terms = wager.payout_terms().unwrap();
        let mut config = empty_config();
        config.accrue_fee(terms.platform_fee).unwrap();

        let mut accounts: Vec<(WagerEntry, UserBalance)> = stakes
            .iter()
            .map(|(side, amount)| entry_for(wager_key, *side, *amount))
            .collect();

        // First batch: two entries, nothing accrued yet.
        for (entry, balance) in accounts.iter_mut().take(2) {
            pay_entry(&mut wager, wager_key, &terms, entry, balance, 0).unwrap();
        }
        assert_eq!(finish_payouts(&mut wager, &mut config, &terms).unwrap(), None);
        assert_eq!(config.accrued_fees, 200);

        // Second batch replays the first two and finishes the rest.
        for (entry, balance) in accounts.iter_mut() {
            pay_entry(&mut wager, wager_key, &terms, entry, balance, 0).unwrap();
        }
        assert_eq!(finish_payouts(&mut wager, &mut config, &terms).unwrap(), Some(2));
        assert_eq!(finish_payouts(&mut wager, &mut config, &terms).unwrap(), None);

        assert!(wager.payouts_complete);
        assert_eq!(wager.residual, 2);
        assert_eq!(config.accrued_fees, 202);
        let credited: u64 = accounts.iter().map(|(_, b)| b.balance).sum();
        assert_eq!(credited, 3 * 1_266);
        assert_eq!(credited + config.accrued_fees, wager.total_pool().unwrap());
    }

    #[test]
    fn test_refund_returns_every_stake() {
        let wager_key = Pubkey::new_unique();
        let mut wager = settled_wager(&[(Side::A, 700), (Side::B, 300)], WagerOutcome::Push);
        let terms = wager.payout_terms().unwrap();
        let mut config = empty_config();

        let (mut a, mut a_balance) = entry_for(wager_key, Side::A, 700);
        let (mut b, mut b_balance) = entry_for(wager_key, Side::B, 300);
        pay_entry(&mut wager, wager_key, &terms, &mut a, &mut a_balance, 0).unwrap();
        pay_entry(&mut wager, wager_key, &terms, &mut b, &mut b_balance, 0).unwrap();

        assert_eq!(finish_payouts(&mut wager, &mut config, &terms).unwrap(), Some(0));
        assert_eq!(a_balance.balance, 700);
        assert_eq!(b_balance.balance, 300);
        assert_eq!(config.accrued_fees, 0);
        assert!(a_balance.is_reconciled() && b_balance.is_reconciled());
    }
}
