//! Balance ledger. Every change to a `UserBalance` goes through `reserve` or
//! `release`, and both hand back the `LedgerTransaction` the caller must emit.
//! No other code writes `balance`.

use anchor_lang::prelude::*;
use anchor_lang::error::ErrorCode;
use crate::errors::StakePoolError;
use crate::events::LedgerTransaction;
use crate::state::{Config, KycProfile, Side, UserBalance, VerificationTier};

pub const MAX_REFERENCE_LEN: usize = 64;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    WagerJoin,
    WagerWin,
    WagerRefund,
    QuizEntry,
    QuizWinnings,
    QuizRefund,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum TransactionMetadata {
    /// Funds moved through the external payment provider.
    Provider { reference: String },
    Wager { wager: Pubkey, side: Side },
    Quiz { quiz: Pubkey },
    QuizPayout { quiz: Pubkey, rank: u16, score: u32 },
    /// Free-form reason for entries with no structured shape.
    Note { text: String },
}

impl UserBalance {
    /// Debits `amount`, failing with `InsufficientFunds` without touching state.
    pub fn reserve(
        &mut self,
        amount: u64,
        kind: TransactionKind,
        reference: Pubkey,
        metadata: TransactionMetadata,
        now: i64,
    ) -> Result<LedgerTransaction> {
        require!(amount > 0, StakePoolError::ZeroAmount);
        require!(self.balance >= amount, StakePoolError::InsufficientFunds);
        let signed = i64::try_from(amount).map_err(|_| error!(StakePoolError::MathOverflow))?;
        let total_debited = self.total_debited
            .checked_add(amount)
            .ok_or(StakePoolError::MathOverflow)?;

        self.balance -= amount;
        self.total_debited = total_debited;
        self.record(kind, -signed, reference, metadata, now)
    }

    /// Credits `amount`. Used for deposits, refunds and winnings.
    pub fn release(
        &mut self,
        amount: u64,
        kind: TransactionKind,
        reference: Pubkey,
        metadata: TransactionMetadata,
        now: i64,
    ) -> Result<LedgerTransaction> {
        require!(amount > 0, StakePoolError::ZeroAmount);
        let signed = i64::try_from(amount).map_err(|_| error!(StakePoolError::MathOverflow))?;
        let balance = self.balance
            .checked_add(amount)
            .ok_or(StakePoolError::MathOverflow)?;
        let total_credited = self.total_credited
            .checked_add(amount)
            .ok_or(StakePoolError::MathOverflow)?;

        self.balance = balance;
        self.total_credited = total_credited;
        self.record(kind, signed, reference, metadata, now)
    }

    fn record(
        &mut self,
        kind: TransactionKind,
        amount: i64,
        reference: Pubkey,
        metadata: TransactionMetadata,
        now: i64,
    ) -> Result<LedgerTransaction> {
        let sequence = self.tx_count;
        self.tx_count = self.tx_count
            .checked_add(1)
            .ok_or(StakePoolError::MathOverflow)?;

        Ok(LedgerTransaction {
            user: self.owner,
            kind,
            amount,
            balance_after: self.balance,
            sequence,
            reference,
            metadata,
            timestamp: now,
        })
    }

    /// balance == credits - debits, i.e. the transaction log replays to the balance.
    pub fn is_reconciled(&self) -> bool {
        self.total_credited
            .checked_sub(self.total_debited)
            .map_or(false, |net| net == self.balance)
    }
}

/// Reads the profile stored at the user's `["kyc", user]` address. The
/// address is fixed by the account constraints, so an empty account means the
/// user has never been verified rather than that the caller left it out.
pub fn load_kyc_profile(info: &AccountInfo) -> Result<Option<KycProfile>> {
    if info.data_is_empty() {
        return Ok(None);
    }
    require_keys_eq!(*info.owner, crate::ID, ErrorCode::AccountOwnedByWrongProgram);
    let data = info.try_borrow_data()?;
    Ok(Some(KycProfile::try_deserialize(&mut &data[..])?))
}

/// Rejects amounts outside the user's KYC transfer bounds. Users without a
/// profile are held to the unverified ceiling from config.
pub fn check_transfer_limits(
    profile: Option<&KycProfile>,
    config: &Config,
    amount: u64,
) -> Result<()> {
    match profile {
        Some(p) if p.tier != VerificationTier::Unverified => {
            require!(
                amount >= p.min_transfer && amount <= p.max_transfer,
                StakePoolError::VerificationRequired
            );
        }
        _ => {
            require!(
                amount <= config.unverified_max_transfer,
                StakePoolError::VerificationRequired
            );
        }
    }
    Ok(())
}

pub fn provider_metadata(reference: String) -> Result<TransactionMetadata> {
    require!(reference.len() <= MAX_REFERENCE_LEN, StakePoolError::ReferenceTooLong);
    Ok(TransactionMetadata::Provider { reference })
}

pub fn note_metadata(text: String) -> Result<TransactionMetadata> {
    require!(text.len() <= MAX_REFERENCE_LEN, StakePoolError::ReferenceTooLong);
    Ok(TransactionMetadata::Note { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance_of(amount: u64) -> UserBalance {
        UserBalance {
            owner: Pubkey::new_unique(),
            balance: amount,
            total_credited: amount,
            total_debited: 0,
            tx_count: 1,
            bump: 255,
        }
    }

    fn config_with_ceiling(ceiling: u64) -> Config {
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
            max_entry_fee_per_question: 1_000_000,
            unverified_max_transfer: ceiling,
            accrued_fees: 0,
            wager_count: 0,
            quiz_count: 0,
            paused: false,
            bump: 255,
            vault_bump: 254,
        }
    }

    fn wager_meta() -> TransactionMetadata {
        TransactionMetadata::Wager { wager: Pubkey::new_unique(), side: Side::A }
    }

    #[test]
    fn test_reserve_debits_and_records() {
        let mut account = balance_of(5_000);
        let wager = Pubkey::new_unique();
        let tx = account
            .reserve(1_000, TransactionKind::WagerJoin, wager, wager_meta(), 42)
            .unwrap();

        assert_eq!(account.balance, 4_000);
        assert_eq!(tx.amount, -1_000);
        assert_eq!(tx.balance_after, 4_000);
        assert_eq!(tx.sequence, 1);
        assert_eq!(tx.reference, wager);
        assert_eq!(tx.user, account.owner);
        assert_eq!(tx.timestamp, 42);
        assert_eq!(account.tx_count, 2);
        assert!(account.is_reconciled());
    }

    #[test]
    fn test_insufficient_funds_leaves_no_trace() {
        let mut account = balance_of(500);
        let err = account
            .reserve(1_000, TransactionKind::WagerJoin, Pubkey::new_unique(), wager_meta(), 0)
            .unwrap_err();

        assert_eq!(err, error!(StakePoolError::InsufficientFunds));
        assert_eq!(account.balance, 500);
        assert_eq!(account.tx_count, 1);
        assert_eq!(account.total_debited, 0);
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let mut account = balance_of(500);
        assert_eq!(
            account
                .release(0, TransactionKind::Deposit, Pubkey::default(), wager_meta(), 0)
                .unwrap_err(),
            error!(StakePoolError::ZeroAmount)
        );
        assert_eq!(
            account
                .reserve(0, TransactionKind::Withdrawal, Pubkey::default(), wager_meta(), 0)
                .unwrap_err(),
            error!(StakePoolError::ZeroAmount)
        );
        assert_eq!(account.tx_count, 1);
    }

    #[test]
    fn test_reserve_then_release_restores_balance() {
        let mut account = balance_of(2_000);
        let wager = Pubkey::new_unique();
        let debit = account
            .reserve(1_000, TransactionKind::WagerJoin, wager, wager_meta(), 1)
            .unwrap();
        let credit = account
            .release(1_000, TransactionKind::WagerRefund, wager, wager_meta(), 2)
            .unwrap();

        assert_eq!(account.balance, 2_000);
        assert_eq!(debit.amount + credit.amount, 0);
        assert_eq!(credit.sequence, debit.sequence + 1);
        assert!(account.is_reconciled());
    }

    #[test]
    fn test_replaying_log_reproduces_balance() {
        let mut account = balance_of(0);
        account.total_credited = 0;
        account.tx_count = 0;
        let reference = Pubkey::new_unique();

        let log = vec![
            account.release(3_000, TransactionKind::Deposit, reference, wager_meta(), 1).unwrap(),
            account.reserve(1_000, TransactionKind::WagerJoin, reference, wager_meta(), 2).unwrap(),
            account.release(1_425, TransactionKind::WagerWin, reference, wager_meta(), 3).unwrap(),
            account.reserve(400, TransactionKind::Withdrawal, reference, wager_meta(), 4).unwrap(),
        ];

        let replayed: i64 = log.iter().map(|tx| tx.amount).sum();
        assert_eq!(replayed, account.balance as i64);
        assert_eq!(account.balance, 3_025);
        assert!(log.windows(2).all(|w| w[1].sequence == w[0].sequence + 1));
    }

    #[test]
    fn test_unverified_users_capped() {
        let config = config_with_ceiling(1_000);
        assert!(check_transfer_limits(None, &config, 1_000).is_ok());
        assert_eq!(
            check_transfer_limits(None, &config, 1_001).unwrap_err(),
            error!(StakePoolError::VerificationRequired)
        );
    }

    #[test]
    fn test_verified_bounds_apply() {
        let config = config_with_ceiling(1_000);
        let mut profile = KycProfile {
            user: Pubkey::new_unique(),
            tier: VerificationTier::Full,
            min_transfer: 100,
            max_transfer: 50_000,
            updated_at: 0,
            bump: 255,
        };
        assert!(check_transfer_limits(Some(&profile), &config, 50_000).is_ok());
        assert_eq!(
            check_transfer_limits(Some(&profile), &config, 99).unwrap_err(),
            error!(StakePoolError::VerificationRequired)
        );

        profile.tier = VerificationTier::Unverified;
        assert_eq!(
            check_transfer_limits(Some(&profile), &config, 5_000).unwrap_err(),
            error!(StakePoolError::VerificationRequired)
        );
    }

    fn profile_account_data(profile: &KycProfile) -> Vec<u8> {
        let mut data = Vec::new();
        profile.try_serialize(&mut data).unwrap();
        data
    }

    #[test]
    fn test_stored_profile_bounds_cannot_be_skipped() {
        let config = config_with_ceiling(1_000);
        let user = Pubkey::new_unique();
        let profile = KycProfile {
            user,
            tier: VerificationTier::Full,
            min_transfer: 100,
            max_transfer: 500,
            updated_at: 0,
            bump: 255,
        };
        let mut data = profile_account_data(&profile);
        let mut lamports = 1_000_000;
        let info = AccountInfo::new(&user, false, false, &mut lamports, &mut data, &crate::ID, false, 0);

        let loaded = load_kyc_profile(&info).unwrap();
        assert_eq!(loaded.as_ref().map(|p| p.max_transfer), Some(500));
        // Under the unverified ceiling, but outside the user's own bounds.
        for amount in [50, 900] {
            assert_eq!(
                check_transfer_limits(loaded.as_ref(), &config, amount).unwrap_err(),
                error!(StakePoolError::VerificationRequired)
            );
        }
        assert!(check_transfer_limits(loaded.as_ref(), &config, 300).is_ok());
    }

    #[test]
    fn test_missing_profile_falls_back_to_unverified_ceiling() {
        let key = Pubkey::new_unique();
        let system = Pubkey::default();
        let mut data: Vec<u8> = Vec::new();
        let mut lamports = 0;
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &system, false, 0);

        assert!(load_kyc_profile(&info).unwrap().is_none());
    }

    #[test]
    fn test_foreign_profile_rejected() {
        let user = Pubkey::new_unique();
        let other_program = Pubkey::new_unique();
        let profile = KycProfile {
            user,
            tier: VerificationTier::Basic,
            min_transfer: 0,
            max_transfer: u64::MAX,
            updated_at: 0,
            bump: 255,
        };
        let mut data = profile_account_data(&profile);
        let mut lamports = 1_000_000;
        let info = AccountInfo::new(&user, false, false, &mut lamports, &mut data, &other_program, false, 0);

        assert_eq!(
            load_kyc_profile(&info).unwrap_err(),
            error!(ErrorCode::AccountOwnedByWrongProgram)
        );
    }

    #[test]
    fn test_provider_reference_length() {
        assert!(provider_metadata("psp_ref_123".to_string()).is_ok());
        assert_eq!(
            provider_metadata("x".repeat(MAX_REFERENCE_LEN + 1)).unwrap_err(),
            error!(StakePoolError::ReferenceTooLong)
        );
    }
}
