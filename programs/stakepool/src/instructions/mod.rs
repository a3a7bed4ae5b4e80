pub mod initialize;
pub mod update_config;
pub mod toggle_pause;
pub mod transfer_authority;
pub mod set_kyc_profile;
pub mod deposit;
pub mod withdraw;
pub mod withdraw_platform_fees;
pub mod create_wager;
pub mod join_wager;
pub mod resolve_wager;
pub mod settle_wager;
pub mod refund_wager;
pub mod distribute_wager_payouts;
pub mod create_quiz;
pub mod add_quiz_question;
pub mod publish_quiz;
pub mod invite_quiz_participant;
pub mod join_quiz;
pub mod start_quiz;
pub mod complete_quiz_participant;
pub mod close_quiz;
pub mod settle_quiz;
pub mod cancel_quiz;

pub use initialize::*;
pub use update_config::*;
pub use toggle_pause::*;
pub use transfer_authority::*;
pub use set_kyc_profile::*;
pub use deposit::*;
pub use withdraw::*;
pub use withdraw_platform_fees::*;
pub use create_wager::*;
pub use join_wager::*;
pub use resolve_wager::*;
pub use settle_wager::*;
pub use refund_wager::*;
pub use distribute_wager_payouts::*;
pub use create_quiz::*;
pub use add_quiz_question::*;
pub use publish_quiz::*;
pub use invite_quiz_participant::*;
pub use join_quiz::*;
pub use start_quiz::*;
pub use complete_quiz_participant::*;
pub use close_quiz::*;
pub use settle_quiz::*;
pub use cancel_quiz::*;
