//! Rotating Savings Fund Engine
//!
//! A fixed group of members each contribute a fixed amount per round; each
//! round one not-yet-paid member is drawn at random to receive the pool.
//!
//! # Key Types
//!
//! - [`FundEngine`]: enrollment, contributions, payouts and lifecycle transitions
//! - [`FundStore`]: persistence seam, with [`JsonFileStore`] and [`MemoryFundStore`]
//! - [`FundRegistry`]: funds as directories under a base directory
//! - [`FundLedger`]: the four entities of one fund held in memory
//!
//! # Execution
//!
//! ```rust,ignore
//! use lib_chitfund::{DurationUnit, FundRegistry, FundTerms};
//!
//! let registry = FundRegistry::new("./funds");
//! let terms = FundTerms::new(100, DurationUnit::Monthly, 12);
//! let mut engine = registry.create_fund("Family", terms, &["Asha".into(), "Ben".into()])?;
//! engine.collect_contribution("asha")?;
//! engine.collect_contribution("ben")?;
//! let receipt = engine.payout_money(&mut rand::thread_rng())?;
//! ```

pub mod engine;
pub mod errors;
pub mod file_store;
pub mod registry;
pub mod store;
pub mod types;

pub use engine::{
    CompletionAction, ContributionReceipt, FundEngine, LifecycleOutcome, PayoutReceipt,
};
pub use errors::*;
pub use file_store::JsonFileStore;
pub use registry::{validate_fund_name, FundRegistry, FundSummary};
pub use store::{CommitOp, FundStore, MemoryFundStore};
pub use types::*;
