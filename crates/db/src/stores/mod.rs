//! Transactional workflows.
//!
//! Each mutating method opens one transaction, re-checks the actor's rights,
//! applies the change with its revision rows, appends the audit entry and
//! commits. Any error drops the transaction and rolls everything back.

pub mod case_store;
pub mod question_store;
pub mod user_store;

pub use case_store::CaseStore;
pub use question_store::QuestionStore;
pub use user_store::UserStore;
