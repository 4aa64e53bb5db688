//! Command entry points: batch-apply and ad-hoc single-call modes.

pub mod adhoc;
pub mod apply;
