//! Application layer orchestrating the recharge.
//!
//! [`flow::RechargeStepFlow`] drives one attempt through the card scanner and
//! payment gateway ports; [`dashboard::Dashboard`] is the caller that receives
//! completed transactions.

pub mod dashboard;
pub mod flow;
