//! Domain model: card readings, amounts, payment methods, the step flow state
//! and the ports through which the flow reaches the outside world.

pub mod amount;
pub mod card;
pub mod flow;
pub mod payment;
pub mod ports;
pub mod transaction;
