//! Port adapters: timer-and-dice simulations of the card reader and payment
//! gateway, plus scripted replacements that replay fixed outcomes.

pub mod scripted;
pub mod simulated;
