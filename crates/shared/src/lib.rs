//! Wire and domain types shared by the exam clients.

pub mod domain;
pub mod error;
pub mod protocol;
