//! Campaign coupon pools: deterministic code generation, atomic pool
//! creation, and contention-tolerant issuance.

pub mod codes;
pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod ids;
