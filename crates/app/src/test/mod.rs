//! Test infrastructure.

pub(crate) mod db;
