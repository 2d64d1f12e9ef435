//! CSV reading for the tabular input.

mod read;

pub(crate) use read::*;
