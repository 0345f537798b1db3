//! Site profiles: default categories and card selectors per shop

pub mod randtech;
