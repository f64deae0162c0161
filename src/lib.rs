//! A red black tree over integer keys that models missing children as explicit black sentinel
//! leaves, together with the arena its nodes live in.

extern crate bincode;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod arena;
pub mod red_black_tree;
