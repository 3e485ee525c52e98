/*!
This crate provides small utilities shared by the other tally crates: error helpers, loose number parsing, label text helpers and a plain text table renderer.
*/

pub mod error;
pub mod number;
pub mod table;
pub mod text;
