//! Rules-level tests: perft batteries, make-move consistency, draw
//! detection, evaluation sanity, and the randomised property suite.

mod draw;
mod make_unmake;
mod proptest;
