//! Small virtual machines for the Advent of Code puzzles that hand you a
//! program and ask what it leaves behind.
//!
//! - `assembunny`: the 2016 `cpy`/`inc`/`dec`/`jnz` register machine, with
//!   `tgl` and `out`.
//! - `elfcode`: the 2018 six-register machine with bitwise and comparison
//!   opcodes.
//! - `intcode`: the 2019 day 2 machine, whose code is also its data.
//! - `turing`: the 2015 day 23 two-register machine with `hlf`, `tpl`, `inc`,
//!   `jmp`, `jie` and `jio`.
//!
//! All of them run on the loop in `machine`, which supplies halting and an
//! optional step budget.

#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

#[cfg(test)]
extern crate env_logger;

pub mod assembunny;
pub mod elfcode;
pub mod error;
pub mod intcode;
pub mod machine;
pub mod turing;

pub use error::MachineError;
pub use machine::{Execute, State};

pub type Word = isize;

#[cfg(test)]
fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
