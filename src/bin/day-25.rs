//! 2016 day 25: find the lowest positive `a` that makes the assembunny
//! program emit an endless `0, 1, 0, 1, ...` clock signal. We settle for the
//! first `SIGNAL_LENGTH` values.

extern crate advent_machines as aoc;
extern crate argh;
extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;

use aoc::assembunny::{Machine, Program};
use aoc::{MachineError, Word};
use argh::FromArgs;
use failure::Error;
use itertools::Itertools;
use std::fs::File;
use std::io::Read;
use std::time::Instant;

const SIGNAL_LENGTH: usize = 32;
const MAX_SEED: Word = 1_000_000;

/// Solve 2016 day 25.
#[derive(FromArgs)]
struct Arguments {
    /// the puzzle input; read from stdin if absent
    #[argh(positional)]
    input: Option<String>,

    /// give up on each candidate after this many instructions
    #[argh(option, default = "1_000_000")]
    step_limit: u64,
}

fn read_input(path: Option<&String>) -> Result<String, Error> {
    let mut input = String::new();
    match path {
        Some(path) => {
            File::open(path)?.read_to_string(&mut input)?;
        }
        None => {
            let stdin = std::io::stdin();
            stdin.lock().read_to_string(&mut input)?;
        }
    }
    Ok(input)
}

fn is_clock(signal: &[Word]) -> bool {
    signal.len() == SIGNAL_LENGTH
        && signal[0] == 0
        && signal.iter().all(|&bit| bit == 0 || bit == 1)
        && signal.iter().tuple_windows().all(|(x, y)| x != y)
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args: Arguments = argh::from_env();
    let input = read_input(args.input.as_ref())?;

    let start = Instant::now();
    let program = input.parse::<Program>()?;
    let mut part1 = None;
    for seed in 1..=MAX_SEED {
        let mut machine = Machine::with_registers(&program, &[("a", seed)])?;
        match machine.run_until_output(SIGNAL_LENGTH, Some(args.step_limit)) {
            Ok(_steps) => (),
            Err(MachineError::StepLimitExceeded { .. }) => continue,
            Err(err) => return Err(err.into()),
        }
        debug!("a = {}: {:?}", seed, machine.output());
        if is_clock(machine.output()) {
            part1 = Some(seed);
            break;
        }
    }
    let part1 = part1.ok_or_else(|| format_err!("no seed up to {} produces a clock signal", MAX_SEED))?;
    let elapsed = start.elapsed().as_secs_f32();

    println!("P1: {}", part1);
    println!();
    println!("Time: {:.7}", elapsed);

    Ok(())
}

#[test]
fn test_is_clock() {
    let clock = (0..SIGNAL_LENGTH).map(|i| (i % 2) as Word).collect::<Vec<_>>();
    assert!(is_clock(&clock));

    // Too short.
    assert!(!is_clock(&clock[..SIGNAL_LENGTH - 1]));

    // Starts with 1.
    let flipped = clock.iter().map(|bit| 1 - bit).collect::<Vec<_>>();
    assert!(!is_clock(&flipped));

    // Stutters.
    let mut stutter = clock.clone();
    stutter[10] = stutter[11];
    assert!(!is_clock(&stutter));

    // Alternates, but not between 0 and 1.
    let wide = (0..SIGNAL_LENGTH).map(|i| (i % 2) as Word * 2).collect::<Vec<_>>();
    assert!(!is_clock(&wide));
}
