//! 2018 day 21: the program halts once register 0 equals a value it
//! generates, checked by a single `eqrr` against register 0.
//!
//! Part 1 wants the first value compared, so we interpret until we reach
//! the check. Part 2 wants the last new value before the generator repeats,
//! which takes far too long to interpret; instead we run this hand-compiled
//! version of the generator loop, seeded with the constant in instruction 7.

extern crate advent_machines as aoc;
extern crate argh;
extern crate env_logger;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

use aoc::elfcode::{Machine, Program};
use aoc::{Execute, State, Word};
use argh::FromArgs;
use failure::Error;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::iter::successors;
use std::time::Instant;

const MASK: Word = 0xff_ffff;
const MULTIPLIER: Word = 0x1016b;

/// Solve 2018 day 21.
#[derive(FromArgs)]
struct Arguments {
    /// the puzzle input; read from stdin if absent
    #[argh(positional)]
    input: Option<String>,

    /// give up on part 1 after this many instructions
    #[argh(option)]
    step_limit: Option<u64>,
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

/// Find the `eqrr` that compares against register 0. Return its index and
/// the register holding the generated value.
fn find_check(program: &Program) -> Result<(usize, Word), Error> {
    program
        .insns
        .iter()
        .enumerate()
        .filter(|(_pc, insn)| insn.mnemonic() == "eqrr")
        .filter_map(|(pc, insn)| match (insn.a, insn.b) {
            (0, other) | (other, 0) => Some((pc, other)),
            _ => None,
        })
        .next()
        .ok_or_else(|| format_err!("program never compares anything with register 0"))
}

/// The values the generator compares against register 0, in order.
fn generated(seed: Word) -> impl Iterator<Item = Word> {
    successors(Some(0), move |&previous| {
        let mut r1 = previous | 0x10000;
        let mut r3 = seed;
        loop {
            r3 = (((r3 + (r1 & 0xff)) & MASK) * MULTIPLIER) & MASK;
            if r1 < 256 {
                break;
            }
            r1 /= 256;
        }
        Some(r3)
    })
    .skip(1)
}

/// Interpret `program` up to its check, and return the first value it
/// compares against register 0.
fn first_checked(program: &Program, limit: Option<u64>) -> Result<Word, Error> {
    let (check, reg) = find_check(program)?;
    let mut machine = Machine::new(program);
    let steps = machine.run_until(limit, |m| m.state() == State::Running(check))?;
    if machine.state() == State::Halted {
        return Err(format_err!("program halted without reaching instruction {}", check));
    }
    debug!("reached the check at {} after {} steps", check, steps);
    Ok(machine.registers().get(reg)?)
}

/// The last value the generator produces before it starts repeating.
fn last_before_repeat(seed: Word) -> Result<Word, Error> {
    let mut seen = HashSet::new();
    let mut last = None;
    for value in generated(seed) {
        if !seen.insert(value) {
            break;
        }
        last = Some(value);
    }
    last.ok_or_else(|| format_err!("generator produced nothing"))
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args: Arguments = argh::from_env();
    let input = read_input(args.input.as_ref())?;

    let start = Instant::now();
    let program = input.parse::<Program>()?;
    let part1 = first_checked(&program, args.step_limit)?;

    let seed = program
        .insns
        .get(7)
        .map(|insn| insn.a)
        .ok_or_else(|| format_err!("program is too short to hold the generator seed"))?;
    let first = generated(seed).next();
    if first != Some(part1) {
        return Err(format_err!(
            "generator seeded with {} disagrees with the program: {:?} vs {}",
            seed,
            first,
            part1
        ));
    }
    let part2 = last_before_repeat(seed)?;
    let elapsed = start.elapsed().as_secs_f32();

    println!("P1: {}", part1);
    println!("P2: {}", part2);
    println!();
    println!("Time: {:.7}", elapsed);

    Ok(())
}

#[cfg(test)]
const SAMPLE: &str = "#ip 3
seti 123 0 1
bani 1 456 1
eqri 1 72 1
addr 1 3 3
seti 0 0 3
seti 0 3 1
bori 1 65536 4
seti 10736359 9 1
bani 4 255 2
addr 1 2 1
bani 1 16777215 1
muli 1 65899 1
bani 1 16777215 1
gtir 256 4 2
addr 2 3 3
addi 3 1 3
seti 27 2 3
seti 0 6 2
addi 2 1 5
muli 5 256 5
gtrr 5 4 5
addr 5 3 3
addi 3 1 3
seti 25 5 3
addi 2 1 2
seti 17 0 3
setr 2 6 4
seti 7 8 3
eqrr 1 0 2
addr 2 3 3
seti 5 3 1
";

#[test]
fn test_find_check() {
    let program = SAMPLE.parse::<Program>().unwrap();
    assert_eq!(find_check(&program).unwrap(), (28, 1));

    let program = "seti 1 0 0".parse::<Program>().unwrap();
    assert!(find_check(&program).is_err());
}

#[test]
fn test_generated_matches_program() {
    let program = SAMPLE.parse::<Program>().unwrap();
    let first = first_checked(&program, Some(10_000)).unwrap();
    assert_eq!(first, 16_311_888);
    assert_eq!(
        generated(program.insns[7].a).take(2).collect::<Vec<_>>(),
        vec![first, 9_015_838]
    );
}

#[test]
fn test_last_before_repeat() {
    assert_eq!(last_before_repeat(10_736_359).unwrap(), 1_413_889);
}
