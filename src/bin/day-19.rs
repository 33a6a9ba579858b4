//! 2018 day 19: the program sums the divisors of a number it builds during
//! setup. Part 1 is quick to interpret outright. Part 2 starts with `r0 = 1`,
//! which makes the number enormous, so we interpret only until the setup
//! code jumps back to instruction 1, take the largest register as the
//! number, and sum its divisors ourselves.

extern crate advent_machines as aoc;
extern crate argh;
extern crate env_logger;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

use aoc::elfcode::{Machine, Program, Registers};
use aoc::{Execute, State, Word};
use argh::FromArgs;
use failure::Error;
use std::fs::File;
use std::io::Read;
use std::time::Instant;

/// Solve 2018 day 19.
#[derive(FromArgs)]
struct Arguments {
    /// the puzzle input; read from stdin if absent
    #[argh(positional)]
    input: Option<String>,

    /// give up on a run after this many instructions
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

fn sum_of_divisors(n: Word) -> Word {
    (1..)
        .take_while(|d| d * d <= n)
        .filter(|d| n % d == 0)
        .map(|d| if d * d == n { d } else { d + n / d })
        .sum()
}

/// Run the setup code with `r0` seeded, and return the number whose divisors
/// the main loop would sum.
fn target(program: &Program, r0: Word, limit: Option<u64>) -> Result<Word, Error> {
    let mut registers = Registers::default();
    registers.0[0] = r0;
    let mut machine = Machine::with_registers(program, registers);

    // Instruction 0 jumps to the setup code, which jumps back to 1 when done.
    if machine.state() == State::Halted {
        return Err(format_err!("program is empty"));
    }
    machine.step()?;
    machine.run_until(limit, |m| m.state() == State::Running(1))?;
    if machine.state() == State::Halted {
        return Err(format_err!("program halted during setup"));
    }
    debug!("after setup: {}", machine.registers());

    machine
        .registers()
        .0
        .iter()
        .cloned()
        .max()
        .ok_or_else(|| format_err!("machine has no registers"))
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args: Arguments = argh::from_env();
    let input = read_input(args.input.as_ref())?;

    let start = Instant::now();
    let program = input.parse::<Program>()?;
    let part1 = Machine::new(&program).run(args.step_limit)?.0[0];
    let part2 = sum_of_divisors(target(&program, 1, args.step_limit)?);
    let elapsed = start.elapsed().as_secs_f32();

    println!("P1: {}", part1);
    println!("P2: {}", part2);
    println!();
    println!("Time: {:.7}", elapsed);

    Ok(())
}

#[test]
fn test_sum_of_divisors() {
    assert_eq!(sum_of_divisors(1), 1);
    assert_eq!(sum_of_divisors(6), 12);
    assert_eq!(sum_of_divisors(16), 31);
    assert_eq!(sum_of_divisors(28), 56);
}

#[test]
fn test_target() {
    // Setup stores 10 in r2 and jumps back to instruction 1.
    let text = "#ip 4\naddi 4 1 4\nseti 99 0 4\nseti 10 0 2\nseti 0 0 4";
    let program = text.parse::<Program>().unwrap();
    assert_eq!(target(&program, 1, Some(100)).unwrap(), 10);

    assert!(target(&Program::default(), 1, None).is_err());
}
