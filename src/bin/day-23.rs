//! 2016 day 23: assembunny with `tgl`.
//!
//! The program computes `a! + x * y`, where `x` and `y` are the literals in
//! instructions 19 and 20. Part 1 (`a = 7`) is cheap to interpret. Part 2
//! (`a = 12`) takes billions of steps, so we use the closed form.

extern crate advent_machines as aoc;
extern crate argh;
extern crate env_logger;
#[macro_use]
extern crate failure;

use aoc::assembunny::{Insn, Machine, Operand, Program};
use aoc::Word;
use argh::FromArgs;
use failure::Error;
use std::fs::File;
use std::io::Read;
use std::time::Instant;

/// Solve 2016 day 23.
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

/// The literal first operand of instruction `pc`.
fn constant(program: &Program, pc: usize) -> Result<Word, Error> {
    match program.0.get(pc) {
        Some(Insn::Copy(Operand::Literal(value), _))
        | Some(Insn::JumpIfNonZero(Operand::Literal(value), _)) => Ok(*value),
        other => Err(format_err!(
            "expected a literal operand at instruction {}, found {:?}",
            pc,
            other
        )),
    }
}

fn factorial(n: Word) -> Word {
    (1..=n).product()
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args: Arguments = argh::from_env();
    let input = read_input(args.input.as_ref())?;

    let start = Instant::now();
    let program = input.parse::<Program>()?;
    let part1 = Machine::with_registers(&program, &[("a", 7)])?
        .run(args.step_limit)?
        .get("a")?;
    let part2 = factorial(12) + constant(&program, 19)? * constant(&program, 20)?;
    let elapsed = start.elapsed().as_secs_f32();

    println!("P1: {}", part1);
    println!("P2: {}", part2);
    println!();
    println!("Time: {:.7}", elapsed);

    Ok(())
}

#[test]
fn test_factorial() {
    assert_eq!(factorial(0), 1);
    assert_eq!(factorial(7), 5040);
    assert_eq!(factorial(12), 479_001_600);
}

#[test]
fn test_constant() {
    let mut text = "inc a\n".repeat(19);
    text.push_str("cpy 73 c\njnz 71 d\n");
    let program = text.parse::<Program>().unwrap();
    assert_eq!(constant(&program, 19).unwrap(), 73);
    assert_eq!(constant(&program, 20).unwrap(), 71);

    // Not a literal, and past the end.
    assert!(constant(&program, 0).is_err());
    assert!(constant(&program, 21).is_err());
}
