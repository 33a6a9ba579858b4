//! 2019 day 2: restore the gravity assist program to its "1202 program alarm"
//! state, then find the noun and verb that make it produce `TARGET`.

extern crate advent_machines as aoc;
extern crate argh;
extern crate env_logger;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate itertools;

use aoc::intcode::{Computer, Program};
use aoc::Word;
use argh::FromArgs;
use failure::Error;
use std::fs::File;
use std::io::Read;
use std::time::Instant;

const TARGET: Word = 19_690_720;

/// Solve 2019 day 2.
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

fn output(program: &Program, noun: Word, verb: Word, limit: Option<u64>) -> Result<Word, Error> {
    let memory = Computer::with_noun_verb(program, noun, verb)?.run(limit)?;
    Ok(memory[0])
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args: Arguments = argh::from_env();
    let input = read_input(args.input.as_ref())?;

    let start = Instant::now();
    let program = input.parse::<Program>()?;
    let part1 = output(&program, 12, 2, args.step_limit)?;

    let mut part2 = None;
    for (noun, verb) in iproduct!(0..100, 0..100) {
        if output(&program, noun, verb, args.step_limit)? == TARGET {
            part2 = Some(100 * noun + verb);
            break;
        }
    }
    let part2 = part2.ok_or_else(|| format_err!("no noun and verb produce {}", TARGET))?;
    let elapsed = start.elapsed().as_secs_f32();

    println!("P1: {}", part1);
    println!("P2: {}", part2);
    println!();
    println!("Time: {:.7}", elapsed);

    Ok(())
}
