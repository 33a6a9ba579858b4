//! 2018 day 16: count the samples that could be three or more opcodes, then
//! work out every opcode's number and run the test program.

extern crate advent_machines as aoc;
extern crate argh;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;

use aoc::elfcode::{assemble, parse_samples, resolve_opcodes, Machine};
use argh::FromArgs;
use failure::Error;
use std::fs::File;
use std::io::Read;
use std::time::Instant;

/// Solve 2018 day 16.
#[derive(FromArgs)]
struct Arguments {
    /// the puzzle input; read from stdin if absent
    #[argh(positional)]
    input: Option<String>,

    /// give up on the test program after this many instructions
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

fn main() -> Result<(), Error> {
    env_logger::init();
    let args: Arguments = argh::from_env();
    let input = read_input(args.input.as_ref())?;

    let start = Instant::now();
    let (samples, code) = parse_samples(&input)?;
    let part1 = samples
        .iter()
        .filter(|sample| sample.candidates().len() >= 3)
        .count();

    let opcodes = resolve_opcodes(&samples)?;
    for (op, mnemonic) in opcodes.iter().enumerate() {
        debug!("{:2}: {}", op, mnemonic);
    }
    let program = assemble(&opcodes, &code)?;
    let part2 = Machine::new(&program).run(args.step_limit)?.0[0];
    let elapsed = start.elapsed().as_secs_f32();

    println!("P1: {}", part1);
    println!("P2: {}", part2);
    println!();
    println!("Time: {:.7}", elapsed);

    Ok(())
}
