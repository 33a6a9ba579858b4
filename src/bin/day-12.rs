//! 2016 day 12: run the assembunny program once with every register zeroed,
//! and once with `c = 1`. Both answers are what ends up in `a`.

extern crate advent_machines as aoc;
extern crate argh;
extern crate env_logger;
extern crate failure;

use aoc::assembunny::{Machine, Program};
use argh::FromArgs;
use failure::Error;
use std::fs::File;
use std::io::Read;
use std::time::Instant;

/// Solve 2016 day 12.
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

fn main() -> Result<(), Error> {
    env_logger::init();
    let args: Arguments = argh::from_env();
    let input = read_input(args.input.as_ref())?;

    let start = Instant::now();
    let program = input.parse::<Program>()?;
    let part1 = Machine::new(&program).run(args.step_limit)?.get("a")?;
    let part2 = Machine::with_registers(&program, &[("c", 1)])?
        .run(args.step_limit)?
        .get("a")?;
    let elapsed = start.elapsed().as_secs_f32();

    println!("P1: {}", part1);
    println!("P2: {}", part2);
    println!();
    println!("Time: {:.7}", elapsed);

    Ok(())
}
