//! The Intcode computer from 2019 day 2: add, multiply, halt.
//!
//! Code and data share one buffer. Operands are addresses, and an
//! instruction may overwrite code that hasn't run yet, so every computer
//! gets its own copy of the program.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::error::MachineError;
use crate::machine::{self, Execute, State};
use crate::Word;

pub const ADD: Word = 1;
pub const MULTIPLY: Word = 2;
pub const HALT: Word = 99;

pub type Memory = Vec<Word>;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program(pub Memory);

impl FromStr for Program {
    type Err = MachineError;
    fn from_str(s: &str) -> Result<Program, MachineError> {
        s.trim()
            .split(',')
            .enumerate()
            .map(|(i, word)| {
                let word = word.trim();
                match word.parse::<Word>() {
                    Ok(value) if value >= 0 => Ok(value),
                    _ => Err(MachineError::parse(
                        1,
                        word,
                        format!("value {} is not a non-negative integer", i),
                    )),
                }
            })
            .collect::<Result<Memory, _>>()
            .map(Program)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(&self.0.iter().join(","))
    }
}

pub struct Computer {
    memory: Memory,
    pc: usize,
    halted: bool,
}

impl Computer {
    pub fn new(program: &Program) -> Computer {
        Computer {
            memory: program.0.clone(),
            pc: 0,
            halted: false,
        }
    }

    /// A computer with `noun` and `verb` stored at addresses 1 and 2.
    pub fn with_noun_verb(program: &Program, noun: Word, verb: Word) -> Result<Computer, MachineError> {
        let mut computer = Computer::new(program);
        computer.poke(1, noun)?;
        computer.poke(2, verb)?;
        Ok(computer)
    }

    pub fn memory(&self) -> &[Word] {
        &self.memory
    }

    pub fn peek(&self, address: Word) -> Result<Word, MachineError> {
        Ok(self.memory[self.check(address)?])
    }

    pub fn poke(&mut self, address: Word, value: Word) -> Result<(), MachineError> {
        let address = self.check(address)?;
        self.memory[address] = value;
        Ok(())
    }

    fn check(&self, address: Word) -> Result<usize, MachineError> {
        if 0 <= address && (address as usize) < self.memory.len() {
            Ok(address as usize)
        } else {
            Err(MachineError::OutOfBounds {
                address,
                len: self.memory.len(),
            })
        }
    }

    /// Run until `99`, and return the final memory. The answer the puzzle
    /// wants is at address 0.
    pub fn run(mut self, limit: Option<u64>) -> Result<Memory, MachineError> {
        machine::run(&mut self, limit)?;
        Ok(self.memory)
    }
}

impl Execute for Computer {
    fn state(&self) -> State {
        if self.halted {
            State::Halted
        } else {
            State::Running(self.pc)
        }
    }

    fn step(&mut self) -> Result<(), MachineError> {
        if self.halted {
            return Ok(());
        }
        let pc = self.pc;
        let at = pc as Word;
        let opcode = self.peek(at)?;
        match opcode {
            ADD | MULTIPLY => {
                let x = self.peek(self.peek(at + 1)?)?;
                let y = self.peek(self.peek(at + 2)?)?;
                let dest = self.peek(at + 3)?;
                trace!("{:4}  {} {} {} -> [{}]", pc, opcode, x, y, dest);

                let value = if opcode == ADD {
                    x.checked_add(y)
                } else {
                    x.checked_mul(y)
                };
                self.poke(dest, value.ok_or(MachineError::Overflow { pc })?)?;
                self.pc += 4;
            }
            HALT => {
                trace!("{:4}  halt", pc);
                self.halted = true;
            }
            _ => {
                return Err(MachineError::UnsupportedOpcode {
                    pc,
                    text: opcode.to_string(),
                })
            }
        }
        Ok(())
    }
}
