//! The 2015 day 23 machine: registers `a` and `b`, and six instructions
//! that halve, triple, increment, or jump.
//!
//! Jumps are relative. The conditional ones test a register: `jie` jumps if
//! it is even, `jio` only if it is exactly one.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use itertools::Itertools;

use crate::error::MachineError;
use crate::machine::{self, Execute, State};
use crate::Word;

const REGISTER_NAMES: &str = "ab";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Register(u8);

impl Register {
    pub fn name(self) -> char {
        (b'a' + self.0) as char
    }
}

impl FromStr for Register {
    type Err = MachineError;
    fn from_str(s: &str) -> Result<Register, MachineError> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch @ 'a'..='b'), None) => Ok(Register(ch as u8 - b'a')),
            _ => Err(MachineError::unknown_register(s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Insn {
    Half(Register),
    Triple(Register),
    Increment(Register),
    Jump(Word),
    JumpIfEven(Register, Word),
    JumpIfOne(Register, Word),
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Insn::Half(r) => write!(f, "hlf {}", r.name()),
            Insn::Triple(r) => write!(f, "tpl {}", r.name()),
            Insn::Increment(r) => write!(f, "inc {}", r.name()),
            Insn::Jump(offset) => write!(f, "jmp {:+}", offset),
            Insn::JumpIfEven(r, offset) => write!(f, "jie {}, {:+}", r.name(), offset),
            Insn::JumpIfOne(r, offset) => write!(f, "jio {}, {:+}", r.name(), offset),
        }
    }
}

fn parse_insn(line: usize, pc: usize, text: &str) -> Result<Insn, MachineError> {
    let words = text.split_whitespace().collect::<Vec<_>>();
    let bad = |reason: String| MachineError::parse(line, text, reason);
    let offset = |word: &str| {
        word.parse::<Word>()
            .map_err(|_| bad(format!("bad offset {:?}", word)))
    };
    // Conditional jumps put a comma after the register.
    let tested = |word: &str| {
        if word.ends_with(',') {
            word[..word.len() - 1].parse::<Register>()
        } else {
            Err(bad(format!("expected a comma after {:?}", word)))
        }
    };
    let arity = |expected: usize| {
        bad(format!(
            "expected {} operand(s), found {}",
            expected,
            words.len() - 1
        ))
    };

    match words[..] {
        ["hlf", r] => Ok(Insn::Half(r.parse()?)),
        ["tpl", r] => Ok(Insn::Triple(r.parse()?)),
        ["inc", r] => Ok(Insn::Increment(r.parse()?)),
        ["jmp", o] => Ok(Insn::Jump(offset(o)?)),
        ["jie", r, o] => Ok(Insn::JumpIfEven(tested(r)?, offset(o)?)),
        ["jio", r, o] => Ok(Insn::JumpIfOne(tested(r)?, offset(o)?)),
        ["hlf", ..] | ["tpl", ..] | ["inc", ..] | ["jmp", ..] => Err(arity(1)),
        ["jie", ..] | ["jio", ..] => Err(arity(2)),
        [] => Err(bad("empty instruction".to_owned())),
        _ => Err(MachineError::UnsupportedOpcode {
            pc,
            text: text.to_owned(),
        }),
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program(pub Vec<Insn>);

impl FromStr for Program {
    type Err = MachineError;
    fn from_str(s: &str) -> Result<Program, MachineError> {
        let mut insns = Vec::new();
        for (i, text) in s.lines().enumerate() {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let pc = insns.len();
            insns.push(parse_insn(i + 1, pc, text)?);
        }
        Ok(Program(insns))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for insn in &self.0 {
            writeln!(f, "{}", insn)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers(pub [Word; 2]);

impl Registers {
    pub fn get(&self, name: &str) -> Result<Word, MachineError> {
        Ok(self[name.parse::<Register>()?])
    }
}

impl Index<Register> for Registers {
    type Output = Word;
    fn index(&self, register: Register) -> &Word {
        &self.0[register.0 as usize]
    }
}

impl IndexMut<Register> for Registers {
    fn index_mut(&mut self, register: Register) -> &mut Word {
        &mut self.0[register.0 as usize]
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let fields = REGISTER_NAMES
            .chars()
            .zip(self.0.iter())
            .map(|(name, value)| format!("{}={}", name, value))
            .join(" ");
        f.write_str(&fields)
    }
}

pub struct Machine<'p> {
    program: &'p Program,
    registers: Registers,
    pc: isize,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p Program) -> Machine<'p> {
        Machine {
            program,
            registers: Registers::default(),
            pc: 0,
        }
    }

    /// Start a machine with some registers seeded, as in `&[("a", 1)]`.
    pub fn with_registers(
        program: &'p Program,
        seeds: &[(&str, Word)],
    ) -> Result<Machine<'p>, MachineError> {
        let mut machine = Machine::new(program);
        for &(name, value) in seeds {
            let register = name.parse::<Register>()?;
            machine.registers[register] = value;
        }
        Ok(machine)
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn run(mut self, limit: Option<u64>) -> Result<Registers, MachineError> {
        machine::run(&mut self, limit)?;
        Ok(self.registers)
    }
}

impl<'p> Execute for Machine<'p> {
    fn state(&self) -> State {
        if 0 <= self.pc && (self.pc as usize) < self.program.0.len() {
            State::Running(self.pc as usize)
        } else {
            State::Halted
        }
    }

    fn step(&mut self) -> Result<(), MachineError> {
        let pc = self.pc as usize;
        let insn = match self.program.0.get(pc) {
            Some(&insn) => insn,
            None => return Ok(()),
        };
        trace!("{:4}  {:10}  {}", pc, insn.to_string(), self.registers);

        let mut offset = 1;
        match insn {
            Insn::Half(r) => self.registers[r] /= 2,
            Insn::Triple(r) => {
                self.registers[r] = self.registers[r]
                    .checked_mul(3)
                    .ok_or(MachineError::Overflow { pc })?;
            }
            Insn::Increment(r) => {
                self.registers[r] = self.registers[r]
                    .checked_add(1)
                    .ok_or(MachineError::Overflow { pc })?;
            }
            Insn::Jump(o) => offset = o,
            Insn::JumpIfEven(r, o) => {
                if self.registers[r] % 2 == 0 {
                    offset = o;
                }
            }
            Insn::JumpIfOne(r, o) => {
                if self.registers[r] == 1 {
                    offset = o;
                }
            }
        }

        self.pc = self
            .pc
            .checked_add(offset)
            .ok_or(MachineError::Overflow { pc })?;
        Ok(())
    }
}
