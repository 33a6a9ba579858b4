//! The 2016 "assembunny" register machine: four registers, `cpy`, `inc`,
//! `dec` and `jnz`, plus `tgl` (day 23) and `out` (day 25).
//!
//! A `Program` is parsed once and then borrowed by as many machines as you
//! like; each machine gets its own registers. `tgl` rewrites code, so a
//! machine that executes one quietly takes a private copy of the program
//! first.

use std::borrow::Cow;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use itertools::Itertools;

use crate::error::MachineError;
use crate::machine::{self, Execute, State};
use crate::Word;

const REGISTER_NAMES: &str = "abcd";

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
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
            (Some(ch @ 'a'..='d'), None) => Ok(Register(ch as u8 - b'a')),
            _ => Err(MachineError::unknown_register(s)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operand {
    Literal(Word),
    Register(Register),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Register(register) => write!(f, "{}", register.name()),
        }
    }
}

/// Operands in register positions are `Operand`s rather than `Register`s
/// because `tgl` can turn `jnz 1 3` into `cpy 1 3`, and toggling it again must
/// give back the original. The parser never produces such forms; executing
/// one does nothing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Insn {
    Copy(Operand, Operand),
    Increment(Operand),
    Decrement(Operand),
    JumpIfNonZero(Operand, Operand),
    Toggle(Operand),
    Out(Operand),
}

impl Insn {
    /// The instruction `tgl` turns this one into.
    pub fn toggled(self) -> Insn {
        match self {
            Insn::Increment(x) => Insn::Decrement(x),
            Insn::Decrement(x) | Insn::Toggle(x) | Insn::Out(x) => Insn::Increment(x),
            Insn::JumpIfNonZero(x, y) => Insn::Copy(x, y),
            Insn::Copy(x, y) => Insn::JumpIfNonZero(x, y),
        }
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Insn::Copy(x, y) => write!(f, "cpy {} {}", x, y),
            Insn::Increment(x) => write!(f, "inc {}", x),
            Insn::Decrement(x) => write!(f, "dec {}", x),
            Insn::JumpIfNonZero(x, y) => write!(f, "jnz {} {}", x, y),
            Insn::Toggle(x) => write!(f, "tgl {}", x),
            Insn::Out(x) => write!(f, "out {}", x),
        }
    }
}

fn parse_operand(line: usize, text: &str, word: &str) -> Result<Operand, MachineError> {
    if let Ok(value) = word.parse::<Word>() {
        return Ok(Operand::Literal(value));
    }

    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_lowercase() => Ok(Operand::Register(word.parse()?)),
        _ => Err(MachineError::parse(
            line,
            text,
            format!("bad operand {:?}", word),
        )),
    }
}

/// Parse the instruction on `line` (one-based) of the text, which will live
/// at index `pc` of the program. An unknown mnemonic is reported before any
/// problem with its operands.
fn parse_insn(line: usize, pc: usize, text: &str) -> Result<Insn, MachineError> {
    let words = text.split_whitespace().collect::<Vec<_>>();
    let operand = |word: &str| parse_operand(line, text, word);
    let register = |position: usize, word: &str| -> Result<Operand, MachineError> {
        match operand(word)? {
            Operand::Literal(_) => Err(MachineError::parse(
                line,
                text,
                format!("operand {} must be a register", position),
            )),
            register => Ok(register),
        }
    };
    let arity = |expected: usize| {
        MachineError::parse(
            line,
            text,
            format!("expected {} operand(s), found {}", expected, words.len() - 1),
        )
    };

    match words[..] {
        ["cpy", x, y] => Ok(Insn::Copy(operand(x)?, register(2, y)?)),
        ["inc", x] => Ok(Insn::Increment(register(1, x)?)),
        ["dec", x] => Ok(Insn::Decrement(register(1, x)?)),
        ["jnz", x, y] => Ok(Insn::JumpIfNonZero(operand(x)?, operand(y)?)),
        ["tgl", x] => Ok(Insn::Toggle(operand(x)?)),
        ["out", x] => Ok(Insn::Out(operand(x)?)),
        ["cpy", ..] | ["jnz", ..] => Err(arity(2)),
        ["inc", ..] | ["dec", ..] | ["tgl", ..] | ["out", ..] => Err(arity(1)),
        [] => Err(MachineError::parse(line, text, "empty instruction")),
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

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Registers(pub [Word; 4]);

impl Registers {
    /// Look up a register by name.
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
    program: Cow<'p, [Insn]>,
    registers: Registers,
    /// Signed, since a jump may land before the start; that halts.
    pc: isize,
    output: Vec<Word>,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p Program) -> Machine<'p> {
        Machine {
            program: Cow::Borrowed(&program.0),
            registers: Registers::default(),
            pc: 0,
            output: Vec::new(),
        }
    }

    /// Start a machine with some registers seeded, as in `&[("c", 1)]`. The
    /// rest start at zero.
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

    /// Everything `out` has produced so far.
    pub fn output(&self) -> &[Word] {
        &self.output
    }

    /// The program as this machine currently sees it, toggles included.
    pub fn code(&self) -> &[Insn] {
        &self.program
    }

    /// Run to completion and return the final registers.
    pub fn run(mut self, limit: Option<u64>) -> Result<Registers, MachineError> {
        machine::run(&mut self, limit)?;
        Ok(self.registers)
    }

    /// Run until `out` has produced at least `count` values in total, or the
    /// program halts.
    pub fn run_until_output(
        &mut self,
        count: usize,
        limit: Option<u64>,
    ) -> Result<u64, MachineError> {
        machine::run_until(self, limit, |machine| machine.output.len() >= count)
    }

    fn value(&self, operand: Operand) -> Word {
        match operand {
            Operand::Literal(value) => value,
            Operand::Register(register) => self.registers[register],
        }
    }
}

impl<'p> Execute for Machine<'p> {
    fn state(&self) -> State {
        if 0 <= self.pc && (self.pc as usize) < self.program.len() {
            State::Running(self.pc as usize)
        } else {
            State::Halted
        }
    }

    fn step(&mut self) -> Result<(), MachineError> {
        // A negative `pc` wraps to an index no program reaches.
        let pc = self.pc as usize;
        let insn = match self.program.get(pc) {
            Some(&insn) => insn,
            None => return Ok(()),
        };
        trace!("{:4}  {:12}  {}", pc, insn.to_string(), self.registers);

        let mut next = self.pc + 1;
        match insn {
            Insn::Copy(src, Operand::Register(dst)) => {
                let value = self.value(src);
                self.registers[dst] = value;
            }
            Insn::Increment(Operand::Register(r)) => {
                self.registers[r] = self.registers[r]
                    .checked_add(1)
                    .ok_or(MachineError::Overflow { pc })?;
            }
            Insn::Decrement(Operand::Register(r)) => {
                self.registers[r] = self.registers[r]
                    .checked_sub(1)
                    .ok_or(MachineError::Overflow { pc })?;
            }
            Insn::JumpIfNonZero(test, offset) => {
                if self.value(test) != 0 {
                    next = self
                        .pc
                        .checked_add(self.value(offset))
                        .ok_or(MachineError::Overflow { pc })?;
                }
            }
            Insn::Toggle(offset) => {
                let len = self.program.len();
                match self.pc.checked_add(self.value(offset)) {
                    Some(target) if 0 <= target && (target as usize) < len => {
                        let target = target as usize;
                        let toggled = self.program[target].toggled();
                        debug!("tgl at {}: {} -> {}", pc, self.program[target], toggled);
                        self.program.to_mut()[target] = toggled;
                    }
                    _ => (),
                }
            }
            Insn::Out(value) => {
                let value = self.value(value);
                self.output.push(value);
            }
            Insn::Copy(_, Operand::Literal(_))
            | Insn::Increment(Operand::Literal(_))
            | Insn::Decrement(Operand::Literal(_)) => {
                debug!("skipping invalid instruction at {}: {}", pc, insn);
            }
        }

        self.pc = next;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run_program(text: &str, seeds: &[(&str, Word)]) -> Result<Registers, MachineError> {
        crate::init_test_logging();
        let program = text.parse::<Program>()?;
        Machine::with_registers(&program, seeds)?.run(Some(10_000))
    }

    #[test]
    fn test_parse() -> Result<(), MachineError> {
        let program = "cpy 41 a\n inc a \n\ndec b\njnz c -2\ntgl d\nout +3\n".parse::<Program>()?;
        let a = Operand::Register("a".parse()?);
        let b = Operand::Register("b".parse()?);
        let c = Operand::Register("c".parse()?);
        let d = Operand::Register("d".parse()?);
        assert_eq!(
            program.0,
            vec![
                Insn::Copy(Operand::Literal(41), a),
                Insn::Increment(a),
                Insn::Decrement(b),
                Insn::JumpIfNonZero(c, Operand::Literal(-2)),
                Insn::Toggle(d),
                Insn::Out(Operand::Literal(3)),
            ]
        );
        assert_eq!(
            program.to_string(),
            "cpy 41 a\ninc a\ndec b\njnz c -2\ntgl d\nout 3\n"
        );
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "cpy 1 a\ncpy 1".parse::<Program>(),
            Err(MachineError::parse(2, "cpy 1", "expected 2 operand(s), found 1"))
        );
        assert_eq!(
            "cpy 1 2".parse::<Program>(),
            Err(MachineError::parse(1, "cpy 1 2", "operand 2 must be a register"))
        );
        assert_eq!(
            "inc 3x".parse::<Program>(),
            Err(MachineError::parse(1, "inc 3x", "bad operand \"3x\""))
        );
        assert_eq!(
            "jnz a".parse::<Program>(),
            Err(MachineError::parse(1, "jnz a", "expected 2 operand(s), found 1"))
        );
        assert_eq!(
            "out a b".parse::<Program>(),
            Err(MachineError::parse(1, "out a b", "expected 1 operand(s), found 2"))
        );
        assert_eq!(
            "mul a 3x".parse::<Program>(),
            Err(MachineError::UnsupportedOpcode {
                pc: 0,
                text: "mul a 3x".to_owned()
            })
        );
        assert_eq!(
            "inc a\n\nmul a b".parse::<Program>(),
            Err(MachineError::UnsupportedOpcode {
                pc: 1,
                text: "mul a b".to_owned()
            })
        );
    }

    #[test]
    fn test_unknown_register() {
        assert_eq!(
            "inc a\ncpy 1 e".parse::<Program>(),
            Err(MachineError::unknown_register("e"))
        );

        let program = Program::default();
        assert_eq!(
            Machine::with_registers(&program, &[("a", 1), ("e", 2)]).err(),
            Some(MachineError::unknown_register("e"))
        );
        assert_eq!(
            Registers::default().get("ab"),
            Err(MachineError::unknown_register("ab"))
        );
    }

    #[test]
    fn test_copy_increment() -> Result<(), MachineError> {
        let registers = run_program("cpy 41 a\ninc a\ninc a\ninc a\njnz a 2\ninc a", &[])?;
        assert_eq!(registers.get("a")?, 44);

        // The example from 2016 day 12.
        let registers = run_program("cpy 41 a\ninc a\ninc a\ndec a\njnz a 2\ndec a", &[])?;
        assert_eq!(registers, Registers([42, 0, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_loops() -> Result<(), MachineError> {
        let registers = run_program("cpy 2 a\ndec a\njnz a -1", &[])?;
        assert_eq!(registers.get("a")?, 0);

        // Multiply by repeated addition.
        let text = "cpy 6 b\ncpy 7 c\ncpy c d\ninc a\ndec d\njnz d -2\ndec b\njnz b -5";
        assert_eq!(run_program(text, &[])?.get("a")?, 42);

        // A jump before the start of the program halts, too.
        assert_eq!(run_program("inc a\njnz a -5\ninc a", &[])?.get("a")?, 1);
        Ok(())
    }

    #[test]
    fn test_literal_zero_never_jumps() -> Result<(), MachineError> {
        let registers = run_program("jnz 0 5\ninc a\njnz 1 2\ninc a\ninc b", &[])?;
        assert_eq!(registers, Registers([1, 1, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_seeds_are_independent() -> Result<(), MachineError> {
        let program = "cpy c a\ninc a".parse::<Program>()?;

        let first = Machine::new(&program).run(None)?;
        let second = Machine::with_registers(&program, &[("c", 1)])?.run(None)?;
        let third = Machine::new(&program).run(None)?;

        assert_eq!(first.get("a")?, 1);
        assert_eq!(second.get("a")?, 2);
        assert_eq!(first, third);
        Ok(())
    }

    #[test]
    fn test_step_limit() -> Result<(), MachineError> {
        let program = "inc a\njnz 1 -1".parse::<Program>()?;
        assert_eq!(
            Machine::new(&program).run(Some(1000)),
            Err(MachineError::StepLimitExceeded { limit: 1000 })
        );
        Ok(())
    }

    #[test]
    fn test_step_when_halted() -> Result<(), MachineError> {
        let program = Program::default();
        let mut machine = Machine::new(&program);
        assert_eq!(machine.state(), State::Halted);
        assert_eq!(machine.step(), Ok(()));

        // Jumping before the start halts; stepping again changes nothing.
        let program = "jnz 1 -5".parse::<Program>()?;
        let mut machine = Machine::new(&program);
        machine.step()?;
        assert_eq!(machine.state(), State::Halted);
        assert_eq!(machine.step(), Ok(()));
        assert_eq!(machine.state(), State::Halted);
        assert_eq!(machine.registers(), &Registers::default());
        Ok(())
    }

    #[test]
    fn test_toggle() -> Result<(), MachineError> {
        // The example from 2016 day 23.
        let program = "cpy 2 a\ntgl a\ntgl a\ntgl a\ncpy 1 a\ndec a\ndec a".parse::<Program>()?;
        let mut machine = Machine::new(&program);
        machine::run(&mut machine, Some(100))?;
        assert_eq!(machine.registers().get("a")?, 3);
        assert_eq!(machine.code()[3].to_string(), "inc a");
        assert_eq!(machine.code()[4].to_string(), "jnz 1 a");

        // The machine toggled its own copy, not ours.
        assert_eq!(program.0[3].to_string(), "tgl a");
        Ok(())
    }

    #[test]
    fn test_toggled_twice() -> Result<(), MachineError> {
        let program = "cpy a b\ninc a\ndec a\njnz 1 3".parse::<Program>()?;
        for &insn in &program.0 {
            assert_ne!(insn.toggled(), insn);
            assert_eq!(insn.toggled().toggled(), insn);
        }

        let program = "tgl c\nout d".parse::<Program>()?;
        assert_eq!(program.0[0].toggled().to_string(), "inc c");
        assert_eq!(program.0[1].toggled().to_string(), "inc d");

        // `jnz 1 3` toggles into `cpy 1 3`, which is skipped.
        let program = "tgl 1\njnz 1 3\ninc a".parse::<Program>()?;
        assert_eq!(Machine::new(&program).run(None)?.get("a")?, 1);
        Ok(())
    }

    #[test]
    fn test_output() -> Result<(), MachineError> {
        let program = "out a\ninc a\njnz 1 -2".parse::<Program>()?;
        let mut machine = Machine::new(&program);
        machine.run_until_output(5, Some(100))?;
        assert_eq!(machine.output(), &[0, 1, 2, 3, 4]);

        // A program that halts first just stops short.
        let program = "out 7".parse::<Program>()?;
        let mut machine = Machine::new(&program);
        assert_eq!(machine.run_until_output(5, None)?, 1);
        assert_eq!(machine.output(), &[7]);
        Ok(())
    }

    #[test]
    fn test_shared_program() -> Result<(), MachineError> {
        let program = "cpy c a\ninc a\ninc a".parse::<Program>()?;
        let (x, y) = std::thread::scope(|scope| {
            let x = scope.spawn(|| Machine::new(&program).run(None));
            let y = scope.spawn(|| Machine::with_registers(&program, &[("c", 10)])?.run(None));
            (x.join().unwrap(), y.join().unwrap())
        });
        assert_eq!(x?.get("a")?, 2);
        assert_eq!(y?.get("a")?, 12);
        Ok(())
    }
}
