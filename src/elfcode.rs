//! The 2018 six-register machine, sometimes called "elfcode".
//!
//! Every instruction is `op a b c`: compute something from `a` and `b` and
//! store it in register `c`. What differs between opcodes is the operation
//! (`add`, `mul`, `ban`, ...) and whether `a` and `b` name registers or are
//! immediate values. `ops` has the arithmetic and `formats` knows where
//! operands come from; `INSN_BY_MNEMONIC` pairs them up under their
//! mnemonics.
//!
//! A program may bind the instruction pointer to a register with an `#ip N`
//! line, which is how day 19 and day 21 programs jump.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::error::MachineError;
use crate::machine::{self, Execute, State};
use crate::Word;

pub const REGISTER_COUNT: usize = 6;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers(pub [Word; REGISTER_COUNT]);

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "[{}]", self.0.iter().map(|r| format!("{:8}", r)).join(" "))
    }
}

impl Registers {
    pub fn get(&self, reg: Word) -> Result<Word, MachineError> {
        Ok(self.0[Registers::index(reg)?])
    }

    pub fn set(&mut self, reg: Word, value: Word) -> Result<(), MachineError> {
        self.0[Registers::index(reg)?] = value;
        Ok(())
    }

    fn index(reg: Word) -> Result<usize, MachineError> {
        if 0 <= reg && (reg as usize) < REGISTER_COUNT {
            Ok(reg as usize)
        } else {
            Err(MachineError::unknown_register(format!("r{}", reg)))
        }
    }
}

/// How one opcode computes its result. Returns `Ok(None)` on arithmetic
/// overflow; the caller knows where we are and reports it.
pub trait Semantic: Sync + Send {
    fn evaluate(&self, insn: &Insn, registers: &Registers) -> Result<Option<Word>, MachineError>;
}

mod ops {
    use crate::Word;

    pub fn add(a: Word, b: Word) -> Option<Word> {
        a.checked_add(b)
    }

    pub fn mul(a: Word, b: Word) -> Option<Word> {
        a.checked_mul(b)
    }

    pub fn ban(a: Word, b: Word) -> Option<Word> {
        Some(a & b)
    }

    pub fn bor(a: Word, b: Word) -> Option<Word> {
        Some(a | b)
    }

    pub fn gt(a: Word, b: Word) -> Option<Word> {
        Some(if a > b { 1 } else { 0 })
    }

    pub fn eq(a: Word, b: Word) -> Option<Word> {
        Some(if a == b { 1 } else { 0 })
    }

    pub fn set(a: Word) -> Option<Word> {
        Some(a)
    }
}

/// Operand formats: `R` takes a register, `I` an immediate. Two-letter
/// formats describe `a` then `b`; one-letter formats ignore `b`.
mod formats {
    use super::{Insn, Registers, Semantic};
    use crate::error::MachineError;
    use crate::Word;

    pub struct RR<S>(pub S);

    impl<S: Sync + Send> Semantic for RR<S>
    where
        S: Fn(Word, Word) -> Option<Word>,
    {
        fn evaluate(&self, insn: &Insn, registers: &Registers) -> Result<Option<Word>, MachineError> {
            Ok((self.0)(registers.get(insn.a)?, registers.get(insn.b)?))
        }
    }

    pub struct RI<S>(pub S);

    impl<S: Sync + Send> Semantic for RI<S>
    where
        S: Fn(Word, Word) -> Option<Word>,
    {
        fn evaluate(&self, insn: &Insn, registers: &Registers) -> Result<Option<Word>, MachineError> {
            Ok((self.0)(registers.get(insn.a)?, insn.b))
        }
    }

    pub struct IR<S>(pub S);

    impl<S: Sync + Send> Semantic for IR<S>
    where
        S: Fn(Word, Word) -> Option<Word>,
    {
        fn evaluate(&self, insn: &Insn, registers: &Registers) -> Result<Option<Word>, MachineError> {
            Ok((self.0)(insn.a, registers.get(insn.b)?))
        }
    }

    pub struct I<S>(pub S);

    impl<S: Sync + Send> Semantic for I<S>
    where
        S: Fn(Word) -> Option<Word>,
    {
        fn evaluate(&self, insn: &Insn, _registers: &Registers) -> Result<Option<Word>, MachineError> {
            Ok((self.0)(insn.a))
        }
    }

    pub struct R<S>(pub S);

    impl<S: Sync + Send> Semantic for R<S>
    where
        S: Fn(Word) -> Option<Word>,
    {
        fn evaluate(&self, insn: &Insn, registers: &Registers) -> Result<Option<Word>, MachineError> {
            Ok((self.0)(registers.get(insn.a)?))
        }
    }
}

macro_rules! insn {
    ($name:ident : $op:ident $format:ident) => {
        (stringify!($name), &(formats::$format(ops::$op)))
    };
}

type Entry = (&'static str, &'static dyn Semantic);

/// Every opcode, in the order the 2018 day 16 puzzle lists them.
static INSN_BY_MNEMONIC: &[Entry] = &[
    insn!(addi: add RI),
    insn!(muli: mul RI),
    insn!(bani: ban RI),
    insn!(bori: bor RI),
    insn!(addr: add RR),
    insn!(mulr: mul RR),
    insn!(banr: ban RR),
    insn!(borr: bor RR),
    insn!(seti: set I),
    insn!(setr: set R),
    insn!(gtir: gt IR),
    insn!(gtri: gt RI),
    insn!(gtrr: gt RR),
    insn!(eqir: eq IR),
    insn!(eqri: eq RI),
    insn!(eqrr: eq RR),
];

lazy_static! {
    static ref ENTRY_INDEX: HashMap<&'static str, &'static Entry> =
        INSN_BY_MNEMONIC.iter().map(|entry| (entry.0, entry)).collect();
}

/// All mnemonics the machine understands.
pub fn mnemonics() -> impl Iterator<Item = &'static str> {
    INSN_BY_MNEMONIC.iter().map(|entry| entry.0)
}

#[derive(Clone, Copy)]
pub struct Insn {
    semantic: &'static Entry,
    pub a: Word,
    pub b: Word,
    pub c: Word,
}

impl Insn {
    /// Returns `None` if `mnemonic` isn't one of ours.
    pub fn new(mnemonic: &str, a: Word, b: Word, c: Word) -> Option<Insn> {
        ENTRY_INDEX
            .get(mnemonic)
            .map(|&semantic| Insn { semantic, a, b, c })
    }

    pub fn mnemonic(&self) -> &'static str {
        self.semantic.0
    }

    /// Compute this instruction's result without storing it.
    pub fn evaluate(&self, registers: &Registers) -> Result<Option<Word>, MachineError> {
        self.semantic.1.evaluate(self, registers)
    }
}

impl PartialEq for Insn {
    fn eq(&self, other: &Insn) -> bool {
        (self.mnemonic(), self.a, self.b, self.c) == (other.mnemonic(), other.a, other.b, other.c)
    }
}

impl Eq for Insn {}

impl fmt::Debug for Insn {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "Insn({})", self)
    }
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} {} {} {}", self.semantic.0, self.a, self.b, self.c)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    /// The register the instruction pointer is bound to, if any.
    pub ip: Option<usize>,
    pub insns: Vec<Insn>,
}

fn parse_operand(line: usize, text: &str, word: &str) -> Result<Word, MachineError> {
    match word.parse::<Word>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(MachineError::parse(
            line,
            text,
            format!("bad operand {:?}", word),
        )),
    }
}

impl FromStr for Program {
    type Err = MachineError;
    fn from_str(s: &str) -> Result<Program, MachineError> {
        let mut program = Program::default();
        for (i, text) in s.lines().enumerate() {
            let line = i + 1;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            if text.starts_with("#ip") {
                if program.ip.is_some() || !program.insns.is_empty() {
                    return Err(MachineError::parse(line, text, "#ip must come first"));
                }
                let (_, reg) = text
                    .split_whitespace()
                    .collect_tuple()
                    .ok_or_else(|| MachineError::parse(line, text, "expected #ip N"))?;
                let reg = parse_operand(line, text, reg)?;
                program.ip = Some(Registers::index(reg)?);
                continue;
            }

            let pc = program.insns.len();
            let mut words = text.split_whitespace();
            let mnemonic = words.next().unwrap_or("");
            let unsupported = || MachineError::UnsupportedOpcode {
                pc,
                text: text.to_owned(),
            };
            if !ENTRY_INDEX.contains_key(mnemonic) {
                return Err(unsupported());
            }

            let (a, b, c) = words
                .map(|word| parse_operand(line, text, word))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .collect_tuple()
                .ok_or_else(|| MachineError::parse(line, text, "expected three operands"))?;

            program
                .insns
                .push(Insn::new(mnemonic, a, b, c).ok_or_else(unsupported)?);
        }

        Ok(program)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        if let Some(ip) = self.ip {
            writeln!(f, "#ip {}", ip)?;
        }
        for insn in &self.insns {
            writeln!(f, "{}", insn)?;
        }
        Ok(())
    }
}

pub struct Machine<'p> {
    program: &'p Program,
    registers: Registers,
    ip: Word,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p Program) -> Machine<'p> {
        Machine::with_registers(program, Registers::default())
    }

    pub fn with_registers(program: &'p Program, registers: Registers) -> Machine<'p> {
        Machine {
            program,
            registers,
            ip: 0,
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn run(mut self, limit: Option<u64>) -> Result<Registers, MachineError> {
        machine::run(&mut self, limit)?;
        Ok(self.registers)
    }

    /// Run until the machine halts or `stop` returns true, which it is asked
    /// before every instruction.
    pub fn run_until<F>(&mut self, limit: Option<u64>, stop: F) -> Result<u64, MachineError>
    where
        F: FnMut(&Machine<'p>) -> bool,
    {
        machine::run_until(self, limit, stop)
    }
}

impl<'p> Execute for Machine<'p> {
    fn state(&self) -> State {
        if 0 <= self.ip && (self.ip as usize) < self.program.insns.len() {
            State::Running(self.ip as usize)
        } else {
            State::Halted
        }
    }

    fn step(&mut self) -> Result<(), MachineError> {
        let pc = self.ip as usize;
        let program = self.program;
        let insn = match program.insns.get(pc) {
            Some(insn) => insn,
            None => return Ok(()),
        };

        // Work on a copy, so a failing instruction leaves no trace.
        let mut registers = self.registers;
        if let Some(bound) = program.ip {
            registers.set(bound as Word, self.ip)?;
        }
        trace!("({:2})  {}    insn: {}", pc, registers, insn);

        let value = insn
            .evaluate(&registers)?
            .ok_or(MachineError::Overflow { pc })?;
        registers.set(insn.c, value)?;

        let ip = match program.ip {
            Some(bound) => registers.get(bound as Word)?,
            None => self.ip,
        };
        self.ip = ip.checked_add(1).ok_or(MachineError::Overflow { pc })?;
        self.registers = registers;
        Ok(())
    }
}

/// One observation from the 2018 day 16 puzzle: an instruction with an
/// unknown opcode number, and the registers before and after it ran.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sample {
    pub before: Registers,
    /// Opcode number, then `a`, `b`, `c`.
    pub insn: [Word; 4],
    pub after: Registers,
}

impl Sample {
    /// The mnemonics that would have produced this sample.
    pub fn candidates(&self) -> Vec<&'static str> {
        INSN_BY_MNEMONIC
            .iter()
            .filter(|entry| self.behaves_like(*entry))
            .map(|entry| entry.0)
            .collect()
    }

    fn behaves_like(&self, entry: &'static Entry) -> bool {
        let insn = Insn {
            semantic: entry,
            a: self.insn[1],
            b: self.insn[2],
            c: self.insn[3],
        };
        let mut registers = self.before;
        match insn.evaluate(&registers) {
            Ok(Some(value)) => registers.set(insn.c, value).is_ok() && registers == self.after,
            _ => false,
        }
    }
}

/// Work out which mnemonic each opcode number stands for. The result is
/// indexed by opcode number.
///
/// Each sample rules out the mnemonics that don't fit it. When an opcode is
/// down to a single mnemonic, no other opcode can have that mnemonic, which
/// may pin down further opcodes, so we iterate to closure.
pub fn resolve_opcodes(samples: &[Sample]) -> Result<Vec<&'static str>, MachineError> {
    let count = INSN_BY_MNEMONIC.len();

    // Bit `i` of `possible[op]` is set if opcode `op` could be entry `i`.
    let mut possible = vec![(1u32 << count) - 1; count];
    for sample in samples {
        let op = sample.insn[0];
        if op < 0 || op as usize >= count {
            return Err(MachineError::Unresolvable {
                reason: format!("sample has opcode {}, but there are only {}", op, count),
            });
        }
        let fits = INSN_BY_MNEMONIC
            .iter()
            .enumerate()
            .filter(|(_i, entry)| sample.behaves_like(*entry))
            .fold(0, |mask, (i, _entry)| mask | 1 << i);
        possible[op as usize] &= fits;
    }

    let mut worklist = (0..count)
        .filter(|&op| possible[op].count_ones() == 1)
        .collect::<Vec<_>>();
    while let Some(op) = worklist.pop() {
        let bit = possible[op];
        for other in 0..count {
            if other != op && possible[other] & bit != 0 {
                possible[other] &= !bit;
                if possible[other].count_ones() == 1 {
                    worklist.push(other);
                }
            }
        }
    }

    possible
        .iter()
        .enumerate()
        .map(|(op, mask)| match mask.count_ones() {
            1 => Ok(INSN_BY_MNEMONIC[mask.trailing_zeros() as usize].0),
            0 => Err(MachineError::Unresolvable {
                reason: format!("no instruction fits opcode {}", op),
            }),
            n => Err(MachineError::Unresolvable {
                reason: format!("opcode {} could be any of {} instructions", op, n),
            }),
        })
        .collect()
}

/// Turn numbered instructions into a program, given the mnemonic for each
/// opcode number.
pub fn assemble(opcodes: &[&str], code: &[[Word; 4]]) -> Result<Program, MachineError> {
    let insns = code
        .iter()
        .enumerate()
        .map(|(pc, &[op, a, b, c])| {
            let unsupported = || MachineError::UnsupportedOpcode {
                pc,
                text: format!("{} {} {} {}", op, a, b, c),
            };
            if op < 0 {
                return Err(unsupported());
            }
            opcodes
                .get(op as usize)
                .and_then(|mnemonic| Insn::new(mnemonic, a, b, c))
                .ok_or_else(unsupported)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Program { ip: None, insns })
}

fn parse_numbers(line: usize, text: &str) -> Result<[Word; 4], MachineError> {
    let (op, a, b, c) = text
        .split_whitespace()
        .map(|word| parse_operand(line, text, word))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .collect_tuple()
        .ok_or_else(|| MachineError::parse(line, text, "expected four numbers"))?;
    Ok([op, a, b, c])
}

fn parse_register_list(line: usize, text: &str, label: &str) -> Result<Registers, MachineError> {
    let bad = |reason: &str| MachineError::parse(line, text, reason);
    if !text.starts_with(label) {
        return Err(bad(&format!("expected {:?}", label)));
    }
    let list = text[label.len()..].trim();
    if !list.starts_with('[') || !list.ends_with(']') || list.len() < 2 {
        return Err(bad("expected a bracketed register list"));
    }

    let mut registers = Registers::default();
    let values = list[1..list.len() - 1].split(',').map(str::trim).collect::<Vec<_>>();
    if values.len() > REGISTER_COUNT {
        return Err(bad("too many registers"));
    }
    for (i, value) in values.into_iter().enumerate() {
        registers.0[i] = value
            .parse::<Word>()
            .map_err(|_| bad(&format!("bad register value {:?}", value)))?;
    }
    Ok(registers)
}

/// Parse a 2018 day 16 input: a run of samples like
///
/// ```text
/// Before: [3, 2, 1, 1]
/// 9 2 1 2
/// After:  [3, 2, 2, 1]
/// ```
///
/// followed by a program of numbered instructions.
pub fn parse_samples(s: &str) -> Result<(Vec<Sample>, Vec<[Word; 4]>), MachineError> {
    let mut samples = Vec::new();
    let mut code = Vec::new();
    let mut lines = s
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text.trim()))
        .filter(|(_line, text)| !text.is_empty());

    while let Some((line, text)) = lines.next() {
        if !text.starts_with("Before:") {
            code.push(parse_numbers(line, text)?);
            continue;
        }

        let before = parse_register_list(line, text, "Before:")?;
        let (insn, after) = match (lines.next(), lines.next()) {
            (Some((insn_line, insn)), Some((after_line, after))) => (
                parse_numbers(insn_line, insn)?,
                parse_register_list(after_line, after, "After:")?,
            ),
            _ => return Err(MachineError::parse(line, text, "sample is cut short")),
        };
        samples.push(Sample {
            before,
            insn,
            after,
        });
    }

    Ok((samples, code))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() -> Result<(), MachineError> {
        let text = "#ip 3\naddi 3 16 3\n\nseti 1 2 5\n";
        let program = text.parse::<Program>()?;
        assert_eq!(program.ip, Some(3));
        assert_eq!(program.insns.len(), 2);
        assert_eq!(program.insns[0].mnemonic(), "addi");
        assert_eq!(program.insns[1], Insn::new("seti", 1, 2, 5).unwrap());
        assert_eq!(program.to_string(), "#ip 3\naddi 3 16 3\nseti 1 2 5\n");

        assert_eq!(mnemonics().count(), 16);
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "seti 1 2 3\naddx 1 2 3".parse::<Program>(),
            Err(MachineError::UnsupportedOpcode {
                pc: 1,
                text: "addx 1 2 3".to_owned()
            })
        );
        assert_eq!(
            "addi 1 2".parse::<Program>(),
            Err(MachineError::parse(1, "addi 1 2", "expected three operands"))
        );
        assert_eq!(
            "addi 1 -2 3".parse::<Program>(),
            Err(MachineError::parse(1, "addi 1 -2 3", "bad operand \"-2\""))
        );
        assert_eq!(
            "#ip 6".parse::<Program>(),
            Err(MachineError::unknown_register("r6"))
        );
        assert_eq!(
            "seti 1 2 3\n#ip 0".parse::<Program>(),
            Err(MachineError::parse(2, "#ip 0", "#ip must come first"))
        );
    }

    #[test]
    fn test_bound_ip() -> Result<(), MachineError> {
        crate::init_test_logging();

        // The example from 2018 day 19.
        let text = "#ip 0\nseti 5 0 1\nseti 6 0 2\naddi 0 1 0\naddr 1 2 3\n\
                    setr 1 0 0\nseti 8 0 4\nseti 9 0 5";
        let program = text.parse::<Program>()?;
        let registers = Machine::new(&program).run(Some(100))?;
        assert_eq!(registers, Registers([6, 5, 6, 0, 0, 9]));
        Ok(())
    }

    #[test]
    fn test_bitwise() -> Result<(), MachineError> {
        let text = "seti 123 0 3\nbani 3 456 3\nborr 3 3 1\nbori 1 65536 2\n\
                    muli 2 3 4\ngtri 4 200000 5\neqrr 1 3 0";
        let program = text.parse::<Program>()?;
        let registers = Machine::new(&program).run(None)?;
        assert_eq!(registers, Registers([1, 72, 65608, 72, 196824, 0]));
        Ok(())
    }

    #[test]
    fn test_run_until() -> Result<(), MachineError> {
        let program = "#ip 1\nseti 0 0 2\naddi 0 1 0\nseti 0 0 1".parse::<Program>()?;
        let mut machine = Machine::new(&program);
        machine.run_until(Some(1000), |m| m.registers().0[0] == 10)?;
        assert_eq!(machine.registers().0[0], 10);
        assert_eq!(machine.state(), State::Running(2));

        assert_eq!(
            Machine::new(&program).run(Some(1000)),
            Err(MachineError::StepLimitExceeded { limit: 1000 })
        );
        Ok(())
    }

    #[test]
    fn test_failures_leave_registers_alone() -> Result<(), MachineError> {
        let program = "#ip 2\nseti 7 0 0\naddr 0 7 1".parse::<Program>()?;
        let mut machine = Machine::new(&program);
        machine.step()?;
        assert_eq!(machine.step(), Err(MachineError::unknown_register("r7")));
        assert_eq!(machine.registers(), &Registers([7, 0, 0, 0, 0, 0]));

        let program = "seti 9223372036854775807 0 0\nmuli 0 2 0".parse::<Program>()?;
        let mut machine = Machine::new(&program);
        machine.step()?;
        assert_eq!(machine.step(), Err(MachineError::Overflow { pc: 1 }));
        assert_eq!(machine.registers().0[0], Word::max_value());
        Ok(())
    }

    #[test]
    fn test_step_when_halted() -> Result<(), MachineError> {
        let program = Program::default();
        let mut machine = Machine::new(&program);
        assert_eq!(machine.state(), State::Halted);
        assert_eq!(machine.step(), Ok(()));
        assert_eq!(machine.registers(), &Registers::default());

        let program = "seti 4 0 1".parse::<Program>()?;
        let mut machine = Machine::new(&program);
        machine.step()?;
        assert_eq!(machine.state(), State::Halted);
        assert_eq!(machine.step(), Ok(()));
        assert_eq!(machine.registers(), &Registers([0, 4, 0, 0, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_candidates() {
        let sample = Sample {
            before: Registers([3, 2, 1, 1, 0, 0]),
            insn: [9, 2, 1, 2],
            after: Registers([3, 2, 2, 1, 0, 0]),
        };
        assert_eq!(sample.candidates(), vec!["addi", "mulr", "seti"]);
    }

    /// Generate samples from a known opcode assignment, and check that we
    /// can recover it.
    #[test]
    fn test_resolve_opcodes() -> Result<(), MachineError> {
        let secret = mnemonics().collect::<Vec<_>>().into_iter().rev().collect::<Vec<_>>();

        let mut seed: u64 = 0x2018_1216;
        let mut random = |n: Word| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % n as u64) as Word
        };

        let mut samples = Vec::new();
        for (op, mnemonic) in secret.iter().enumerate() {
            for _ in 0..40 {
                let mut before = Registers::default();
                for r in 0..4 {
                    before.0[r] = random(16);
                }
                let insn = [op as Word, random(4), random(4), random(4)];
                let mut after = before;
                let value = Insn::new(mnemonic, insn[1], insn[2], insn[3])
                    .unwrap()
                    .evaluate(&before)?
                    .unwrap();
                after.set(insn[3], value)?;
                samples.push(Sample {
                    before,
                    insn,
                    after,
                });
            }
        }

        assert_eq!(resolve_opcodes(&samples)?, secret);

        // With only one sample, most opcodes are wide open.
        assert!(resolve_opcodes(&samples[..1]).is_err());
        Ok(())
    }

    #[test]
    fn test_assemble() -> Result<(), MachineError> {
        let opcodes = mnemonics().collect::<Vec<_>>();
        let program = assemble(&opcodes, &[[8, 5, 0, 0], [0, 0, 3, 0]])?;
        assert_eq!(program.to_string(), "seti 5 0 0\naddi 0 3 0\n");
        assert_eq!(Machine::new(&program).run(None)?.0[0], 8);

        assert_eq!(
            assemble(&opcodes, &[[16, 1, 2, 3]]).err(),
            Some(MachineError::UnsupportedOpcode {
                pc: 0,
                text: "16 1 2 3".to_owned()
            })
        );
        Ok(())
    }

    #[test]
    fn test_parse_samples() -> Result<(), MachineError> {
        let text = "Before: [3, 2, 1, 1]\n9 2 1 2\nAfter:  [3, 2, 2, 1]\n\n\
                    Before: [0, 1, 2, 3]\n1 0 0 1\nAfter:  [0, 0, 2, 3]\n\n\n\n\
                    7 3 2 0\n7 2 1 1\n";
        let (samples, code) = parse_samples(text)?;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].insn, [9, 2, 1, 2]);
        assert_eq!(samples[1].after, Registers([0, 0, 2, 3, 0, 0]));
        assert_eq!(code, vec![[7, 3, 2, 0], [7, 2, 1, 1]]);

        assert!(parse_samples("Before: [1, 2]\n1 2 3 4\n").is_err());
        assert!(parse_samples("Before: 1, 2\n1 2 3 4\nAfter: [1, 2]").is_err());
        Ok(())
    }
}
