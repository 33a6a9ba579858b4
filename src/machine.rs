//! The fetch/dispatch loop shared by every instruction set.
//!
//! A machine is anything that can say whether it is still running and execute
//! one instruction when asked. The loop here owns the rest: noticing halts,
//! enforcing the caller's step budget, and offering an early exit.

use crate::error::MachineError;

/// Where a machine is in its life. `Halted` is terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// About to execute the instruction at this index.
    Running(usize),
    Halted,
}

pub trait Execute {
    fn state(&self) -> State;

    /// Execute exactly one instruction. Stepping a halted machine does
    /// nothing. On error, the instruction must have had no effect.
    fn step(&mut self) -> Result<(), MachineError>;
}

/// Run `machine` until it halts, returning the number of instructions
/// executed. If `limit` is given and that many instructions execute without
/// the machine halting, fail with `StepLimitExceeded`.
pub fn run<M: Execute>(machine: &mut M, limit: Option<u64>) -> Result<u64, MachineError> {
    run_until(machine, limit, |_| false)
}

/// Like `run`, but also stop as soon as `stop` returns true. `stop` is
/// consulted before every instruction, including the first.
pub fn run_until<M, F>(machine: &mut M, limit: Option<u64>, mut stop: F) -> Result<u64, MachineError>
where
    M: Execute,
    F: FnMut(&M) -> bool,
{
    let mut steps = 0;
    loop {
        if let State::Halted = machine.state() {
            debug!("halted after {} steps", steps);
            return Ok(steps);
        }

        if stop(machine) {
            debug!("stopped after {} steps", steps);
            return Ok(steps);
        }

        if let Some(limit) = limit {
            if steps >= limit {
                return Err(MachineError::StepLimitExceeded { limit });
            }
        }

        machine.step()?;
        steps += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Counts down to zero, one step per tick.
    struct Countdown(usize);

    impl Execute for Countdown {
        fn state(&self) -> State {
            if self.0 == 0 {
                State::Halted
            } else {
                State::Running(self.0)
            }
        }

        fn step(&mut self) -> Result<(), MachineError> {
            self.0 -= 1;
            Ok(())
        }
    }

    #[test]
    fn test_run() {
        assert_eq!(run(&mut Countdown(0), None), Ok(0));
        assert_eq!(run(&mut Countdown(10), None), Ok(10));

        // Halting on exactly the last permitted step is fine.
        assert_eq!(run(&mut Countdown(10), Some(10)), Ok(10));
        assert_eq!(
            run(&mut Countdown(10), Some(9)),
            Err(MachineError::StepLimitExceeded { limit: 9 })
        );
    }

    #[test]
    fn test_run_until() {
        let mut countdown = Countdown(10);
        assert_eq!(run_until(&mut countdown, None, |c| c.0 == 4), Ok(6));
        assert_eq!(countdown.state(), State::Running(4));

        // Resuming picks up where we stopped.
        assert_eq!(run(&mut countdown, None), Ok(4));
        assert_eq!(countdown.state(), State::Halted);
    }
}
