//! Module.

use std::fmt;

use tracing::trace_span;

/// Synchronous module.
///
/// Every handshake on `Ports` is decided from the state at the start of the cycle; transfers and
/// the next state are committed together before `step` returns.
pub trait Module: fmt::Debug {
    /// Ports through which the module talks to its environment.
    type Ports;

    /// Returns module name.
    fn get_module_name(&self) -> String;

    /// Advances one clock cycle.
    fn step(&mut self, ports: &mut Self::Ports, cycle: u64);
}

/// Global clock driving modules in lock-step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    cycle: u64,
}

impl Clock {
    /// Creates a clock at cycle 0.
    pub fn new() -> Self { Self::default() }

    /// Current cycle.
    pub fn cycle(&self) -> u64 { self.cycle }

    /// Steps `module` for one cycle.
    pub fn tick<M: Module>(&mut self, module: &mut M, ports: &mut M::Ports) {
        let span = trace_span!("tick", cycle = self.cycle);
        let _enter = span.enter();
        module.step(ports, self.cycle);
        self.cycle += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VrChannel;

    /// One-entry register slice.
    #[derive(Debug, Default)]
    struct Reg {
        state: Option<u32>,
    }

    impl Module for Reg {
        type Ports = (VrChannel<u32>, VrChannel<u32>);

        fn get_module_name(&self) -> String { "reg".to_string() }

        fn step(&mut self, (input, output): &mut Self::Ports, _cycle: u64) {
            let drained = match self.state {
                Some(v) => output.push(v).is_ok(),
                None => false,
            };
            if drained {
                self.state = None;
            }
            if self.state.is_none() {
                self.state = input.accept();
            }
        }
    }

    #[test]
    fn clock_advances_module() {
        let mut clock = Clock::new();
        let mut reg = Reg::default();
        let mut ports = (VrChannel::new(), VrChannel::new());
        ports.0.offer(5).unwrap();
        ports.1.set_ready(true);

        clock.tick(&mut reg, &mut ports);
        assert_eq!(ports.1.take(), None);
        clock.tick(&mut reg, &mut ports);
        assert_eq!(ports.1.take(), Some(5));
        assert_eq!(clock.cycle(), 2);
    }
}
