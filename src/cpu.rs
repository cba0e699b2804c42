use std::fmt;

/// What the memory subsystem needs from the instruction-execution engine.
pub trait Processor {
    /// Charge `cycles` to the running cycle counter.
    fn incr_cycles(&mut self, cycles: u64);

    /// Stop the current cycle budget so the scheduler recomputes it before the
    /// next instruction.
    fn break_now(&mut self);
}

/// Minimal processor that only keeps the accounting the memory side touches.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct CycleCounter {
    pub cycles: u64,
    pub break_requests: u32,
}

impl CycleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl Processor for CycleCounter {
    fn incr_cycles(&mut self, cycles: u64) {
        self.cycles += cycles;
    }

    fn break_now(&mut self) {
        self.break_requests += 1;
    }
}

impl fmt::Debug for CycleCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleCounter")
            .field("cycles", &self.cycles)
            .field("break_requests", &self.break_requests)
            .finish()
    }
}
