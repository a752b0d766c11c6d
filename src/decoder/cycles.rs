use std::collections::HashSet;

/// The IFDs of a file form a singly linked chain through their `next` offsets. Since we offer
/// iteration over this chain we want to detect when following a link would revisit a directory,
/// such that callers can be guaranteed to terminate iteration at some point even in malicious
/// images.
#[derive(Default, Debug, Clone)]
pub struct IfdCycles {
    visited: HashSet<u32>,
}

impl IfdCycles {
    pub fn new() -> Self {
        IfdCycles::default()
    }

    /// Record a visit to the directory at `offset`. Returns `false` if it was seen before.
    pub fn visit(&mut self, offset: u32) -> bool {
        self.visited.insert(offset)
    }

    /// Whether following a link to `offset` would close a cycle.
    pub fn closes_cycle(&self, offset: u32) -> bool {
        self.visited.contains(&offset)
    }

    pub fn clear(&mut self) {
        self.visited.clear();
    }
}

#[test]
fn cycles_are_detected() {
    let mut cycles = IfdCycles::new();

    assert!(cycles.visit(0x20));
    assert!(cycles.visit(0x800));
    assert!(cycles.closes_cycle(0x20), "cycle must be detected");
    assert!(!cycles.closes_cycle(0x40));
}

#[test]
fn reflective_cycle() {
    let mut cycles = IfdCycles::new();

    assert!(cycles.visit(0x20));
    assert!(!cycles.visit(0x20), "self-referential cycle must be detected");
}

#[test]
fn cleared_chain_starts_over() {
    let mut cycles = IfdCycles::new();

    cycles.visit(0x20);
    cycles.clear();
    assert!(!cycles.closes_cycle(0x20));
}
