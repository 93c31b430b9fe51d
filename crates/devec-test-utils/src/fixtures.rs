//! Element fixtures for failure-safety tests.

use std::cell::Cell;
use std::rc::Rc;

/// Element whose `clone` panics once the shared budget is spent.
///
/// The budget counts successful clones; `Tripwire::budget(2)` lets two
/// clones through and panics on the third.
#[derive(Debug)]
pub struct Tripwire {
    pub value: i32,
    budget: Rc<Cell<usize>>,
}

impl Tripwire {
    /// A shared clone budget.
    pub fn budget(clones: usize) -> Rc<Cell<usize>> {
        Rc::new(Cell::new(clones))
    }

    pub fn new(value: i32, budget: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            budget: Rc::clone(budget),
        }
    }
}

impl Clone for Tripwire {
    fn clone(&self) -> Self {
        let left = self.budget.get();
        if left == 0 {
            panic!("tripwire: clone budget exhausted");
        }
        self.budget.set(left - 1);
        Self {
            value: self.value,
            budget: Rc::clone(&self.budget),
        }
    }
}

impl PartialEq for Tripwire {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Element that bumps a shared counter when dropped.
#[derive(Debug, Clone)]
pub struct DropCounter {
    pub id: usize,
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    pub fn new(id: usize, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            id,
            drops: Rc::clone(drops),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
