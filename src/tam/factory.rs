//! Instruction and fragment factory.
//!
//! One factory is created per compilation run; it owns the label counter so
//! label names are unique within the run without any global state.

use super::fragment::Fragment;
use super::instructions::{Library, Register, TamInstruction};

/// Builder for target instructions and fragments.
#[derive(Debug, Default)]
pub struct TamFactory {
    labels: u32,
}

impl TamFactory {
    pub fn new() -> Self {
        TamFactory { labels: 0 }
    }

    pub fn create_fragment(&self) -> Fragment {
        Fragment::new()
    }

    /// Returns a fresh label number, unique within this factory.
    pub fn create_label_number(&mut self) -> u32 {
        let number = self.labels;
        self.labels += 1;
        number
    }

    pub fn create_load_l(&self, value: i64) -> TamInstruction {
        TamInstruction::LoadL(value)
    }

    pub fn create_load_lf(&self, value: f64) -> TamInstruction {
        TamInstruction::LoadLF(value)
    }

    pub fn create_load(&self, register: Register, offset: usize, size: usize) -> TamInstruction {
        TamInstruction::Load {
            register,
            offset,
            size,
        }
    }

    pub fn create_load_i(&self, size: usize) -> TamInstruction {
        TamInstruction::LoadI { size }
    }

    pub fn create_store(&self, register: Register, offset: usize, size: usize) -> TamInstruction {
        TamInstruction::Store {
            register,
            offset,
            size,
        }
    }

    pub fn create_store_i(&self, size: usize) -> TamInstruction {
        TamInstruction::StoreI { size }
    }

    pub fn create_push(&self, size: usize) -> TamInstruction {
        TamInstruction::Push { size }
    }

    pub fn create_pop(&self, keep: usize, remove: usize) -> TamInstruction {
        TamInstruction::Pop { keep, remove }
    }

    pub fn create_jump(&self, label: impl Into<String>) -> TamInstruction {
        TamInstruction::Jump {
            label: label.into(),
        }
    }

    pub fn create_jump_if(&self, label: impl Into<String>, value: u8) -> TamInstruction {
        TamInstruction::JumpIf {
            label: label.into(),
            value,
        }
    }

    pub fn create_call(&self, label: impl Into<String>, register: Register) -> TamInstruction {
        TamInstruction::Call {
            label: label.into(),
            register,
        }
    }

    pub fn create_return(&self, result: usize, remove: usize) -> TamInstruction {
        TamInstruction::Return { result, remove }
    }

    pub fn create_heap_alloc(&self) -> TamInstruction {
        TamInstruction::HeapAlloc
    }

    pub fn create_operator(&self, library: Library) -> TamInstruction {
        TamInstruction::Subroutine(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_numbers_are_unique_and_increasing() {
        let mut factory = TamFactory::new();
        let first = factory.create_label_number();
        let second = factory.create_label_number();
        let third = factory.create_label_number();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_separate_factories_are_independent() {
        // The counter is per run state, never shared between compilations.
        let mut a = TamFactory::new();
        let mut b = TamFactory::new();
        assert_eq!(a.create_label_number(), b.create_label_number());
    }
}
