//! Peephole pass over a lowered function body.
//!
//! The lowering often moves a value through a cache slot only to copy it out
//! again on the next instruction:
//!
//! ``` text
//! ASSIGN %fcv  x
//! PUSH   %bpv  %fcv
//! ```
//!
//! Such pairs become a single `PUSH %bpv x`. Jump offsets are relative, so
//! every jump is rewritten afterwards to land on the same instruction as
//! before.
use std::collections::HashSet;

use tracing::debug;

use crate::instruction::{Instruction, InstructionType};

pub fn optimize(instructions: Vec<Instruction>) -> Vec<Instruction> {
	let targets = jump_targets(&instructions);
	let original = instructions.len();

	// `remap[i]` is the new index of old instruction `i`, plus one entry for
	// the end of the list.
	let mut remap = Vec::with_capacity(original + 1);
	let mut optimized: Vec<Instruction> = Vec::with_capacity(original);
	let mut index = 0;
	while index < original {
		if let Some(fused) = fuse(&instructions, index, &targets) {
			remap.push(optimized.len());
			remap.push(optimized.len());
			optimized.push(fused);
			index += 2;
			continue;
		}
		remap.push(optimized.len());
		optimized.push(instructions[index].clone());
		index += 1;
	}
	remap.push(optimized.len());

	for (old, instruction) in instructions.iter().enumerate() {
		let Some(target) = jump_target(old, instruction) else { continue };
		let (Some(&from), Some(&to)) = (remap.get(old), remap.get(target)) else { continue };
		optimized[from].set_jump_offset(to as i64 - from as i64);
	}
	debug!(removed = original - optimized.len(), "optimized instructions");
	optimized
}

/// `ASSIGN S x; (ASSIGN|PUSH) y S` with `S` a cache slot becomes `y x`.
fn fuse(instructions: &[Instruction], index: usize, targets: &HashSet<usize>) -> Option<Instruction> {
	let first = &instructions[index];
	let second = instructions.get(index + 1)?;
	let slot = &first.operand1;
	let fusable = first.r#type == InstructionType::Assign
		&& slot.is_cache_slot()
		&& !first.operand2.is_empty()
		&& matches!(second.r#type, InstructionType::Assign | InstructionType::Push)
		&& !second.operand2.is_literal()
		&& second.operand2.name == slot.name
		&& second.operand1.name != slot.name
		// Storing into a typed slot converts the value on the way.
		&& (!slot.data_type.is_resolved() || slot.data_type.base() == first.operand2.data_type.base())
		&& !targets.contains(&(index + 1))
		&& !(index > 0 && instructions[index - 1].r#type.is_comparison());
	fusable.then(|| Instruction { operand2: first.operand2.clone(), ..second.clone() })
}

fn jump_target(index: usize, instruction: &Instruction) -> Option<usize> {
	if instruction.r#type != InstructionType::Jump {
		return None;
	}
	index.checked_add_signed(isize::try_from(instruction.jump_offset()?).ok()?)
}

/// Every index control can arrive at other than by falling through.
fn jump_targets(instructions: &[Instruction]) -> HashSet<usize> {
	let mut targets = HashSet::new();
	for (index, instruction) in instructions.iter().enumerate() {
		if let Some(target) = jump_target(index, instruction) {
			targets.insert(target);
		}
		if instruction.r#type.is_comparison() {
			targets.insert(index + 2);
		}
	}
	targets
}
