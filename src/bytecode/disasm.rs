use std::fmt::Write;

use crate::bytecode::{CompiledProgram, Instruction, Op};

/// Print disassembly of a compiled program under a heading
pub fn print_program(name: &str, program: &CompiledProgram) {
    println!("════════════════════════════════════════");
    println!(" {}", name);
    println!(" {} instructions", program.len());
    println!("════════════════════════════════════════");
    print!("{}", disassemble(&program.ops));
    println!();
}

/// Disassemble a slice of instructions, one per line, marking jump targets.
///
/// ```text
/// 0000   L0   JUMP_FALSE  front_is_clear +3 ↓ (→ 0003)
/// 0001   L0   ACT         move
/// 0002   L0   JUMP        +2 ↓ (→ 0004)
///       ┌──────────────────────────────────
/// 0003 ► L0   ACT         turn_left
/// ```
pub fn disassemble(ops: &[Instruction]) -> String {
    let jump_targets = collect_jump_targets(ops);
    let mut out = String::new();

    for (ip, instr) in ops.iter().enumerate() {
        let is_target = jump_targets.contains(&ip);
        if is_target {
            out.push_str("      ┌──────────────────────────────────\n");
        }

        let marker = if is_target { "► " } else { "  " };
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{:04} {}L{:<4}{}",
            ip,
            marker,
            instr.line,
            format_op(&instr.op, ip)
        );
    }

    // A jump landing just past the end is how branches exit the program.
    if jump_targets.contains(&ops.len()) && !ops.is_empty() {
        let _ = writeln!(out, "{:04} ► END", ops.len());
    }

    out
}

fn collect_jump_targets(ops: &[Instruction]) -> Vec<usize> {
    let mut targets = Vec::new();

    for (ip, instr) in ops.iter().enumerate() {
        if let Some(target) = instr.target(ip) {
            if target >= 0 && !targets.contains(&(target as usize)) {
                targets.push(target as usize);
            }
        }
    }

    targets
}

fn format_op(op: &Op, ip: usize) -> String {
    match op {
        Op::Act(action) => format!("ACT         {}", action),
        Op::JumpIfFalse(condition, offset) => {
            format!("JUMP_FALSE  {} {}", condition, format_jump(ip, *offset))
        }
        Op::Jump(offset) => format!("JUMP        {}", format_jump(ip, *offset)),
    }
}

fn format_jump(ip: usize, offset: i64) -> String {
    let target = ip as i64 + offset;
    let direction = if offset < 0 { "↑" } else { "↓" };
    format!("{:+} {} (→ {:04})", offset, direction, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::action::Action;
    use crate::lang::condition::Condition;

    #[test]
    fn test_disassemble_actions() {
        let listing = disassemble(&[
            Instruction::act(0, Action::Move),
            Instruction::act(1, Action::PickUp),
        ]);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000"));
        assert!(lines[0].ends_with("ACT         move"));
        assert!(lines[1].contains("L1"));
        assert!(lines[1].ends_with("pick_up"));
    }

    #[test]
    fn test_disassemble_marks_jump_targets() {
        let listing = disassemble(&[
            Instruction::jump_if_false(0, Condition::FrontIsClear, 3),
            Instruction::act(0, Action::Move),
            Instruction::jump(0, 2),
            Instruction::act(0, Action::TurnLeft),
        ]);

        assert!(listing.contains("JUMP_FALSE  front_is_clear +3 ↓ (→ 0003)"));
        assert!(listing.contains("JUMP        +2 ↓ (→ 0004)"));
        assert!(listing.contains("0003 ► L0"));
        assert!(listing.contains("0004 ► END"));
    }

    #[test]
    fn test_disassemble_empty() {
        assert_eq!(disassemble(&[]), "");
    }
}
