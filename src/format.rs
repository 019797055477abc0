use crate::bytecode::Instruction;

const INDENT: usize = 2;

/// Re-indent a program: every bracket starts a new line, loop bodies are
/// indented two spaces deeper than their brackets.
pub fn format_program(instructions: &[Instruction]) -> String {
    let mut formatted = String::new();
    let mut depth: usize = 0;

    for instruction in instructions {
        match instruction {
            Instruction::LoopOpen => {
                push_line(&mut formatted, depth);
                formatted.push('[');
                depth += 1;
            }
            Instruction::LoopClose => {
                depth = depth.saturating_sub(1);
                push_line(&mut formatted, depth);
                formatted.push(']');
            }
            other => formatted.push_str(&other.to_string()),
        }
    }

    formatted
}

fn push_line(formatted: &mut String, depth: usize) {
    formatted.push('\n');
    formatted.extend(std::iter::repeat(' ').take(depth * INDENT));
}
