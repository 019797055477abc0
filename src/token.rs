/// The eight symbols of the language. Every other byte is a comment.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Op {
    Right,
    Left,
    Incr,
    Decr,
    Output,
    Input,
    LoopOpen,
    LoopClose,
}

impl Op {
    /// Recognize a source byte. Returns `None` for anything that is not one of the eight symbols.
    pub fn new(byte: u8) -> Option<Self> {
        match byte {
            b'>' => Some(Op::Right),
            b'<' => Some(Op::Left),
            b'+' => Some(Op::Incr),
            b'-' => Some(Op::Decr),
            b'.' => Some(Op::Output),
            b',' => Some(Op::Input),
            b'[' => Some(Op::LoopOpen),
            b']' => Some(Op::LoopClose),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Op::Right => '>',
            Op::Left => '<',
            Op::Incr => '+',
            Op::Decr => '-',
            Op::Output => '.',
            Op::Input => ',',
            Op::LoopOpen => '[',
            Op::LoopClose => ']',
        }
    }
}
