use super::token::Op;

/// Filters raw source bytes down to the eight recognized symbols.
pub struct Lexer<'a> {
    program: &'a [u8],
    cursor: usize,
    discarded: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(program: &'a [u8]) -> Self {
        Lexer {
            program,
            cursor: 0,
            discarded: 0,
        }
    }

    /// Get the next opcode, skipping and counting every byte that isn't one.
    pub fn next_op(&mut self) -> Option<Op> {
        while let Some(byte) = self.next_byte() {
            match Op::new(byte) {
                Some(op) => return Some(op),
                None => self.discarded += 1,
            }
        }

        None
    }

    /// Number of bytes thrown away so far
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.program.get(self.cursor).copied();
        if byte.is_some() {
            self.cursor += 1;
        }
        byte
    }
}

impl Iterator for Lexer<'_> {
    type Item = Op;

    fn next(&mut self) -> Option<Op> {
        self.next_op()
    }
}
