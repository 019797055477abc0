//! A small virtual machine for the eight-instruction tape language.
//!
//! # Example
//!
//! ```text
//! ++++        cell 0 = 4
//! [           while cell 0 != 0
//!   >++++<    cell 1 += 4
//!   -         cell 0 -= 1
//! ]
//! >.          print cell 1 (16)
//! ```
//!
//! # Instructions
//!
//! | Symbol | Instruction | Brief |
//! |--------|-------------|-------|
//! | `>`    | Right       | Move the data pointer one cell right. |
//! | `<`    | Left        | Move the data pointer one cell left. The tape extends below address 0. |
//! | `+`    | Incr        | Increment the current cell, wrapping 255 to 0. |
//! | `-`    | Decr        | Decrement the current cell, wrapping 0 to 255. |
//! | `.`    | Output      | Write the current cell as a raw byte. |
//! | `,`    | Input       | Read one byte into the current cell, 0 once input runs out. |
//! | `[`    | LoopOpen    | If the current cell is 0, jump past the matching `]`. |
//! | `]`    | LoopClose   | If the current cell is not 0, jump back past the matching `[`. |
//!
//! Any other byte is a comment and is discarded when the program is loaded.
//!
//! # Important notes
//!
//! - Brackets must balance. An unmatched one is reported with its position in the
//!   filtered program and nothing runs.
//! - Output is buffered and flushed every 8192 bytes and at the end of the program.
//!   Quitting from the debugger drops whatever has not been flushed yet.
//! - The tape is unbounded in both directions unless a limit is configured. Cell 0
//!   always exists and counts toward the limit.
//! - Raw terminal mode is restored on normal exit, on errors and on SIGINT/SIGTERM.

pub mod bytecode;
pub mod config;
pub mod debugger;
pub mod error;
pub mod format;
pub mod io;
pub mod jump_table;
mod lexer;
pub mod shell;
pub mod tape;
pub mod terminal;
pub mod token;
pub mod vm;
