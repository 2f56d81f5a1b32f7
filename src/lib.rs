//! # How bare text becomes bytecode and runs
//!
//! User's source code: `int r = add(2, 3) * 4;`

//! ## Lexing
//!
//! The lexer walks the characters once and cuts them into tokens at separator
//! and operator characters. Each token gets a coarse `lexical class`
//! (identifier, literal, operator, ...) and a fine `lexeme` (`+=`, `while`,
//! `int`, ...). Whitespace and `#` comments never become tokens. So the tokens
//! are `["int", "r", "=", "add", "(", "2", ",", "3", ")", "*", "4", ";"]`.

//! ## Imports
//!
//! `import "io";` is not a language construct at all: before parsing, the
//! statement is replaced by the tokens of the imported source. Imported module
//! names are remembered so the host functions of the standard modules can be
//! installed later.

//! ## Lowering
//!
//! There is no syntax tree. The parser recognises one statement at a time and
//! immediately emits flat, two operand instructions for it:
//!
//! ``` text
//! DECLARE  r: int
//! DECLARE  $t0: void
//! PUSH     %bpv: int    2 (const int)
//! PUSH     %bpv: int    3 (const int)
//! CALL     add: int
//! ASSIGN   $t0: int     %frv: int
//! MUL      $t0: int     4 (const int)
//! ASSIGN   r: int       $t0: int
//! ```
//!
//! Names starting with `%` are cache slots shared by the whole program: the
//! calculation slots, the return value slot, the comparison slots and the
//! parameter buffer arguments travel through. Names starting with `$` are
//! temporaries local to the frame, used when a call could clobber a cache
//! slot mid expression.
//!
//! To know the type of every name without running anything, the parser keeps
//! a simulated frame of declared types, pushing and popping scopes in lock
//! step with the `PUSH_SCOPE` and `POP_SCOPE` it emits.

//! ## Control flow
//!
//! There is no conditional jump. A comparison that holds skips the one
//! instruction after it, and the lowering always puts an unconditional jump
//! there:
//!
//! ``` text
//! LESS     i: int       10 (const int)
//! JUMP     +5           # taken only when the comparison failed
//! PUSH_SCOPE
//! ...                   # the loop body
//! POP_SCOPE
//! JUMP     -5           # back to the comparison
//! ```
//!
//! Jump offsets are relative to the jump itself and are back-patched once the
//! size of the skipped code is known.

//! ## Static checks
//!
//! Once a function is lowered, every instruction is checked on its operand
//! types: strings only mix with strings, pointers only alias, and with
//! implicit conversion disabled both sides of every operator must agree.
//! Operands typed `void` are only known at runtime and are let through.

//! ## Running
//!
//! The interpreter executes the flat lists with an instruction pointer. A call
//! pushes a frame, the callee's prologue pulls its parameters from the
//! parameter buffer, and `RETURN` pops the frame again. Host functions such as
//! `WriteLine` share that contract, so calling them needs no special case.

pub mod ast;
pub mod cli;
pub mod config;
pub mod debug;
pub mod environment;
pub mod error;
pub mod function;
pub mod instruction;
pub mod interpreter;
pub mod lexer;
pub mod module;
pub mod optimizer;
pub mod parser;
pub mod scriptor;
pub mod utils;

pub use config::Config;
pub use error::ScriptError;
pub use scriptor::{Program, Scriptor};
