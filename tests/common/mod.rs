#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use treelox::interpreter::Interpreter;
use treelox::runner::{RunError, Runner};

/// In‑memory writer whose contents stay readable after the interpreter
/// takes ownership of a clone.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A runner whose program output lands in the returned buffer and whose
/// `input()` reads from `stdin`.
pub fn runner_with_input(stdin: &str) -> (Runner, SharedBuffer) {
    let output = SharedBuffer::default();
    let interpreter = Interpreter::with_io(
        Box::new(Cursor::new(stdin.as_bytes().to_vec())),
        Box::new(output.clone()),
    );

    (Runner::with_interpreter(interpreter), output)
}

pub fn runner() -> (Runner, SharedBuffer) {
    runner_with_input("")
}

/// Run `source` in a fresh session and return everything it printed.
pub fn run(source: &str) -> (String, Result<(), RunError>) {
    let (mut runner, output) = runner();
    let result = runner.run(source);

    (output.contents(), result)
}

/// Run a program that must succeed and return its output.
pub fn output_of(source: &str) -> String {
    let (output, result) = run(source);

    if let Err(e) = result {
        match e {
            RunError::Static(errors) => {
                let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                panic!("static errors: {:?}", messages);
            }
            RunError::Runtime(e) => panic!("runtime error: {}", e),
        }
    }

    output
}

/// Run a program that must hit a runtime fault; returns (output, message).
pub fn runtime_error_of(source: &str) -> (String, String) {
    let (output, result) = run(source);

    match result {
        Err(RunError::Runtime(e)) => (output, e.to_string()),
        Err(RunError::Static(errors)) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            panic!("expected runtime fault, got static errors: {:?}", messages)
        }
        Ok(()) => panic!("expected runtime fault, program succeeded with {:?}", output),
    }
}
