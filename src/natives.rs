//! Host functions installed in the global environment at start‑up.

use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::callable::NativeFunction;
use crate::environment::EnvRef;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Define `clock`, `input` and `print` in `globals`.
pub fn install(globals: &EnvRef) {
    let natives: [NativeFunction; 3] = [
        NativeFunction {
            name: "clock",
            arity: 0,
            func: clock,
        },
        NativeFunction {
            name: "input",
            arity: 1,
            func: input,
        },
        NativeFunction {
            name: "print",
            arity: 1,
            func: print,
        },
    ];

    for native in natives {
        debug!("Defining native function '{}'", native.name);

        globals
            .borrow_mut()
            .define(native.name, Value::Native(Rc::new(native)));
    }
}

/// Wall‑clock seconds since the Unix epoch.
fn clock(_interpreter: &mut Interpreter, _args: &[Value]) -> Result<Value, String> {
    let seconds: f64 = Utc::now().timestamp_micros() as f64 / 1_000_000.0;

    info!("Native function 'clock' returned: {}", seconds);

    Ok(Value::Number(seconds))
}

/// Write the prompt, then block for one line of input.  End of input reads
/// as `nil`.
fn input(interpreter: &mut Interpreter, args: &[Value]) -> Result<Value, String> {
    let prompt: String = args.first().map(Value::to_string).unwrap_or_default();

    interpreter
        .write_prompt(&prompt)
        .map_err(|e| format!("Output error: {}", e))?;

    match interpreter.read_line() {
        Ok(Some(line)) => Ok(Value::String(line)),
        Ok(None) => Ok(Value::Nil),
        Err(e) => Err(format!("Input error: {}", e)),
    }
}

/// Print a value on its own line and hand it back unchanged.
fn print(interpreter: &mut Interpreter, args: &[Value]) -> Result<Value, String> {
    let value: Value = args.first().cloned().unwrap_or(Value::Nil);

    interpreter
        .write_line(&value.to_string())
        .map_err(|e| format!("Output error: {}", e))?;

    Ok(value)
}
