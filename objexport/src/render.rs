//! Final reporting of a run: the `--json` result document or a plain
//! `Error:` line, and the process exit status.

use std::io::Write;

use objexport_core::{DescriptionCollection, ObjExportError, Result};
use serde_json::{Value, json};

/// Exit status of a successful run
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status of a failed run
pub const EXIT_FAILURE: u8 = 1;

/// `{"status":0,"result":<collection>}`
pub fn success_document(collection: &DescriptionCollection) -> Value {
    json!({
        "status": EXIT_SUCCESS,
        "result": collection,
    })
}

/// `{"status":1,"name":<kind>,"message":<message>,"exitCode":1}`
pub fn error_document(error: &ObjExportError) -> Value {
    json!({
        "status": EXIT_FAILURE,
        "name": error.kind(),
        "message": error.to_string(),
        "exitCode": EXIT_FAILURE,
    })
}

/// Writes the outcome of a run and returns the exit status.
///
/// In JSON mode the result document goes to `out` for both success and
/// failure. Otherwise a failure is reported as `Error: <message>` on `err`
/// and a success writes nothing further.
pub fn report<O, E>(
    json_mode: bool,
    result: &Result<DescriptionCollection>,
    out: &mut O,
    err: &mut E,
) -> u8
where
    O: Write + ?Sized,
    E: Write + ?Sized,
{
    let status = if result.is_ok() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    };

    if json_mode {
        let document = match result {
            Ok(collection) => success_document(collection),
            Err(error) => error_document(error),
        };
        match serde_json::to_string_pretty(&document) {
            Ok(text) => {
                // A closed stdout leaves nothing further to report to.
                let _ = writeln!(out, "{text}");
            }
            Err(e) => {
                let _ = writeln!(err, "Error: Failed to serialize result: {e}");
                return EXIT_FAILURE;
            }
        }
    } else if let Err(error) = result {
        let _ = writeln!(err, "Error: {error}");
    }

    status
}
