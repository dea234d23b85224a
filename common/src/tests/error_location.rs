use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures the construction site.
///
/// **WHY THIS MATTERS**: Every error in the workspace carries an `ErrorLocation`. If it
/// stops pointing at the right file, log lines for dropped frames and failed sends lose
/// their debugging value.
///
/// **BUG THIS CATCHES**: Would catch if `Location::caller()` stops being propagated or the
/// file path is dropped.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: Current caller location
    // WHEN: Creating ErrorLocation from caller
    let location = ErrorLocation::from(Location::caller());

    // THEN: Should capture file, line, and column
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert!(location.line > 0, "Should capture line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the `[file:line:column]` display format.
///
/// **BUG THIS CATCHES**: Would catch a Display change that drops the brackets or a field.
#[test]
fn given_error_location_when_displayed_then_formats_with_brackets_and_colons() {
    // GIVEN: A manually-constructed location
    let location = ErrorLocation {
        file: "src/router/mod.rs",
        line: 42,
        column: 7,
    };

    // WHEN: Formatting for display
    let rendered = location.to_string();

    // THEN: Should render as [file:line:column]
    assert_eq!(rendered, "[src/router/mod.rs:42:7]");
}
