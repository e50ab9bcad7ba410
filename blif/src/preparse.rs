use abc_mini_netlist::GrowVec;

/// One or more physical lines joined by trailing backslashes, with comments removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
    /// 1-based number of the first physical line.
    pub number: usize,
    pub text: String,
}

/// Removes a `#` comment, unless the `#` is inside a double-quoted string.
fn strip_comment(physical: &str) -> &str {
    let mut quoted = false;
    for (offset, character) in physical.char_indices() {
        match character {
            '"' => quoted = !quoted,
            '#' if !quoted => return &physical[..offset],
            _ => (),
        }
    }
    physical
}

pub(crate) fn split_logical_lines(buffer: &str) -> GrowVec<LogicalLine> {
    let mut lines = GrowVec::new();
    let mut pending: Option<LogicalLine> = None;
    for (index, physical) in buffer.lines().enumerate() {
        let code = strip_comment(physical).trim_end();
        let (code, continued) = match code.strip_suffix('\\') {
            Some(code) => (code.trim(), true),
            None => (code.trim(), false),
        };
        let line = pending.get_or_insert_with(|| LogicalLine { number: index + 1, text: String::new() });
        if !code.is_empty() {
            if !line.text.is_empty() {
                line.text.push(' ');
            }
            line.text.push_str(code);
        }
        if !continued {
            if let Some(line) = pending.take().filter(|line| !line.text.is_empty()) {
                lines.push(line);
            }
        }
    }
    if let Some(line) = pending.take().filter(|line| !line.text.is_empty()) {
        lines.push(line);
    }
    lines
}
