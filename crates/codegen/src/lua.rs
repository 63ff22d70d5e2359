//! Small helpers for writing Lua source text.

const INDENT: &str = "    ";

/// Double-quoted Lua string literal.
pub fn lua_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Number literal without a trailing `.0` for integral values.
pub fn lua_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Indents every non-empty line of `text` by `levels` steps.
pub fn indent(text: &str, levels: usize) -> String {
    let pad = INDENT.repeat(levels);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins boolean expressions, parenthesising each when there is more than one.
pub fn join_guards(parts: &[String], op: &str) -> String {
    let parts: Vec<&String> = parts.iter().filter(|part| !part.trim().is_empty()).collect();
    match parts.len() {
        0 => String::new(),
        1 => parts[0].clone(),
        _ => parts
            .iter()
            .map(|part| format!("({})", part))
            .collect::<Vec<_>>()
            .join(&format!(" {} ", op)),
    }
}

/// Text safe to follow `--` on one line: line breaks and other control
/// characters become spaces.
pub fn lua_comment(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Line oriented writer that tracks block depth.
#[derive(Debug, Default)]
pub struct LuaWriter {
    out: String,
    depth: usize,
}

impl LuaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(depth: usize) -> Self {
        Self {
            out: String::new(),
            depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Writes one statement; continuation lines of a multi-line statement
    /// keep their relative indentation.
    pub fn line(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.out.push('\n');
            return;
        }
        for part in text.lines() {
            if part.trim().is_empty() {
                self.out.push('\n');
                continue;
            }
            self.out.push_str(&INDENT.repeat(self.depth));
            self.out.push_str(part);
            self.out.push('\n');
        }
    }

    /// Writes a possibly multi-line fragment at the current depth.
    pub fn block(&mut self, text: &str) {
        self.line(text);
    }

    /// Writes `header` and enters a nested block.
    pub fn open(&mut self, header: &str) {
        self.line(header);
        self.depth += 1;
    }

    /// Leaves the current block and writes `footer` (`end`, `else`, ...).
    pub fn close(&mut self, footer: &str) {
        debug_assert!(self.depth > 0, "unbalanced close: {}", footer);
        self.depth = self.depth.saturating_sub(1);
        self.line(footer);
    }

    /// Closes the current branch and opens a sibling (`elseif ... then`, `else`).
    pub fn reopen(&mut self, header: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(header);
        self.depth += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.out.trim().is_empty()
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_escape_quotes_and_newlines() {
        assert_eq!(lua_string("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(lua_number(5.0), "5");
        assert_eq!(lua_number(1.5), "1.5");
        assert_eq!(lua_number(-2.0), "-2");
        assert_eq!(lua_number(f64::NAN), "0");
    }

    #[test]
    fn comments_stay_on_one_line() {
        assert_eq!(lua_comment("Two\nLines"), "Two Lines");
        assert_eq!(lua_comment("tab\there\r\n"), "tab here");
    }

    #[test]
    fn writer_nests_blocks() {
        let mut w = LuaWriter::new();
        w.open("if a then");
        w.line("x = 1");
        w.reopen("else");
        w.line("x = 2");
        w.close("end");
        assert_eq!(w.finish(), "if a then\n    x = 1\nelse\n    x = 2\nend\n");
    }

    #[test]
    fn join_guards_parenthesises_multiple_parts() {
        assert_eq!(join_guards(&["a".to_string()], "and"), "a");
        assert_eq!(
            join_guards(&["a".to_string(), String::new(), "b or c".to_string()], "and"),
            "(a) and (b or c)"
        );
    }
}
