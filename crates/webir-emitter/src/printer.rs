//! Line-oriented source buffer used by the Gleam emitter.

pub(crate) struct SourcePrinter {
    output: String,
    indent_level: u32,
    indent_str: &'static str,
}

impl SourcePrinter {
    pub(crate) fn new() -> Self {
        SourcePrinter {
            output: String::new(),
            indent_level: 0,
            indent_str: "  ",
        }
    }

    pub(crate) fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub(crate) fn write_line(&mut self) {
        self.output.push('\n');
    }

    pub(crate) fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    /// Indented text followed by a newline.
    pub(crate) fn line(&mut self, s: &str) {
        self.write_indent();
        self.write(s);
        self.write_line();
    }

    /// Separate the next block with one empty line, never more.
    pub(crate) fn blank_line(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with("\n\n") {
            self.write_line();
        }
    }

    pub(crate) const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Each doc line as a `///` comment.
    pub(crate) fn doc_comment(&mut self, doc: &str) {
        for line in doc.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(&format!("/// {line}"));
            }
        }
    }

    pub(crate) fn finish(self) -> String {
        self.output
    }
}
