//! Formatting helpers for generated SPD module text.

/// A line-oriented buffer for generated module text.
#[derive(Debug, Default)]
pub struct CodeFormatter {
    output: String,
}

impl CodeFormatter {
    /// Create an empty formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a line.
    pub fn writeln(&mut self, s: &str) {
        self.output.push_str(s);
        self.output.push('\n');
    }

    /// Write an empty line.
    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Get the formatted output.
    pub fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_formatter() {
        let mut fmt = CodeFormatter::new();
        fmt.writeln("Name      kernel0;");
        fmt.newline();
        fmt.writeln("Main_In   {Mi::a_in0};");
        assert_eq!(
            fmt.finish(),
            "Name      kernel0;\n\nMain_In   {Mi::a_in0};\n"
        );
    }
}
