// Output accumulator: label declarations plus generated code lines.

/// Collects declarations and code lines in emission order.
#[derive(Debug, Default)]
pub struct Emitter {
    declarations: Vec<String>,
    lines: Vec<String>,
}

impl Emitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` and bind it at the current position.
    pub fn bind(&mut self, name: &str) {
        self.declarations.push(name.to_string());
        self.emit(format!("__ bind(&{name});"));
    }

    pub fn emit(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    #[must_use]
    pub fn declarations(&self) -> &[String] {
        &self.declarations
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// `Label a, b, c;` followed by every code line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.declarations.is_empty() {
            out.push_str("Label ");
            out.push_str(&self.declarations.join(", "));
            out.push_str(";\n");
        }
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
