//! Textual assembly of the emitted module.
//!
//! The [`ModuleWriter`] stitches per-method instruction lists into one
//! Jasmin module: class scaffolding first, then a fixed static entry
//! trampoline, then every emitted method. Formatting follows the assembler's
//! conventions: directives flush left, label markers indented one tab,
//! instructions two.

/// Name of the emitted class.
pub const MODULE_CLASS: &str = "Main";

/// Fixed operand-stack limit for every emitted method.
pub const STACK_LIMIT: u32 = 128;

/// Fixed local-variable limit for every emitted method.
pub const LOCALS_LIMIT: u32 = 128;

/// Accumulates the textual module.
#[derive(Debug, Default)]
pub struct ModuleWriter {
    out: String,
}

impl ModuleWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the class header.
    pub fn begin_class(&mut self) {
        self.out.push_str(".class public ");
        self.out.push_str(MODULE_CLASS);
        self.out.push('\n');
        self.out.push_str(".super java/lang/Object\n");
    }

    /// Emit the fixed static entry point that instantiates the module class,
    /// running the program's main body in its constructor.
    pub fn trampoline(&mut self) {
        let body = [
            format!("new {MODULE_CLASS}"),
            format!("invokespecial {MODULE_CLASS}/<init>()V"),
            "return".to_string(),
        ];
        self.method(".method public static main([Ljava/lang/String;)V", &body);
    }

    /// Emit one method: directive, fixed limits, body, end marker.
    ///
    /// Body lines ending in `:` are label markers and indent one tab;
    /// everything else indents two.
    pub fn method(&mut self, directive: &str, body: &[String]) {
        self.out.push_str(directive);
        self.out.push('\n');
        self.out.push_str(&format!(".limit stack {STACK_LIMIT}\n"));
        self.out.push_str(&format!(".limit locals {LOCALS_LIMIT}\n"));
        for line in body {
            if line.ends_with(':') {
                self.out.push('\t');
            } else {
                self.out.push_str("\t\t");
            }
            self.out.push_str(line);
            self.out.push('\n');
        }
        self.out.push_str(".end method\n");
    }

    /// Finish and return the module text.
    pub fn finish(self) -> String {
        self.out
    }
}
