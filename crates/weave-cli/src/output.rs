//! Output formatting for compiled views and compile errors.

use camino::Utf8Path;
use miette::{Diagnostic, IntoDiagnostic, LabeledSpan, NamedSource, Result, SourceCode, WrapErr};
use std::fmt;
use weave_compiler::CompileError;
use weave_dom::Node;

/// Serialize a compiled view.
pub fn render(view: &Node, pretty: bool) -> String {
    if pretty {
        view.to_pretty_html()
    } else {
        view.to_html()
    }
}

/// Write rendered output to a file, or stdout when no path is given.
pub fn write_output(html: &str, path: Option<&Utf8Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, html)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {}", path)),
        None => {
            println!("{}", html);
            Ok(())
        }
    }
}

/// A compile error rendered against the failing expression.
#[derive(Debug)]
pub struct ExpressionDiagnostic {
    error: CompileError,
    source_code: NamedSource<String>,
    offset: usize,
    len: usize,
}

impl ExpressionDiagnostic {
    pub fn new(error: CompileError) -> Self {
        let expression = error.expression().to_string();
        let (offset, len) = match &error {
            CompileError::Parse { source, .. } => {
                let range = source.span.to_range();
                let start = range.start.min(expression.len());
                (start, range.end.min(expression.len()).saturating_sub(start))
            }
            CompileError::Eval { .. } => (0, expression.len()),
        };
        let name = format!("`{}` directive", error.directive());

        Self {
            source_code: NamedSource::new(name, expression),
            error,
            offset,
            len,
        }
    }
}

impl fmt::Display for ExpressionDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for ExpressionDiagnostic {}

impl Diagnostic for ExpressionDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("weave::{}", self.error.code())))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = match &self.error {
            CompileError::Parse { .. } => "here",
            CompileError::Eval { .. } => "while evaluating this",
        };
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(label.to_string()),
            (self.offset, self.len),
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use weave_expr::{EvalError, ParseError, Span};

    #[test]
    fn test_render() {
        let view = Node::Fragment(vec![Node::element("ul")]);
        assert_eq!(render(&view, false), "<ul></ul>");
    }

    #[test]
    fn test_parse_error_label() {
        let diagnostic = ExpressionDiagnostic::new(CompileError::Parse {
            directive: "show".into(),
            expression: "a +".into(),
            source: ParseError::unexpected_end("expression", Span::new(3, 3)),
        });

        let code = diagnostic.code().map(|code| code.to_string());
        assert_eq!(code.as_deref(), Some("weave::unexpected-end"));

        let labels: Vec<_> = diagnostic.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 3);
        assert_eq!(labels[0].len(), 0);
    }

    #[test]
    fn test_eval_error_labels_whole_expression() {
        let diagnostic = ExpressionDiagnostic::new(CompileError::Eval {
            directive: "text".into(),
            expression: "user.name".into(),
            source: EvalError::type_error("Cannot read properties of undefined (reading 'name')"),
        });

        let labels: Vec<_> = diagnostic.labels().into_iter().flatten().collect();
        assert_eq!(labels[0].offset(), 0);
        assert_eq!(labels[0].len(), 9);
        assert!(diagnostic.to_string().starts_with("failed to evaluate `text` directive"));
    }
}
