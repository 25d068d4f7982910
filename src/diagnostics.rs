use std::fmt;

/// Receiver of lexical error reports. Owned by the caller; the scanner only
/// ever reports into it and never reads anything back.
pub trait DiagnosticSink {
    fn report(&mut self, line: u32, location: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: u32,
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "[line {}] Error: {}", self.line, self.message)
        } else {
            write!(f, "[line {}] Error {}: {}", self.line, self.location, self.message)
        }
    }
}

/// Collects every report in the order it was made.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn had_error(&self) -> bool {
        !self.reported.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.reported.iter()
    }

    pub fn clear(&mut self) {
        self.reported.clear();
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, line: u32, location: &str, message: &str) {
        self.reported.push(Diagnostic {
            line,
            location: location.to_owned(),
            message: message.to_owned(),
        });
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn collects_reports_in_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.had_error());

        diagnostics.report(1, "at '@'", "Unexpected character.");
        diagnostics.report(3, "", "Unterminated string.");

        assert!(diagnostics.had_error());
        assert_eq!(diagnostics.len(), 2);
        let lines: Vec<u32> = diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 3]);

        diagnostics.clear();
        assert!(!diagnostics.had_error());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn formats_with_and_without_location() {
        let diagnostic = Diagnostic {
            line: 2,
            location: "at '#'".to_owned(),
            message: "Unexpected character.".to_owned(),
        };
        assert_eq!(diagnostic.to_string(), "[line 2] Error at '#': Unexpected character.");

        let diagnostic = Diagnostic {
            line: 7,
            location: String::new(),
            message: "Unterminated string.".to_owned(),
        };
        assert_eq!(diagnostic.to_string(), "[line 7] Error: Unterminated string.");
    }
}
