//! Indentation-aware text sink used by the generators.

use crate::Error;

const INDENT: &str = "  ";

/// Substitute `$name$` placeholders in `template`.
///
/// `$$` writes a literal `$`. A placeholder that has no binding in `vars`
/// is an error rather than being left in the output.
pub fn render(template: &str, vars: &[(&str, &str)]) -> Result<String, Error> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('$')
            .ok_or_else(|| Error::UnterminatedPlaceholder(template.to_string()))?;
        let name = &after[..end];
        if name.is_empty() {
            out.push('$');
        } else {
            let value = vars
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| Error::UnknownPlaceholder(name.to_string()))?;
            out.push_str(value);
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Join `items` with `separator`.
pub fn joined<I, S>(items: I, separator: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Append-only output buffer.
///
/// Indentation is applied lazily to the first character of each line, so
/// blank lines never carry trailing whitespace.
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    level: usize,
    at_line_start: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            level: 0,
            at_line_start: true,
        }
    }

    /// Render `template` with `vars` and append it.
    pub fn print(&mut self, template: &str, vars: &[(&str, &str)]) -> Result<(), Error> {
        let text = render(template, vars)?;
        self.print_raw(&text);
        Ok(())
    }

    /// Append `text` verbatim, apart from indentation.
    pub fn print_raw(&mut self, text: &str) {
        for line in text.split_inclusive('\n') {
            if self.at_line_start && line != "\n" {
                for _ in 0..self.level {
                    self.out.push_str(INDENT);
                }
            }
            self.out.push_str(line);
            self.at_line_start = line.ends_with('\n');
        }
    }

    /// Append `text` without indenting its continuation lines.
    ///
    /// Used for literals such as string defaults, whose line breaks are part
    /// of the value.
    pub fn print_verbatim(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start && !text.starts_with('\n') {
            for _ in 0..self.level {
                self.out.push_str(INDENT);
            }
        }
        self.out.push_str(text);
        self.at_line_start = text.ends_with('\n');
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn outdent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Consume the printer, returning everything written.
    pub fn finish(self) -> String {
        self.out
    }
}
