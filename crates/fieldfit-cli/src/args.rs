use anyhow::{Context, Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full-screen textarea
    Interactive,
    /// Reflow stdin once and print the result
    Format,
}

/// Command-line arguments after the program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub mode: Mode,
    /// `(max_chars_per_line, max_lines)` given on the command line
    pub limits: Option<(usize, usize)>,
}

pub fn usage(program: &str) -> String {
    format!("Usage: {program} [--format] [max-chars-per-line max-lines]")
}

pub fn parse(args: &[String]) -> Result<Args> {
    let (mode, rest) = match args.split_first() {
        Some((flag, rest)) if flag == "--format" => (Mode::Format, rest),
        _ => (Mode::Interactive, args),
    };

    let limits = match rest {
        [] => None,
        [chars, lines] => Some((
            chars
                .parse::<usize>()
                .with_context(|| format!("Invalid max-chars-per-line '{chars}'"))?,
            lines
                .parse::<usize>()
                .with_context(|| format!("Invalid max-lines '{lines}'"))?,
        )),
        _ => bail!("Expected both max-chars-per-line and max-lines, or neither"),
    };

    Ok(Args { mode, limits })
}
