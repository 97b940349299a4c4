use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Print `message`, then read one line from `input`.
///
/// Returns `None` on end of input, which callers treat as a cancel.
pub fn prompt_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> Result<Option<String>> {
    write!(output, "{}", message).context("Failed to write prompt")?;
    output.flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Like [`prompt_from`], but an empty answer yields `default`.
pub fn prompt_with_default_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
    default: &str,
) -> Result<Option<String>> {
    let answer = prompt_from(input, output, &format!("{} [{}]: ", message, default))?;
    Ok(answer.map(|a| if a.is_empty() { default.to_string() } else { a }))
}

/// Prompt on the terminal.
pub fn prompt(message: &str) -> Result<Option<String>> {
    prompt_from(&mut std::io::stdin().lock(), &mut std::io::stdout(), message)
}

/// Prompt on the terminal with a default value.
pub fn prompt_with_default(message: &str, default: &str) -> Result<Option<String>> {
    prompt_with_default_from(
        &mut std::io::stdin().lock(),
        &mut std::io::stdout(),
        message,
        default,
    )
}

/// Prompt with a yes/no question. End of input counts as the default.
pub fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?.unwrap_or_default();
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}
