//! Line-based prompts that re-ask until the answer parses.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Result, bail};

/// Asks `question` and keeps re-asking until the reply parses as `T`.
///
/// Fails only when input is exhausted or unreadable.
pub fn ask<T, R, W>(input: &mut R, output: &mut W, question: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    R: BufRead,
    W: Write,
{
    write!(output, "{question}")?;
    output.flush()?;
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for an answer");
        }
        match line.trim().parse::<T>() {
            Ok(value) => return Ok(value),
            Err(e) => {
                writeln!(output, "{e}")?;
                write!(output, "Try again: ")?;
                output.flush()?;
            }
        }
    }
}

/// A yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YesNo(pub bool);

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => Ok(YesNo(true)),
            "no" | "n" => Ok(YesNo(false)),
            _ => Err("Invalid input. Please enter yes or no.".to_string()),
        }
    }
}

/// Asks a yes/no question until it gets one of the two.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    let YesNo(answer) = ask(input, output, question)?;
    Ok(answer)
}
