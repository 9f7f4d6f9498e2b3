use spindle::PointerPhase;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Down,
    Move,
    Up,
    Cancel,
    Frames,
    Settle,
    Index,
    Relayout,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `t` is optional; without it the wheel stamps the sample itself.
    Pointer {
        phase: PointerPhase,
        y: f64,
        t: Option<f64>,
    },
    Frames(usize),
    Settle,
    Index(usize),
    Relayout(Option<usize>),
    Quit,
}

#[derive(Error, Debug, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand { line: usize, word: String },
    #[error("line {line}: `{verb}` expects {expected}")]
    Arguments {
        line: usize,
        verb: Verb,
        expected: &'static str,
    },
    #[error("line {line}: `{value}` is not a valid number")]
    Number { line: usize, value: String },
}

/// Parses one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Command>, ScriptError> {
    let text = text.split('#').next().unwrap_or_default().trim();
    let mut words = text.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let verb = Verb::from_str(word).map_err(|_| ScriptError::UnknownCommand {
        line,
        word: word.to_string(),
    })?;
    let args: Vec<&str> = words.collect();

    let arguments = |expected| ScriptError::Arguments {
        line,
        verb,
        expected,
    };
    let number = |value: &str| {
        value.parse::<f64>().map_err(|_| ScriptError::Number {
            line,
            value: value.to_string(),
        })
    };
    let count = |value: &str| {
        value.parse::<usize>().map_err(|_| ScriptError::Number {
            line,
            value: value.to_string(),
        })
    };

    let command = match verb {
        Verb::Down | Verb::Move | Verb::Up | Verb::Cancel => {
            let phase = match verb {
                Verb::Down => PointerPhase::Down,
                Verb::Move => PointerPhase::Move,
                Verb::Up => PointerPhase::Up,
                _ => PointerPhase::Cancel,
            };
            match args.as_slice() {
                [y] => Command::Pointer {
                    phase,
                    y: number(y)?,
                    t: None,
                },
                [y, t] => Command::Pointer {
                    phase,
                    y: number(y)?,
                    t: Some(number(t)?),
                },
                _ => return Err(arguments("<y> [t]")),
            }
        }
        Verb::Frames => match args.as_slice() {
            [n] => Command::Frames(count(n)?),
            _ => return Err(arguments("<count>")),
        },
        Verb::Index => match args.as_slice() {
            [i] => Command::Index(count(i)?),
            _ => return Err(arguments("<index>")),
        },
        Verb::Relayout => match args.as_slice() {
            [] => Command::Relayout(None),
            [i] => Command::Relayout(Some(count(i)?)),
            _ => return Err(arguments("[index]")),
        },
        Verb::Settle | Verb::Quit if !args.is_empty() => return Err(arguments("no arguments")),
        Verb::Settle => Command::Settle,
        Verb::Quit => Command::Quit,
    };

    Ok(Some(command))
}

pub fn parse(source: &str) -> Result<Vec<Command>, ScriptError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, text)| parse_line(i + 1, text).transpose())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let source = "
# flick upwards
down 300 0
up 204 100   # fast release
settle
INDEX 2
relayout
relayout 1
frames 3
move 12.5
";
        let commands = parse(source).unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Pointer {
                    phase: PointerPhase::Down,
                    y: 300.0,
                    t: Some(0.0)
                },
                Command::Pointer {
                    phase: PointerPhase::Up,
                    y: 204.0,
                    t: Some(100.0)
                },
                Command::Settle,
                Command::Index(2),
                Command::Relayout(None),
                Command::Relayout(Some(1)),
                Command::Frames(3),
                Command::Pointer {
                    phase: PointerPhase::Move,
                    y: 12.5,
                    t: None
                },
            ]
        );
    }

    #[test]
    fn test_errors_name_the_line() {
        assert_eq!(
            parse("settle\nspin 3"),
            Err(ScriptError::UnknownCommand {
                line: 2,
                word: "spin".to_string()
            })
        );
        assert_eq!(
            parse_line(4, "down"),
            Err(ScriptError::Arguments {
                line: 4,
                verb: Verb::Down,
                expected: "<y> [t]"
            })
        );
        assert_eq!(
            parse_line(1, "frames many"),
            Err(ScriptError::Number {
                line: 1,
                value: "many".to_string()
            })
        );
        assert!(parse_line(1, "settle now").is_err());
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_line(1, "   "), Ok(None));
        assert_eq!(parse_line(1, "# nothing here"), Ok(None));
    }
}
