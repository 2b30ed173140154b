use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  search <text> | /<text>   set the search query (short queries clear results)
  open <n>                  open the n-th result (again to close)
  select <id>               open a movie by IMDb id
  rate <0-10>               rate the open movie
  add                       add the open movie to your watched list
  remove <id>               remove a movie from your watched list
  back | esc                close the open movie
  watched                   show the watched list
  export                    print the watched list as JSON
  help                      show this help
  quit                      exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Open(usize),
    Select(String),
    Rate(u8),
    Add,
    Remove(String),
    Back,
    Watched,
    Export,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);

        // The query is taken verbatim so leading and trailing spaces count.
        if let Some(query) = line.strip_prefix('/') {
            return Ok(Command::Search(query.to_string()));
        }

        let trimmed = line.trim_start();
        let (name, rest) = match trimmed.split_once(' ') {
            Some((name, rest)) => (name, rest),
            None => (trimmed, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "" => Err(ParseCommandError::Empty),
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "open" | "o" => {
                let n = number(rest, "open")?;
                if n == 0 {
                    return Err(ParseCommandError::InvalidNumber(rest.trim().to_string()));
                }
                Ok(Command::Open(n))
            }
            "select" => Ok(Command::Select(argument(rest, "select")?)),
            "rate" | "r" => {
                let value = number(rest, "rate")?;
                u8::try_from(value)
                    .map(Command::Rate)
                    .map_err(|_| ParseCommandError::InvalidNumber(rest.trim().to_string()))
            }
            "add" => Ok(Command::Add),
            "remove" | "rm" => Ok(Command::Remove(argument(rest, "remove")?)),
            "back" | "esc" => Ok(Command::Back),
            "watched" | "w" => Ok(Command::Watched),
            "export" => Ok(Command::Export),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

fn argument(rest: &str, command: &'static str) -> Result<String, ParseCommandError> {
    let arg = rest.trim();
    if arg.is_empty() {
        return Err(ParseCommandError::MissingArgument(command));
    }
    Ok(arg.to_string())
}

fn number(rest: &str, command: &'static str) -> Result<usize, ParseCommandError> {
    let arg = argument(rest, command)?;
    arg.parse()
        .map_err(|_| ParseCommandError::InvalidNumber(arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_forms() {
        assert_eq!("search Inception".parse::<Command>(), Ok(Command::Search("Inception".into())));
        assert_eq!("/star wars".parse::<Command>(), Ok(Command::Search("star wars".into())));
        assert_eq!("/".parse::<Command>(), Ok(Command::Search(String::new())));
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(String::new())));
    }

    #[test]
    fn parses_selection_and_rating() {
        assert_eq!("open 2".parse::<Command>(), Ok(Command::Open(2)));
        assert_eq!("select tt1375666".parse::<Command>(), Ok(Command::Select("tt1375666".into())));
        assert_eq!("rate 10".parse::<Command>(), Ok(Command::Rate(10)));
        assert_eq!("add".parse::<Command>(), Ok(Command::Add));
        assert_eq!("esc".parse::<Command>(), Ok(Command::Back));
        assert_eq!("remove tt1".parse::<Command>(), Ok(Command::Remove("tt1".into())));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<Command>(), Err(ParseCommandError::Empty));
        assert_eq!("open 0".parse::<Command>(), Err(ParseCommandError::InvalidNumber("0".into())));
        assert_eq!("rate x".parse::<Command>(), Err(ParseCommandError::InvalidNumber("x".into())));
        assert_eq!("rate 300".parse::<Command>(), Err(ParseCommandError::InvalidNumber("300".into())));
        assert_eq!("remove".parse::<Command>(), Err(ParseCommandError::MissingArgument("remove")));
        assert_eq!("dance".parse::<Command>(), Err(ParseCommandError::Unknown("dance".into())));
    }
}
