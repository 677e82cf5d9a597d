use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space1},
    combinator::{all_consuming, map, map_res, opt, value},
    sequence::{pair, preceded},
    IResult,
};
use std::convert::TryFrom;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Commands accepted on the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next(u32),
    Prev(u32),
    Select(u32),
    Today,
    Show,
    Hide,
    Toggle,
    Quit,
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, u32::from_str)(input)
}

fn repeat(input: &str) -> IResult<&str, u32> {
    map(opt(preceded(space1, number)), |n| n.unwrap_or(1))(input)
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((
        map(pair(alt((tag("next"), tag("n"))), repeat), |(_, n)| {
            Command::Next(n)
        }),
        map(pair(alt((tag("prev"), tag("p"))), repeat), |(_, n)| {
            Command::Prev(n)
        }),
        map(
            preceded(alt((tag("select"), tag("s"))), preceded(space1, number)),
            Command::Select,
        ),
        value(Command::Today, tag("today")),
        value(Command::Show, tag("show")),
        value(Command::Hide, tag("hide")),
        value(Command::Toggle, tag("toggle")),
        value(Command::Quit, alt((tag("quit"), tag("q")))),
    ))(input)
}

impl Command {
    /// Signed month offset of a navigation command. `None` for other
    /// commands and for counts too large for a month offset.
    pub fn month_delta(&self) -> Option<i32> {
        match *self {
            Command::Next(n) => i32::try_from(n).ok(),
            Command::Prev(n) => i32::try_from(n).ok().map(|n| -n),
            _ => None,
        }
    }
}

impl FromStr for Command {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        all_consuming(command)(trimmed)
            .map(|(_, cmd)| cmd)
            .map_err(|_| Error::new(ErrorKind::CommandParse, trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_with_and_without_count() {
        assert_eq!("next".parse::<Command>().unwrap(), Command::Next(1));
        assert_eq!("n 3".parse::<Command>().unwrap(), Command::Next(3));
        assert_eq!("prev".parse::<Command>().unwrap(), Command::Prev(1));
        assert_eq!(" p 12 ".parse::<Command>().unwrap(), Command::Prev(12));
    }

    #[test]
    fn select_needs_a_day() {
        assert_eq!("select 5".parse::<Command>().unwrap(), Command::Select(5));
        assert_eq!("s 31".parse::<Command>().unwrap(), Command::Select(31));
        assert!("select".parse::<Command>().is_err());
    }

    #[test]
    fn visibility_and_quit() {
        assert_eq!("show".parse::<Command>().unwrap(), Command::Show);
        assert_eq!("hide".parse::<Command>().unwrap(), Command::Hide);
        assert_eq!("toggle".parse::<Command>().unwrap(), Command::Toggle);
        assert_eq!("today".parse::<Command>().unwrap(), Command::Today);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn month_delta_keeps_direction() {
        assert_eq!("next 3".parse::<Command>().unwrap().month_delta(), Some(3));
        assert_eq!("prev 3".parse::<Command>().unwrap().month_delta(), Some(-3));
        assert_eq!("show".parse::<Command>().unwrap().month_delta(), None);

        let huge = "next 4294967295".parse::<Command>().unwrap();
        assert_eq!(huge, Command::Next(u32::MAX));
        assert_eq!(huge.month_delta(), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!("jump".parse::<Command>().is_err());
        assert!("next please".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }
}
