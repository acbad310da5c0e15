//! The surface syntax of terms.
//!
//! | term | syntax |
//! |---|---|
//! | input | `u x y` |
//! | output | `^u x y` |
//! | inaction | `0` |
//! | composition | `(P \| Q \| R)` |
//! | scope | `(x y)P` |
//! | replication | `!P` |
//!
//! Names are a lowercase letter followed by lowercase letters or digits. A parenthesised list of
//! names followed by a term is a scope, any other parenthesised term is a composition, and a
//! composition of a single term is that term.
use chumsky::prelude::*;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

use crate::{Agent, Name, NameSet, Parity, Solo};

///Unable to parse a term.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct ParseError(String);

impl From<Vec<Rich<'_, char>>> for ParseError {
    fn from(value: Vec<Rich<'_, char>>) -> Self {
        ParseError(
            value
                .iter()
                .map(std::string::ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0)
    }
}

fn name<'a>() -> impl Parser<'a, &'a str, Name, extra::Err<Rich<'a, char>>> + Clone {
    any()
        .filter(char::is_ascii_lowercase)
        .then(
            any()
                .filter(|c: &char| c.is_ascii_lowercase() || c.is_ascii_digit())
                .repeated(),
        )
        .to_slice()
        .map(Name::from)
        .labelled("name")
}

fn agent_parser<'a>() -> impl Parser<'a, &'a str, Agent, extra::Err<Rich<'a, char>>> + Clone {
    recursive(|agent| {
        let inaction = just('0').to(Agent::Inaction);

        let solo = just('^')
            .or_not()
            .then(name())
            .then(name().padded().repeated().collect::<Vec<_>>())
            .map(|((output, subject), objects)| {
                let parity = if output.is_some() {
                    Parity::Output
                } else {
                    Parity::Input
                };
                Agent::Solo(Solo::new(subject, objects, parity))
            });

        let scope = name()
            .padded()
            .repeated()
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just('('), just(')'))
            .then(agent.clone().padded())
            .map(|(scope, child): (Vec<Name>, Agent)| Agent::Scope {
                child: Box::new(child),
                scope: scope.into_iter().collect::<NameSet>(),
            });

        let composition = agent
            .clone()
            .padded()
            .separated_by(just('|'))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just('('), just(')'))
            .map(|children: Vec<Agent>| match <[Agent; 1]>::try_from(children) {
                Ok([child]) => child,
                Err(children) => Agent::Composition(children),
            });

        let replication = just('!').ignore_then(agent).map(Agent::replication);

        choice((inaction, replication, scope, composition, solo))
    })
}

impl Agent {
    ///Parses a term from its surface syntax.
    ///
    ///```
    ///# use solo_calculus::Agent;
    ///let agent = Agent::parse("(x)(u x | ^u y | !(p x y))")?;
    ///assert_eq!(agent.to_string(), "(x)(u x | ^u y | !(p x y))");
    ///# Ok::<(), anyhow::Error>(())
    ///```
    ///
    ///# Errors
    ///Returns a [`ParseError`] if the string is not a term.
    pub fn parse(s: &str) -> Result<Agent, ParseError> {
        agent_parser()
            .padded()
            .then_ignore(end())
            .parse(s)
            .into_result()
            .map_err(std::convert::Into::into)
    }
}

impl FromStr for Agent {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Agent::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_solos() -> anyhow::Result<()> {
        assert_eq!(Agent::parse("u x y")?, Agent::input("u", ["x", "y"]));
        assert_eq!(Agent::parse("^u x")?, Agent::output("u", ["x"]));
        assert_eq!(Agent::parse("  p  ")?, Agent::input("p", Vec::<Name>::new()));
        assert_eq!(Agent::parse("u0 x12")?, Agent::input("u0", ["x12"]));
        Ok(())
    }

    #[test]
    fn parse_structure() -> anyhow::Result<()> {
        assert_eq!(Agent::parse("0")?, Agent::Inaction);
        assert_eq!(
            Agent::parse("(u x|^u y)")?,
            Agent::composition([Agent::input("u", ["x"]), Agent::output("u", ["y"])])
        );
        assert_eq!(Agent::parse("(p x)")?, Agent::input("p", ["x"]));
        assert_eq!(
            Agent::parse("(x y)(p x y)")?,
            Agent::scope(["x", "y"], Agent::input("p", ["x", "y"]))
        );
        assert_eq!(
            Agent::parse("(x) 0")?,
            Agent::scope(["x"], Agent::Inaction)
        );
        assert_eq!(
            Agent::parse("!(p x)")?,
            Agent::replication(Agent::input("p", ["x"]))
        );
        assert_eq!(
            Agent::parse("!!(x)(p x | q)")?,
            Agent::replication(Agent::replication(Agent::scope(
                ["x"],
                Agent::composition([Agent::input("p", ["x"]), Agent::input("q", Vec::<Name>::new())])
            )))
        );
        Ok(())
    }

    #[test]
    fn scope_or_composition() -> anyhow::Result<()> {
        // a list of names with nothing after it is a solo
        assert_eq!(Agent::parse("(p x y)")?, Agent::input("p", ["x", "y"]));
        assert_eq!(
            Agent::parse("((x)(p x) | q)")?,
            Agent::composition([
                Agent::scope(["x"], Agent::input("p", ["x"])),
                Agent::input("q", Vec::<Name>::new())
            ])
        );
        Ok(())
    }

    #[test]
    fn malformed_terms() {
        for s in ["", "(", "u x |", "(u x | )", "^", "X y", "u x)", "!", "(x y)(", "1"] {
            assert!(Agent::parse(s).is_err(), "{s} should not parse");
        }
    }
}
