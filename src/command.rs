//! Terminal commands
//!
//! Every line typed into the terminal front-end is parsed into a `Command`.
//! Positions are 1-based as printed on screen and stored as indices.

use crate::navigation::Tab;
use clap::{Parser, Subcommand};

/// A typed line: its first word names the command.
#[derive(Debug, Parser)]
#[command(multicall = true)]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Switch the home tab
    Tab {
        #[arg(value_enum, ignore_case = true)]
        tab: Tab,
    },

    /// Open an item of the grid
    Open {
        /// Position in the grid, starting at 1
        #[arg(value_name = "N", value_parser = parse_position)]
        index: usize,
    },

    /// Open the featured item
    Featured,

    /// Jump the carousel to a slide
    Dot {
        /// Slide number, starting at 1
        #[arg(value_name = "N", value_parser = parse_position)]
        index: usize,
    },

    /// Drag the carousel (100 = one slide)
    Scroll {
        #[arg(value_parser = parse_offset, allow_negative_numbers = true)]
        offset: f32,
    },

    /// Pause the carousel
    Hold,

    /// Resume the carousel
    Release,

    /// Pick a season
    Season { number: u32 },

    /// Pick an episode of the active season
    Episode { number: u32 },

    /// Return to the home tab
    Back,

    /// Jump to a location, e.g. /series/<id>, /film/<id>, /?tab=WHY
    Goto { location: String },

    /// Print the current location
    Where,

    /// Exit
    #[command(visible_aliases = ["exit", "q"])]
    Quit,
}

impl Command {
    /// Parses a typed line. Returns `Ok(None)` for blank lines.
    ///
    /// `help` and `<command> --help` come back as an error carrying the help
    /// text, like every other parse failure.
    pub fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }

        let parsed = CommandLine::try_parse_from(words)?;
        Ok(Some(parsed.command))
    }
}

/// Parses a 1-based position and converts it to an index.
fn parse_position(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err("expected a position starting at 1".to_string()),
    }
}

fn parse_offset(value: &str) -> Result<f32, String> {
    match value.parse::<f32>() {
        Ok(offset) if offset.is_finite() && offset >= 0.0 => Ok(offset),
        _ => Err("expected a non-negative offset".to_string()),
    }
}
