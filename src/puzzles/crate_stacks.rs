use once_cell::sync::Lazy;
use regex::Regex;
use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::{debug, warn};

use crate::puzzles::puzzle::{Answers, CrateStacksSnafu, PuzzleError, PuzzleTrait};

static CRATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([A-Z])\]").expect("crate pattern is valid"));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("number pattern is valid"));
static MOVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^move (?<count>\d+) from (?<from>\d+) to (?<to>\d+)$")
        .expect("move pattern is valid")
});

/// Every crate in the drawing takes this many characters, separator included.
const CRATE_WIDTH: usize = 4;

/// Simulates a crane rearranging stacks of crates and reports the crates left on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateStacks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crane {
    /// Lifts one crate per step, so a moved pile ends up reversed.
    OneAtATime,
    /// Lifts the whole pile at once, keeping its order.
    AllAtOnce,
}

/// A `move` instruction with 1-based stack labels as written in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub count: usize,
    pub from: usize,
    pub to: usize,
}

/// Crate stacks, each listed bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stacks(Vec<Vec<char>>);

impl Stacks {
    fn index(&self, label: usize) -> Result<usize, CrateStacksError> {
        let stacks = self.0.len();
        label
            .checked_sub(1)
            .filter(|&index| index < stacks)
            .ok_or(CrateStacksError::UnknownStack { label, stacks })
    }

    pub fn apply(&mut self, step: Move, crane: Crane) -> Result<(), CrateStacksError> {
        let from = self.index(step.from)?;
        let to = self.index(step.to)?;
        let available = self.0[from].len();
        ensure!(
            available >= step.count,
            NotEnoughCratesSnafu {
                requested: step.count,
                available,
                label: step.from,
            }
        );

        let mut lifted = self.0[from].split_off(available - step.count);
        if crane == Crane::OneAtATime {
            lifted.reverse();
        }
        self.0[to].extend(lifted);
        Ok(())
    }

    /// The top crate of every non-empty stack, left to right.
    pub fn top_crates(&self) -> String {
        self.0.iter().filter_map(|stack| stack.last()).collect()
    }
}

/// Splits the input into the starting stacks and the list of moves.
///
/// The drawing ends at the line of stack labels; only moves after it are read. Other lines
/// are skipped.
pub fn parse_plan(input: &str) -> Result<(Stacks, Vec<Move>), CrateStacksError> {
    let mut lines = input.lines();
    let mut rows: Vec<Vec<(usize, char)>> = Vec::new();

    let stack_count = loop {
        let line = lines.next().context(MissingStackLabelsSnafu)?;
        let labels = NUMBER.find_iter(line).count();
        if labels > 0 {
            break labels;
        }
        rows.push(
            CRATE
                .captures_iter(line)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let mark = caps.get(1)?.as_str().chars().next()?;
                    Some((whole.start() / CRATE_WIDTH, mark))
                })
                .collect(),
        );
    };

    let mut stacks = vec![Vec::new(); stack_count];
    for row in rows.iter().rev() {
        for &(column, mark) in row {
            match stacks.get_mut(column) {
                Some(stack) => stack.push(mark),
                None => warn!(
                    "Crate [{}] in column {} is outside the {} labelled stacks, dropping it",
                    mark,
                    column + 1,
                    stack_count
                ),
            }
        }
    }

    let moves = lines.filter_map(parse_move).collect::<Vec<_>>();
    debug!("Parsed {} stacks and {} moves", stack_count, moves.len());

    Ok((Stacks(stacks), moves))
}

fn parse_move(line: &str) -> Option<Move> {
    let caps = MOVE.captures(line.trim_end())?;
    let number = |name: &str| caps.name(name)?.as_str().parse::<usize>().ok();
    let parsed = Move {
        count: number("count")?,
        from: number("from")?,
        to: number("to")?,
    };
    Some(parsed)
}

/// Runs every move with the given crane and returns the final stacks.
pub fn rearrange(
    mut stacks: Stacks,
    moves: &[Move],
    crane: Crane,
) -> Result<Stacks, CrateStacksError> {
    for step in moves {
        stacks.apply(*step, crane)?;
    }
    Ok(stacks)
}

impl PuzzleTrait for CrateStacks {
    fn name(&self) -> &'static str {
        "crate-stacks"
    }

    fn solve(&self, input: &str) -> Result<Answers, PuzzleError> {
        let (stacks, moves) = parse_plan(input).context(CrateStacksSnafu)?;

        let single =
            rearrange(stacks.clone(), &moves, Crane::OneAtATime).context(CrateStacksSnafu)?;
        let batched = rearrange(stacks, &moves, Crane::AllAtOnce).context(CrateStacksSnafu)?;

        Ok(Answers::new(single.top_crates(), batched.top_crates()))
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum CrateStacksError {
    #[snafu(display("The drawing has no line of stack labels"))]
    MissingStackLabels,
    #[snafu(display("There is no stack {} (only {} stacks)", label, stacks))]
    UnknownStack { label: usize, stacks: usize },
    #[snafu(display(
        "Action not allowed, trying to move {} crates from stack {} holding {}",
        requested,
        label,
        available
    ))]
    NotEnoughCrates {
        requested: usize,
        available: usize,
        label: usize,
    },
}
