use colored::Colorize;
use supports_color::Stream;

use crate::puzzles::Answers;

/// Enables colored answers only when stdout can show them.
pub fn configure_colors() {
    let enabled = supports_color::on(Stream::Stdout).is_some();
    colored::control::set_override(enabled);
}

pub fn render_answers(puzzle_name: &str, answers: &Answers) -> String {
    format!(
        "{}\n{} {}\n{} {}",
        puzzle_name.bold(),
        "Part 1:".dimmed(),
        answers.part_one.green().bold(),
        "Part 2:".dimmed(),
        answers.part_two.green().bold(),
    )
}
