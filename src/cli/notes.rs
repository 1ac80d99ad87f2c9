use std::{fmt::Display, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};

use crate::{
    state::notes::NoteLog,
    utils::{dir::{AppPaths, create_application_default_path}, time::date_to_folder_name},
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct NotesCommand {
    #[arg(
        long = "day",
        short,
        help = "Day to print. Examples are \"yesterday\", \"15/03/2025\". Defaults to today"
    )]
    day: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(long, help = "Application directory")]
    dir: Option<PathBuf>,
}

/// Command to print the focus note log for a single day.
pub async fn process_notes_command(
    NotesCommand {
        day,
        date_style,
        dir,
    }: NotesCommand,
) -> Result<()> {
    let now = Local::now();
    let dialect: chrono_english::Dialect = date_style.into();
    let day = match day.map(|s| parse_date_string(&s, now, dialect)) {
        Some(Ok(v)) => v.date_naive(),
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate day {e}"),
                )
                .into());
        }
        None => now.date_naive(),
    };

    let paths = AppPaths::new(dir.map_or_else(create_application_default_path, Ok)?);
    let lines = NoteLog::new(paths.daily_notes_dir()).read_day(day).await?;

    if lines.is_empty() {
        println!("No notes for {}", date_to_folder_name(day));
        return Ok(());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
