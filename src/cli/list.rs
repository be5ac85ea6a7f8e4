use clap::Args;
use colored::Colorize;
use tabled::{
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};

use super::error::CliError;
use super::ui;
use crate::command::catalog;

#[derive(Debug, Args)]
pub struct List {}

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "Operation")]
    operation: String, // Use String to hold colored output
    #[tabled(rename = "AWS command")]
    aws: String,
    #[tabled(rename = "Confirms")]
    confirms: &'static str,
    #[tabled(rename = "Summary")]
    summary: &'static str,
}

impl List {
    pub fn run(&self) -> Result<(), CliError> {
        let rows: Vec<OperationRow> = catalog::entries()
            .iter()
            .map(|spec| OperationRow {
                operation: ui::format_highlight(&format!("{} {}", spec.service, spec.verb)),
                aws: format!("aws {} {}", spec.aws_service, spec.aws_operation),
                confirms: if spec.destructive { "yes" } else { "" },
                summary: spec.summary,
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::blank())
            .with(Modify::new(Rows::first()).with(Color::FG_GREEN))
            .with(
                Modify::new(Rows::first())
                    .with(tabled::settings::Format::content(|s| s.bold().to_string())),
            );
        println!("{}", table);
        Ok(())
    }
}
