// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::error::Error;
use std::path::PathBuf;

use clap::{ArgMatches, Command, arg};
use colored::{Color, Colorize};
use tidecal_core::{
    Config as CoreConfig, EventHandle, HandleMethod, HandleStatus, IngestionHandler, PersistPlan,
};

use crate::store::DirStore;
use crate::table::{Table, TableColumn, TableStyleBasic};
use crate::util::{arg_file, get_file, read_calendar};

#[derive(Debug, Clone)]
pub struct CmdImport {
    pub file: PathBuf,
    pub force: bool,
    pub cancel: bool,
}

impl CmdImport {
    pub const NAME: &str = "import";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Reconcile the events of a file with the calendar directory")
            .arg(arg_file())
            .arg(arg!(-f --force "Persist events flagged with warnings, e.g. outdated updates"))
            .arg(arg!(--cancel "Treat every event of the file as a cancellation"))
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            file: get_file(matches)?,
            force: matches.get_flag("force"),
            cancel: matches.get_flag("cancel"),
        })
    }

    pub async fn run(self, config: &CoreConfig) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "importing events...");
        let text = read_calendar(&self.file).await?;

        // the directory store reads and writes files synchronously
        let core = config.clone();
        let (handler, plan, executed) =
            tokio::task::spawn_blocking(move || self.import(&core, &text))
                .await?
                .map_err(|err| err as Box<dyn Error>)?;

        print!(
            "{}",
            Table::new(TableStyleBasic::new(), &HANDLE_COLUMNS, handler.handles())
        );
        match executed {
            0 => println!("{}", "Nothing to persist.".yellow()),
            n => {
                for action in &plan.actions {
                    println!("  {action}");
                }
                println!("{} {n} change(s) written to {}", "Done:".green(), config.calendar_path.display());
            }
        }
        Ok(())
    }

    fn import(
        &self,
        config: &CoreConfig,
        text: &str,
    ) -> Result<(IngestionHandler, PersistPlan, usize), Box<dyn Error + Send + Sync>> {
        let zone = config.time_zone()?;
        let method = match self.cancel {
            true => HandleMethod::Cancel,
            false => HandleMethod::AddUpdate,
        };

        let mut handler = IngestionHandler::new(config.calendar(), zone.clone());
        handler.try_read_ical(text, method)?;

        let mut store = DirStore::open(&config.calendar_path, zone)?;
        handler.validate(&store)?;
        let plan = handler.persist(self.force)?;
        let executed = plan.execute(&mut store)?;
        Ok((handler, plan, executed))
    }
}

const HANDLE_COLUMNS: [HandleColumn; 4] = [
    HandleColumn::Status,
    HandleColumn::Method,
    HandleColumn::Uid,
    HandleColumn::Issues,
];

#[derive(Debug, Clone, Copy)]
enum HandleColumn {
    Status,
    Method,
    Uid,
    Issues,
}

impl TableColumn<EventHandle> for HandleColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            HandleColumn::Status => "Status",
            HandleColumn::Method => "Method",
            HandleColumn::Uid => "UID",
            HandleColumn::Issues => "Issues",
        }
        .into()
    }

    fn format<'a>(&self, data: &'a EventHandle) -> Cow<'a, str> {
        match self {
            HandleColumn::Status => match data.status() {
                HandleStatus::Parsed => "parsed",
                HandleStatus::Validated => "validated",
                HandleStatus::Accepted => "accepted",
                HandleStatus::Rejected => "rejected",
            }
            .into(),
            HandleColumn::Method => data.method().to_string().into(),
            HandleColumn::Uid => data.event().uid().into(),
            HandleColumn::Issues => data
                .errors()
                .iter()
                .map(|e| e.code())
                .chain(data.warnings().iter().map(|w| w.code()))
                .collect::<Vec<_>>()
                .join(", ")
                .into(),
        }
    }

    fn color(&self, data: &EventHandle) -> Option<Color> {
        match (self, data.status()) {
            (HandleColumn::Status, HandleStatus::Accepted) => Some(Color::Green),
            (HandleColumn::Status, HandleStatus::Rejected) => Some(Color::Red),
            (HandleColumn::Issues, _) if !data.errors().is_empty() => Some(Color::Red),
            (HandleColumn::Issues, _) => Some(Color::Yellow),
            _ => None,
        }
    }
}
