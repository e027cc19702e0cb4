// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use jiff::tz::TimeZone;
use tidecal_core::{EncodeOutput, FieldSet, HandleMethod, MasterEvent, decode, encode};

use crate::util::{arg_file, arg_tz, get_file, get_tz, read_calendar, resolve_tz};

#[derive(Debug, Clone)]
pub struct CmdExport {
    pub file: PathBuf,
    pub cancel: bool,
    pub tz: Option<String>,
}

impl CmdExport {
    pub const NAME: &str = "export";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Re-encode the events of a file as calendar text")
            .arg(arg_file())
            .arg(arg!(--cancel "Write a cancellation with the minimal field set"))
            .arg(arg_tz())
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            file: get_file(matches)?,
            cancel: matches.get_flag("cancel"),
            tz: get_tz(matches),
        })
    }

    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "exporting events...");
        let zone = resolve_tz(self.tz.as_deref())?;
        let text = read_calendar(&self.file).await?;
        let output = self.export(&text, &zone)?;

        for warning in &output.warnings {
            eprintln!("{} {}", "Warning:".yellow(), warning);
        }
        print!("{}", output.text);
        Ok(())
    }

    fn export(&self, text: &str, zone: &TimeZone) -> Result<EncodeOutput, Box<dyn Error>> {
        let events: Vec<MasterEvent> = decode(text, HandleMethod::AddUpdate, zone)?
            .into_iter()
            .map(|d| d.event)
            .collect();

        let fields = match self.cancel {
            true => FieldSet::CANCEL,
            false => FieldSet::AllFields,
        };
        Ok(encode(&events, fields)?)
    }
}
