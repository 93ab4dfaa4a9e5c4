#![allow(missing_docs)]

//! Interactive command loop.

use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
    character::CharacterManager, crafting::CraftingEngine, error::CommandError,
    store::DocumentStore,
};

const COMMAND_PROMPT: &str =
    "Enter a command (add, heal, damage, remove, display, craft, addMoney, addMateria, exit): ";

/// Command words understood by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Heal,
    Damage,
    Remove,
    Display,
    Craft,
    AddMoney,
    AddMateria,
    Exit,
}

impl Command {
    /// Prompt for the single follow-up argument, if the command takes one.
    pub fn argument_prompt(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("Enter item name: "),
            Self::Heal => Some("Enter HP to restore: "),
            Self::Damage => Some("Enter damage to deal: "),
            Self::Remove => Some("Enter item name to remove: "),
            Self::Craft => Some("Enter recipe name to craft: "),
            Self::AddMoney => Some("Enter amount of money to add: "),
            Self::AddMateria => Some("Enter amount of materia to add: "),
            Self::Display | Self::Exit => None,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "add" => Ok(Self::Add),
            "heal" => Ok(Self::Heal),
            "damage" => Ok(Self::Damage),
            "remove" => Ok(Self::Remove),
            "display" => Ok(Self::Display),
            "craft" => Ok(Self::Craft),
            "addMoney" => Ok(Self::AddMoney),
            "addMateria" => Ok(Self::AddMateria),
            "exit" => Ok(Self::Exit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

/// Parse a non-negative integer amount.
pub fn parse_amount(raw: &str) -> Result<i64, CommandError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|amount| *amount >= 0)
        .ok_or_else(|| CommandError::InvalidAmount(raw.trim().to_string()))
}

/// Text printed after a successful command.
struct Reply {
    persisted: bool,
    text: String,
}

impl Reply {
    fn saved(text: String) -> Self {
        Self {
            persisted: true,
            text,
        }
    }
}

/// Line-oriented prompt loop over any reader/writer pair.
pub struct Shell<R, W, S> {
    input: R,
    output: W,
    characters: CharacterManager<S>,
}

impl<R: BufRead, W: Write, S: DocumentStore> Shell<R, W, S> {
    pub fn new(input: R, output: W, characters: CharacterManager<S>) -> Self {
        Self {
            input,
            output,
            characters,
        }
    }

    /// Process commands until `exit` or end of input.
    ///
    /// Rejected commands are reported and the loop continues; storage
    /// failures are returned to the caller.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(line) = self.prompt(COMMAND_PROMPT)? else {
                break;
            };
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    debug!("{err}");
                    writeln!(self.output, "Unknown command.")?;
                    continue;
                }
            };

            let argument = match command.argument_prompt() {
                Some(text) => match self.prompt(text)? {
                    Some(value) => value,
                    None => break,
                },
                None => String::new(),
            };

            debug!(?command, "Executing command");
            match self.execute(command, &argument) {
                Ok(None) => break,
                Ok(Some(reply)) => {
                    if reply.persisted {
                        writeln!(self.output, "Data saved.")?;
                    }
                    writeln!(self.output, "{}", reply.text)?;
                }
                Err(CommandError::Storage(err)) => return Err(err),
                Err(err) => self.report(&err)?,
            }
        }

        writeln!(self.output, "Program finished.")?;
        self.output.flush()?;
        Ok(())
    }

    /// Run one command; `None` ends the session.
    fn execute(&self, command: Command, argument: &str) -> Result<Option<Reply>, CommandError> {
        let characters = &self.characters;
        let reply = match command {
            Command::Add => {
                characters.add_item(argument)?;
                Reply::saved(format!("Item \"{argument}\" added to inventory."))
            }
            Command::Remove => {
                characters.remove_item(argument)?;
                Reply::saved(format!("Item \"{argument}\" removed from inventory."))
            }
            Command::Heal => {
                let hp = characters.heal(parse_amount(argument)?)?;
                Reply::saved(format!("HP restored. Current HP: {hp}."))
            }
            Command::Damage => {
                let hp = characters.damage(parse_amount(argument)?)?;
                Reply::saved(format!("Damage taken. Current HP: {hp}."))
            }
            Command::AddMoney => {
                let money = characters.add_money(parse_amount(argument)?)?;
                Reply::saved(format!("Money added. Balance: {money}."))
            }
            Command::AddMateria => {
                characters.add_materia(parse_amount(argument)?)?;
                Reply::saved("Resources added.".to_string())
            }
            Command::Craft => {
                let item = CraftingEngine::new(characters).craft(argument)?;
                Reply::saved(format!("Item \"{item}\" crafted."))
            }
            Command::Display => {
                let state = characters.display()?;
                let rendered = serde_json::to_string_pretty(&state)
                    .context("failed to render character data")?;
                Reply {
                    persisted: false,
                    text: format!("Character data:\n{rendered}"),
                }
            }
            Command::Exit => return Ok(None),
        };
        Ok(Some(reply))
    }

    fn report(&mut self, err: &CommandError) -> Result<()> {
        match err {
            CommandError::InsufficientResources { shortfalls, .. } => {
                for shortfall in shortfalls {
                    writeln!(self.output, "{shortfall}")?;
                }
            }
            other => writeln!(self.output, "Error: {other}.")?,
        }
        Ok(())
    }

    /// Print `text` and read one line; `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).context("failed to read input")? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}
