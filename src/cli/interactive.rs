//! Prompt driven session. Each command maps to one of the controller's
//! events and the table is printed again whenever it changes.

use super::ui;
use crate::core::{Controller, FetchOutcome, RateProvider};
use anyhow::Result;
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  base CODE      switch the base currency
  amount VALUE   set the amount to convert
  add CODE       show a currency
  remove CODE    hide a currency
  refresh        fetch rates again
  list           list available currencies
  show           print the table
  help           show this help
  quit           leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Base(String),
    /// Raw amount input, parsed leniently by the controller.
    Amount(String),
    Add(String),
    Remove(String),
    Refresh,
    List,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let code = |arg: Option<&str>| {
            arg.map(str::to_uppercase)
                .ok_or_else(|| format!("'{name}' needs a currency code"))
        };

        match name.as_str() {
            "base" => code(arg).map(Command::Base),
            "amount" => Ok(Command::Amount(arg.unwrap_or_default().to_string())),
            "add" => code(arg).map(Command::Add),
            "remove" | "rm" => code(arg).map(Command::Remove),
            "refresh" => Ok(Command::Refresh),
            "list" | "currencies" => Ok(Command::List),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(format!("Unknown command '{name}', type 'help' for a list")),
        }
    }
}

fn print_table<P: RateProvider, W: Write>(controller: &Controller<P>, out: &mut W) -> Result<()> {
    writeln!(out, "{}", ui::rates_table(controller.state(), controller.rows()))?;
    Ok(())
}

/// Applies one command, returning `false` once the session should end.
pub async fn handle<P: RateProvider, W: Write>(
    controller: &mut Controller<P>,
    command: Command,
    out: &mut W,
) -> Result<bool> {
    match command {
        Command::Base(code) => {
            let result = ui::with_spinner("Fetching rates...", controller.set_base(&code)).await;
            match result {
                Ok(()) => print_table(controller, out)?,
                Err(e) => writeln!(out, "{}", ui::alert(&e.to_string()))?,
            }
        }
        Command::Amount(input) => {
            controller.set_amount_input(&input);
            print_table(controller, out)?;
        }
        Command::Add(code) => {
            if controller.add_currency(&code) {
                print_table(controller, out)?;
            } else {
                writeln!(out, "{code} is already shown")?;
            }
        }
        Command::Remove(code) => {
            if controller.remove_currency(&code) {
                print_table(controller, out)?;
            } else {
                writeln!(out, "{code} is not shown")?;
            }
        }
        Command::Refresh => {
            let result = ui::with_spinner("Fetching rates...", controller.refresh()).await;
            match result {
                Ok(FetchOutcome::Applied) => print_table(controller, out)?,
                Ok(FetchOutcome::Stale) => {}
                Err(e) => writeln!(out, "{}", ui::alert(&e.to_string()))?,
            }
        }
        Command::List => writeln!(out, "{}", ui::options_list(controller.options(), 10))?,
        Command::Show => print_table(controller, out)?,
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// Runs a session reading commands from `input` until it ends or `quit`.
pub async fn run_session<P, R, W>(controller: &mut Controller<P>, input: R, out: &mut W) -> Result<()>
where
    P: RateProvider,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    handle(controller, Command::Refresh, out).await?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if !handle(controller, command, out).await? {
                    break;
                }
            }
            Err(message) => writeln!(out, "{}", ui::alert(&message))?,
        }
    }
    writeln!(out)?;
    Ok(())
}

pub async fn run<P: RateProvider>(controller: &mut Controller<P>) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    writeln!(stdout, "Type 'help' for a list of commands.")?;
    run_session(controller, stdin, &mut stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!("base inr".parse::<Command>(), Ok(Command::Base("INR".to_string())));
        assert_eq!(" ADD usd ".parse::<Command>(), Ok(Command::Add("USD".to_string())));
        assert_eq!("rm GBP".parse::<Command>(), Ok(Command::Remove("GBP".to_string())));
        assert_eq!("amount 12.5".parse::<Command>(), Ok(Command::Amount("12.5".to_string())));
        assert_eq!("amount".parse::<Command>(), Ok(Command::Amount(String::new())));
        assert_eq!("refresh".parse::<Command>(), Ok(Command::Refresh));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_command_errors() {
        let missing: Result<Command, String> = "base".parse();
        assert_eq!(missing, Err("'base' needs a currency code".to_string()));

        let unknown: Result<Command, String> = "swap".parse();
        assert!(unknown.unwrap_err().contains("Unknown command 'swap'"));
    }
}
