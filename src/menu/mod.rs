/*
Main menu

    1. Add Plane                 6. List number of available seats for a given flight
    2. Add Pilot                 7. List total number of repairs per plane
    3. Add Flight                8. List total number of repairs per year
    4. Add Technician            9. Find total number of passengers with a given status
    5. Book Flight              10. < EXIT

1-4 create records (records.rs), 5-9 book and report (reports.rs).
A failed action prints its error and returns to the menu. Closing the
input stream ends the loop the same way as choosing 10.
*/

pub mod records;
pub mod render;
pub mod reports;

use crate::config::AppConfig;
use crate::database::Database;
use crate::error::{AppErr, Result};
use crate::existence::ExistenceChecker;
use crate::ids::IdAllocator;
use crate::input::Prompter;
use crate::input::parse;
use crate::workflow::Coordinator;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    AddPlane = 1,
    AddPilot,
    AddFlight,
    AddTechnician,
    BookFlight,
    AvailableSeats,
    RepairsPerPlane,
    RepairsPerYear,
    PassengersWithStatus,
    Exit,
}

impl Choice {
    pub const ALL: [Choice; 10] = [
        Choice::AddPlane,
        Choice::AddPilot,
        Choice::AddFlight,
        Choice::AddTechnician,
        Choice::BookFlight,
        Choice::AvailableSeats,
        Choice::RepairsPerPlane,
        Choice::RepairsPerYear,
        Choice::PassengersWithStatus,
        Choice::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Choice::AddPlane => "Add Plane",
            Choice::AddPilot => "Add Pilot",
            Choice::AddFlight => "Add Flight",
            Choice::AddTechnician => "Add Technician",
            Choice::BookFlight => "Book Flight",
            Choice::AvailableSeats => "List number of available seats for a given flight.",
            Choice::RepairsPerPlane => {
                "List total number of repairs per plane in descending order"
            }
            Choice::RepairsPerYear => "List total number of repairs per year in ascending order",
            Choice::PassengersWithStatus => {
                "Find total number of passengers with a given status"
            }
            Choice::Exit => "< EXIT",
        }
    }
}

impl TryFrom<i64> for Choice {
    type Error = AppErr;

    fn try_from(value: i64) -> Result<Self> {
        Choice::ALL
            .into_iter()
            .find(|choice| *choice as i64 == value)
            .ok_or_else(|| AppErr::Validation(format!("there is no menu entry {value}")))
    }
}

/// Everything one menu action needs. The connection is borrowed for the
/// whole session and released by the caller.
pub struct Session<'db, R, W> {
    db: &'db Database,
    prompter: Prompter<R, W>,
    ids: Box<dyn IdAllocator>,
    checker: ExistenceChecker,
    coordinator: Coordinator,
    date_format: String,
}

impl<'db, R: BufRead, W: Write> Session<'db, R, W> {
    pub fn new(db: &'db Database, prompter: Prompter<R, W>, config: &AppConfig) -> Self {
        let checker = ExistenceChecker::new(config.existence.mode());
        let coordinator = Coordinator::new(config.insert.mode, checker);
        debug!(
            ids = ?config.ids.strategy,
            existence = ?checker.mode(),
            insert = ?coordinator.mode(),
            "session ready"
        );
        Self {
            db,
            prompter: prompter.with_max_retries(config.validation.max_retries),
            ids: config.ids.strategy.allocator(),
            checker,
            coordinator,
            date_format: config.validation.date_format.clone(),
        }
    }

    pub fn prompter(&mut self) -> &mut Prompter<R, W> {
        &mut self.prompter
    }

    fn dispatch(&mut self, choice: Choice) -> Result<()> {
        match choice {
            Choice::AddPlane => records::add_plane(self),
            Choice::AddPilot => records::add_pilot(self),
            Choice::AddFlight => records::add_flight(self),
            Choice::AddTechnician => records::add_technician(self),
            Choice::BookFlight => reports::book_flight(self),
            Choice::AvailableSeats => reports::available_seats(self),
            Choice::RepairsPerPlane => reports::repairs_per_plane(self),
            Choice::RepairsPerYear => reports::repairs_per_year(self),
            Choice::PassengersWithStatus => reports::passengers_with_status(self),
            Choice::Exit => Ok(()),
        }
    }
}

pub fn run<R: BufRead, W: Write>(session: &mut Session<'_, R, W>) -> Result<()> {
    loop {
        print_menu(&mut session.prompter)?;
        let choice = match session
            .prompter
            .read_unbounded("Please make your choice:", |line| {
                Choice::try_from(parse::integer(line)?)
            }) {
            Ok(choice) => choice,
            Err(e) if e.is_eof() => return Ok(()),
            Err(e) => return Err(e),
        };
        if choice == Choice::Exit {
            return Ok(());
        }

        info!(?choice, "menu action");
        match session.dispatch(choice) {
            Ok(()) => {}
            Err(e) if e.is_eof() => {
                info!("input closed during {:?}", choice);
                return Ok(());
            }
            Err(e) => {
                warn!(?choice, error = %e, "menu action failed");
                session.prompter.say(format!("Error: {e}"))?;
            }
        }
    }
}

fn print_menu<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<()> {
    prompter.say("MAIN MENU")?;
    prompter.say("---------")?;
    for choice in Choice::ALL {
        prompter.say(format!("{}. {}", choice as i64, choice.label()))?;
    }
    Ok(())
}

/// Parser accepting an id that already exists in `table.column`.
fn existing<'a>(
    db: &'a Database,
    checker: &'a ExistenceChecker,
    table: &'static str,
    column: &'static str,
) -> impl Fn(&str) -> Result<i64> + 'a {
    move |line| {
        let id = parse::non_negative(line)?;
        if checker.exists(db, table, column, id)? {
            Ok(id)
        } else {
            Err(AppErr::Validation(format!("no {table} with {column} {id}")))
        }
    }
}
