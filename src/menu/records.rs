// 메뉴 1-4: 새 레코드 추가. 키 할당 -> 입력 검증 -> 삽입 순서.

use super::{Session, existing};
use crate::database::Statement;
use crate::error::{AppErr, Result};
use crate::existence::Reference;
use crate::input::parse;
use crate::var_char::{Airport, FullName, Make, Model, Nationality};
use crate::workflow::{InsertOutcome, Step, Workflow};
use std::io::{BufRead, Write};
use tracing::info;

pub const MAX_SEATS: i64 = 499;

struct PlaneFields {
    age: i64,
    seats: i64,
    make: Make,
    model: Model,
}

struct FlightFields {
    cost: i64,
    num_sold: i64,
    num_stops: i64,
    departure_date: String,
    arrival_date: String,
    arrival_airport: Airport,
    departure_airport: Airport,
}

struct FlightInfoFields {
    flight_id: i64,
    pilot_id: Option<i64>,
    plane_id: Option<i64>,
}

pub fn add_plane<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let mut wf = Workflow::start("add plane");
    let id = wf.check(s.ids.next_id(s.db, "Plane", "id"))?;
    wf.advance(Step::IdAllocated)?;

    let fields = wf.check(read_plane(s))?;
    wf.advance(Step::FieldsValidated)?;

    let insert = Statement::new(
        "INSERT INTO Plane (id, make, model, age, seats) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(fields.make)
    .bind(fields.model)
    .bind(fields.age)
    .bind(fields.seats);
    insert_single(s, &mut wf, &insert)?;
    s.prompter.say(format!("Plane {id} added."))
}

fn read_plane<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<PlaneFields> {
    let p = &mut s.prompter;
    let age = p.read_validated("Please enter age of plane:", parse::non_negative)?;
    let seats = p.read_validated(
        &format!("Please enter number of seats (0-{MAX_SEATS}):"),
        parse::in_range(0, MAX_SEATS),
    )?;
    let make: Make = p.read_validated("Please enter the make of the plane:", parse::text)?;
    let model: Model = p.read_validated("Please enter the model of the plane:", parse::text)?;
    Ok(PlaneFields {
        age,
        seats,
        make,
        model,
    })
}

pub fn add_pilot<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let mut wf = Workflow::start("add pilot");
    let id = wf.check(s.ids.next_id(s.db, "Pilot", "id"))?;
    wf.advance(Step::IdAllocated)?;

    let (name, nationality) = wf.check(read_pilot(s))?;
    wf.advance(Step::FieldsValidated)?;

    let insert = Statement::new("INSERT INTO Pilot (id, fullname, nationality) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(name)
        .bind(nationality);
    insert_single(s, &mut wf, &insert)?;
    s.prompter.say(format!("Pilot {id} added."))
}

fn read_pilot<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<(FullName, Nationality)> {
    let p = &mut s.prompter;
    let name: FullName = p.read_validated("Please enter the Pilot's full name:", parse::text)?;
    let nationality: Nationality = p.read_validated("Please enter the nationality of the Pilot:", parse::text)?;
    Ok((name, nationality))
}

pub fn add_technician<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let mut wf = Workflow::start("add technician");
    let id = wf.check(s.ids.next_id(s.db, "Technician", "id"))?;
    wf.advance(Step::IdAllocated)?;

    let name: FullName = wf.check(s.prompter.read_validated(
        "Please enter the full name of this new technician:",
        parse::text,
    ))?;
    wf.advance(Step::FieldsValidated)?;

    let insert = Statement::new("INSERT INTO Technician (id, full_name) VALUES (?1, ?2)")
        .bind(id)
        .bind(name);
    insert_single(s, &mut wf, &insert)?;
    s.prompter.say(format!("Technician {id} added."))
}

/// Adds a flight and its flight info as one dependent insert.
pub fn add_flight<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let mut wf = Workflow::start("add flight");
    let fnum = wf.check(s.ids.next_id(s.db, "Flight", "fnum"))?;
    wf.advance(Step::IdAllocated)?;
    let fiid = wf.check(s.ids.next_id(s.db, "FlightInfo", "fiid"))?;
    wf.advance(Step::IdAllocated)?;

    let flight = wf.check(read_flight(s))?;
    let info = wf.check(read_flight_info(s, fnum))?;
    wf.advance(Step::FieldsValidated)?;

    let primary = Statement::new(
        "INSERT INTO Flight (fnum, cost, num_sold, num_stops, actual_departure_date, \
         actual_arrival_date, arrival_airport, departure_airport) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(fnum)
    .bind(flight.cost)
    .bind(flight.num_sold)
    .bind(flight.num_stops)
    .bind(flight.departure_date)
    .bind(flight.arrival_date)
    .bind(flight.arrival_airport)
    .bind(flight.departure_airport);
    let dependent = Statement::new(
        "INSERT INTO FlightInfo (fiid, flight_id, pilot_id, plane_id) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(fiid)
    .bind(info.flight_id)
    .bind(info.pilot_id)
    .bind(info.plane_id);
    let reference = Reference::new("Flight", "fnum", info.flight_id);

    let outcome =
        s.coordinator
            .insert_checked(s.db, &mut wf, &primary, Some(&reference), &dependent);
    info!(fnum, fiid, ?outcome, "add flight finished");
    match outcome {
        InsertOutcome::Inserted => s
            .prompter
            .say(format!("Flight {fnum} added with flight info {fiid}.")),
        InsertOutcome::DependentSkipped => s.prompter.say(format!(
            "Flight {fnum} added. Flight {} does not exist, flight info was not added.",
            info.flight_id
        )),
        InsertOutcome::Failed => s.prompter.say(format!(
            "Error: {}",
            wf.failure().unwrap_or("flight was not added")
        )),
    }
}

fn read_flight<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<FlightFields> {
    let p = &mut s.prompter;
    let date = parse::date(&s.date_format);
    let cost = p.read_validated("Please enter the cost of the flight:", parse::non_negative)?;
    let num_sold = p.read_validated(
        "Please enter the number of tickets sold for this flight:",
        parse::non_negative,
    )?;
    let num_stops = p.read_validated(
        "Please enter the number of stops for this flight:",
        parse::non_negative,
    )?;
    let departure = p.read_validated(
        &format!("Please enter the actual departure date ({}):", s.date_format),
        &date,
    )?;
    let arrival = p.read_validated(
        &format!("Please enter the actual arrival date ({}):", s.date_format),
        &date,
    )?;
    let arrival_airport: Airport = p.read_validated("Please enter the arrival airport:", parse::text)?;
    let departure_airport: Airport = p.read_validated("Please enter the departure airport:", parse::text)?;
    // 저장 형식은 입력 형식과 관계없이 ISO 날짜
    Ok(FlightFields {
        cost,
        num_sold,
        num_stops,
        departure_date: departure.format(parse::DATE_FORMAT).to_string(),
        arrival_date: arrival.format(parse::DATE_FORMAT).to_string(),
        arrival_airport,
        departure_airport,
    })
}

fn read_flight_info<R: BufRead, W: Write>(
    s: &mut Session<'_, R, W>,
    fnum: i64,
) -> Result<FlightInfoFields> {
    let (db, checker) = (s.db, s.checker);
    let flight_id = s.prompter.read_validated(
        &format!("Please enter the flight number for flight info (blank for {fnum}):"),
        |line| {
            if line.trim().is_empty() {
                return Ok(fnum);
            }
            let n = parse::non_negative(line)?;
            if n == fnum || checker.exists(db, "Flight", "fnum", n)? {
                Ok(n)
            } else {
                Err(AppErr::Validation(format!("no Flight with fnum {n}")))
            }
        },
    )?;
    let pilot_id = s.prompter.read_validated(
        "Please enter the pilot id (blank for none):",
        parse::optional(existing(db, &checker, "Pilot", "id")),
    )?;
    let plane_id = s.prompter.read_validated(
        "Please enter the plane id (blank for none):",
        parse::optional(existing(db, &checker, "Plane", "id")),
    )?;
    Ok(FlightInfoFields {
        flight_id,
        pilot_id,
        plane_id,
    })
}

fn insert_single<R: BufRead, W: Write>(
    s: &mut Session<'_, R, W>,
    wf: &mut Workflow,
    insert: &Statement,
) -> Result<()> {
    wf.check(s.db.execute_update(insert))?;
    wf.advance(Step::PrimaryInserted)?;
    wf.advance(Step::Done)
}
