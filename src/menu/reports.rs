// 메뉴 5-9: 예약과 조회.

use super::{Session, existing, render};
use crate::database::{Database, Statement};
use crate::error::{AppErr, Result};
use crate::input::parse;
use crate::workflow::{Step, Workflow};
use std::fmt::Display;
use std::io::{BufRead, Write};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Waitlisted,
    Confirmed,
    Reserved,
}

impl Status {
    pub fn code(self) -> &'static str {
        match self {
            Status::Waitlisted => "W",
            Status::Confirmed => "C",
            Status::Reserved => "R",
        }
    }

    pub fn parse(line: &str) -> Result<Self> {
        match line.trim().to_uppercase().as_str() {
            "W" | "WAITLISTED" => Ok(Status::Waitlisted),
            "C" | "CONFIRMED" => Ok(Status::Confirmed),
            "R" | "RESERVED" => Ok(Status::Reserved),
            _ => Err(AppErr::Validation(
                "status must be W (waitlisted), C (confirmed) or R (reserved)".to_string(),
            )),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Status::Waitlisted => "waitlisted",
            Status::Confirmed => "confirmed",
            Status::Reserved => "reserved",
        };
        write!(f, "{label}")
    }
}

/// Plane capacity minus tickets sold and seats already held by reserved or
/// confirmed bookings. `None` when no plane is assigned to the flight.
pub fn seats_left(db: &Database, fnum: i64) -> Result<Option<i64>> {
    let stmt = Statement::new(
        "SELECT P.seats - F.num_sold - \
         (SELECT COUNT(*) FROM Reservation R WHERE R.fid = F.fnum AND R.status IN ('R', 'C')) \
         FROM Flight F \
         JOIN FlightInfo FI ON FI.flight_id = F.fnum \
         JOIN Plane P ON P.id = FI.plane_id \
         WHERE F.fnum = ?1 \
         ORDER BY FI.fiid LIMIT 1",
    )
    .bind(fnum);
    match db.query_scalar(&stmt)? {
        None => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| AppErr::Format {
            table: "Plane".to_string(),
            column: "seats".to_string(),
            value: raw,
        }),
    }
}

pub fn book_flight<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let mut wf = Workflow::start("book flight");
    let rnum = wf.check(s.ids.next_id(s.db, "Reservation", "rnum"))?;
    wf.advance(Step::IdAllocated)?;

    let (cid, fnum) = wf.check(read_booking(s))?;
    wf.advance(Step::FieldsValidated)?;

    let db = s.db;
    let left = wf.check(seats_left(db, fnum))?;
    let status = match left {
        Some(n) if n > 0 => Status::Reserved,
        _ => Status::Waitlisted,
    };
    let insert = Statement::new("INSERT INTO Reservation (rnum, cid, fid, status) VALUES (?1, ?2, ?3, ?4)")
        .bind(rnum)
        .bind(cid)
        .bind(fnum)
        .bind(status.code().to_string());
    wf.check(db.execute_update(&insert))?;
    wf.advance(Step::PrimaryInserted)?;
    wf.advance(Step::Done)?;
    info!(rnum, cid, fnum, %status, "reservation created");
    s.prompter.say(format!(
        "Reservation {rnum} for customer {cid} on flight {fnum} is {status}."
    ))
}

fn read_booking<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<(i64, i64)> {
    let (db, checker) = (s.db, s.checker);
    let cid = s
        .prompter
        .read_validated("Please enter the customer id:", existing(db, &checker, "Customer", "id"))?;
    let fnum = s
        .prompter
        .read_validated("Please enter the flight number:", existing(db, &checker, "Flight", "fnum"))?;
    Ok((cid, fnum))
}

pub fn available_seats<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let (db, checker) = (s.db, s.checker);
    let fnum = s
        .prompter
        .read_validated("Please enter the flight number:", existing(db, &checker, "Flight", "fnum"))?;
    let date = s.prompter.read_validated(
        &format!("Please enter the departure date ({}):", s.date_format),
        parse::date(&s.date_format),
    )?;
    let date = date.format(parse::DATE_FORMAT).to_string();

    let rows = db.execute_query(
        &Statement::new(
            "SELECT F.fnum AS flight, F.actual_departure_date AS departure, \
             P.seats AS capacity, F.num_sold AS sold, P.seats - F.num_sold AS available \
             FROM Flight F \
             JOIN FlightInfo FI ON FI.flight_id = F.fnum \
             JOIN Plane P ON P.id = FI.plane_id \
             WHERE F.fnum = ?1 AND F.actual_departure_date = ?2 \
             ORDER BY FI.fiid",
        )
        .bind(fnum)
        .bind(date.clone()),
    )?;
    if rows.is_empty() {
        return s.prompter.say(format!(
            "No plane is assigned to flight {fnum} departing on {date}."
        ));
    }
    s.prompter.say(render::table(&rows))
}

pub fn repairs_per_plane<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let rows = s.db.execute_query(&Statement::new(
        "SELECT P.id AS plane, COUNT(R.rid) AS repairs \
         FROM Plane P LEFT JOIN Repairs R ON R.plane_id = P.id \
         GROUP BY P.id \
         ORDER BY repairs DESC, plane",
    ))?;
    s.prompter.say(render::table(&rows))
}

pub fn repairs_per_year<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let rows = s.db.execute_query(&Statement::new(
        "SELECT strftime('%Y', repair_date) AS year, COUNT(*) AS repairs \
         FROM Repairs \
         GROUP BY year \
         ORDER BY repairs ASC, year",
    ))?;
    s.prompter.say(render::table(&rows))
}

pub fn passengers_with_status<R: BufRead, W: Write>(s: &mut Session<'_, R, W>) -> Result<()> {
    let status = s.prompter.read_validated(
        "Please enter the reservation status (W, C or R):",
        Status::parse,
    )?;
    let count = s
        .db
        .query_scalar(
            &Statement::new("SELECT COUNT(*) FROM Reservation WHERE status = ?1")
                .bind(status.code().to_string()),
        )?
        .unwrap_or_else(|| "0".to_string());
    s.prompter
        .say(format!("{count} passengers are {status}."))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::AppConfig;
    use crate::menu::run;
    use crate::menu::test::{count, db, output, session};

    fn seed(db: &Database) {
        db.execute_batch(
            "INSERT INTO Plane VALUES (0, 'Boeing', '737', 5, 2);
             INSERT INTO Plane VALUES (1, 'Airbus', 'A320', 2, 180);
             INSERT INTO Plane VALUES (2, 'Embraer', 'E190', 9, 100);
             INSERT INTO Flight VALUES (0, 300, 2, 0, '2024-05-01', '2024-05-01', 'LAX', 'SFO');
             INSERT INTO Flight VALUES (1, 450, 100, 1, '2024-05-02', '2024-05-03', 'JFK', 'LAX');
             INSERT INTO Flight VALUES (2, 150, 0, 0, '2024-05-04', '2024-05-04', 'SEA', 'PDX');
             INSERT INTO FlightInfo (fiid, flight_id, plane_id) VALUES (0, 0, 0);
             INSERT INTO FlightInfo (fiid, flight_id, plane_id) VALUES (1, 1, 1);
             INSERT INTO Customer (id, fname, lname, gtype, dob) VALUES (0, 'Ada', 'Lovelace', 'F', '1815-12-10');
             INSERT INTO Technician VALUES (0, 'Grace Hopper');
             INSERT INTO Repairs VALUES (0, '2022-03-01', 'ENG', NULL, 1, 0);
             INSERT INTO Repairs VALUES (1, '2023-07-11', 'HYD', NULL, 1, 0);
             INSERT INTO Repairs VALUES (2, '2023-09-30', 'AVI', NULL, 0, 0);
             INSERT INTO Repairs VALUES (3, '2023-10-02', 'ENG', NULL, 1, 0);",
        )
        .unwrap();
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(Status::parse("w").unwrap(), Status::Waitlisted);
        assert_eq!(Status::parse(" Confirmed ").unwrap(), Status::Confirmed);
        assert_eq!(Status::parse("R").unwrap().code(), "R");
        assert!(matches!(Status::parse("X"), Err(AppErr::Validation(_))));
    }

    #[test]
    fn test_seats_left() {
        let db = db();
        seed(&db);
        assert_eq!(seats_left(&db, 0).unwrap(), Some(0));
        assert_eq!(seats_left(&db, 1).unwrap(), Some(80));
        // 비행기가 배정되지 않은 항공편
        assert_eq!(seats_left(&db, 2).unwrap(), None);
    }

    #[test]
    fn test_book_flight_reserved_when_seats_left() {
        let db = db();
        seed(&db);
        let mut s = session(&db, "5\n0\n1\n10\n", &AppConfig::default());
        run(&mut s).unwrap();
        let status = db
            .query_scalar(&Statement::new("SELECT status FROM Reservation WHERE rnum = 0"))
            .unwrap();
        assert_eq!(status.as_deref(), Some("R"));
        assert!(output(&mut s).contains("Reservation 0 for customer 0 on flight 1 is reserved."));
    }

    #[test]
    fn test_book_full_flight_is_waitlisted() {
        let db = db();
        seed(&db);
        let mut s = session(&db, "5\n0\n0\n5\n0\n2\n10\n", &AppConfig::default());
        run(&mut s).unwrap();
        let rows = db
            .execute_query(&Statement::new("SELECT rnum, fid, status FROM Reservation ORDER BY rnum"))
            .unwrap();
        assert_eq!(
            rows.rows,
            vec![
                vec![Some("0".to_string()), Some("0".to_string()), Some("W".to_string())],
                vec![Some("1".to_string()), Some("2".to_string()), Some("W".to_string())],
            ]
        );
    }

    #[test]
    fn test_last_seat_goes_to_first_booking() {
        let db = db();
        seed(&db);
        db.execute_batch("UPDATE Flight SET num_sold = 1 WHERE fnum = 0").unwrap();
        let mut s = session(&db, "5\n0\n0\n5\n0\n0\n10\n", &AppConfig::default());
        run(&mut s).unwrap();
        let statuses = db
            .execute_query(&Statement::new("SELECT status FROM Reservation ORDER BY rnum"))
            .unwrap();
        assert_eq!(
            statuses.rows,
            vec![vec![Some("R".to_string())], vec![Some("W".to_string())]]
        );
    }

    #[test]
    fn test_confirmed_bookings_hold_seats() {
        let db = db();
        seed(&db);
        assert_eq!(seats_left(&db, 1).unwrap(), Some(80));
        db.execute_batch(
            "INSERT INTO Reservation VALUES (0, 0, 1, 'C');
             INSERT INTO Reservation VALUES (1, 0, 1, 'R');
             INSERT INTO Reservation VALUES (2, 0, 1, 'W');",
        )
        .unwrap();
        assert_eq!(seats_left(&db, 1).unwrap(), Some(78));
    }

    #[test]
    fn test_book_flight_unknown_customer_reprompts() {
        let db = db();
        seed(&db);
        let mut s = session(&db, "5\n9\n0\n1\n10\n", &AppConfig::default());
        run(&mut s).unwrap();
        assert_eq!(count(&db, "Reservation"), 1);
        assert!(output(&mut s).contains("no Customer with id 9"));
    }

    #[test]
    fn test_available_seats() {
        let db = db();
        seed(&db);
        let mut s = session(&db, "6\n1\n2024-05-02\n6\n1\n2024-05-09\n10\n", &AppConfig::default());
        run(&mut s).unwrap();
        let out = output(&mut s);
        assert!(out.contains("| flight | departure  | capacity | sold | available |"));
        assert!(out.contains("|   1    | 2024-05-02 |   180    | 100  |    80     |"));
        assert!(out.contains("No plane is assigned to flight 1 departing on 2024-05-09."));
    }

    #[test]
    fn test_repairs_per_plane_descending() {
        let db = db();
        seed(&db);
        let mut s = session(&db, "7\n10\n", &AppConfig::default());
        run(&mut s).unwrap();
        let out = output(&mut s);
        let one = out.find("|   1   |    3    |").unwrap();
        let zero = out.find("|   0   |    1    |").unwrap();
        let two = out.find("|   2   |    0    |").unwrap();
        assert!(one < zero && zero < two);
    }

    #[test]
    fn test_repairs_per_year_ascending() {
        let db = db();
        seed(&db);
        let mut s = session(&db, "8\n10\n", &AppConfig::default());
        run(&mut s).unwrap();
        let out = output(&mut s);
        let y2022 = out.find("| 2022 |    1    |").unwrap();
        let y2023 = out.find("| 2023 |    3    |").unwrap();
        assert!(y2022 < y2023);
    }

    #[test]
    fn test_passengers_with_status() {
        let db = db();
        seed(&db);
        db.execute_batch(
            "INSERT INTO Reservation VALUES (0, 0, 0, 'W');
             INSERT INTO Reservation VALUES (1, 0, 1, 'W');
             INSERT INTO Reservation VALUES (2, 0, 1, 'C');",
        )
        .unwrap();
        let mut s = session(&db, "9\nx\nw\n9\nR\n10\n", &AppConfig::default());
        run(&mut s).unwrap();
        let out = output(&mut s);
        assert!(out.contains("2 passengers are waitlisted."));
        assert!(out.contains("0 passengers are reserved."));
    }
}
