// 항공 운영 스키마. 이미 있는 테이블은 건드리지 않는다.
pub const AIRLINE: &str = "
CREATE TABLE IF NOT EXISTS Plane (
    id      INTEGER NOT NULL PRIMARY KEY,
    make    TEXT    NOT NULL,
    model   TEXT    NOT NULL,
    age     INTEGER NOT NULL CHECK (age >= 0),
    seats   INTEGER NOT NULL CHECK (seats >= 0 AND seats < 500)
);

CREATE TABLE IF NOT EXISTS Pilot (
    id          INTEGER NOT NULL PRIMARY KEY,
    fullname    TEXT    NOT NULL,
    nationality TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS Flight (
    fnum                  INTEGER NOT NULL PRIMARY KEY,
    cost                  INTEGER NOT NULL CHECK (cost >= 0),
    num_sold              INTEGER NOT NULL CHECK (num_sold >= 0),
    num_stops             INTEGER NOT NULL CHECK (num_stops >= 0),
    actual_departure_date TEXT    NOT NULL,
    actual_arrival_date   TEXT    NOT NULL,
    arrival_airport       TEXT    NOT NULL,
    departure_airport     TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS FlightInfo (
    fiid      INTEGER NOT NULL PRIMARY KEY,
    flight_id INTEGER NOT NULL REFERENCES Flight (fnum),
    pilot_id  INTEGER REFERENCES Pilot (id),
    plane_id  INTEGER REFERENCES Plane (id)
);

CREATE TABLE IF NOT EXISTS Technician (
    id        INTEGER NOT NULL PRIMARY KEY,
    full_name TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS Customer (
    id      INTEGER NOT NULL PRIMARY KEY,
    fname   TEXT    NOT NULL,
    lname   TEXT    NOT NULL,
    gtype   TEXT    NOT NULL,
    dob     TEXT    NOT NULL,
    address TEXT,
    phone   TEXT,
    zipcode TEXT
);

CREATE TABLE IF NOT EXISTS Reservation (
    rnum   INTEGER NOT NULL PRIMARY KEY,
    cid    INTEGER NOT NULL REFERENCES Customer (id),
    fid    INTEGER NOT NULL REFERENCES Flight (fnum),
    status TEXT    NOT NULL CHECK (status IN ('W', 'C', 'R'))
);

CREATE TABLE IF NOT EXISTS Repairs (
    rid           INTEGER NOT NULL PRIMARY KEY,
    repair_date   TEXT    NOT NULL,
    repair_code   TEXT    NOT NULL,
    pilot_id      INTEGER REFERENCES Pilot (id),
    plane_id      INTEGER NOT NULL REFERENCES Plane (id),
    technician_id INTEGER REFERENCES Technician (id)
);
";

/// Counters used by the sequence id strategy, one row per `table.column`.
pub const ID_SEQUENCE: &str = "
CREATE TABLE IF NOT EXISTS id_sequence (
    name       TEXT    NOT NULL PRIMARY KEY,
    next_value INTEGER NOT NULL
);
";
