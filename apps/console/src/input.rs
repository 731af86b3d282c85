//! Line-oriented prompt helpers shared by every screen.

use std::io::{self, Write};

use chrono::NaiveDate;

/// Reads one trimmed line. A closed stdin surfaces as `UnexpectedEof` so
/// prompt loops end instead of spinning on empty reads.
fn read_line() -> io::Result<String> {
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

pub fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    read_line()
}

/// Prompt with a default taken when the operator just presses enter.
pub fn prompt_or(label: &str, default: &str) -> io::Result<String> {
    print!("{} [{}]: ", label, default);
    io::stdout().flush()?;
    let entry = read_line()?;
    Ok(if entry.is_empty() {
        default.to_string()
    } else {
        entry
    })
}

/// Menu choice. Re-asks until the operator types a number.
pub fn prompt_choice(label: &str) -> io::Result<u32> {
    loop {
        match prompt(label)?.parse() {
            Ok(choice) => return Ok(choice),
            Err(_) => println!("Ingrese un número válido"),
        }
    }
}

/// Numeric id; an empty line means "none".
pub fn prompt_id(label: &str) -> io::Result<Option<i64>> {
    loop {
        let entry = prompt(label)?;
        if entry.is_empty() {
            return Ok(None);
        }
        match entry.parse() {
            Ok(id) => return Ok(Some(id)),
            Err(_) => println!("Ingrese un número válido"),
        }
    }
}

/// Comma-separated id list; an empty line means an empty list.
pub fn prompt_ids(label: &str) -> io::Result<Vec<i64>> {
    loop {
        let entry = prompt(label)?;
        if entry.is_empty() {
            return Ok(Vec::new());
        }
        let parsed: Result<Vec<i64>, _> =
            entry.split(',').map(|part| part.trim().parse()).collect();
        match parsed {
            Ok(ids) => return Ok(ids),
            Err(_) => println!("Ingrese números separados por comas"),
        }
    }
}

/// Calendar date as `AAAA-MM-DD`, defaulting on an empty line.
pub fn prompt_date(label: &str, default: NaiveDate) -> io::Result<NaiveDate> {
    loop {
        match prompt_or(label, &default.to_string())?.parse() {
            Ok(date) => return Ok(date),
            Err(_) => println!("Ingrese una fecha válida (AAAA-MM-DD)"),
        }
    }
}
