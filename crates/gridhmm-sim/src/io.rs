//! Plain-text grid and scenario files.
//!
//! Grid file: a `"<rows> <columns>"` header, then one `"<row> <col> <code>"` line
//! per cell with 1-indexed coordinates and `code` one of `N`, `H`, `T`, `B`.
//!
//! Scenario file: the start position, one position per step, a line of action
//! codes (`U`, `D`, `L`, `R`), then a line of observation codes (`N`, `H`, `T`).
//! Positions are `"<row> <col>"`, 1-indexed like the grid file.

use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use gridhmm_core::{Action, Observation, Position, Scenario, TerrainGrid, TerrainKind};

use crate::error::SimError;

/// Write a grid in the text format.
pub fn write_grid<W: Write>(grid: &TerrainGrid, mut writer: W) -> Result<(), SimError> {
    writeln!(writer, "{} {}", grid.rows(), grid.columns())?;
    for (index, kind) in grid.cells().iter().enumerate() {
        let position = grid.position_of(index);
        writeln!(
            writer,
            "{} {} {}",
            position.row + 1,
            position.col + 1,
            kind.code()
        )?;
    }
    Ok(())
}

/// Parse a grid from the text format. Every cell must be listed exactly once.
pub fn parse_grid(text: &str) -> Result<TerrainGrid, SimError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| SimError::parse(1, "missing grid header"))?;
    let (rows, columns) = parse_pair(header_line, header)?;
    if rows == 0 || columns == 0 {
        return Err(SimError::parse(header_line, "grid must not be empty"));
    }

    // Every cell needs its own line, so the body bounds the allocation.
    let body: Vec<(usize, &str)> = lines.collect();
    let expected = rows
        .checked_mul(columns)
        .ok_or_else(|| SimError::parse(header_line, "grid is too large"))?;
    if expected > body.len() {
        return Err(SimError::parse(
            header_line,
            format!(
                "a {rows}x{columns} grid needs {expected} cells, the file lists {}",
                body.len()
            ),
        ));
    }

    let mut cells: Vec<Option<TerrainKind>> = vec![None; expected];
    for (line_no, line) in body {
        let mut fields = line.split_whitespace();
        let (Some(row), Some(col), Some(code), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(SimError::parse(line_no, "expected '<row> <col> <terrain>'"));
        };

        let row = parse_index(line_no, row, rows)?;
        let col = parse_index(line_no, col, columns)?;
        let kind = single_char(code)
            .and_then(TerrainKind::from_code)
            .ok_or_else(|| SimError::parse(line_no, format!("unknown terrain code '{code}'")))?;

        let slot = &mut cells[row * columns + col];
        if slot.is_some() {
            return Err(SimError::parse(
                line_no,
                format!("cell {} {} listed twice", row + 1, col + 1),
            ));
        }
        *slot = Some(kind);
    }

    let cells = cells
        .into_iter()
        .enumerate()
        .map(|(index, kind)| {
            kind.ok_or_else(|| {
                SimError::parse(
                    header_line,
                    format!(
                        "cell {} {} is missing",
                        index / columns + 1,
                        index % columns + 1
                    ),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TerrainGrid::new(rows, columns, cells)?)
}

/// Write a grid file to disk.
pub fn save_grid(path: impl AsRef<Path>, grid: &TerrainGrid) -> Result<(), SimError> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    write_grid(grid, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a grid file from disk.
pub fn load_grid(path: impl AsRef<Path>) -> Result<TerrainGrid, SimError> {
    let text = fs::read_to_string(path)?;
    parse_grid(&text)
}

/// Write a scenario in the text format.
pub fn write_scenario<W: Write>(scenario: &Scenario, mut writer: W) -> Result<(), SimError> {
    for position in scenario.positions() {
        writeln!(writer, "{} {}", position.row + 1, position.col + 1)?;
    }
    let actions: String = scenario.actions().iter().map(|a| a.code()).collect();
    let observations: String = scenario.observations().iter().map(|o| o.code()).collect();
    writeln!(writer, "{actions}")?;
    writeln!(writer, "{observations}")?;
    Ok(())
}

/// Parse a scenario from the text format.
pub fn parse_scenario(text: &str) -> Result<Scenario, SimError> {
    let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
    // The last two lines may be empty for a walk with no steps, so keep three.
    while lines.len() > 3 && lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    if lines.len() < 3 {
        return Err(SimError::parse(
            lines.len().max(1),
            "expected a start position, an action line, and an observation line",
        ));
    }

    let (position_lines, codes) = lines.split_at(lines.len() - 2);
    let positions = position_lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let (row, col) = parse_pair(i + 1, line)?;
            if row == 0 || col == 0 {
                return Err(SimError::parse(i + 1, "positions are 1-indexed"));
            }
            Ok(Position::new(row - 1, col - 1))
        })
        .collect::<Result<Vec<_>, SimError>>()?;

    let action_line = lines.len() - 1;
    let actions = codes[0]
        .chars()
        .map(|c| {
            Action::from_code(c)
                .ok_or_else(|| SimError::parse(action_line, format!("unknown action code '{c}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let observation_line = lines.len();
    let observations = codes[1]
        .chars()
        .map(|c| {
            Observation::from_code(c).ok_or_else(|| {
                SimError::parse(
                    observation_line,
                    format!("unknown observation code '{c}'"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scenario::new(positions, actions, observations)?)
}

/// Write a scenario file to disk.
pub fn save_scenario(path: impl AsRef<Path>, scenario: &Scenario) -> Result<(), SimError> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    write_scenario(scenario, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a scenario file from disk.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario, SimError> {
    let text = fs::read_to_string(path)?;
    parse_scenario(&text)
}

fn parse_pair(line_no: usize, line: &str) -> Result<(usize, usize), SimError> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(a), Some(b), None) => {
            let a = a
                .parse()
                .map_err(|_| SimError::parse(line_no, format!("'{a}' is not a number")))?;
            let b = b
                .parse()
                .map_err(|_| SimError::parse(line_no, format!("'{b}' is not a number")))?;
            Ok((a, b))
        }
        _ => Err(SimError::parse(line_no, "expected two numbers")),
    }
}

/// Parse a 1-indexed coordinate into a 0-indexed one below `limit`.
fn parse_index(line_no: usize, field: &str, limit: usize) -> Result<usize, SimError> {
    let value: usize = field
        .parse()
        .map_err(|_| SimError::parse(line_no, format!("'{field}' is not a number")))?;
    if value == 0 || value > limit {
        return Err(SimError::parse(
            line_no,
            format!("index {value} is outside 1..={limit}"),
        ));
    }
    Ok(value - 1)
}

fn single_char(field: &str) -> Option<char> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
