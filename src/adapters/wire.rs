//! Reply decoding for the simulator's text protocol
//!
//! Replies are complete literal encodings of the corresponding value:
//! coordinate pairs like `(3, 4)` and nested lists like
//! `[[0, 1], [True, False]]`. Each function decodes one whole reply;
//! there is no partial or streaming parsing. Errors carry a message
//! only; the transport adapter attaches the request context.

/// Decode a coordinate pair such as `(3, 4)` or `[3, 4]`.
pub fn parse_pair(text: &str) -> Result<(i64, i64), String> {
    let inner = strip_brackets(text.trim());
    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 2 {
        return Err(format!(
            "expected two comma-separated coordinates, got '{}'",
            text.trim()
        ));
    }
    let x = parse_scalar(parts[0])?;
    let y = parse_scalar(parts[1])?;
    Ok((x as i64, y as i64))
}

/// Decode a nested numeric list such as `[[0, 1.5], [2, 3]]` into
/// columns of numbers. `True`/`False` literals decode to 1/0.
pub fn parse_number_grid(text: &str) -> Result<Vec<Vec<f64>>, String> {
    let inner = strip_brackets(text.trim());
    let mut grid = Vec::new();
    for row in split_top_level(inner)? {
        let row = row.trim();
        let row_inner = row
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| format!("expected a bracketed row, got '{row}'"))?;
        let mut cells = Vec::new();
        if !row_inner.trim().is_empty() {
            for cell in row_inner.split(',') {
                cells.push(parse_scalar(cell)?);
            }
        }
        grid.push(cells);
    }
    if grid.is_empty() {
        return Err("grid reply contained no rows".to_string());
    }
    Ok(grid)
}

/// Decode a nested boolean list; any non-zero numeric value counts as
/// `true`.
pub fn parse_bool_grid(text: &str) -> Result<Vec<Vec<bool>>, String> {
    let grid = parse_number_grid(text)?;
    Ok(grid
        .into_iter()
        .map(|row| row.into_iter().map(|v| v != 0.0).collect())
        .collect())
}

fn parse_scalar(token: &str) -> Result<f64, String> {
    match token.trim() {
        "True" | "true" => Ok(1.0),
        "False" | "false" => Ok(0.0),
        other => other
            .parse::<f64>()
            .map_err(|_| format!("invalid numeric literal '{other}'")),
    }
}

fn strip_brackets(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .or_else(|| text.strip_prefix('[').and_then(|s| s.strip_suffix(']')))
        .unwrap_or(text)
}

/// Split `text` on commas at bracket depth zero.
fn split_top_level(text: &str) -> Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(format!("unbalanced brackets in '{text}'"));
                }
            }
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(format!("unbalanced brackets in '{text}'"));
    }
    parts.push(&text[start..]);
    Ok(parts)
}
