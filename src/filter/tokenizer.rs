use super::error::FilterCodecError;

/// Split a `key(body),key(body),...` string into its top-level groups.
///
/// Only commas outside any parentheses separate groups; the body of each
/// group is returned raw so callers can tokenize it again one level down.
/// Keys may repeat and are returned in input order.
pub fn tokenize_part(input: &str) -> Result<Vec<(&str, &str)>, FilterCodecError> {
    let mut parts = Vec::new();
    if input.is_empty() {
        return Ok(parts);
    }

    let mut depth = 0usize;
    let mut group_start = 0usize;
    let mut open_at: Option<usize> = None;
    let mut closed = false;

    for (i, c) in input.char_indices() {
        match c {
            '(' => {
                if closed {
                    return Err(FilterCodecError::malformed(
                        i,
                        "unexpected '(' after a closed group",
                    ));
                }
                if depth == 0 {
                    open_at = Some(i);
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    return Err(FilterCodecError::malformed(i, "unmatched ')'"));
                }
                depth -= 1;
                if depth == 0
                    && let Some(open) = open_at
                {
                    parts.push((&input[group_start..open], &input[open + 1..i]));
                    closed = true;
                }
            }
            ',' if depth == 0 => {
                if !closed {
                    return Err(incomplete_group(group_start, &input[group_start..i]));
                }
                group_start = i + 1;
                open_at = None;
                closed = false;
            }
            _ if depth == 0 && closed => {
                return Err(FilterCodecError::malformed(
                    i,
                    "unexpected text after a closed group",
                ));
            }
            _ => {}
        }
    }

    if depth > 0 {
        return Err(FilterCodecError::malformed(
            open_at.unwrap_or(group_start),
            "unclosed '('",
        ));
    }
    if !closed {
        return Err(incomplete_group(group_start, &input[group_start..]));
    }

    Ok(parts)
}

fn incomplete_group(position: usize, group: &str) -> FilterCodecError {
    if group.is_empty() {
        FilterCodecError::malformed(position, "empty group")
    } else {
        FilterCodecError::malformed(position, format!("group '{group}' has no '(...)' body"))
    }
}

/// Split a comma separated value list. An empty body is one empty value.
pub fn split_values(body: &str) -> impl Iterator<Item = &str> {
    body.split(',')
}
