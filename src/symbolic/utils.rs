// the collection of utility functions mainly for bracket parsing and proceeding

/// true when every '(' has its ')' and no ')' comes first
pub fn brackets_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Byte position of the ')' closing the '(' found at `bracket_start`.
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in input.char_indices().skip_while(|(i, _)| *i < bracket_start) {
        if c == '(' {
            depth += 1;
        } else if c == ')' {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Splits `input` at commas that are not nested inside brackets.
pub fn split_outside_brackets(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if c == separator && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Position of the first `target_char` at bracket depth zero.
pub fn find_char_positions_outside_brackets(s: &str, target_char: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if ch == target_char && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values < 2 {
        return vec![start; num_values];
    }
    let step = (end - start) / (num_values as f64 - 1.0);
    (0..num_values).map(|i| start + i as f64 * step).collect()
}
