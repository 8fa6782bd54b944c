use once_cell::sync::Lazy;
use regex::Regex;

static TABLE_LINE: Lazy<Regex> = Lazy::new(|| compile(r"^\s*\|"));
static TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| compile(r"^\s*\|[-:|\s]*$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid table pattern {pattern}: {err}"))
}

/// Pad table rows that are missing trailing cells so they keep parsing as
/// rows of the table above them.
///
/// The column count comes from the header's pipe count. Header and separator
/// lines are never modified, and any line that does not start with a pipe
/// ends the table.
pub fn pad_tables(text: &str) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut in_table = false;
    let mut expected_pipes = 0;
    let mut index = 0;

    while index < lines.len() {
        if !TABLE_LINE.is_match(&lines[index]) {
            in_table = false;
            expected_pipes = 0;
            index += 1;
            continue;
        }

        if !in_table {
            let separator_follows = lines
                .get(index + 1)
                .is_some_and(|next| TABLE_SEPARATOR.is_match(next));
            if separator_follows {
                in_table = true;
                expected_pipes = count_pipes(&lines[index]);
                index += 2;
                continue;
            }
        } else {
            let missing = expected_pipes.saturating_sub(count_pipes(&lines[index]));
            if missing > 0 {
                let mut padded = lines[index].trim_end().to_string();
                padded.push_str(&" |".repeat(missing));
                lines[index] = padded;
            }
        }
        index += 1;
    }

    lines.join("\n")
}

fn count_pipes(line: &str) -> usize {
    line.matches('|').count()
}
