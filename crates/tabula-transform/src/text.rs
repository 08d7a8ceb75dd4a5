//! String transforms.
//!
//! Only `Text` cells are rewritten by the whitespace and case transforms.
//! Pattern-based transforms also see the text form of numbers, and a number is
//! only turned into text when the transform actually changes it.

use regex::NoExpand;
use serde::Deserialize;
use tabula_model::{Table, Value};

use crate::error::{Result, TransformError};
use crate::frame::{
    TransformOutput, build_pattern, insert_after, map_cells, map_textual, require_absent,
    require_column,
};

fn map_text_only(table: &Table, column: &str, mut f: impl FnMut(&str) -> String) -> Table {
    map_cells(table, column, |cell| match cell {
        Value::Text(text) => Value::Text(f(text)),
        other => other.clone(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimMode {
    Leading,
    Trailing,
    #[default]
    Both,
    /// Remove every whitespace character.
    All,
    /// Trim and collapse inner runs of whitespace to one space.
    NormalizeInner,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrimParams {
    pub mode: TrimMode,
}

pub fn trim_whitespace(
    table: &Table,
    column: &str,
    params: &TrimParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let table = map_text_only(table, column, |text| match params.mode {
        TrimMode::Leading => text.trim_start().to_string(),
        TrimMode::Trailing => text.trim_end().to_string(),
        TrimMode::Both => text.trim().to_string(),
        TrimMode::All => text.chars().filter(|c| !c.is_whitespace()).collect(),
        TrimMode::NormalizeInner => text.split_whitespace().collect::<Vec<_>>().join(" "),
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    Upper,
    Lower,
    /// First character upper, remainder lower.
    Capitalize,
    /// Capitalize every whitespace-separated word.
    Title,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCaseParams {
    pub mode: CaseMode,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

pub fn change_case(
    table: &Table,
    column: &str,
    params: &ChangeCaseParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let table = map_text_only(table, column, |text| match params.mode {
        CaseMode::Upper => text.to_uppercase(),
        CaseMode::Lower => text.to_lowercase(),
        CaseMode::Capitalize => capitalize(text),
        CaseMode::Title => title_case(text),
    });
    Ok(TransformOutput::in_place(table))
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindReplaceParams {
    pub find: String,
    #[serde(default)]
    pub replace: String,
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
    #[serde(default = "default_true")]
    pub replace_all: bool,
}

pub fn find_replace(
    table: &Table,
    column: &str,
    params: &FindReplaceParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    if params.find.is_empty() {
        return Err(TransformError::invalid("Find text cannot be empty"));
    }
    let pattern = build_pattern(&params.find, params.use_regex, params.case_sensitive)?;
    let limit = if params.replace_all { 0 } else { 1 };
    let table = map_textual(table, column, |text| {
        if params.use_regex {
            pattern.replacen(text, limit, params.replace.as_str()).into_owned()
        } else {
            pattern.replacen(text, limit, NoExpand(params.replace.as_str())).into_owned()
        }
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// One new column per part.
    #[default]
    Columns,
    /// The cell becomes a list of parts.
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitColumnParams {
    pub delimiter: String,
    #[serde(default)]
    pub mode: SplitMode,
    #[serde(default)]
    pub max_parts: Option<usize>,
    #[serde(default = "default_true")]
    pub keep_original: bool,
}

fn split_parts(text: &str, delimiter: &str, max_parts: Option<usize>) -> Vec<String> {
    match max_parts {
        Some(n) => text.splitn(n, delimiter).map(str::to_string).collect(),
        None => text.split(delimiter).map(str::to_string).collect(),
    }
}

pub fn split_column(
    table: &Table,
    column: &str,
    params: &SplitColumnParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    if params.delimiter.is_empty() {
        return Err(TransformError::invalid("Delimiter cannot be empty"));
    }
    if params.max_parts == Some(0) {
        return Err(TransformError::invalid("Maximum parts must be at least 1"));
    }

    let split = |cell: &Value| -> Option<Vec<String>> {
        match cell {
            Value::Null => None,
            other => Some(split_parts(&other.to_text(), &params.delimiter, params.max_parts)),
        }
    };

    if params.mode == SplitMode::Array {
        let table = map_cells(table, column, |cell| match split(cell) {
            Some(parts) => Value::List(parts.into_iter().map(Value::Text).collect()),
            None => Value::Null,
        });
        return Ok(TransformOutput::in_place(table));
    }

    let parts: Vec<Option<Vec<String>>> = table.values(column).map(split).collect();
    let width = parts.iter().flatten().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Err(TransformError::invalid(format!(
            "Column '{column}' has no values to split"
        )));
    }
    let new_columns: Vec<String> = (1..=width).map(|i| format!("{column}_{i}")).collect();
    for name in &new_columns {
        require_absent(table, name)?;
    }

    let mut columns = insert_after(table.columns(), column, &new_columns);
    if !params.keep_original {
        columns.retain(|c| c != column);
    }
    let rows = table
        .rows()
        .iter()
        .zip(parts)
        .map(|(row, parts)| {
            let mut updated = row.clone();
            let parts = parts.unwrap_or_default();
            for (i, name) in new_columns.iter().enumerate() {
                let value = parts.get(i).cloned().map_or(Value::Null, Value::Text);
                updated.set(name.clone(), value);
            }
            if !params.keep_original {
                updated.remove(column);
            }
            updated
        })
        .collect();
    let table = table.with_data(columns, rows)?;
    let removed = if params.keep_original {
        Vec::new()
    } else {
        vec![column.to_string()]
    };
    Ok(TransformOutput::added(table, new_columns).with_removed(removed))
}

fn default_space() -> String {
    " ".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcatenateParams {
    pub second_column: String,
    #[serde(default = "default_space")]
    pub delimiter: String,
    #[serde(default)]
    pub drop_sources: bool,
}

/// Joins two columns into `<first>_<second>_combined`, appended at the end.
pub fn concatenate(
    table: &Table,
    column: &str,
    params: &ConcatenateParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    require_column(table, &params.second_column)?;
    let second = params.second_column.as_str();
    let new_name = format!("{column}_{second}_combined");
    require_absent(table, &new_name)?;

    let mut columns = table.columns().to_vec();
    if params.drop_sources {
        columns.retain(|c| c != column && c != second);
    }
    columns.push(new_name.clone());
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut updated = row.clone();
            let (a, b) = (row.get(column), row.get(second));
            let combined = if a.is_null() && b.is_null() {
                Value::Null
            } else {
                Value::Text(format!("{}{}{}", a.to_text(), params.delimiter, b.to_text()))
            };
            updated.set(new_name.clone(), combined);
            updated
        })
        .collect();
    let table = table.with_data(columns, rows)?;
    let removed = if params.drop_sources {
        let mut removed = vec![column.to_string()];
        if second != column {
            removed.push(second.to_string());
        }
        removed
    } else {
        Vec::new()
    };
    Ok(TransformOutput::added(table, vec![new_name]).with_removed(removed))
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractSubstringParams {
    pub start: usize,
    pub length: Option<usize>,
}

/// Character-based substring.
pub fn extract_substring(
    table: &Table,
    column: &str,
    params: &ExtractSubstringParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let table = map_textual(table, column, |text| {
        let chars = text.chars().skip(params.start);
        match params.length {
            Some(n) => chars.take(n).collect(),
            None => chars.collect(),
        }
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadSide {
    #[default]
    Left,
    Right,
}

fn default_pad_char() -> String {
    " ".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PadTextParams {
    pub length: usize,
    #[serde(default = "default_pad_char")]
    pub pad_char: String,
    #[serde(default)]
    pub side: PadSide,
}

pub fn pad_text(table: &Table, column: &str, params: &PadTextParams) -> Result<TransformOutput> {
    require_column(table, column)?;
    let mut pad_chars = params.pad_char.chars();
    let (Some(pad), None) = (pad_chars.next(), pad_chars.next()) else {
        return Err(TransformError::invalid("Pad character must be a single character"));
    };
    let table = map_textual(table, column, |text| {
        let missing = params.length.saturating_sub(text.chars().count());
        let padding: String = std::iter::repeat_n(pad, missing).collect();
        match params.side {
            PadSide::Left => format!("{padding}{text}"),
            PadSide::Right => format!("{text}{padding}"),
        }
    });
    Ok(TransformOutput::in_place(table))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveKind {
    Digits,
    Letters,
    Punctuation,
    Whitespace,
    NonAlphanumeric,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCharactersParams {
    pub kind: RemoveKind,
    #[serde(default)]
    pub characters: Option<String>,
}

pub fn remove_characters(
    table: &Table,
    column: &str,
    params: &RemoveCharactersParams,
) -> Result<TransformOutput> {
    require_column(table, column)?;
    let custom: Vec<char> = match (params.kind, &params.characters) {
        (RemoveKind::Custom, Some(chars)) if !chars.is_empty() => chars.chars().collect(),
        (RemoveKind::Custom, _) => {
            return Err(TransformError::invalid(
                "Custom removal requires a set of characters",
            ));
        }
        _ => Vec::new(),
    };
    let removes = |c: char| match params.kind {
        RemoveKind::Digits => c.is_numeric(),
        RemoveKind::Letters => c.is_alphabetic(),
        RemoveKind::Punctuation => c.is_ascii_punctuation(),
        RemoveKind::Whitespace => c.is_whitespace(),
        RemoveKind::NonAlphanumeric => !c.is_alphanumeric() && !c.is_whitespace(),
        RemoveKind::Custom => custom.contains(&c),
    };
    let table = map_textual(table, column, |text| text.chars().filter(|c| !removes(*c)).collect());
    Ok(TransformOutput::in_place(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_lowercases_the_rest() {
        assert_eq!(capitalize("hELLO wORLD"), "Hello world");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn title_case_keeps_spacing() {
        assert_eq!(title_case("the  quick\tfox"), "The  Quick\tFox");
    }

    #[test]
    fn split_parts_respects_limit() {
        assert_eq!(split_parts("a,b,c", ",", Some(2)), vec!["a", "b,c"]);
        assert_eq!(split_parts("a,b,c", ",", None), vec!["a", "b", "c"]);
    }
}
