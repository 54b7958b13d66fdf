//! Текстовый формат записи:
//!
//! `id \t name \t description \t price \t minutes \t True|False`
//!
//! Текстовые поля пишутся с экранированием (`\\`, `\t`, `\n`, `\r`), поэтому
//! каждая записанная запись занимает ровно одну строку. Старые файлы, где
//! описание содержит сырые переводы строк, по-прежнему читаются, см. `RecordReader`.

use std::borrow::Cow;
use std::io::{self, BufRead};

use crate::error::FormatError;
use crate::types::Stock;

/// Число полей в записи
pub const FIELD_COUNT: usize = 6;

const SEP: char = '\t';
const TRUE_LIT: &str = "True";
const FALSE_LIT: &str = "False";

/// Stock -> одна строка (без завершающего перевода строки)
pub fn encode(stock: &Stock) -> String {
    format!(
        "{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}",
        stock.id,
        escape(&stock.name),
        escape(&stock.description),
        stock.price,
        stock.minutes,
        flag_literal(stock.is_procedure),
    )
}

/// Полная запись (как её собрал `RecordReader`) -> Stock
pub fn decode(record: &str) -> Result<Stock, FormatError> {
    let fields: Vec<&str> = record.split(SEP).collect();
    let [id, name, description, price, minutes, flag] = fields.as_slice() else {
        return Err(FormatError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    };

    let id = id
        .parse::<u32>()
        .map_err(|_| FormatError::InvalidId(id.to_string()))?;

    let price = price
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| FormatError::InvalidPrice(price.to_string()))?;

    let minutes = minutes
        .parse::<i32>()
        .map_err(|_| FormatError::InvalidMinutes(minutes.to_string()))?;

    let is_procedure = match *flag {
        TRUE_LIT => true,
        FALSE_LIT => false,
        other => return Err(FormatError::InvalidFlag(other.to_string())),
    };

    Ok(Stock {
        id,
        name: unescape(name),
        description: unescape(description),
        price,
        minutes,
        is_procedure,
    })
}

/// id записи без полного разбора; `None`, если префикс не число
pub fn record_id(record: &str) -> Option<u32> {
    let (id, _) = record.split_once(SEP)?;
    id.parse().ok()
}

/// `name + description` (без экранирования) для поиска по ключевому слову
pub fn search_text(record: &str) -> Option<String> {
    let mut fields = record.split(SEP).skip(1);
    let name = fields.next()?;
    let description = fields.next()?;

    let mut text = unescape(name);
    text.push_str(&unescape(description));
    Some(text)
}

fn flag_literal(v: bool) -> &'static str {
    if v { TRUE_LIT } else { FALSE_LIT }
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '\t', '\n', '\r']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Неизвестные последовательности остаются как есть: в старых файлах
/// обратный слеш никто не экранировал.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Запись закончена, когда в ней уже есть все разделители и последний
/// токен ровно `True`/`False`.
fn is_complete(record: &str) -> bool {
    record.matches(SEP).count() >= FIELD_COUNT - 1
        && matches!(record.rsplit(SEP).next(), Some(TRUE_LIT | FALSE_LIT))
}

#[derive(Debug)]
pub(crate) enum FrameError {
    Io(io::Error),
    Format(FormatError),
}

/// Собирает записи из строк файла.
///
/// Строки накапливаются (с `\n` между ними), пока запись не станет полной.
/// Пустые строки между записями пропускаются.
pub(crate) struct RecordReader<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> RecordReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<String, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = String::new();
        let mut started = false;

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    return Some(Err(FrameError::Format(FormatError::NotUtf8)));
                }
                Some(Err(e)) => return Some(Err(FrameError::Io(e))),
                None if started => {
                    return Some(Err(FrameError::Format(FormatError::Unterminated(record))));
                }
                None => return None,
            };

            if !started && line.trim().is_empty() {
                continue;
            }

            if started {
                record.push('\n');
            }
            record.push_str(&line);
            started = true;

            if is_complete(&record) {
                return Some(Ok(record));
            }
        }
    }
}
