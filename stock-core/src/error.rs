use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::validate::Violation;

/// Верхнеуровневый тип ошибок крейта
#[derive(Debug, Error)]
pub enum StockError {
    /// Запись в файле не разбирается
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Кандидат не прошёл проверку перед записью
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Ошибки файлового ввода/вывода
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Записи с таким id нет в файле
    #[error("stock not found: {0}")]
    NotFound(u32),

    /// Следующий id не помещается в u32
    #[error("no free stock id left")]
    IdsExhausted,
}

/// Ошибки формата записи
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Полей не шесть
    #[error("expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid stock id: {0:?}")]
    InvalidId(String),

    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    #[error("invalid minutes: {0:?}")]
    InvalidMinutes(String),

    /// Ожидался литерал `True`/`False`
    #[error("invalid procedure flag: {0:?}")]
    InvalidFlag(String),

    /// Байты файла не являются UTF-8
    #[error("record is not valid UTF-8 text")]
    NotUtf8,

    /// Файл закончился посреди записи
    #[error("unterminated record at end of file: {0:?}")]
    Unterminated(String),
}

/// Ошибка ввода/вывода с именем операции, которая её вызвала
#[derive(Debug, Error)]
#[error("{op} failed on {path:?}: {source}")]
pub struct StoreError {
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl StoreError {
    pub(crate) fn new(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Все нарушенные правила кандидата сразу
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn contains(&self, v: Violation) -> bool {
        self.violations.contains(&v)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "--{v}")?;
        }
        Ok(())
    }
}
