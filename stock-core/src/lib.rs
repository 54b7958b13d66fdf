//! # stock-core
//!
//! Хранилище позиций склада (`Stock`) в плоском текстовом файле.
//!
//! Этот крейт содержит:
//!
//! - [`types`]: доменный тип [`Stock`]
//! - [`codec`]: текстовый формат записи и разбиение файла на записи
//! - [`store`]: файл данных + архив: чтение, поиск, дозапись, перезапись, снимки
//! - [`validate`]: проверка кандидата перед записью
//! - [`repository`]: публичный фасад: list/get/search/add/update/delete
//! - [`error`]: типы ошибок
//!
//! ## Быстрый пример
//!
//! ```rust
//! use stock_core::{Stock, StockRepository, StorePaths};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let repo = StockRepository::new(StorePaths::in_dir(dir.path()));
//!
//! let saved = repo.add(Stock::new("Consult", "30 min visit", 50.0, 30, true)).unwrap();
//! assert_eq!(saved.stock.id, 1);
//!
//! let found = repo.search("visit").unwrap();
//! assert_eq!(found, vec![saved.stock.clone()]);
//!
//! // отмена: файл возвращается к снимку, сделанному перед add
//! saved.undo.restore().unwrap();
//! assert!(repo.list_all().unwrap().is_empty());
//! ```
//!
//! ## Дизайн
//!
//! Один процесс, один поток, блокирующий ввод/вывод. Каждая операция сама
//! открывает файлы и закрывает их до возврата. Блокировок нет: два процесса
//! на одном файле могут потерять изменения друг друга.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Доменные типы.
pub mod types;

/// Кодек записи.
pub mod codec;

/// Файловое хранилище.
pub mod store;

/// Проверка кандидатов.
pub mod validate;

/// Фасад хранилища.
pub mod repository;

/// Ошибки `stock-core`.
pub mod error;

/// Общие константы
mod constants;
pub use constants::{DEFAULT_ARCHIVE_FILE, DEFAULT_DATA_FILE};

// --- Re-exports (публичный фасад API) ---

pub use crate::error::{FormatError, StockError, StoreError, ValidationError};
pub use crate::repository::{Deleted, Saved, StockRepository};
pub use crate::store::{FileStore, RestoreToken, StorePaths};
pub use crate::types::Stock;
pub use crate::validate::Violation;
