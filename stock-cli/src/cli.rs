use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use stock_core::{DEFAULT_ARCHIVE_FILE, DEFAULT_DATA_FILE, Stock, StorePaths};

/// Stock CLI - ведение списка товаров и процедур в текстовом файле.
///
/// Каждое изменение сначала снимает копию файла в архив;
/// `restore` возвращает файл к этой копии.
#[derive(Parser, Debug, Clone)]
#[command(name = "stock-cli", version, about)]
pub(crate) struct Args {
    /// Файл данных
    #[arg(long, global = true, default_value = DEFAULT_DATA_FILE)]
    pub(crate) data: PathBuf,

    /// Файл архива (последний снимок данных)
    #[arg(long, global = true, default_value = DEFAULT_ARCHIVE_FILE)]
    pub(crate) archive: PathBuf,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub(crate) enum Command {
    /// Все записи (по имени; с --by-id по id)
    List {
        #[arg(long)]
        by_id: bool,
    },

    /// Одна запись по id
    Get { id: u32 },

    /// Поиск по имени и описанию без учёта регистра
    Search { keyword: String },

    /// Новая запись
    Add(StockFields),

    /// Заменить запись с данным id
    Update {
        id: u32,
        #[command(flatten)]
        fields: StockFields,
    },

    /// Удалить запись
    Delete { id: u32 },

    /// Отменить последнее изменение (архив -> данные)
    Restore,
}

/// Поля записи, которые вводит пользователь
#[derive(ClapArgs, Debug, Clone, PartialEq)]
pub(crate) struct StockFields {
    #[arg(long)]
    pub(crate) name: String,

    /// Описание; может быть многострочным
    #[arg(long)]
    pub(crate) description: String,

    /// Цена, например 50 или 12.75
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) price: f64,

    /// Длительность процедуры; для товаров 0
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub(crate) minutes: i32,

    /// Запись является процедурой, а не товаром
    #[arg(long)]
    pub(crate) procedure: bool,
}

impl StockFields {
    pub(crate) fn into_stock(self, id: u32) -> Stock {
        Stock::new(
            self.name,
            self.description,
            self.price,
            self.minutes,
            self.procedure,
        )
        .with_id(id)
    }
}

impl Args {
    /// Проверки, которые clap не выражает
    pub(crate) fn validate(&self) -> Result<()> {
        if self.data == self.archive {
            bail!("--data and --archive must be different files (got: {:?})", self.data);
        }
        Ok(())
    }

    pub(crate) fn store_paths(&self) -> StorePaths {
        StorePaths::new(&self.data, &self.archive)
    }
}
