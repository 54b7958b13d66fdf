use log::{info, warn};

use crate::codec;
use crate::error::StockError;
use crate::store::{FileStore, RestoreToken, StorePaths};
use crate::types::Stock;
use crate::validate::validate;

/// Результат `add`/`update`: сохранённая запись и копия файла данных до изменения.
///
/// `undo` не зависит от архива, поэтому старый токен переживает последующие
/// попытки, в том числе неудачные.
#[derive(Debug)]
pub struct Saved {
    pub stock: Stock,
    pub undo: RestoreToken,
}

/// Результат `delete`
#[derive(Debug)]
pub struct Deleted {
    /// `false`, если записи с таким id не было
    pub removed: bool,
    pub undo: RestoreToken,
}

/// Публичный фасад хранилища: чтение, поиск и проверенные изменения.
#[derive(Debug, Clone)]
pub struct StockRepository {
    store: FileStore,
}

impl Default for StockRepository {
    fn default() -> Self {
        Self::new(StorePaths::default())
    }
}

impl StockRepository {
    pub fn new(paths: StorePaths) -> Self {
        Self {
            store: FileStore::new(paths),
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn ensure_exists(&self) -> Result<(), StockError> {
        Ok(self.store.ensure_exists()?)
    }

    pub fn snapshot(&self) -> Result<(), StockError> {
        self.store.ensure_exists()?;
        Ok(self.store.snapshot()?)
    }

    /// Отмена: файл данных возвращается к последнему снимку целиком.
    pub fn restore_snapshot(&self) -> Result<(), StockError> {
        Ok(self.store.restore_snapshot()?)
    }

    /// Все записи по возрастанию id
    pub fn list_all(&self) -> Result<Vec<Stock>, StockError> {
        self.store.ensure_exists()?;

        let mut stocks = Vec::new();
        for record in self.store.scan_all()? {
            stocks.push(codec::decode(&record?)?);
        }
        stocks.sort_by_key(|s| s.id);
        Ok(stocks)
    }

    pub fn get_by_id(&self, id: u32) -> Result<Option<Stock>, StockError> {
        self.store.ensure_exists()?;

        match self.store.find_by_id(id)? {
            Some(record) => Ok(Some(codec::decode(&record)?)),
            None => Ok(None),
        }
    }

    /// Записи, где `name + description` содержит `keyword`, по возрастанию id
    pub fn search(&self, keyword: &str) -> Result<Vec<Stock>, StockError> {
        self.store.ensure_exists()?;

        let mut stocks = self
            .store
            .find_by_keyword(keyword)?
            .iter()
            .map(|r| codec::decode(r))
            .collect::<Result<Vec<_>, _>>()?;
        stocks.sort_by_key(|s| s.id);
        Ok(stocks)
    }

    /// Новая запись; id = максимальный + 1 (или 1 в пустом файле).
    pub fn add(&self, candidate: Stock) -> Result<Saved, StockError> {
        let candidate = candidate.normalized().with_id(Stock::UNASSIGNED_ID);

        self.store.ensure_exists()?;
        let undo = self.store.begin_attempt()?;
        self.check(&candidate)?;

        let id = self.next_id()?;
        let stock = candidate.with_id(id);
        self.store.append(&codec::encode(&stock))?;

        info!("added stock {stock}");
        Ok(Saved { stock, undo })
    }

    /// Замена записи с тем же id. Запись с таким id должна существовать.
    pub fn update(&self, candidate: Stock) -> Result<Saved, StockError> {
        let stock = candidate.normalized();

        self.store.ensure_exists()?;
        let undo = self.store.begin_attempt()?;
        self.check(&stock)?;

        let replaced = self
            .store
            .rewrite_replacing(stock.id, &codec::encode(&stock))?;
        if replaced == 0 {
            return Err(StockError::NotFound(stock.id));
        }

        info!("updated stock {stock}");
        Ok(Saved { stock, undo })
    }

    /// Удаление без проверки; снимок всё равно делается.
    pub fn delete(&self, id: u32) -> Result<Deleted, StockError> {
        self.store.ensure_exists()?;
        let undo = self.store.begin_attempt()?;

        let removed = self
            .store
            .rewrite_excluding(|record| codec::record_id(record) == Some(id))?;

        if removed > 0 {
            info!("deleted stock #{id}");
        } else {
            warn!("delete: no stock with id {id}");
        }

        Ok(Deleted {
            removed: removed > 0,
            undo,
        })
    }

    fn check(&self, candidate: &Stock) -> Result<(), StockError> {
        let same_name = self.search(&candidate.name)?;
        validate(candidate, &same_name).map_err(|e| {
            warn!(
                "rejected stock {:?}: {} violation(s)",
                candidate.name,
                e.violations.len()
            );
            StockError::from(e)
        })
    }

    fn next_id(&self) -> Result<u32, StockError> {
        match self.list_all()?.iter().map(|s| s.id).max() {
            Some(max) => max.checked_add(1).ok_or(StockError::IdsExhausted),
            None => Ok(1),
        }
    }
}
