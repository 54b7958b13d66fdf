use log::{debug, warn};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::codec::{self, FrameError, RecordReader};
use crate::constants::{DEFAULT_ARCHIVE_FILE, DEFAULT_DATA_FILE};
use crate::error::{StockError, StoreError};

/// Пара файлов хранилища: данные и архив (последний снимок данных)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub data: PathBuf,
    pub archive: PathBuf,
}

impl StorePaths {
    pub fn new(data: impl Into<PathBuf>, archive: impl Into<PathBuf>) -> Self {
        Self {
            data: data.into(),
            archive: archive.into(),
        }
    }

    /// Имена файлов по умолчанию внутри каталога `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DEFAULT_DATA_FILE), dir.join(DEFAULT_ARCHIVE_FILE))
    }
}

impl Default for StorePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE, DEFAULT_ARCHIVE_FILE)
    }
}

/// Файловое хранилище записей.
///
/// Каждый вызов сам открывает и закрывает нужные файлы; общих дескрипторов нет.
/// Блокировок тоже нет: файл должен принадлежать одному процессу.
#[derive(Debug, Clone)]
pub struct FileStore {
    paths: StorePaths,
}

impl FileStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Если файла данных нет: восстановить его из архива (rename), иначе создать пустой.
    pub fn ensure_exists(&self) -> Result<(), StoreError> {
        const OP: &str = "ensure_exists";
        let StorePaths { data, archive } = &self.paths;

        if exists(OP, data)? {
            return Ok(());
        }

        if exists(OP, archive)? {
            warn!("data file {data:?} is missing; recovering it from archive {archive:?}");
            fs::rename(archive, data).map_err(|e| StoreError::new(OP, data, e))?;
        } else {
            debug!("creating empty data file {data:?}");
            File::create(data).map_err(|e| StoreError::new(OP, data, e))?;
        }

        Ok(())
    }

    /// Ленивый проход по всем записям файла данных.
    ///
    /// Файл открывается сразу, читается по мере итерации.
    pub fn scan_all(&self) -> Result<Records, StoreError> {
        Records::open("scan", &self.paths.data)
    }

    /// Первая запись с данным id
    pub fn find_by_id(&self, id: u32) -> Result<Option<String>, StockError> {
        for record in self.scan_all()? {
            let record = record?;
            if codec::record_id(&record) == Some(id) {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Все записи, у которых `name + description` содержит `keyword` (без учёта регистра)
    pub fn find_by_keyword(&self, keyword: &str) -> Result<Vec<String>, StockError> {
        let keyword = keyword.to_lowercase();
        let mut out = Vec::new();

        for record in self.scan_all()? {
            let record = record?;
            match codec::search_text(&record) {
                Some(text) if text.to_lowercase().contains(&keyword) => out.push(record),
                Some(_) => {}
                None => debug!("skipping malformed record during search: {record:?}"),
            }
        }

        Ok(out)
    }

    /// Дописать запись в конец файла данных
    pub fn append(&self, record: &str) -> Result<(), StoreError> {
        const OP: &str = "append";
        let data = &self.paths.data;

        let mut f = OpenOptions::new()
            .append(true)
            .create(true)
            .open(data)
            .map_err(|e| StoreError::new(OP, data, e))?;

        writeln!(f, "{record}").map_err(|e| StoreError::new(OP, data, e))?;
        Ok(())
    }

    /// Переписать файл без записей, для которых `pred` истинен.
    ///
    /// Возвращает число удалённых записей.
    pub fn rewrite_excluding(
        &self,
        mut pred: impl FnMut(&str) -> bool,
    ) -> Result<usize, StockError> {
        let mut removed = 0;
        self.rewrite_with("rewrite_excluding", |record| {
            if pred(&record) {
                removed += 1;
                None
            } else {
                Some(record)
            }
        })?;
        debug!("rewrite removed {removed} record(s)");
        Ok(removed)
    }

    /// Переписать файл, подставив `replacement` вместо записей с данным id.
    ///
    /// Возвращает число заменённых записей.
    pub fn rewrite_replacing(&self, id: u32, replacement: &str) -> Result<usize, StockError> {
        let mut replaced = 0;
        self.rewrite_with("rewrite_replacing", |record| {
            if codec::record_id(&record) == Some(id) {
                replaced += 1;
                Some(replacement.to_string())
            } else {
                Some(record)
            }
        })?;
        debug!("rewrite replaced {replaced} record(s) with id {id}");
        Ok(replaced)
    }

    /// Снимок данных в архив; старый архив перезаписывается.
    pub fn snapshot(&self) -> Result<(), StoreError> {
        let StorePaths { data, archive } = &self.paths;
        fs::copy(data, archive).map_err(|e| StoreError::new("snapshot", data, e))?;
        debug!("snapshot {data:?} -> {archive:?}");
        Ok(())
    }

    /// Снимок перед попыткой изменения.
    ///
    /// Архив перезаписывается как обычно, а токен хранит собственную копию
    /// содержимого: следующие попытки на него не влияют.
    pub fn begin_attempt(&self) -> Result<RestoreToken, StoreError> {
        const OP: &str = "begin_attempt";
        let data = &self.paths.data;

        let contents = fs::read(data).map_err(|e| StoreError::new(OP, data, e))?;
        self.snapshot()?;

        Ok(RestoreToken {
            data: data.clone(),
            contents,
        })
    }

    /// Вернуть файл данных к последнему снимку (копия архива поверх данных).
    ///
    /// Если файла данных нет, архив просто становится им.
    pub fn restore_snapshot(&self) -> Result<(), StoreError> {
        const OP: &str = "restore_snapshot";
        let StorePaths { data, archive } = &self.paths;

        if !exists(OP, data)? {
            return self.ensure_exists();
        }

        fs::copy(archive, data).map_err(|e| StoreError::new(OP, archive, e))?;
        debug!("restored {data:?} from {archive:?}");
        Ok(())
    }

    /// Общий механизм перезаписи: данные копируются в архив, затем архив
    /// прокачивается обратно в обрезанный файл данных через `f`.
    ///
    /// При ошибке посреди прохода данные могут остаться обрезанными;
    /// полная копия лежит в архиве.
    fn rewrite_with(
        &self,
        op: &'static str,
        mut f: impl FnMut(String) -> Option<String>,
    ) -> Result<(), StockError> {
        let StorePaths { data, archive } = &self.paths;

        self.snapshot()?;

        let source = Records::open(op, archive)?;
        let target = File::create(data).map_err(|e| StoreError::new(op, data, e))?;
        let mut w = BufWriter::new(target);

        for record in source {
            if let Some(out) = f(record?) {
                writeln!(w, "{out}").map_err(|e| StoreError::new(op, data, e))?;
            }
        }

        w.flush().map_err(|e| StoreError::new(op, data, e))?;
        Ok(())
    }
}

fn exists(op: &'static str, path: &Path) -> Result<bool, StoreError> {
    path.try_exists().map_err(|e| StoreError::new(op, path, e))
}

/// Снимок, сделанный перед изменением. `restore` возвращает файл данных к нему.
#[derive(Clone)]
pub struct RestoreToken {
    data: PathBuf,
    contents: Vec<u8>,
}

impl RestoreToken {
    pub fn restore(self) -> Result<(), StoreError> {
        fs::write(&self.data, &self.contents)
            .map_err(|e| StoreError::new("restore", &self.data, e))?;
        debug!("restored {:?} to attempt snapshot ({} bytes)", self.data, self.contents.len());
        Ok(())
    }
}

impl fmt::Debug for RestoreToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoreToken")
            .field("data", &self.data)
            .field("bytes", &self.contents.len())
            .finish()
    }
}

/// Итератор сырых записей одного файла
pub struct Records {
    op: &'static str,
    path: PathBuf,
    inner: RecordReader<BufReader<File>>,
}

impl Records {
    fn open(op: &'static str, path: &Path) -> Result<Self, StoreError> {
        let f = File::open(path).map_err(|e| StoreError::new(op, path, e))?;
        Ok(Self {
            op,
            path: path.to_path_buf(),
            inner: RecordReader::new(BufReader::new(f)),
        })
    }
}

impl Iterator for Records {
    type Item = Result<String, StockError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        Some(item.map_err(|e| match e {
            FrameError::Io(e) => StockError::from(StoreError::new(self.op, &self.path, e)),
            FrameError::Format(e) => StockError::from(e),
        }))
    }
}
